//! `#rrggbb` colours as edited by the colour picker.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::ControlError;

/// An sRGB colour stored as three bytes, parsed from and formatted to `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const WHITE: Self = Self([0xff, 0xff, 0xff]);
    pub const BLACK: Self = Self([0x00, 0x00, 0x00]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Pack as `0xrrggbb`.
    pub fn to_u32(self) -> u32 {
        let [r, g, b] = self.0;
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }

    pub fn from_u32(value: u32) -> Self {
        Self([(value >> 16) as u8, (value >> 8) as u8, value as u8])
    }

    /// Channels in `[0, 1]`, still sRGB-encoded.
    pub fn to_srgb_f32(self) -> [f32; 3] {
        self.0.map(|c| f32::from(c) / 255.0)
    }

    /// Channels decoded to linear light, for shading and clear colours on an
    /// sRGB surface.
    pub fn to_linear(self) -> [f32; 3] {
        self.0.map(|c| srgb_to_linear(f32::from(c) / 255.0))
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl FromStr for HexColor {
    type Err = ControlError;

    /// Accepts `#rrggbb` and the shorthand `#rgb`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ControlError::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => u32::from_str_radix(digits, 16)
                .map(Self::from_u32)
                .map_err(|_| invalid()),
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16)
                    .map(Self::from_u32)
                    .map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// A random colour string in `#rrggbb` form.
///
/// Values come from `0x100000..0xffffff`, so the string always has six digits
/// without padding.
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06x}", rng.gen_range(0x10_0000u32..0xff_ffff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_parse_long_form() {
        let color: HexColor = "#76acda".parse().unwrap();
        assert_eq!(color, HexColor::new(0x76, 0xac, 0xda));
        assert_eq!(color.to_u32(), 0x76acda);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let upper: HexColor = "#FFAA00".parse().unwrap();
        let lower: HexColor = "#ffaa00".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_parse_shorthand() {
        let color: HexColor = "#0f8".parse().unwrap();
        assert_eq!(color, HexColor::new(0x00, 0xff, 0x88));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["76acda", "#76acd", "#76acdz", "#", "", "#1234567"] {
            assert!(bad.parse::<HexColor>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_display_pads_channels() {
        assert_eq!(HexColor::new(0x01, 0x02, 0x03).to_string(), "#010203");
        assert_eq!(HexColor::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(HexColor::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let white = HexColor::WHITE.to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_linear_is_darker_than_srgb_midtones() {
        let grey = HexColor::new(0x80, 0x80, 0x80);
        let srgb = grey.to_srgb_f32()[0];
        let linear = grey.to_linear()[0];
        assert!(linear < srgb);
        assert!((linear - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_random_hex_color_shape() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        for _ in 0..500 {
            let s = random_hex_color(&mut rng);
            assert_eq!(s.len(), 7);
            assert!(s.starts_with('#'));
            assert!(s[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            assert!(s.parse::<HexColor>().is_ok());
        }
    }
}
