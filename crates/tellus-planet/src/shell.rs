//! Shell identifiers and the parameters each shell is built from.

use std::fmt;
use std::str::FromStr;

use tellus_controls::HexColor;
use tracing::warn;

use crate::PlanetError;

/// One of the three concentric planet layers, innermost first in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellKind {
    Ocean,
    Ground,
    HighGround,
}

impl ShellKind {
    pub const ALL: [ShellKind; 3] = [ShellKind::Ocean, ShellKind::Ground, ShellKind::HighGround];

    /// Panel folder name for this shell.
    pub fn name(self) -> &'static str {
        match self {
            ShellKind::Ocean => "Ocean",
            ShellKind::Ground => "Ground",
            ShellKind::HighGround => "HighGround",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ShellKind::Ocean => 0,
            ShellKind::Ground => 1,
            ShellKind::HighGround => 2,
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShellKind {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PlanetError::UnknownShell(s.to_string()))
    }
}

/// Tessellation and jitter for one shell surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Upper bound of the per-vertex offset. Zero disables jitter.
    pub jitter: f32,
}

impl ShellParams {
    pub const MIN_WIDTH_SEGMENTS: u32 = 3;
    pub const MIN_HEIGHT_SEGMENTS: u32 = 2;
    pub const MAX_SEGMENTS: u32 = 512;

    pub fn new(radius: f32, width_segments: u32, height_segments: u32, jitter: f32) -> Self {
        Self {
            radius,
            width_segments,
            height_segments,
            jitter,
        }
    }

    /// Segment counts raised to the minimum a closed sphere needs and capped
    /// at [`Self::MAX_SEGMENTS`].
    pub fn segments(&self) -> (u32, u32) {
        if self.width_segments > Self::MAX_SEGMENTS || self.height_segments > Self::MAX_SEGMENTS {
            warn!(
                width = self.width_segments,
                height = self.height_segments,
                max = Self::MAX_SEGMENTS,
                "segment count capped"
            );
        }
        (
            self.width_segments
                .clamp(Self::MIN_WIDTH_SEGMENTS, Self::MAX_SEGMENTS),
            self.height_segments
                .clamp(Self::MIN_HEIGHT_SEGMENTS, Self::MAX_SEGMENTS),
        )
    }
}

impl Default for ShellParams {
    fn default() -> Self {
        Self::new(1.0, 16, 16, 0.0)
    }
}

/// Flat Lambert material of one shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellMaterial {
    pub color: HexColor,
}

impl ShellMaterial {
    pub fn new(color: HexColor) -> Self {
        Self { color }
    }
}

/// Geometry and material of one shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellSettings {
    pub params: ShellParams,
    pub material: ShellMaterial,
}

/// Settings for all three shells, indexed by [`ShellKind::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetSettings {
    pub shells: [ShellSettings; 3],
}

impl PlanetSettings {
    pub fn shell(&self, kind: ShellKind) -> &ShellSettings {
        &self.shells[kind.index()]
    }

    pub fn shell_mut(&mut self, kind: ShellKind) -> &mut ShellSettings {
        &mut self.shells[kind.index()]
    }
}

impl Default for PlanetSettings {
    /// Earth-like colours with the ocean slightly inside the ground.
    fn default() -> Self {
        let shell = |radius: f32, color: HexColor| ShellSettings {
            params: ShellParams::new(radius, 16, 16, 0.0),
            material: ShellMaterial::new(color),
        };
        Self {
            shells: [
                shell(0.98, HexColor::new(0x76, 0xac, 0xda)),
                shell(1.0, HexColor::new(0xb8, 0xb6, 0x58)),
                shell(1.02, HexColor::new(0xe3, 0xc9, 0x7f)),
            ],
        }
    }
}
