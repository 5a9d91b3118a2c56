//! Directional light: parallel rays shining from a position toward a target.
//!
//! The [`DirectionalLight`] struct describes the CPU-side light properties,
//! while [`DirectionalLightUniform`] is the GPU-side representation written
//! to a uniform buffer whenever the light changes.

use bytemuck::{Pod, Zeroable};

/// Direction used when position and target coincide.
const FALLBACK_DIRECTION: glam::Vec3 = glam::Vec3::NEG_Y;

/// CPU-side directional light description.
///
/// Only the direction from `position` to `target` matters for shading; the
/// distance between them does not.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: glam::Vec3,
    pub target: glam::Vec3,
    /// Linear RGB color of the light (not premultiplied by intensity).
    pub color: glam::Vec3,
    /// Scalar intensity multiplier.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: glam::Vec3::Y,
            target: glam::Vec3::ZERO,
            color: glam::Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    /// Normalized direction the light travels in, FROM the light toward the
    /// surface. Falls back to straight down when position equals target.
    pub fn direction(&self) -> glam::Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(FALLBACK_DIRECTION)
    }

    pub fn set_position(&mut self, position: glam::Vec3) {
        self.position = position;
    }

    /// Build the GPU-side uniform from this light's properties.
    pub fn to_uniform(&self) -> DirectionalLightUniform {
        let direction = self.direction();
        DirectionalLightUniform {
            direction_intensity: [direction.x, direction.y, direction.z, self.intensity],
            color_padding: [self.color.x, self.color.y, self.color.z, 0.0],
        }
    }
}

/// GPU-side representation, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// xyz = direction (normalized), w = intensity.
    pub direction_intensity: [f32; 4],
    /// xyz = color (linear RGB), w = padding.
    pub color_padding: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shines_down() {
        let light = DirectionalLight::default();
        assert!((light.direction() - glam::Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_direction_points_toward_target() {
        let mut light = DirectionalLight::default();
        light.set_position(glam::Vec3::new(3.0, 0.0, 4.0));
        let dir = light.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6, "must be unit length");
        assert!((dir - glam::Vec3::new(-0.6, 0.0, -0.8)).length() < 1e-6);
    }

    #[test]
    fn test_distance_does_not_matter() {
        let near = DirectionalLight {
            position: glam::Vec3::new(1.0, 1.0, 0.0),
            ..Default::default()
        };
        let far = DirectionalLight {
            position: glam::Vec3::new(10.0, 10.0, 0.0),
            ..Default::default()
        };
        assert!((near.direction() - far.direction()).length() < 1e-6);
    }

    #[test]
    fn test_light_at_target_falls_back_to_down() {
        let light = DirectionalLight {
            position: glam::Vec3::ZERO,
            ..Default::default()
        };
        assert_eq!(light.direction(), glam::Vec3::NEG_Y);
    }

    #[test]
    fn test_uniform_buffer_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 32);
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, direction_intensity),
            0
        );
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, color_padding),
            16
        );
    }

    #[test]
    fn test_to_uniform_packs_correctly() {
        let light = DirectionalLight {
            position: glam::Vec3::new(0.0, 2.0, 0.0),
            target: glam::Vec3::ZERO,
            color: glam::Vec3::new(1.0, 0.5, 0.25),
            intensity: 2.0,
        };
        let u = light.to_uniform();
        assert!((u.direction_intensity[1] - (-1.0)).abs() < 1e-6);
        assert!((u.direction_intensity[3] - 2.0).abs() < 1e-6);
        assert!((u.color_padding[0] - 1.0).abs() < 1e-6);
        assert!((u.color_padding[1] - 0.5).abs() < 1e-6);
        assert!((u.color_padding[2] - 0.25).abs() < 1e-6);
        assert!((u.color_padding[3] - 0.0).abs() < 1e-6);
    }
}
