//! Ambient light: a constant term added to every lit fragment.

/// Uniform light reaching every surface regardless of orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB color.
    pub color: glam::Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: glam::Vec3::splat(0.05),
            intensity: 1.0,
        }
    }
}

impl AmbientLight {
    /// Premultiplied color, padded to a vec4.
    pub fn to_uniform(&self) -> [f32; 4] {
        let c = self.color * self.intensity;
        [c.x, c.y, c.z, 0.0]
    }
}
