//! Scene lights: one positioned directional light plus a flat ambient term,
//! packed together into the uniform the Lambert shader reads.

mod ambient;
mod directional;

pub use ambient::AmbientLight;
pub use directional::{DirectionalLight, DirectionalLightUniform};

use bytemuck::{Pod, Zeroable};

/// The lights of a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneLights {
    pub directional: DirectionalLight,
    pub ambient: AmbientLight,
}

impl SceneLights {
    pub fn to_uniform(&self) -> LightingUniform {
        LightingUniform {
            directional: self.directional.to_uniform(),
            ambient: self.ambient.to_uniform(),
        }
    }
}

/// GPU-side lighting block, 48 bytes.
///
/// Bound at `@group(1) @binding(0)` visible to `ShaderStages::FRAGMENT`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightingUniform {
    pub directional: DirectionalLightUniform,
    /// rgb = ambient colour premultiplied by intensity, w = padding.
    pub ambient: [f32; 4],
}
