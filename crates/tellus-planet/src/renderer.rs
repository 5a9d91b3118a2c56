//! GPU resources for drawing a [`Planet`] with the Lambert pipeline.

use tellus_lighting::SceneLights;
use tellus_render::{
    BufferAllocator, Camera, LambertPipeline, ObjectUniform, VertexBuffer, draw_lambert,
};
use tracing::trace;

use crate::planet::{Planet, Shell};
use crate::shell::ShellKind;

/// Per-shell uniform: rotation matrix plus linear base colour.
pub fn shell_uniform(shell: &Shell) -> ObjectUniform {
    ObjectUniform::new(shell.model_matrix(), shell.material.color.to_linear())
}

struct ShellGpu {
    vertices: VertexBuffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ShellGpu {
    fn new(device: &wgpu::Device, pipeline: &LambertPipeline, shell: &Shell) -> Self {
        let allocator = BufferAllocator::new(device);
        let label = format!("shell-{}", shell.kind);
        let vertices = allocator.create_vertices(&label, &shell.surface.flat_vertices());
        let uniform_buffer =
            allocator.create_uniform_buffer(&format!("{label}-uniform"), &shell_uniform(shell));
        let bind_group = LambertPipeline::bind_group(
            device,
            &format!("{label}-bg"),
            &pipeline.object_bind_group_layout,
            &uniform_buffer,
        );
        Self {
            vertices,
            uniform_buffer,
            bind_group,
        }
    }
}

/// What [`PlanetRenderer::sync`] uploaded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub vertex_uploads: usize,
    pub uniform_writes: usize,
}

/// Owns the Lambert pipeline, the camera and light uniforms, and one vertex
/// buffer plus object uniform per shell.
pub struct PlanetRenderer {
    pub pipeline: LambertPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    shells: [ShellGpu; 3],
}

impl PlanetRenderer {
    /// Upload every shell of `planet` and clear its pending changes.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        planet: &mut Planet,
        camera: &Camera,
        lights: &SceneLights,
    ) -> Self {
        let pipeline = LambertPipeline::new(device, surface_format);
        let allocator = BufferAllocator::new(device);

        let camera_buffer = allocator.create_uniform_buffer("camera-uniform", &camera.to_uniform());
        let camera_bind_group = LambertPipeline::bind_group(
            device,
            "camera-bg",
            &pipeline.camera_bind_group_layout,
            &camera_buffer,
        );

        let light_buffer = allocator.create_uniform_buffer("light-uniform", &lights.to_uniform());
        let light_bind_group = LambertPipeline::bind_group(
            device,
            "light-bg",
            &pipeline.light_bind_group_layout,
            &light_buffer,
        );

        let shells = ShellKind::ALL.map(|kind| ShellGpu::new(device, &pipeline, planet.shell(kind)));
        planet.take_updates();

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            light_buffer,
            light_bind_group,
            shells,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera.to_uniform()));
    }

    pub fn update_lights(&self, queue: &wgpu::Queue, lights: &SceneLights) {
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&lights.to_uniform()));
    }

    /// Push pending shell changes to the GPU.
    ///
    /// A regenerated surface gets a fresh vertex buffer. Rotation and material
    /// changes only rewrite the shell's uniform.
    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, planet: &mut Planet) -> SyncStats {
        let mut stats = SyncStats::default();
        for update in planet.take_updates() {
            let shell = planet.shell(update.kind);
            let gpu = &mut self.shells[update.kind.index()];
            if update.geometry {
                gpu.vertices = BufferAllocator::new(device)
                    .create_vertices(&format!("shell-{}", update.kind), &shell.surface.flat_vertices());
                stats.vertex_uploads += 1;
            }
            if update.uniform {
                queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&shell_uniform(shell)));
                stats.uniform_writes += 1;
            }
        }
        if stats != SyncStats::default() {
            trace!(?stats, "synced planet shells");
        }
        stats
    }

    /// Draw the visible shells. A removed planet draws nothing.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>, planet: &Planet) {
        for shell in planet.visible_shells() {
            let gpu = &self.shells[shell.kind.index()];
            if gpu.vertices.vertex_count == 0 {
                continue;
            }
            draw_lambert(
                render_pass,
                &self.pipeline,
                &self.camera_bind_group,
                &self.light_bind_group,
                &gpu.bind_group,
                &gpu.vertices,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{PlanetSettings, ShellMaterial, ShellParams};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use tellus_controls::HexColor;

    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    fn planet() -> Planet {
        Planet::generate(&PlanetSettings::default(), &mut Xoshiro256StarStar::seed_from_u64(5))
    }

    #[test]
    fn test_shell_uniform_carries_linear_color_and_rotation() {
        let mut planet = planet();
        planet.regenerate_material(ShellKind::Ocean, ShellMaterial::new(HexColor::WHITE));
        planet.rotate_z(0.5);
        let uniform = shell_uniform(planet.shell(ShellKind::Ocean));
        assert_eq!(uniform.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            uniform.model,
            glam::Mat4::from_rotation_z(0.5).to_cols_array_2d()
        );
    }

    #[test]
    fn test_sync_uploads_only_changed_shells() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut planet = planet();
        let mut renderer = PlanetRenderer::new(
            &device,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &mut planet,
            &Camera::default(),
            &SceneLights::default(),
        );
        assert_eq!(renderer.sync(&device, &queue, &mut planet), SyncStats::default());

        planet.regenerate_geometry(
            ShellKind::Ground,
            ShellParams::new(1.0, 8, 4, 0.0),
            &mut Xoshiro256StarStar::seed_from_u64(9),
        );
        let stats = renderer.sync(&device, &queue, &mut planet);
        assert_eq!(stats, SyncStats { vertex_uploads: 1, uniform_writes: 0 });
        assert_eq!(
            renderer.shells[ShellKind::Ground.index()].vertices.vertex_count,
            (2 * 8 * 3 * 3) as u32
        );

        planet.rotate(0.1, 0.0, 0.0);
        let stats = renderer.sync(&device, &queue, &mut planet);
        assert_eq!(stats, SyncStats { vertex_uploads: 0, uniform_writes: 3 });
    }
}
