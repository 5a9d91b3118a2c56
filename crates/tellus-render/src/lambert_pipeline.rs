//! Flat-shaded Lambert pipeline.
//!
//! Draws [`VertexPositionNormal`] triangle lists with camera at group 0,
//! lights at group 1 and the per-object model matrix and colour at group 2.
//! The fragment colour is `color * (ambient + directional * max(n·l, 0))`.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use tellus_lighting::LightingUniform;

use crate::buffer::{VertexBuffer, VertexPositionNormal};
use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;

/// Per-object uniform: model matrix and linear base colour.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// rgb = linear colour, a = 1.
    pub color: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: glam::Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
        }
    }
}

fn uniform_layout_entry(
    visibility: wgpu::ShaderStages,
    size: usize,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// Lambert pipeline and its bind group layouts.
pub struct LambertPipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// Camera uniform bind group layout (group 0).
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    /// Lighting uniform bind group layout (group 1).
    pub light_bind_group_layout: wgpu::BindGroupLayout,
    /// Object uniform bind group layout (group 2).
    pub object_bind_group_layout: wgpu::BindGroupLayout,
}

impl LambertPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lambert-shader"),
            source: wgpu::ShaderSource::Wgsl(LAMBERT_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lambert-camera-bgl"),
                entries: &[uniform_layout_entry(
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<CameraUniform>(),
                )],
            });

        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lambert-light-bgl"),
                entries: &[uniform_layout_entry(
                    wgpu::ShaderStages::FRAGMENT,
                    std::mem::size_of::<LightingUniform>(),
                )],
            });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lambert-object-bgl"),
                entries: &[uniform_layout_entry(
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<ObjectUniform>(),
                )],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lambert-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &light_bind_group_layout,
                &object_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lambert-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormal::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::stencil_state()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        log::debug!("Created Lambert pipeline for {surface_format:?}");

        Self {
            pipeline,
            camera_bind_group_layout,
            light_bind_group_layout,
            object_bind_group_layout,
        }
    }

    /// Bind group over a uniform buffer for `layout`.
    pub fn bind_group(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }
}

/// Draw one object with camera, light, and object bind groups.
pub fn draw_lambert(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &LambertPipeline,
    camera_bind_group: &wgpu::BindGroup,
    light_bind_group: &wgpu::BindGroup,
    object_bind_group: &wgpu::BindGroup,
    vertices: &VertexBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, camera_bind_group, &[]);
    render_pass.set_bind_group(1, light_bind_group, &[]);
    render_pass.set_bind_group(2, object_bind_group, &[]);
    vertices.bind(render_pass);
    vertices.draw(render_pass);
}

/// WGSL source for flat Lambert shading.
pub const LAMBERT_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    position: vec4<f32>,
};

struct DirectionalLight {
    direction_intensity: vec4<f32>,
    color_padding: vec4<f32>,
};

struct Lighting {
    sun: DirectionalLight,
    ambient: vec4<f32>,
};

struct ObjectUniform {
    model: mat4x4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> lighting: Lighting;

@group(2) @binding(0)
var<uniform> draw_data: ObjectUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = draw_data.model * vec4<f32>(in.position, 1.0);
    out.clip_position = camera.view_proj * world;
    // Models are rotations only, so the upper 3x3 transforms normals.
    out.normal = (draw_data.model * vec4<f32>(in.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let l = -lighting.sun.direction_intensity.xyz;
    let n_dot_l = max(dot(n, l), 0.0);
    let direct = lighting.sun.color_padding.xyz * lighting.sun.direction_intensity.w * n_dot_l;
    let color = draw_data.color.rgb * (lighting.ambient.rgb + direct);
    return vec4<f32>(color, draw_data.color.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::create_test_device;

    #[test]
    fn test_object_uniform_layout() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
        assert_eq!(std::mem::offset_of!(ObjectUniform, color), 64);
    }

    #[test]
    fn test_object_uniform_packs_color_opaque() {
        let u = ObjectUniform::new(glam::Mat4::IDENTITY, [0.1, 0.2, 0.3]);
        assert_eq!(u.color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(u.model, glam::Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_shader_declares_all_groups() {
        for group in ["@group(0)", "@group(1)", "@group(2)"] {
            assert!(LAMBERT_SHADER_SOURCE.contains(group), "missing {group}");
        }
        assert!(LAMBERT_SHADER_SOURCE.contains("fn vs_main"));
        assert!(LAMBERT_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_pipeline_creation() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let pipeline = LambertPipeline::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb);
        let buffer = crate::BufferAllocator::new(&device)
            .create_uniform_buffer("test-object", &ObjectUniform::new(glam::Mat4::IDENTITY, [1.0; 3]));
        let _group = LambertPipeline::bind_group(
            &device,
            "test-object-bg",
            &pipeline.object_bind_group_layout,
            &buffer,
        );
    }
}
