//! Vertex and uniform buffer management for GPU rendering.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// A non-indexed triangle list on the GPU.
pub struct VertexBuffer {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl VertexBuffer {
    /// Bind as vertex buffer slot 0.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.buffer.slice(..));
    }

    /// Draw every vertex as one instance.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

/// GPU buffer allocator for creating vertex and uniform buffers.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a triangle list.
    pub fn create_vertices<V: Pod>(&self, label: &str, vertices: &[V]) -> VertexBuffer {
        VertexBuffer {
            buffer: self.create_vertex_buffer(&format!("{label}-vertices"), bytemuck::cast_slice(vertices)),
            vertex_count: vertices.len() as u32,
        }
    }

    /// Create a vertex buffer from raw byte data.
    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Create a uniform buffer initialized with `value`, writable through the queue.
    pub fn create_uniform_buffer<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Vertex format with position and normal, for flat-shaded lit geometry.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormal {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl VertexPositionNormal {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Get the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormal>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::create_test_device;

    fn triangle() -> [VertexPositionNormal; 3] {
        let normal = [0.0, 0.0, 1.0];
        [
            VertexPositionNormal {
                position: [0.0, 0.0, 0.0],
                normal,
            },
            VertexPositionNormal {
                position: [1.0, 0.0, 0.0],
                normal,
            },
            VertexPositionNormal {
                position: [0.0, 1.0, 0.0],
                normal,
            },
        ]
    }

    #[test]
    fn test_vertex_position_normal_layout() {
        let layout = VertexPositionNormal::layout();
        // position (f32×3) + normal (f32×3) = 24 bytes stride
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn test_vertex_count_matches_input() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let allocator = BufferAllocator::new(&device);
        let buffer = allocator.create_vertices("test-triangle", &triangle());
        assert_eq!(buffer.vertex_count, 3);
        assert_eq!(buffer.buffer.size(), 72);
    }

    #[test]
    fn test_uniform_buffer_size_matches_value() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let allocator = BufferAllocator::new(&device);
        let buffer = allocator.create_uniform_buffer("test-uniform", &[0.0f32; 4]);
        assert_eq!(buffer.size(), 16);
        assert!(buffer.usage().contains(wgpu::BufferUsages::UNIFORM));
    }
}
