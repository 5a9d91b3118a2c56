//! wgpu rendering: device and surface setup, reverse-Z camera and depth, and
//! the flat Lambert pipeline the planet is drawn with.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod lambert_pipeline;
pub mod pass;
pub mod surface;

pub use buffer::{BufferAllocator, VertexBuffer, VertexPositionNormal};
pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use lambert_pipeline::{LAMBERT_SHADER_SOURCE, LambertPipeline, ObjectUniform, draw_lambert};
pub use pass::{FrameEncoder, RenderPassBuilder, clear_color_from_linear};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
