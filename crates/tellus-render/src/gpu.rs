//! Device and window surface setup.
//!
//! [`RenderContext`] holds the device, queue and the configured surface of the
//! single window the planet is drawn into.

use std::sync::Arc;
use winit::window::Window;

/// Failure while bringing up the GPU for a window.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    #[error("no GPU adapter can present to this window")]
    NoAdapter,

    #[error("GPU device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("window surface could not be created: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
}

/// Why a frame could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// Still lost after one reconfigure.
    #[error("surface lost")]
    Lost,

    #[error("out of memory")]
    OutOfMemory,

    /// The frame can be skipped and retried next redraw.
    #[error("timeout")]
    Timeout,
}

/// What to do after `get_current_texture` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    Reconfigure,
    Fail(SurfaceError),
}

fn recovery_for(error: &wgpu::SurfaceError) -> Recovery {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Recovery::Reconfigure,
        wgpu::SurfaceError::Timeout => Recovery::Fail(SurfaceError::Timeout),
        wgpu::SurfaceError::OutOfMemory => Recovery::Fail(SurfaceError::OutOfMemory),
        wgpu::SurfaceError::Other => Recovery::Fail(SurfaceError::Lost),
    }
}

pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Create a device able to present to `window` and configure the surface
    /// at the window's inner size.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("Adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tellus-device"),
                ..Default::default()
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let config = surface_config(&caps, size.width, size.height, vsync);
        log::debug!(
            "Surface {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface_format: config.format,
            surface,
            config,
        })
    }

    /// Reconfigure for a new window size. Zero sizes are clamped to 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    /// Configured surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Next frame to draw into. A lost or outdated surface is reconfigured
    /// once and acquired again.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        let error = match self.surface.get_current_texture() {
            Ok(texture) => return Ok(texture),
            Err(error) => error,
        };
        match recovery_for(&error) {
            Recovery::Fail(e) => Err(e),
            Recovery::Reconfigure => {
                log::warn!("Surface {error}, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.surface.get_current_texture().map_err(|e| {
                    log::error!("Surface still unusable after reconfigure: {e}");
                    SurfaceError::Lost
                })
            }
        }
    }
}

/// Block on [`RenderContext::new`].
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

/// Surface configuration for the given capabilities: an sRGB format when one
/// is offered, a present mode chosen by `vsync`, and a size of at least 1x1.
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    width: u32,
    height: u32,
    vsync: bool,
) -> wgpu::SurfaceConfiguration {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: present_mode(&caps.present_modes, vsync),
        alpha_mode: caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

/// `Fifo` with vsync. Without it, `Mailbox` or else `Immediate` when offered,
/// and `Fifo` otherwise since every surface supports it.
fn present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}
