//! GPU side of the scene: surface, depth buffer, planet renderer and UI.

use std::sync::Arc;

use tellus_planet::PlanetRenderer;
use tellus_render::{
    DepthBuffer, FrameEncoder, RenderContext, RenderPassBuilder, SurfaceError, SurfaceWrapper,
    clear_color_from_linear, init_render_context_blocking,
};
use tracing::{error, info, warn};
use winit::window::Window;

use crate::AppError;
use crate::scene::Scene;
use crate::ui::{UiLayer, screen_descriptor};

pub struct SceneRenderer {
    pub gpu: RenderContext,
    depth: DepthBuffer,
    planet: PlanetRenderer,
    pub ui: UiLayer,
    pub surface: SurfaceWrapper,
}

impl SceneRenderer {
    /// Attach a surface to `window`, sized to its viewport, and upload the scene.
    pub fn new(
        window: Arc<Window>,
        scene: &mut Scene,
        vsync: bool,
        panel_width: f32,
    ) -> Result<Self, AppError> {
        let inner = window.inner_size();
        let surface = SurfaceWrapper::new(inner.width, inner.height, window.scale_factor());
        let gpu = init_render_context_blocking(window.clone(), vsync)?;

        let size = surface.physical_size();
        scene.resize(size.width, size.height);
        let depth = DepthBuffer::new(&gpu.device, size.width, size.height);
        let planet = PlanetRenderer::new(
            &gpu.device,
            gpu.surface_format,
            &mut scene.planet,
            &scene.camera,
            &scene.lights,
        );
        scene.take_lights_dirty();
        let ui = UiLayer::new(&gpu.device, gpu.surface_format, &window, panel_width);

        info!(
            width = size.width,
            height = size.height,
            format = ?gpu.surface_format,
            "scene renderer ready"
        );

        Ok(Self {
            gpu,
            depth,
            planet,
            ui,
            surface,
        })
    }

    /// Re-apply a viewport size to the surface, depth buffer and camera.
    pub fn resize(&mut self, scene: &mut Scene, width: u32, height: u32) {
        self.gpu.resize(width, height);
        let (width, height) = self.gpu.size();
        self.depth.resize(&self.gpu.device, width, height);
        scene.resize(width, height);
    }

    /// Run the UI, update the scene and draw one frame.
    pub fn render(&mut self, window: &Window, scene: &mut Scene) {
        let (changes, ui_output) = self.ui.run(window, &mut scene.panels);
        scene.update(changes);

        let queue = &self.gpu.queue;
        self.planet.sync(&self.gpu.device, queue, &mut scene.planet);
        self.planet.update_camera(queue, &scene.camera);
        if scene.take_lights_dirty() {
            self.planet.update_lights(queue, &scene.lights);
        }

        let surface_texture = match self.gpu.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                warn!("surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                error!("failed to acquire surface texture: {e}");
                return;
            }
        };

        let mut frame = FrameEncoder::new(&self.gpu.device, surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .clear_color(clear_color_from_linear(scene.clear_color_linear()))
                .depth(&self.depth)
                .label("scene-pass");
            let mut pass = frame.begin_render_pass(&builder);
            self.planet.render(&mut pass, &scene.planet);
        }

        let (width, height) = self.gpu.size();
        let screen = screen_descriptor(width, height, self.surface.scale_factor());
        self.ui.paint(
            &self.gpu.device,
            &self.gpu.queue,
            &mut frame.encoder,
            &frame.view,
            &screen,
            ui_output,
        );

        frame.submit(&self.gpu.queue);
    }
}
