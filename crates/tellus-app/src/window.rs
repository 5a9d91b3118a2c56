//! Window creation and event handling via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]. Every redraw renders one
//! frame and immediately requests the next, so the loop runs until the window
//! is closed.

use std::sync::Arc;

use tellus_config::Config;
use tellus_controls::ControlPanels;
use tracing::{error, info, instrument};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::AppError;
use crate::panels::load_panels;
use crate::renderer::SceneRenderer;
use crate::scene::Scene;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(fullscreen_mode(config))
}

/// Borderless fullscreen on the current monitor when enabled.
pub fn fullscreen_mode(config: &Config) -> Option<Fullscreen> {
    config
        .window
        .fullscreen
        .then_some(Fullscreen::Borderless(None))
}

/// Application state: the scene plus the window and GPU resources created
/// once the event loop resumes.
pub struct App {
    config: Config,
    scene: Scene,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
}

impl App {
    pub fn new(config: Config, panels: ControlPanels) -> Self {
        let scene = Scene::new(&config, panels);
        Self {
            config,
            scene,
            window: None,
            renderer: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match SceneRenderer::new(
            window.clone(),
            &mut self.scene,
            self.config.window.vsync,
            self.config.panels.width,
        ) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                error!("{e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer) else {
            return;
        };

        let _ = renderer.ui.handle_event(window, &event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.scene.planet.remove();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = renderer
                    .surface
                    .handle_resize(new_size.width, new_size.height)
                {
                    let (w, h) = (resize.physical.width, resize.physical.height);
                    renderer.resize(&mut self.scene, w, h);
                    info!("Window resized to {}x{} (scale: {:.2})", w, h, resize.scale_factor);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let inner = window.inner_size();
                let resize = renderer.surface.handle_scale_factor_changed(
                    scale_factor,
                    inner.width,
                    inner.height,
                );
                let (w, h) = (resize.physical.width, resize.physical.height);
                renderer.resize(&mut self.scene, w, h);
                info!("Scale factor changed to {:.2}, resized to {}x{}", scale_factor, w, h);
            }
            WindowEvent::RedrawRequested => {
                renderer.render(window, &mut self.scene);
                window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Build the panels, open the window and run until it is closed.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let panels = load_panels(&config.panels, config.planet.seed)?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, panels);
    event_loop.run_app(&mut app)?;
    Ok(())
}
