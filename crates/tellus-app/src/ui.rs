//! egui overlay drawn on top of the 3D scene.

use egui_wgpu::ScreenDescriptor;
use tellus_controls::{ControlChange, ControlPanels};
use winit::event::WindowEvent;
use winit::window::Window;

/// egui context, its winit input state and its wgpu renderer.
pub struct UiLayer {
    pub ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    /// Texture updates not yet handed to the renderer.
    pending_textures: egui::TexturesDelta,
    panel_width: f32,
}

impl UiLayer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        panel_width: f32,
    ) -> Self {
        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            Some(device.limits().max_texture_dimension_2d as usize),
        );
        let renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            egui_wgpu::RendererOptions::default(),
        );
        Self {
            ctx,
            winit_state,
            renderer,
            pending_textures: egui::TexturesDelta::default(),
            panel_width,
        }
    }

    /// Forward a window event to egui.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> egui_winit::EventResponse {
        self.winit_state.on_window_event(window, event)
    }

    /// Run one UI pass over the panels. Returns the edits made this frame and
    /// the output to paint. Texture updates are kept until the next
    /// [`Self::paint`], so a frame that is never painted loses none of them.
    pub fn run(
        &mut self,
        window: &Window,
        panels: &mut ControlPanels,
    ) -> (Vec<ControlChange>, egui::FullOutput) {
        let raw_input = self.winit_state.take_egui_input(window);
        let width = self.panel_width;
        let mut changes = Vec::new();
        let mut output = self.ctx.run(raw_input, |ctx| {
            changes = panels.show(ctx, width);
        });
        carry_textures(&mut self.pending_textures, &mut output);
        self.winit_state
            .handle_platform_output(window, output.platform_output.clone());
        (changes, output)
    }

    /// Paint `output` over `view` without clearing it.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        screen: &ScreenDescriptor,
        output: egui::FullOutput,
    ) {
        let textures = std::mem::take(&mut self.pending_textures);
        for (id, delta) in &textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let jobs = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        // No paint callbacks are registered, so there are no extra command buffers.
        let _ = self.renderer.update_buffers(device, queue, encoder, &jobs, screen);

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ui-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(&mut pass.forget_lifetime(), &jobs, screen);
        }

        for id in &textures.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Move the texture updates of `output` to the end of `pending`.
pub fn carry_textures(pending: &mut egui::TexturesDelta, output: &mut egui::FullOutput) {
    pending.append(std::mem::take(&mut output.textures_delta));
}

/// Screen descriptor for a surface of `width` x `height` physical pixels.
pub fn screen_descriptor(width: u32, height: u32, scale_factor: f64) -> ScreenDescriptor {
    ScreenDescriptor {
        size_in_pixels: [width.max(1), height.max(1)],
        pixels_per_point: scale_factor as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_descriptor_clamps_zero_size() {
        let screen = screen_descriptor(0, 0, 2.0);
        assert_eq!(screen.size_in_pixels, [1, 1]);
        assert_eq!(screen.pixels_per_point, 2.0);
    }

    #[test]
    fn test_font_upload_survives_unpainted_frames() {
        let mut panels = crate::panels::load_panels(&Default::default(), Some(4)).unwrap();
        let ctx = egui::Context::default();
        let mut pending = egui::TexturesDelta::default();
        for _ in 0..3 {
            let mut output = ctx.run(egui::RawInput::default(), |ctx| {
                panels.show(ctx, 400.0);
            });
            carry_textures(&mut pending, &mut output);
            assert!(output.textures_delta.is_empty());
        }
        assert!(
            pending
                .set
                .iter()
                .any(|(id, delta)| *id == egui::TextureId::default() && delta.pos.is_none())
        );
    }

    #[test]
    fn test_panels_show_without_edits_reports_no_changes() {
        let mut panels = crate::panels::load_panels(&Default::default(), Some(4)).unwrap();
        let ctx = egui::Context::default();
        let mut changes = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changes = panels.show(ctx, 400.0);
        });
        assert!(changes.is_empty());
    }
}
