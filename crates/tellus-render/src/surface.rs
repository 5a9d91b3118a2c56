//! Viewport size tracking.
//!
//! Window systems report zero sizes while minimized (and on Wayland before the
//! first configure). [`SurfaceWrapper`] clamps those to 1×1 and reports a
//! [`SurfaceResizeEvent`] only when the physical size actually changes, so the
//! surface, depth buffer, camera and UI are resized together and only once.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Event produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    /// Physical pixels per logical pixel.
    pub scale_factor: f64,
}

/// Current viewport size and scale factor, clamped to at least 1×1.
#[derive(Clone, Debug)]
pub struct SurfaceWrapper {
    physical: PhysicalSize,
    scale_factor: f64,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical: clamp(physical_width, physical_height),
            scale_factor,
        }
    }

    /// Record a new window size. Returns an event if the clamped size changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let physical = clamp(physical_width, physical_height);
        if physical == self.physical {
            return None;
        }
        self.physical = physical;
        Some(self.event())
    }

    /// Record a scale factor change. Always returns an event, since the UI
    /// must re-layout even when the physical size is unchanged.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        physical_width: u32,
        physical_height: u32,
    ) -> SurfaceResizeEvent {
        self.scale_factor = scale_factor;
        self.physical = clamp(physical_width, physical_height);
        self.event()
    }

    fn event(&self) -> SurfaceResizeEvent {
        SurfaceResizeEvent {
            physical: self.physical,
            scale_factor: self.scale_factor,
        }
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.physical
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.physical.aspect_ratio()
    }

    /// Logical (UI) size.
    pub fn logical_size(&self) -> (f64, f64) {
        (
            f64::from(self.physical.width) / self.scale_factor,
            f64::from(self.physical.height) / self.scale_factor,
        )
    }
}

fn clamp(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}
