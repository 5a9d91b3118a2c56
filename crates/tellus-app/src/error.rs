//! Application-level errors.

use std::path::PathBuf;

use tellus_config::ConfigError;
use tellus_controls::ControlError;
use tellus_render::RenderContextError;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read panel document {path}: {source}")]
    PanelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid panel document: {0}")]
    Panel(#[from] ControlError),

    #[error("GPU initialization failed: {0}")]
    Render(#[from] RenderContextError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
