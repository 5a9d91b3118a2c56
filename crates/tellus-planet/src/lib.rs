//! Layered planet: three concentric UV-sphere shells (ocean, ground and high
//! ground), each with its own radius, tessellation, vertex jitter and colour,
//! rotating together.
//!
//! [`Planet`] holds the CPU side and records which shells changed.
//! [`PlanetRenderer`] mirrors it on the GPU, re-uploading only what changed.

mod planet;
mod renderer;
mod shell;
mod sphere;

pub use planet::{Planet, Shell, ShellUpdate};
pub use renderer::{PlanetRenderer, SyncStats, shell_uniform};
pub use shell::{PlanetSettings, ShellKind, ShellMaterial, ShellParams, ShellSettings};
pub use sphere::SphereSurface;

/// Errors from the planet crate.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    #[error("unknown shell '{0}', expected Ocean, Ground or HighGround")]
    UnknownShell(String),
}
