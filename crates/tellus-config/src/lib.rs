//! Configuration system for Tellus.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Serialization tolerates missing and unknown fields so older
//! config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    APP_DIR_NAME, CameraConfig, Config, DebugConfig, PanelConfig, PlanetConfig, WindowConfig,
    default_config_dir,
};
pub use error::ConfigError;
