//! Command-line argument parsing for Tellus.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tellus command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tellus", about = "Procedural layered planet with a live control panel")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Enable vsync.
    #[arg(long)]
    pub vsync: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Seed for planet vertex jitter.
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON document replacing the embedded scene panel.
    #[arg(long)]
    pub scene_json: Option<PathBuf>,

    /// JSON document replacing the embedded planet panel.
    #[arg(long)]
    pub planet_json: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(vsync) = args.vsync {
            self.window.vsync = vsync;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(seed) = args.seed {
            self.planet.seed = Some(seed);
        }
        if let Some(ref path) = args.scene_json {
            self.panels.scene_json = Some(path.clone());
        }
        if let Some(ref path) = args.planet_json {
            self.panels.planet_json = Some(path.clone());
        }
    }
}
