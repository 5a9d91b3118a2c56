//! The Scene and Planet control panels and typed reads of their values.
//!
//! Both documents are embedded in the binary. Either can be replaced by a
//! file named in the config. Every read falls back to a built-in default with
//! a warning when the path is missing or holds the wrong kind of value.

use std::path::Path;

use glam::Vec3;
use tellus_config::PanelConfig;
use tellus_controls::{ControlPanels, ControlPath, HexColor};
use tellus_lighting::{AmbientLight, DirectionalLight};
use tellus_planet::{PlanetSettings, ShellKind, ShellMaterial, ShellParams, ShellSettings};
use tracing::{info, warn};

use crate::AppError;

pub const SCENE_TITLE: &str = "Scene";
pub const PLANET_TITLE: &str = "Planet";

pub const SCENE_JSON: &str = include_str!("../assets/scene.json");
pub const PLANET_JSON: &str = include_str!("../assets/planet.json");

const DEFAULT_CLEAR_COLOR: HexColor = HexColor::new(0x0b, 0x0d, 0x17);
const DEFAULT_AMBIENT_COLOR: HexColor = HexColor::new(0x40, 0x40, 0x40);

/// Build both panels, reading override documents where configured.
///
/// With a seed, function markers such as `randomHexadecimalColor()` resolve
/// the same way on every run.
pub fn load_panels(config: &PanelConfig, seed: Option<u64>) -> Result<ControlPanels, AppError> {
    let mut panels = match seed {
        Some(seed) => ControlPanels::with_seed(seed),
        None => ControlPanels::new(),
    };
    let scene = document(config.scene_json.as_deref(), SCENE_JSON)?;
    let planet = document(config.planet_json.as_deref(), PLANET_JSON)?;
    panels.add_json_str(SCENE_TITLE, &scene)?;
    panels.add_json_str(PLANET_TITLE, &planet)?;
    Ok(panels)
}

fn document(path: Option<&Path>, embedded: &str) -> Result<String, AppError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading panel document");
            std::fs::read_to_string(path).map_err(|source| AppError::PanelRead {
                path: path.to_path_buf(),
                source,
            })
        }
        None => Ok(embedded.to_string()),
    }
}

pub fn scene_path(rest: &str) -> ControlPath {
    ControlPath::parse(&format!("{SCENE_TITLE}/{rest}"))
}

pub fn planet_path(rest: &str) -> ControlPath {
    ControlPath::parse(&format!("{PLANET_TITLE}/{rest}"))
}

pub fn geometry_path(kind: ShellKind, key: &str) -> ControlPath {
    planet_path("Geometry").child(kind.name()).child(key)
}

pub fn material_color_path(kind: ShellKind) -> ControlPath {
    planet_path("Material").child(kind.name()).child("Color")
}

fn number_or(panels: &ControlPanels, path: ControlPath, default: f64) -> f64 {
    panels.number(&path).unwrap_or_else(|e| {
        warn!(%path, default, "{e}, using default");
        default
    })
}

fn color_or(panels: &ControlPanels, path: ControlPath, default: HexColor) -> HexColor {
    panels.color(&path).unwrap_or_else(|e| {
        warn!(%path, %default, "{e}, using default");
        default
    })
}

fn srgb_to_linear(color: HexColor) -> Vec3 {
    Vec3::from_array(color.to_linear())
}

pub fn clear_color(panels: &ControlPanels) -> HexColor {
    color_or(panels, scene_path("Color"), DEFAULT_CLEAR_COLOR)
}

pub fn light_position(panels: &ControlPanels) -> Vec3 {
    let defaults = DirectionalLight::default().position;
    let axis = |key: &str, default: f32| {
        number_or(panels, scene_path("Lights/DirectionalLight_1").child(key), default as f64) as f32
    };
    Vec3::new(
        axis("Position.X", defaults.x),
        axis("Position.Y", defaults.y),
        axis("Position.Z", defaults.z),
    )
}

pub fn light_color(panels: &ControlPanels) -> Vec3 {
    srgb_to_linear(color_or(
        panels,
        scene_path("Lights/DirectionalLight_1/Color"),
        HexColor::WHITE,
    ))
}

pub fn ambient_color(panels: &ControlPanels) -> Vec3 {
    srgb_to_linear(color_or(
        panels,
        scene_path("Lights/AmbientLight_1/Color"),
        DEFAULT_AMBIENT_COLOR,
    ))
}

pub fn directional_light(panels: &ControlPanels) -> DirectionalLight {
    DirectionalLight {
        position: light_position(panels),
        color: light_color(panels),
        ..DirectionalLight::default()
    }
}

pub fn ambient_light(panels: &ControlPanels) -> AmbientLight {
    AmbientLight {
        color: ambient_color(panels),
        intensity: 1.0,
    }
}

pub fn shell_params(panels: &ControlPanels, kind: ShellKind) -> ShellParams {
    let defaults = PlanetSettings::default().shell(kind).params;
    let number = |key: &str, default: f64| number_or(panels, geometry_path(kind, key), default);
    ShellParams {
        radius: number("Radius", defaults.radius as f64) as f32,
        width_segments: number("Segments.Width", defaults.width_segments as f64).round().max(0.0) as u32,
        height_segments: number("Segments.Height", defaults.height_segments as f64).round().max(0.0) as u32,
        jitter: number("Vertices.Position.Random", defaults.jitter as f64) as f32,
    }
}

pub fn shell_material(panels: &ControlPanels, kind: ShellKind) -> ShellMaterial {
    let default = PlanetSettings::default().shell(kind).material.color;
    ShellMaterial::new(color_or(panels, material_color_path(kind), default))
}

pub fn planet_settings(panels: &ControlPanels) -> PlanetSettings {
    PlanetSettings {
        shells: ShellKind::ALL.map(|kind| ShellSettings {
            params: shell_params(panels, kind),
            material: shell_material(panels, kind),
        }),
    }
}

/// Per-frame rotation speeds in radians.
pub fn rotation_speeds(panels: &ControlPanels) -> Vec3 {
    let axis = |key: &str| number_or(panels, planet_path("Renderer").child(key), 0.0) as f32;
    Vec3::new(axis("Rotation.X"), axis("Rotation.Y"), axis("Rotation.Z"))
}
