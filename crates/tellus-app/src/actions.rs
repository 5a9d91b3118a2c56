//! Mapping from panel controllers to scene mutations.

use tellus_controls::{ControlPanels, ControlPath, Listeners};
use tellus_planet::ShellKind;
use tracing::{debug, warn};

use crate::panels::{material_color_path, planet_path, scene_path};

/// A scene mutation triggered by a control change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ClearColor,
    LightPosition,
    LightColor,
    AmbientColor,
    ShellGeometry(ShellKind),
    ShellMaterial(ShellKind),
}

/// Register the scene and planet listeners for the controllers present in
/// `panels`. Missing controllers are skipped with a warning.
pub fn register_listeners(panels: &ControlPanels) -> Listeners<Action> {
    let mut listeners = Listeners::new();
    let mut listen = |path: ControlPath, action: Action| match panels.controller(&path) {
        Ok(controller) => listeners.on_change(controller, action),
        Err(e) => warn!(%path, ?action, "no listener registered: {e}"),
    };

    listen(scene_path("Color"), Action::ClearColor);
    let light = scene_path("Lights/DirectionalLight_1");
    for axis in ["Position.X", "Position.Y", "Position.Z"] {
        listen(light.child(axis), Action::LightPosition);
    }
    listen(light.child("Color"), Action::LightColor);
    listen(scene_path("Lights/AmbientLight_1/Color"), Action::AmbientColor);

    for kind in ShellKind::ALL {
        listen(material_color_path(kind), Action::ShellMaterial(kind));
    }

    // Every leaf under a shell's geometry folder rebuilds that shell.
    let geometry = planet_path("Geometry");
    if let Ok(folder) = panels.folder(&geometry) {
        for (name, node) in folder.iter() {
            let Some(tree) = node.as_folder() else {
                continue;
            };
            let Ok(kind) = name.parse::<ShellKind>() else {
                debug!(folder = name, "geometry folder does not name a shell");
                continue;
            };
            for (path, _) in tree.leaves(&geometry.child(name)) {
                listen(path, Action::ShellGeometry(kind));
            }
        }
    }

    debug!(count = listeners.len(), "registered control listeners");
    listeners
}
