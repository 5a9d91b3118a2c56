//! The scene: panels, listeners, camera, lights and planet, driven once per
//! frame. GPU resources live in [`crate::renderer`].

use glam::Vec3;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tellus_config::Config;
use tellus_controls::{ControlChange, ControlPanels, HexColor, Listeners};
use tellus_lighting::SceneLights;
use tellus_planet::Planet;
use tellus_render::Camera;
use tracing::{debug, info};

use crate::actions::{Action, register_listeners};
use crate::panels;

pub struct Scene {
    pub panels: ControlPanels,
    listeners: Listeners<Action>,
    pub planet: Planet,
    pub lights: SceneLights,
    pub clear_color: HexColor,
    pub camera: Camera,
    rng: Xoshiro256StarStar,
    lights_dirty: bool,
}

impl Scene {
    /// Assemble the scene from the current panel values.
    pub fn new(config: &Config, panels: ControlPanels) -> Self {
        let mut rng = match config.planet.seed {
            Some(seed) => Xoshiro256StarStar::seed_from_u64(seed),
            None => Xoshiro256StarStar::from_entropy(),
        };
        let planet = Planet::generate(&panels::planet_settings(&panels), &mut rng);
        let lights = SceneLights {
            directional: panels::directional_light(&panels),
            ambient: panels::ambient_light(&panels),
        };
        let camera = Camera::perspective(
            config.fov_y_radians(),
            config.window.width as f32 / config.window.height.max(1) as f32,
            config.camera.near,
            config.camera.far,
        )
        .look_at(Vec3::new(0.0, 0.0, config.camera.distance), Vec3::ZERO);
        let listeners = register_listeners(&panels);

        info!(
            seed = ?config.planet.seed,
            listeners = listeners.len(),
            "scene assembled"
        );

        Self {
            clear_color: panels::clear_color(&panels),
            panels,
            listeners,
            planet,
            lights,
            camera,
            rng,
            lights_dirty: true,
        }
    }

    /// Advance one frame: apply control changes made through the UI or the
    /// setters, then spin the planet by the current rotation speeds.
    pub fn update(&mut self, ui_changes: Vec<ControlChange>) -> Vec<Action> {
        let mut changes = self.panels.take_changes();
        changes.extend(ui_changes);
        let actions = self.handle_changes(&changes);
        self.planet.on_render(panels::rotation_speeds(&self.panels));
        actions
    }

    /// Run the listeners registered for `changes`.
    pub fn handle_changes(&mut self, changes: &[ControlChange]) -> Vec<Action> {
        if changes.is_empty() {
            return Vec::new();
        }
        let actions = self.listeners.dispatch(changes);
        for action in &actions {
            self.apply(*action);
        }
        actions
    }

    pub fn apply(&mut self, action: Action) {
        debug!(?action, "applying control change");
        match action {
            Action::ClearColor => self.clear_color = panels::clear_color(&self.panels),
            Action::LightPosition => {
                self.lights
                    .directional
                    .set_position(panels::light_position(&self.panels));
                self.lights_dirty = true;
            }
            Action::LightColor => {
                self.lights.directional.color = panels::light_color(&self.panels);
                self.lights_dirty = true;
            }
            Action::AmbientColor => {
                self.lights.ambient.color = panels::ambient_color(&self.panels);
                self.lights_dirty = true;
            }
            Action::ShellGeometry(kind) => {
                let params = panels::shell_params(&self.panels, kind);
                self.planet.regenerate_geometry(kind, params, &mut self.rng);
            }
            Action::ShellMaterial(kind) => {
                let material = panels::shell_material(&self.panels, kind);
                self.planet.regenerate_material(kind, material);
            }
        }
    }

    /// Track a new viewport size. Zero dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
    }

    pub fn clear_color_linear(&self) -> [f32; 3] {
        self.clear_color.to_linear()
    }

    /// Whether the light uniform needs rewriting, clearing the flag.
    pub fn take_lights_dirty(&mut self) -> bool {
        std::mem::take(&mut self.lights_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::{geometry_path, load_panels, material_color_path, planet_path, scene_path};
    use tellus_planet::ShellKind;

    fn scene() -> Scene {
        let mut config = Config::default();
        config.planet.seed = Some(21);
        let panels = load_panels(&config.panels, Some(21)).unwrap();
        Scene::new(&config, panels)
    }

    #[test]
    fn test_new_scene_reflects_panels() {
        let scene = scene();
        assert_eq!(scene.clear_color, HexColor::new(0x0b, 0x0d, 0x17));
        assert_eq!(scene.lights.directional.position, Vec3::ONE);
        assert_eq!(scene.camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert!((scene.camera.aspect_ratio - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(scene.planet.shell(ShellKind::Ocean).params.width_segments, 24);
    }

    #[test]
    fn test_update_rotates_planet_each_frame() {
        let mut scene = scene();
        scene.update(Vec::new());
        scene.update(Vec::new());
        let rotation = scene.planet.shell(ShellKind::Ground).rotation;
        assert!((rotation.y - 0.004).abs() < 1e-6);
        assert_eq!(rotation.x, 0.0);
    }

    #[test]
    fn test_setter_changes_apply_on_update() {
        let mut scene = scene();
        scene
            .panels
            .set_number(geometry_path(ShellKind::Ocean, "Radius"), 2.0)
            .unwrap();
        let actions = scene.update(Vec::new());
        assert_eq!(actions, vec![Action::ShellGeometry(ShellKind::Ocean)]);
        let shell = scene.planet.shell(ShellKind::Ocean);
        assert_eq!(shell.params.radius, 2.0);
        assert!((shell.surface.pristine[0].length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_ui_changes_are_dispatched() {
        let mut scene = scene();
        let path = material_color_path(ShellKind::Ground);
        scene.panels.set_color(&path, HexColor::WHITE).unwrap();
        let ui_changes = scene.panels.take_changes();
        let actions = scene.update(ui_changes);
        assert_eq!(actions, vec![Action::ShellMaterial(ShellKind::Ground)]);
        assert_eq!(
            scene.planet.shell(ShellKind::Ground).material.color,
            HexColor::WHITE
        );
    }

    #[test]
    fn test_light_changes_mark_lights_dirty() {
        let mut scene = scene();
        assert!(scene.take_lights_dirty());
        assert!(!scene.take_lights_dirty());

        scene
            .panels
            .set_number(scene_path("Lights/DirectionalLight_1/Position.X"), -4.0)
            .unwrap();
        scene.update(Vec::new());
        assert_eq!(scene.lights.directional.position.x, -4.0);
        assert!(scene.take_lights_dirty());
    }

    #[test]
    fn test_clear_color_change() {
        let mut scene = scene();
        scene
            .panels
            .set_color(scene_path("Color"), HexColor::WHITE)
            .unwrap();
        scene.update(Vec::new());
        assert_eq!(scene.clear_color_linear(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_rotation_speed_change_takes_effect_next_frame() {
        let mut scene = scene();
        scene
            .panels
            .set_number(planet_path("Renderer/Rotation.Y"), 0.0)
            .unwrap();
        scene
            .panels
            .set_number(planet_path("Renderer/Rotation.Z"), 0.01)
            .unwrap();
        scene.update(Vec::new());
        let rotation = scene.planet.shell(ShellKind::HighGround).rotation;
        assert_eq!(rotation.y, 0.0);
        assert!((rotation.z - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut scene = scene();
        scene.resize(1000, 500);
        assert!((scene.camera.aspect_ratio - 2.0).abs() < 1e-6);
    }
}
