//! The layered planet: three concentric shells rotating together.

use glam::{EulerRot, Mat4, Vec3};
use rand::Rng;
use tracing::{debug, warn};

use crate::shell::{PlanetSettings, ShellKind, ShellMaterial, ShellParams};
use crate::sphere::SphereSurface;

/// One shell: its surface, material and Euler rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub kind: ShellKind,
    pub params: ShellParams,
    pub material: ShellMaterial,
    pub surface: SphereSurface,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub(crate) geometry_dirty: bool,
    pub(crate) uniform_dirty: bool,
}

impl Shell {
    fn generate<R: Rng + ?Sized>(
        kind: ShellKind,
        params: ShellParams,
        material: ShellMaterial,
        rng: &mut R,
    ) -> Self {
        Self {
            kind,
            params,
            material,
            surface: SphereSurface::generate(&params, rng),
            rotation: Vec3::ZERO,
            geometry_dirty: true,
            uniform_dirty: true,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// Pending GPU work for one shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellUpdate {
    pub kind: ShellKind,
    /// The surface was regenerated and needs a new vertex buffer.
    pub geometry: bool,
    /// The model matrix or colour changed.
    pub uniform: bool,
}

/// Three shells, ordered as [`ShellKind::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    shells: [Shell; 3],
    removed: bool,
}

impl Planet {
    /// Build all three shells from `settings`.
    pub fn generate<R: Rng + ?Sized>(settings: &PlanetSettings, rng: &mut R) -> Self {
        let shells = ShellKind::ALL.map(|kind| {
            let shell = settings.shell(kind);
            Shell::generate(kind, shell.params, shell.material, rng)
        });
        debug!(
            triangles = shells.iter().map(|s| s.surface.triangle_count()).sum::<usize>(),
            "generated planet"
        );
        Self {
            shells,
            removed: false,
        }
    }

    pub fn shell(&self, kind: ShellKind) -> &Shell {
        &self.shells[kind.index()]
    }

    pub fn shells(&self) -> &[Shell; 3] {
        &self.shells
    }

    /// Shells still in the scene. Empty once the planet is removed.
    pub fn visible_shells(&self) -> &[Shell] {
        if self.removed { &[] } else { &self.shells }
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Rebuild one shell's surface. The old surface is dropped.
    pub fn regenerate_geometry<R: Rng + ?Sized>(
        &mut self,
        kind: ShellKind,
        params: ShellParams,
        rng: &mut R,
    ) {
        if self.warn_if_removed("regenerate_geometry") {
            return;
        }
        let shell = &mut self.shells[kind.index()];
        shell.params = params;
        shell.surface = SphereSurface::generate(&params, rng);
        shell.geometry_dirty = true;
        debug!(
            shell = %kind,
            radius = params.radius,
            width = shell.surface.width_segments,
            height = shell.surface.height_segments,
            jitter = params.jitter,
            "regenerated shell geometry"
        );
    }

    /// Replace one shell's material.
    pub fn regenerate_material(&mut self, kind: ShellKind, material: ShellMaterial) {
        if self.warn_if_removed("regenerate_material") {
            return;
        }
        let shell = &mut self.shells[kind.index()];
        shell.material = material;
        shell.uniform_dirty = true;
        debug!(shell = %kind, color = %material.color, "regenerated shell material");
    }

    /// Add to every shell's rotation. Zero deltas leave that axis untouched.
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        if dx != 0.0 {
            self.rotate_x(dx);
        }
        if dy != 0.0 {
            self.rotate_y(dy);
        }
        if dz != 0.0 {
            self.rotate_z(dz);
        }
    }

    pub fn rotate_x(&mut self, dx: f32) {
        self.rotate_axis(0, dx);
    }

    pub fn rotate_y(&mut self, dy: f32) {
        self.rotate_axis(1, dy);
    }

    pub fn rotate_z(&mut self, dz: f32) {
        self.rotate_axis(2, dz);
    }

    fn rotate_axis(&mut self, axis: usize, delta: f32) {
        if self.warn_if_removed("rotate") {
            return;
        }
        for shell in &mut self.shells {
            shell.rotation[axis] += delta;
            shell.uniform_dirty = true;
        }
    }

    /// Per-frame hook: rotate by the current speeds (radians per frame).
    pub fn on_render(&mut self, speeds: Vec3) {
        if self.removed {
            return;
        }
        self.rotate(speeds.x, speeds.y, speeds.z);
    }

    /// Take the planet out of the scene for good.
    pub fn remove(&mut self) {
        if !self.removed {
            self.removed = true;
            debug!("planet removed from scene");
        }
    }

    /// Drain the per-shell change flags, in shell order.
    pub fn take_updates(&mut self) -> Vec<ShellUpdate> {
        self.shells
            .iter_mut()
            .filter(|shell| shell.geometry_dirty || shell.uniform_dirty)
            .map(|shell| {
                let update = ShellUpdate {
                    kind: shell.kind,
                    geometry: shell.geometry_dirty,
                    uniform: shell.uniform_dirty,
                };
                shell.geometry_dirty = false;
                shell.uniform_dirty = false;
                update
            })
            .collect()
    }

    fn warn_if_removed(&self, operation: &str) -> bool {
        if self.removed {
            warn!(operation, "ignoring mutation of a removed planet");
        }
        self.removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use tellus_controls::HexColor;

    fn planet() -> Planet {
        Planet::generate(&PlanetSettings::default(), &mut Xoshiro256StarStar::seed_from_u64(7))
    }

    #[test]
    fn test_generate_builds_three_shells_in_order() {
        let planet = planet();
        let kinds: Vec<ShellKind> = planet.shells().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ShellKind::ALL.to_vec());
        assert_eq!(planet.visible_shells().len(), 3);
        assert!(planet.shells().iter().all(|s| s.geometry_dirty && s.uniform_dirty));
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut planet = planet();
        planet.rotate(0.1, 0.2, 0.3);
        planet.rotate(0.1, 0.2, 0.3);
        for shell in planet.shells() {
            assert!((shell.rotation - Vec3::new(0.2, 0.4, 0.6)).length() < 1e-6);
        }
    }

    #[test]
    fn test_zero_deltas_leave_rotation_untouched() {
        let mut planet = planet();
        planet.rotate_y(0.5);
        planet.take_updates();
        planet.rotate(0.0, 0.0, 0.0);
        for shell in planet.shells() {
            assert_eq!(shell.rotation, Vec3::new(0.0, 0.5, 0.0));
            assert!(!shell.uniform_dirty);
        }
    }

    #[test]
    fn test_negative_deltas_are_applied() {
        let mut planet = planet();
        planet.rotate(-0.25, 0.0, 0.0);
        assert_eq!(planet.shell(ShellKind::Ground).rotation.x, -0.25);
    }

    #[test]
    fn test_on_render_rotates_by_speeds() {
        let mut planet = planet();
        for _ in 0..10 {
            planet.on_render(Vec3::new(0.0, 0.01, 0.0));
        }
        assert!((planet.shell(ShellKind::Ocean).rotation.y - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_regenerate_geometry_touches_one_shell() {
        let mut planet = planet();
        let before = planet.clone();
        let params = ShellParams::new(1.5, 24, 12, 0.0);
        planet.regenerate_geometry(
            ShellKind::HighGround,
            params,
            &mut Xoshiro256StarStar::seed_from_u64(1),
        );
        let shell = planet.shell(ShellKind::HighGround);
        assert_eq!(shell.params, params);
        assert_eq!(shell.surface.width_segments, 24);
        for p in &shell.surface.pristine {
            assert!((p.length() - 1.5).abs() < 1e-5);
        }
        assert_eq!(planet.shell(ShellKind::Ocean), before.shell(ShellKind::Ocean));
        assert_eq!(planet.shell(ShellKind::Ground), before.shell(ShellKind::Ground));
    }

    #[test]
    fn test_regenerate_material_replaces_color() {
        let mut planet = planet();
        let material = ShellMaterial::new(HexColor::new(1, 2, 3));
        planet.regenerate_material(ShellKind::Ground, material);
        assert_eq!(planet.shell(ShellKind::Ground).material, material);
        assert_ne!(planet.shell(ShellKind::Ocean).material, material);
    }

    #[test]
    fn test_model_matrix_uses_xyz_order() {
        let mut planet = planet();
        planet.rotate(0.3, 0.5, 0.7);
        let expected = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(0.5) * Mat4::from_rotation_z(0.7);
        let model = planet.shell(ShellKind::Ocean).model_matrix();
        assert!(model.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_take_updates_reports_and_clears_flags() {
        let mut planet = planet();
        assert_eq!(planet.take_updates().len(), 3);
        assert!(planet.take_updates().is_empty());

        planet.regenerate_material(ShellKind::HighGround, ShellMaterial::new(HexColor::WHITE));
        assert_eq!(
            planet.take_updates(),
            vec![ShellUpdate {
                kind: ShellKind::HighGround,
                geometry: false,
                uniform: true,
            }]
        );

        planet.regenerate_geometry(
            ShellKind::Ocean,
            ShellParams::default(),
            &mut Xoshiro256StarStar::seed_from_u64(2),
        );
        let updates = planet.take_updates();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].geometry && !updates[0].uniform);
    }

    #[test]
    fn test_removed_planet_draws_nothing_and_ignores_mutations() {
        let mut planet = planet();
        planet.remove();
        assert!(planet.is_removed());
        assert!(planet.visible_shells().is_empty());

        let before = planet.clone();
        planet.rotate(1.0, 1.0, 1.0);
        planet.on_render(Vec3::ONE);
        planet.regenerate_material(ShellKind::Ocean, ShellMaterial::new(HexColor::BLACK));
        planet.regenerate_geometry(
            ShellKind::Ocean,
            ShellParams::default(),
            &mut Xoshiro256StarStar::seed_from_u64(3),
        );
        assert_eq!(planet, before);

        planet.remove();
        assert!(planet.is_removed());
    }
}
