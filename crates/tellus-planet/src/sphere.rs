//! UV sphere generation with optional per-vertex jitter.
//!
//! Vertices are laid out row by row from the +Y pole to the -Y pole, each row
//! holding `width_segments + 1` vertices so the seam column is duplicated.
//! Each pole row holds `width_segments + 1` copies of the pole. Jitter moves
//! the copies of one point together, so the surface stays closed.
//! Longitude `phi` runs over `[0, 2π]` and colatitude `theta` over `[0, π]`:
//!
//! ```text
//! x = -r cos(phi) sin(theta)
//! y =  r cos(theta)
//! z =  r sin(phi) sin(theta)
//! ```

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;
use tellus_render::VertexPositionNormal;

use crate::shell::ShellParams;

/// A generated sphere surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereSurface {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Vertex positions after jitter.
    pub positions: Vec<Vec3>,
    /// Vertex positions before jitter, index-aligned with `positions`.
    pub pristine: Vec<Vec3>,
    /// Counter-clockwise triangle list, outward facing.
    pub indices: Vec<u32>,
}

impl SphereSurface {
    /// Build a sphere from `params`, jittering with `rng` when `params.jitter > 0`.
    pub fn generate<R: Rng + ?Sized>(params: &ShellParams, rng: &mut R) -> Self {
        let (width_segments, height_segments) = params.segments();
        let pristine = uv_positions(params.radius, width_segments, height_segments);
        let indices = uv_indices(width_segments, height_segments);

        let mut positions = pristine.clone();
        if params.jitter > 0.0 {
            jitter_positions(&mut positions, width_segments, height_segments, params.jitter, rng);
        }

        Self {
            radius: params.radius,
            width_segments,
            height_segments,
            positions,
            pristine,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expand into a flat-shaded triangle list with one normal per face.
    ///
    /// Triangles that jitter collapsed to zero area are dropped.
    pub fn flat_vertices(&self) -> Vec<VertexPositionNormal> {
        let mut vertices = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ];
            let Some(normal) = (b - a).cross(c - a).try_normalize() else {
                continue;
            };
            let normal = normal.to_array();
            for position in [a, b, c] {
                vertices.push(VertexPositionNormal {
                    position: position.to_array(),
                    normal,
                });
            }
        }
        vertices
    }
}

fn uv_positions(radius: f32, width_segments: u32, height_segments: u32) -> Vec<Vec3> {
    let mut positions =
        Vec::with_capacity((width_segments as usize + 1) * (height_segments as usize + 1));
    for iy in 0..=height_segments {
        if iy == 0 || iy == height_segments {
            let pole = radius * if iy == 0 { Vec3::Y } else { Vec3::NEG_Y };
            positions.extend(std::iter::repeat_n(pole, width_segments as usize + 1));
            continue;
        }
        let theta = iy as f32 / height_segments as f32 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let first = positions.len();
        for ix in 0..width_segments {
            let phi = ix as f32 / width_segments as f32 * TAU;
            let (sin_phi, cos_phi) = phi.sin_cos();
            positions.push(Vec3::new(
                -radius * cos_phi * sin_theta,
                radius * cos_theta,
                radius * sin_phi * sin_theta,
            ));
        }
        // The seam closes exactly on the first column.
        positions.push(positions[first]);
    }
    positions
}

/// Quad grid split into two triangles per cell. The first row keeps only the
/// lower triangle and the last row only the upper one, since the pole edge of
/// those cells has zero length.
fn uv_indices(width_segments: u32, height_segments: u32) -> Vec<u32> {
    let row = width_segments + 1;
    let mut indices =
        Vec::with_capacity(width_segments as usize * (height_segments as usize - 1) * 6);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    indices
}

/// Push every distinct grid point along one random axis by a random amount
/// in `[0, max)`. A pole row shares one offset and the seam column reuses the
/// offset of the first column.
fn jitter_positions<R: Rng + ?Sized>(
    positions: &mut [Vec3],
    width_segments: u32,
    height_segments: u32,
    max: f32,
    rng: &mut R,
) {
    let row = width_segments as usize + 1;
    for (iy, vertices) in positions.chunks_exact_mut(row).enumerate() {
        let is_pole = iy == 0 || iy == height_segments as usize;
        let distinct = if is_pole { 1 } else { width_segments as usize };
        let offsets: Vec<(usize, f32)> = (0..distinct)
            .map(|_| (rng.gen_range(0..3), rng.gen_range(0.0..max)))
            .collect();
        for (ix, position) in vertices.iter_mut().enumerate() {
            let (axis, offset) = offsets[ix % distinct];
            position[axis] += offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn rng() -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(42)
    }

    #[test]
    fn test_vertex_count_is_grid_size() {
        for (w, h) in [(3, 2), (8, 6), (16, 16), (32, 5)] {
            let sphere = SphereSurface::generate(&ShellParams::new(1.0, w, h, 0.0), &mut rng());
            assert_eq!(sphere.vertex_count(), ((w + 1) * (h + 1)) as usize, "{w}x{h}");
        }
    }

    #[test]
    fn test_triangle_count_skips_pole_cells() {
        let sphere = SphereSurface::generate(&ShellParams::new(1.0, 8, 6, 0.0), &mut rng());
        assert_eq!(sphere.triangle_count(), 2 * 8 * (6 - 1));
    }

    #[test]
    fn test_segments_below_minimum_are_raised() {
        let sphere = SphereSurface::generate(&ShellParams::new(1.0, 1, 0, 0.0), &mut rng());
        assert_eq!(sphere.width_segments, 3);
        assert_eq!(sphere.height_segments, 2);
        assert_eq!(sphere.vertex_count(), 12);
    }

    #[test]
    fn test_pristine_vertices_lie_on_radius() {
        let sphere = SphereSurface::generate(&ShellParams::new(2.5, 12, 9, 0.0), &mut rng());
        for p in &sphere.pristine {
            assert!((p.length() - 2.5).abs() < 1e-5, "{p:?}");
        }
        assert_eq!(sphere.positions, sphere.pristine);
    }

    #[test]
    fn test_poles_are_on_y_axis() {
        let sphere = SphereSurface::generate(&ShellParams::new(1.0, 4, 4, 0.0), &mut rng());
        let first = sphere.pristine[0];
        let last = *sphere.pristine.last().unwrap();
        assert!((first - Vec3::Y).length() < 1e-6);
        assert!((last - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_jitter_moves_each_vertex_on_at_most_one_axis() {
        let max = 0.25;
        let sphere = SphereSurface::generate(&ShellParams::new(1.0, 16, 12, max), &mut rng());
        let mut moved = 0;
        for (p, q) in sphere.positions.iter().zip(&sphere.pristine) {
            let delta = *p - *q;
            let changed: Vec<f32> = delta.to_array().into_iter().filter(|d| *d != 0.0).collect();
            assert!(changed.len() <= 1, "{delta:?}");
            if let Some(d) = changed.first() {
                assert!(*d >= 0.0 && *d <= max + 1e-6, "{d}");
                moved += 1;
            }
        }
        assert!(moved > sphere.vertex_count() / 2);
    }

    #[test]
    fn test_jitter_keeps_seam_and_poles_closed() {
        let (w, h) = (16usize, 16usize);
        let sphere = SphereSurface::generate(&ShellParams::new(1.0, 16, 16, 0.08), &mut rng());
        let row = w + 1;
        for iy in 0..=h {
            assert_eq!(sphere.positions[iy * row], sphere.positions[iy * row + w], "seam row {iy}");
        }
        for iy in [0, h] {
            let pole = sphere.positions[iy * row];
            assert!(sphere.positions[iy * row..(iy + 1) * row].iter().all(|p| *p == pole));
        }
        assert_ne!(sphere.positions, sphere.pristine);
    }

    #[test]
    fn test_same_seed_same_surface() {
        let params = ShellParams::new(1.0, 10, 10, 0.1);
        let a = SphereSurface::generate(&params, &mut rng());
        let b = SphereSurface::generate(&params, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_jitter_consumes_no_randomness() {
        let mut seeded = rng();
        let _ = SphereSurface::generate(&ShellParams::new(1.0, 8, 8, 0.0), &mut seeded);
        assert_eq!(seeded.r#gen::<u64>(), rng().r#gen::<u64>());
    }

    #[test]
    fn test_flat_normals_are_unit_and_outward() {
        let sphere = SphereSurface::generate(&ShellParams::new(1.0, 12, 8, 0.0), &mut rng());
        let vertices = sphere.flat_vertices();
        assert_eq!(vertices.len(), sphere.triangle_count() * 3);
        for tri in vertices.chunks_exact(3) {
            let normal = Vec3::from_array(tri[0].normal);
            assert!((normal.length() - 1.0).abs() < 1e-5);
            let centroid = tri
                .iter()
                .map(|v| Vec3::from_array(v.position))
                .sum::<Vec3>()
                / 3.0;
            assert!(normal.dot(centroid) > 0.0);
            assert!(tri.iter().all(|v| v.normal == tri[0].normal));
        }
    }

    #[test]
    fn test_flat_normals_follow_jittered_positions() {
        let sphere = SphereSurface::generate(&ShellParams::new(1.0, 8, 6, 0.3), &mut rng());
        for tri in sphere.flat_vertices().chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(tri[i].position));
            let expected = (b - a).cross(c - a).normalize();
            assert!((Vec3::from_array(tri[0].normal) - expected).length() < 1e-5);
        }
    }
}
