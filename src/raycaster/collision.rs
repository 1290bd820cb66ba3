use raylib::prelude::*;

use super::caster::{cast_ray, Ray};
use crate::map::vec::scaled_to;
use crate::map::GridMap;

const DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Escape probe directions, ranked in this order on equal distances:
/// the four axis directions first, then the diagonals. All unit length so
/// every probe has the same reach.
const ESCAPE_DIRS: [(f32, f32); 8] = [
    (0.0, 1.0),
    (-1.0, 0.0),
    (0.0, -1.0),
    (1.0, 0.0),
    (DIAG, DIAG),
    (-DIAG, DIAG),
    (DIAG, -DIAG),
    (-DIAG, -DIAG),
];

const ORTHO_DIRS: [(f32, f32); 4] = [(0.0, 1.0), (-1.0, 0.0), (1.0, 0.0), (0.0, -1.0)];

/// Pushes positions that ended up inside or too close to walls back into open
/// space, using only ray queries against the grid.
///
/// `buffer` is the minimum clearance kept from any wall; `probe_factor`
/// scales the cell size into the maximum escape-probe distance.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    pub buffer: f32,
    pub probe_factor: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            buffer: 4.0,
            probe_factor: 2.5,
        }
    }
}

impl CollisionResolver {
    /// Return `position` corrected to lie outside all blocking cells with at
    /// least `buffer` clearance.
    ///
    /// If the position is embedded in a wall, eight antiray probes look for
    /// the nearest open cell (ignoring the cell the position sits in); the
    /// winner is nudged half the buffer past the boundary so the result never
    /// lands exactly on it. When no probe escapes within range — a fully
    /// enclosed pocket — the original position comes back unchanged; callers
    /// must treat that as a survivable outcome, not an error.
    ///
    /// Afterwards four orthogonal probes measure wall clearance and push the
    /// position away by any deficit. The pushes are independent, so a corner
    /// can apply two at once; that composition is best-effort, not
    /// idempotent, in tight corners.
    pub fn resolve(&self, grid: &GridMap, position: Vector2) -> Vector2 {
        let origin_cell = grid.cell_coords_at(position);
        let mut resolved = position;

        if grid.is_solid(origin_cell.0, origin_cell.1) {
            let reach = self.probe_factor * grid.cell_size();
            let mut best: Option<(Vector2, Vector2, f32)> = None;
            for &(dx, dy) in &ESCAPE_DIRS {
                let direction = Vector2::new(dx, dy);
                let probe = cast_ray(
                    grid,
                    -1,
                    &Ray {
                        origin: position,
                        direction,
                        max_distance: reach,
                    },
                    true,
                    &[origin_cell],
                );
                if let Some(point) = probe.point {
                    let distance = probe.distance();
                    if best.map_or(true, |(_, _, d)| distance < d) {
                        best = Some((point, direction, distance));
                    }
                }
            }
            match best {
                Some((point, direction, _)) => {
                    resolved = point + scaled_to(direction, self.buffer / 2.0);
                }
                None => return position,
            }
        }

        if self.buffer > 0.0 {
            for &(dx, dy) in &ORTHO_DIRS {
                let direction = Vector2::new(dx, dy);
                let probe = cast_ray(
                    grid,
                    -1,
                    &Ray {
                        origin: resolved,
                        direction,
                        max_distance: self.buffer,
                    },
                    false,
                    &[],
                );
                let distance = probe.distance();
                if distance <= self.buffer {
                    // push away from the wall by the clearance deficit
                    resolved = resolved - direction * (self.buffer - distance);
                }
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::OutOfBounds;

    const WALL: Color = Color::new(150, 150, 150, 255);

    #[test]
    fn test_single_wall_pushout_reaches_buffer() {
        // 10x10 grid, cell size 16, one isolated wall cell at (5,5)
        let mut grid = GridMap::new(10, 10, 16.0);
        grid.fill_border(WALL);
        grid.set_cell(5, 5, Some(WALL));
        let resolver = CollisionResolver::default();

        // embedded 1 unit past the left face (x = 80), open space to the left
        let embedded = Vector2::new(81.0, 88.0);
        let resolved = resolver.resolve(&grid, embedded);
        assert!((resolved.x - (80.0 - resolver.buffer)).abs() < 1e-3);
        assert!((resolved.y - 88.0).abs() < 1e-3);

        // the result is clear of every blocking cell
        let cell = grid.cell_coords_at(resolved);
        assert!(!grid.is_solid(cell.0, cell.1));

        // resolving the output again is a no-op
        let again = resolver.resolve(&grid, resolved);
        assert!(resolved.distance_to(again) < 1e-3);
    }

    #[test]
    fn test_center_of_cell_escapes_to_nearest_face() {
        // dead center of the blocking cell: all four axis probes tie at half
        // a cell; the first-ranked probe (+y) wins, and the orthogonal pass
        // then backs the point off to exactly the buffer distance
        let mut grid = GridMap::new(10, 10, 16.0);
        grid.fill_border(WALL);
        grid.set_cell(5, 5, Some(WALL));
        let resolver = CollisionResolver::default();

        let center = Vector2::new(88.0, 88.0);
        let resolved = resolver.resolve(&grid, center);
        assert!((resolved.x - 88.0).abs() < 1e-3);
        assert!((resolved.y - (96.0 + resolver.buffer)).abs() < 1e-3);

        let again = resolver.resolve(&grid, resolved);
        assert!(resolved.distance_to(again) < 1e-3);
    }

    #[test]
    fn test_enclosed_pocket_fails_without_moving() {
        // a sealed grid with a solid boundary policy: no probe can escape,
        // the position must come back unchanged instead of erroring
        let mut grid = GridMap::new(3, 3, 16.0);
        grid.out_of_bounds = OutOfBounds::Solid(WALL);
        for x in 0..3 {
            for y in 0..3 {
                grid.set_cell(x, y, Some(WALL));
            }
        }
        let resolver = CollisionResolver::default();
        let stuck = Vector2::new(24.0, 24.0);
        let resolved = resolver.resolve(&grid, stuck);
        assert_eq!(resolved.x, stuck.x);
        assert_eq!(resolved.y, stuck.y);
    }

    #[test]
    fn test_open_boundary_lets_probes_escape_outside() {
        // same sealed 3x3 but with the open boundary policy: the probes see
        // past the grid edge and the position escapes the map entirely
        let mut grid = GridMap::new(3, 3, 16.0);
        for x in 0..3 {
            for y in 0..3 {
                grid.set_cell(x, y, Some(WALL));
            }
        }
        let resolver = CollisionResolver::default();
        let stuck = Vector2::new(24.0, 24.0);
        let resolved = resolver.resolve(&grid, stuck);
        assert!(stuck.distance_to(resolved) > 1.0);
        let cell = grid.cell_coords_at(resolved);
        assert!(!grid.is_solid(cell.0, cell.1));
    }

    #[test]
    fn test_near_wall_clearance_enforced() {
        // not embedded, just closer than the buffer to a wall face
        let mut grid = GridMap::new(10, 10, 16.0);
        grid.fill_border(WALL);
        grid.set_cell(5, 5, Some(WALL));
        let resolver = CollisionResolver::default();

        let close = Vector2::new(79.0, 88.0); // 1 unit left of the wall face
        let resolved = resolver.resolve(&grid, close);
        assert!((resolved.x - (80.0 - resolver.buffer)).abs() < 1e-3);
        assert!((resolved.y - 88.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_buffer_skips_clearance_pass() {
        let mut grid = GridMap::new(10, 10, 16.0);
        grid.fill_border(WALL);
        let resolver = CollisionResolver {
            buffer: 0.0,
            probe_factor: 2.5,
        };
        let close = Vector2::new(17.0, 88.0); // open cell right next to the border
        let resolved = resolver.resolve(&grid, close);
        assert_eq!(resolved.x, close.x);
        assert_eq!(resolved.y, close.y);
    }
}
