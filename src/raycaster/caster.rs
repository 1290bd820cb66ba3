use raylib::prelude::*;

use crate::map::vec::scaled_to;
use crate::map::GridMap;

/// A ray to trace through the grid. The direction does not need to be unit
/// length; `max_distance` bounds the traversal at
/// `origin + direction * max_distance`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector2,
    pub direction: Vector2,
    pub max_distance: f32,
}

/// Result of tracing one ray. `point` is absent on a miss, and `material`
/// is absent when the hit cell has no stored material (out-of-range hits
/// under a solid boundary policy carry the policy's material).
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Screen column this ray belongs to, or -1 for ad hoc queries.
    pub column: i32,
    pub origin: Vector2,
    pub direction: Vector2,
    pub point: Option<Vector2>,
    pub material: Option<Color>,
}

impl RayHit {
    /// Euclidean distance from origin to the hit point, or infinity on a miss.
    pub fn distance(&self) -> f32 {
        match self.point {
            Some(point) => self.origin.distance_to(point),
            None => f32::INFINITY,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.point.is_some()
    }

    fn miss(column: i32, origin: Vector2, direction: Vector2) -> Self {
        Self {
            column,
            origin,
            direction,
            point: None,
            material: None,
        }
    }
}

/// Trace a ray cell by cell through the grid.
///
/// The current cell is tested before each advance: in normal mode the
/// traversal stops on the first blocking cell, with `antiray` it stops on the
/// first open cell instead (used to find a way out of a wall). Cells listed
/// in `ignore` are treated as transparent either way, so a ray can see past
/// the cell its origin sits inside.
///
/// A zero direction is an immediate miss, never an error.
pub fn cast_ray(
    grid: &GridMap,
    column: i32,
    ray: &Ray,
    antiray: bool,
    ignore: &[(i32, i32)],
) -> RayHit {
    let dir = ray.direction;
    if dir.x == 0.0 && dir.y == 0.0 {
        return RayHit::miss(column, ray.origin, dir);
    }

    let dir_sign_x = if dir.x > 0.0 { 1 } else { -1 };
    let dir_sign_y = if dir.y > 0.0 { 1 } else { -1 };
    // Cell-relative offset of the grid line the ray travels toward next.
    let tile_off_x = if dir.x > 0.0 { 1 } else { 0 };
    let tile_off_y = if dir.y > 0.0 { 1 } else { 0 };

    let cell_size = grid.cell_size();
    let (mut tile_x, mut tile_y) = grid.cell_coords_at(ray.origin);
    let mut cur_x = ray.origin.x;
    let mut cur_y = ray.origin.y;
    let mut t = 0.0_f32;

    let max_x = ray.origin.x + dir.x * ray.max_distance;
    let max_y = ray.origin.y + dir.y * ray.max_distance;

    loop {
        let within_x = if dir.x >= 0.0 { cur_x <= max_x } else { cur_x >= max_x };
        let within_y = if dir.y >= 0.0 { cur_y <= max_y } else { cur_y >= max_y };
        if !within_x || !within_y {
            return RayHit::miss(column, ray.origin, dir);
        }

        if !ignore.contains(&(tile_x, tile_y)) {
            let material = grid.cell(tile_x, tile_y);
            if material.is_some() != antiray {
                return RayHit {
                    column,
                    origin: ray.origin,
                    direction: dir,
                    point: Some(Vector2::new(cur_x, cur_y)),
                    material,
                };
            }
        }

        // Parametric distance to the next vertical and horizontal grid line.
        let dt_x = if dir.x == 0.0 {
            f32::INFINITY
        } else {
            ((tile_x + tile_off_x) as f32 * cell_size - cur_x) / dir.x
        };
        let dt_y = if dir.y == 0.0 {
            f32::INFINITY
        } else {
            ((tile_y + tile_off_y) as f32 * cell_size - cur_y) / dir.y
        };

        // Exact grid-corner ties step across the horizontal line (the y cell
        // advances); the comparison below is strict on purpose.
        if dt_x < dt_y {
            t += dt_x;
            tile_x += dir_sign_x;
        } else {
            t += dt_y;
            tile_y += dir_sign_y;
        }
        cur_x = ray.origin.x + dir.x * t;
        cur_y = ray.origin.y + dir.y * t;
    }
}

/// True iff nothing blocks the straight segment between two points.
/// A degenerate segment (both points equal) has line of sight.
pub fn line_of_sight(grid: &GridMap, from: Vector2, to: Vector2) -> bool {
    let distance = from.distance_to(to);
    let ray = Ray {
        origin: from,
        direction: scaled_to(to - from, 1.0),
        max_distance: distance,
    };
    !cast_ray(grid, -1, &ray, false, &[]).is_hit()
}
