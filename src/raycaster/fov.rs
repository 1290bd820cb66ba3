use raylib::prelude::*;

use crate::map::vec::rotated_deg;

/// Fewer rays than this cannot cover a field of view; lower requests are
/// silently clamped, never rejected.
pub const MIN_RAY_COUNT: usize = 3;

/// Ordered fan of `ray_count` unit directions sweeping `fov_deg` degrees
/// around `facing`, left edge to right edge.
///
/// Direction i points at the center of column i's angular slice (the half-step
/// offset), so column boundaries don't bias which wall a column samples.
pub fn fov_directions(facing: Vector2, fov_deg: f32, ray_count: usize) -> Vec<Vector2> {
    let n = ray_count.max(MIN_RAY_COUNT);
    let left_edge = rotated_deg(facing, -fov_deg / 2.0);
    (0..n)
        .map(|i| rotated_deg(left_edge, (i as f32 + 0.5) * fov_deg / n as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::vec::signed_angle_deg;

    #[test]
    fn test_ray_count_clamped_to_minimum() {
        let facing = Vector2::new(0.0, 1.0);
        assert_eq!(fov_directions(facing, 60.0, 0).len(), 3);
        assert_eq!(fov_directions(facing, 60.0, 1).len(), 3);
        assert_eq!(fov_directions(facing, 60.0, 50).len(), 50);
    }

    #[test]
    fn test_fan_is_symmetric_about_facing() {
        let facing = Vector2::new(0.0, 1.0);
        let fov = 60.0;
        let n = 60;
        let dirs = fov_directions(facing, fov, n);

        let first = signed_angle_deg(facing, dirs[0]);
        let last = signed_angle_deg(facing, dirs[n - 1]);
        let half_column = fov / n as f32 / 2.0;

        // edge rays sit half a column inside ±fov/2
        assert!((first.abs() - (fov / 2.0 - half_column)).abs() < 1e-3);
        assert!((last.abs() - (fov / 2.0 - half_column)).abs() < 1e-3);
        // and mirror each other
        assert!((first + last).abs() < 1e-3);
    }

    #[test]
    fn test_fan_sweeps_monotonically() {
        let facing = Vector2::new(1.0, 0.0);
        let dirs = fov_directions(facing, 90.0, 9);
        let mut prev = signed_angle_deg(facing, dirs[0]);
        for dir in &dirs[1..] {
            let angle = signed_angle_deg(facing, *dir);
            assert!(angle > prev);
            prev = angle;
        }
    }

    #[test]
    fn test_directions_stay_unit_length() {
        let dirs = fov_directions(Vector2::new(0.6, 0.8), 75.0, 10);
        for dir in dirs {
            assert!((dir.length() - 1.0).abs() < 1e-4);
        }
    }
}
