use rand::Rng;
use raylib::prelude::*;

use crate::map::vec::rotated_deg;
use crate::raycaster::{fov_directions, MIN_RAY_COUNT};

const GRAVITY: f32 = -15.0;
const JUMP_VELOCITY: f32 = 8.0;

/// First-person viewer: position, facing and view configuration, plus the
/// jump state that feeds the vertical view offset.
pub struct Player {
    pub position: Vector2,
    /// Unit facing direction.
    pub facing: Vector2,
    /// Horizontal and vertical field of view in degrees.
    pub fov: (f32, f32),
    /// Rays cast per frame, one per screen column. Clamped to at least
    /// [`MIN_RAY_COUNT`] wherever it is consumed.
    pub ray_count: usize,
    /// Maximum sight distance in world units.
    pub sight: f32,
    pub move_speed: f32,
    /// Turn rate in degrees per second.
    pub turn_speed: f32,
    /// Height above the floor gained by jumping.
    pub z: f32,
    z_vel: f32,
}

impl Player {
    pub fn new(position: Vector2) -> Self {
        let heading = rand::thread_rng().gen::<f32>() * 360.0;
        Self {
            position,
            facing: rotated_deg(Vector2::new(0.0, 1.0), heading),
            fov: (60.0, 45.0),
            ray_count: 60,
            sight: 200.0,
            move_speed: 50.0,
            turn_speed: 160.0,
            z: 0.0,
            z_vel: 0.0,
        }
    }

    /// Rotate the facing direction. `direction` is -1, 0 or 1.
    pub fn turn(&mut self, direction: f32, dt: f32) {
        self.facing = rotated_deg(self.facing, direction * self.turn_speed * dt);
    }

    /// Naive forward/strafe integration. Returns the target position without
    /// moving the player; the caller runs it through the collision resolver
    /// first.
    pub fn walk(&self, forward: f32, strafe: f32, dt: f32) -> Vector2 {
        let mut target = self.position;
        if forward != 0.0 {
            target = target + self.facing * (forward * self.move_speed * dt);
        }
        if strafe != 0.0 {
            let right = rotated_deg(self.facing, 90.0);
            target = target + right * (strafe * self.move_speed * dt);
        }
        target
    }

    /// Start a jump, only from the ground.
    pub fn jump(&mut self) {
        if self.z == 0.0 && self.z_vel == 0.0 {
            self.z_vel = JUMP_VELOCITY;
        }
    }

    /// Integrate gravity on the vertical offset.
    pub fn update_vertical(&mut self, dt: f32) {
        if self.z > 0.0 || self.z_vel != 0.0 {
            self.z_vel += GRAVITY * dt;
            self.z += self.z_vel * dt;
        }
        if self.z <= 0.0 {
            self.z = 0.0;
            self.z_vel = 0.0;
        }
    }

    /// The frame's fan of ray directions across the horizontal FOV.
    pub fn ray_directions(&self) -> Vec<Vector2> {
        fov_directions(self.facing, self.fov.0, self.ray_count.max(MIN_RAY_COUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_rotates_facing() {
        let mut player = Player::new(Vector2::zero());
        player.facing = Vector2::new(1.0, 0.0);
        player.turn_speed = 90.0;
        player.turn(1.0, 1.0);
        assert!((player.facing.x - 0.0).abs() < 1e-4);
        assert!((player.facing.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_walk_moves_along_facing() {
        let mut player = Player::new(Vector2::new(10.0, 10.0));
        player.facing = Vector2::new(0.0, 1.0);
        player.move_speed = 40.0;
        let target = player.walk(1.0, 0.0, 0.5);
        assert!((target.x - 10.0).abs() < 1e-4);
        assert!((target.y - 30.0).abs() < 1e-4);
        // walk does not move the player itself
        assert!((player.position.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_strafe_is_perpendicular() {
        let mut player = Player::new(Vector2::zero());
        player.facing = Vector2::new(0.0, 1.0);
        player.move_speed = 10.0;
        let target = player.walk(0.0, 1.0, 1.0);
        assert!(target.x.abs() > 9.9);
        assert!(target.y.abs() < 1e-4);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let mut player = Player::new(Vector2::zero());
        player.jump();
        let mut peak: f32 = 0.0;
        for _ in 0..300 {
            player.update_vertical(1.0 / 60.0);
            peak = peak.max(player.z);
        }
        assert!(peak > 0.5);
        assert_eq!(player.z, 0.0);

        // airborne players cannot double-jump
        player.jump();
        player.update_vertical(1.0 / 60.0);
        let rising = player.z;
        player.jump();
        player.update_vertical(1.0 / 60.0);
        assert!(player.z > rising);
    }

    #[test]
    fn test_ray_directions_respect_minimum() {
        let mut player = Player::new(Vector2::zero());
        player.ray_count = 1;
        assert_eq!(player.ray_directions().len(), MIN_RAY_COUNT);
    }
}
