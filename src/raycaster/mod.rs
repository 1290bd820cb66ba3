pub mod caster;
pub mod collision;
pub mod fov;

pub use caster::{cast_ray, line_of_sight, Ray, RayHit};
pub use collision::CollisionResolver;
pub use fov::{fov_directions, MIN_RAY_COUNT};
