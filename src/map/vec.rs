use raylib::prelude::*;

/// Rotate a vector by an angle in degrees, returning a new vector.
/// Positive angles rotate counterclockwise in the y-up mathematical sense.
pub fn rotated_deg(v: Vector2, degrees: f32) -> Vector2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rescale a vector to the given length. The zero vector stays zero.
pub fn scaled_to(v: Vector2, len: f32) -> Vector2 {
    let current = v.length();
    if current == 0.0 {
        Vector2::zero()
    } else {
        v * (len / current)
    }
}

/// Signed angle in degrees from `a` to `b`, in (-180, 180]. Positive means
/// `b` lies counterclockwise of `a`, matching the sign of [`rotated_deg`].
pub fn signed_angle_deg(a: Vector2, b: Vector2) -> f32 {
    let cross = a.x * b.y - a.y * b.x;
    let dot = a.x * b.x + a.y * b.y;
    cross.atan2(dot).to_degrees()
}
