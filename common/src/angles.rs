//! Angle helpers for the clockwise-positive, degrees-based sprite convention.
//!
//! A heading of 0 points along +y, 90 along +x. Velocities derived from a
//! heading are therefore `(sin θ, cos θ) * speed`.

/// Fold any angle into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation that takes `from` onto `to`, in `[-180, 180)`.
pub fn shortest_difference(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Heading in degrees of the vector `(dx, dy)`.
pub fn heading_of(dx: f32, dy: f32) -> f32 {
    dx.atan2(dy).to_degrees()
}

/// Heading that points from `(from_x, from_y)` toward `(to_x, to_y)`.
pub fn heading_towards(from_x: f32, from_y: f32, to_x: f32, to_y: f32) -> f32 {
    heading_of(to_x - from_x, to_y - from_y)
}

/// Unit direction vector for a heading.
pub fn direction(heading: f32) -> (f32, f32) {
    let radians = heading.to_radians();
    (radians.sin(), radians.cos())
}

/// Eased steering: move `current` a fraction of the way to `target` along the
/// shorter arc. The fraction is `turn_speed * dt`.
pub fn ease_towards(current: f32, target: f32, turn_speed: f32, dt: f32) -> f32 {
    let diff = shortest_difference(current, target);
    wrap_degrees(current + diff * turn_speed * dt)
}
