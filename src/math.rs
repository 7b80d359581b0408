//! Small vector helpers shared by the table, steering and emitter code.
//!
//! Everything here is total: degenerate input (zero-length vectors, empty
//! spans) resolves to a defined value instead of producing NaN.

use glam::Vec3;

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: the `t` for which `lerp(a, b, t) == value`.
///
/// Returns 0 for an empty span so callers interpolating between two
/// coincident samples land on the first one.
#[inline]
pub fn inv_lerp(value: f32, a: f32, b: f32) -> f32 {
    let span = b - a;
    if span.abs() > f32::EPSILON {
        (value - a) / span
    } else {
        0.0
    }
}

/// Scale `v` down so its length does not exceed `max`.
///
/// Vectors already within the limit are returned unchanged. A negative
/// limit is treated as zero.
#[inline]
pub fn limit_magnitude(v: Vec3, max: f32) -> Vec3 {
    let max = max.max(0.0);
    let length = v.length();
    if length > max {
        v * (max / length)
    } else {
        v
    }
}

/// Scalar projection coefficient of `a` onto `b` (`a·b / b·b`).
///
/// Zero when `b` has no length.
#[inline]
pub fn scalar_projection(a: Vec3, b: Vec3) -> f32 {
    let denom = b.length_squared();
    if denom > 0.0 {
        a.dot(b) / denom
    } else {
        0.0
    }
}
