//! Steering forces and path following.
//!
//! Every behavior is a pure function of the particle's position and
//! velocity. The emitter sums their results into the particle's force
//! accumulator before integration.
//!
//! | Behavior | Magnitude |
//! |----------|-----------|
//! | [`seek`] | `strength` |
//! | [`attract`] | `strength * (1 - d / radius)` inside `radius` |
//! | [`gravitate`] | `min(strength / d², cap)` |
//! | [`steer`] | `unit * strength - velocity`, at most `cap` |
//! | [`arrive`] | like steer, desired speed ramps down inside `radius` |
//!
//! Degenerate geometry (coincident target, zero radius) yields a zero force.

use glam::Vec3;

use crate::math;
use crate::table::PathTable;

/// Default dead zone for [`attract`] and [`gravitate`].
pub const DEFAULT_MIN_RANGE: f32 = 1e-10;

/// Unit vector toward `target` scaled by `strength`.
pub fn seek(position: Vec3, target: Vec3, strength: f32) -> Vec3 {
    let to_target = target - position;
    let distance = to_target.length();
    if distance > 0.0 {
        to_target * (strength / distance)
    } else {
        Vec3::ZERO
    }
}

/// Pull toward `target` that fades linearly to zero at `radius`.
///
/// Zero outside `radius` and inside `min_range`.
pub fn attract(position: Vec3, target: Vec3, strength: f32, radius: f32, min_range: f32) -> Vec3 {
    let to_target = target - position;
    let distance_sq = to_target.length_squared();
    if distance_sq <= min_range * min_range || distance_sq >= radius * radius {
        return Vec3::ZERO;
    }
    let distance = distance_sq.sqrt();
    to_target * (strength * (1.0 - distance / radius) / distance)
}

/// Inverse-square pull toward `target`, capped at `cap`.
///
/// Zero inside `min_range`.
pub fn gravitate(position: Vec3, target: Vec3, strength: f32, cap: f32, min_range: f32) -> Vec3 {
    let to_target = target - position;
    let distance_sq = to_target.length_squared();
    if distance_sq <= min_range * min_range {
        return Vec3::ZERO;
    }
    let power = (strength / distance_sq).min(cap);
    to_target * (power / distance_sq.sqrt())
}

/// Correction from the current velocity toward full speed at `target`.
///
/// The result never exceeds `cap`.
pub fn steer(position: Vec3, velocity: Vec3, target: Vec3, strength: f32, cap: f32) -> Vec3 {
    let to_target = target - position;
    let distance = to_target.length();
    if distance > 0.0 {
        let desired = to_target * (strength / distance);
        math::limit_magnitude(desired - velocity, cap)
    } else {
        Vec3::ZERO
    }
}

/// Like [`steer`], but the desired speed falls off linearly inside `radius`
/// so particles settle on the target.
///
/// The result never exceeds `cap`.
pub fn arrive(
    position: Vec3,
    velocity: Vec3,
    target: Vec3,
    strength: f32,
    radius: f32,
    cap: f32,
) -> Vec3 {
    let to_target = target - position;
    let distance_sq = to_target.length_squared();

    let desired = if distance_sq < radius * radius {
        to_target * (strength / radius)
    } else if distance_sq > 0.0 {
        to_target * (strength / distance_sq.sqrt())
    } else {
        Vec3::ZERO
    };

    math::limit_magnitude(desired - velocity, cap)
}

// ============================================================================
// Path following
// ============================================================================

/// How an emitter moves particles along its path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FollowMode {
    /// Path is ignored.
    #[default]
    Off,
    /// Physics stays on; particles drifting out of the corridor are steered
    /// toward a point ahead on the path.
    Corridor,
    /// Physics is bypassed; particles are placed on the path and advanced at
    /// a constant speed.
    Direct,
}

/// Corridor parameters for [`corridor_steer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corridor {
    /// Distance ahead of the particle's path position to steer toward.
    pub look_ahead: f32,
    /// Allowed distance from the path before a correction is applied.
    pub radius: f32,
    /// Steering strength and cap.
    pub power: f32,
}

/// True when `path` can drive a follower.
pub fn can_follow(path: &PathTable<Vec3>) -> bool {
    path.total_length() > 0.0 && path.sample_count() >= 2
}

/// Corridor steering for one particle.
///
/// Returns the steering force to add (zero while inside the corridor) and
/// updates the particle's distance along the path and its cached cursor.
pub fn corridor_steer(
    path: &PathTable<Vec3>,
    corridor: &Corridor,
    position: Vec3,
    velocity: Vec3,
    dt: f32,
    distance: &mut f32,
    cursor: &mut crate::table::TableCursor,
) -> Vec3 {
    if !can_follow(path) {
        return Vec3::ZERO;
    }

    let length = path.total_length();
    *distance = distance.rem_euclid(length);

    let Some(found) = path.locate_from(*cursor, *distance) else {
        return Vec3::ZERO;
    };
    *cursor = found;
    let Some(current) = path.entry(found).copied() else {
        return Vec3::ZERO;
    };

    let future = position + velocity * dt;
    let (start, segment) = match path.next_cursor(found).and_then(|next| path.entry(next)) {
        Some(next) if next.value != current.value => (current.value, next.value - current.value),
        Some(next) => {
            // Interval boundary: the next interval starts on this very point,
            // so aim at its first real sample instead.
            let after = path
                .next_cursor(found)
                .and_then(|c| path.next_cursor(c))
                .and_then(|c| path.entry(c))
                .map_or(next.value, |e| e.value);
            (current.value, after - current.value)
        }
        None => {
            let previous = path
                .prev_cursor(found)
                .and_then(|c| path.entry(c))
                .map_or(current.value, |e| e.value);
            (current.value, current.value - previous)
        }
    };

    let coefficient = math::scalar_projection(future - start, segment);
    let on_path = start + segment * coefficient;

    let mut force = Vec3::ZERO;
    if on_path.distance_squared(future) > corridor.radius * corridor.radius {
        let target = path.lookup_wrapped(*distance + corridor.look_ahead);
        force = steer(position, velocity, target, corridor.power, corridor.power);
    }

    *distance = current.cumulative_distance + coefficient.max(0.0) * segment.length();
    force
}

/// Direct follow for one particle.
///
/// Advances the distance by `speed * dt` (wrapping at the path end) and
/// returns the new position on the path. Returns `None` when the path
/// cannot be followed.
pub fn direct_follow(
    path: &PathTable<Vec3>,
    speed: f32,
    dt: f32,
    distance: &mut f32,
    cursor: &mut crate::table::TableCursor,
) -> Option<Vec3> {
    if !can_follow(path) {
        return None;
    }
    let length = path.total_length();
    let step = speed * dt;
    let next = (*distance + step).rem_euclid(length);
    let position = path.lookup_from(cursor, next);
    *distance = next;
    Some(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{TableCursor, TableEntry};
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut impl Rng, scale: f32) -> Vec3 {
        Vec3::new(
            rng.gen_range(-scale..scale),
            rng.gen_range(-scale..scale),
            rng.gen_range(-scale..scale),
        )
    }

    fn straight_path() -> PathTable<Vec3> {
        PathTable::from_intervals(vec![vec![
            TableEntry::new(Vec3::ZERO, 0.0),
            TableEntry::new(Vec3::new(10.0, 0.0, 0.0), 0.5),
            TableEntry::new(Vec3::new(20.0, 0.0, 0.0), 1.0),
        ]])
    }

    #[test]
    fn test_seek() {
        let f = seek(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), 2.0);
        assert_eq!(f, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(seek(Vec3::ONE, Vec3::ONE, 5.0), Vec3::ZERO);
    }

    #[test]
    fn test_attract_linear_falloff() {
        let near = attract(Vec3::ZERO, Vec3::new(2.5, 0.0, 0.0), 4.0, 10.0, DEFAULT_MIN_RANGE);
        assert!((near - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);

        let outside = attract(Vec3::ZERO, Vec3::new(12.0, 0.0, 0.0), 4.0, 10.0, DEFAULT_MIN_RANGE);
        assert_eq!(outside, Vec3::ZERO);

        let inside_dead_zone = attract(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), 4.0, 10.0, 1.0);
        assert_eq!(inside_dead_zone, Vec3::ZERO);
    }

    #[test]
    fn test_gravitate_is_capped() {
        let far = gravitate(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), 8.0, 100.0, DEFAULT_MIN_RANGE);
        assert!((far - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);

        let near = gravitate(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.1), 8.0, 1.5, DEFAULT_MIN_RANGE);
        assert!((near.length() - 1.5).abs() < 1e-5);

        assert_eq!(gravitate(Vec3::ONE, Vec3::ONE, 8.0, 1.5, DEFAULT_MIN_RANGE), Vec3::ZERO);
    }

    #[test]
    fn test_steer_and_arrive_respect_cap() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let position = random_vec(&mut rng, 50.0);
            let velocity = random_vec(&mut rng, 100.0);
            let target = random_vec(&mut rng, 50.0);
            let strength = rng.gen_range(0.0..500.0);
            let radius = rng.gen_range(0.0..30.0);
            let cap = rng.gen_range(0.0..20.0);

            let s = steer(position, velocity, target, strength, cap);
            let a = arrive(position, velocity, target, strength, radius, cap);
            assert!(s.length() <= cap * (1.0 + 1e-5) + 1e-6, "steer {s} cap {cap}");
            assert!(a.length() <= cap * (1.0 + 1e-5) + 1e-6, "arrive {a} cap {cap}");
        }
    }

    #[test]
    fn test_steer_small_correction_passes_through() {
        let f = steer(Vec3::ZERO, Vec3::new(0.9, 0.0, 0.0), Vec3::X * 10.0, 1.0, 5.0);
        assert!((f - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_arrive_slows_inside_radius() {
        let f = arrive(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 10.0, 5.0, 100.0);
        assert!((f - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
        let g = arrive(Vec3::ZERO, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.0, 5.0, 100.0);
        assert!((g - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_corridor_no_force_on_path() {
        let path = straight_path();
        let corridor = Corridor { look_ahead: 1.0, radius: 0.5, power: 10.0 };
        let mut distance = 3.0;
        let mut cursor = TableCursor::default();

        let force = corridor_steer(
            &path,
            &corridor,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            0.1,
            &mut distance,
            &mut cursor,
        );
        assert_eq!(force, Vec3::ZERO);
        assert!((distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_corridor_steers_back_when_outside() {
        let path = straight_path();
        let corridor = Corridor { look_ahead: 1.0, radius: 0.5, power: 10.0 };
        let mut distance = 3.0;
        let mut cursor = TableCursor::default();

        let force = corridor_steer(
            &path,
            &corridor,
            Vec3::new(3.0, 5.0, 0.0),
            Vec3::ZERO,
            0.1,
            &mut distance,
            &mut cursor,
        );
        assert!(force.y < 0.0);
        assert!(force.length() <= corridor.power + 1e-4);
        assert!((distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_corridor_wraps_distance() {
        let path = straight_path();
        let corridor = Corridor { look_ahead: 1.0, radius: 0.5, power: 10.0 };
        let mut distance = 43.0;
        let mut cursor = TableCursor::default();
        corridor_steer(
            &path,
            &corridor,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::ZERO,
            0.1,
            &mut distance,
            &mut cursor,
        );
        assert!((distance - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_direct_follow_advances_and_wraps() {
        let path = straight_path();
        let mut distance = 0.0;
        let mut cursor = TableCursor::default();

        let p = direct_follow(&path, 50.0, 0.1, &mut distance, &mut cursor);
        assert_eq!(p, Some(Vec3::new(5.0, 0.0, 0.0)));

        distance = 18.0;
        let p = direct_follow(&path, 50.0, 0.1, &mut distance, &mut cursor).unwrap();
        assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-4);
        assert!((distance - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_path_disables_following() {
        let path = PathTable::from_intervals(vec![vec![TableEntry::new(Vec3::ONE, 0.0)]]);
        let mut distance = 1.0;
        let mut cursor = TableCursor::default();
        assert!(!can_follow(&path));
        assert_eq!(direct_follow(&path, 1.0, 1.0, &mut distance, &mut cursor), None);
        assert_eq!(distance, 1.0);
    }
}
