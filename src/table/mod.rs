//! Distance-addressable lookup tables.
//!
//! A [`PathTable`] is the sampled form of a curve: an ordered list of
//! intervals (one per node-to-node span), each holding an ordered list of
//! [`TableEntry`] samples. Every sample records its value, its local
//! parameter within the interval and its cumulative distance from the start
//! of the whole table.
//!
//! The same structure serves two purposes:
//!
//! | Value type | Use |
//! |------------|-----|
//! | `Vec3` | Spatial paths built from spline nodes |
//! | `f32` | Motion graphs (size/speed/colour over lifetime) |
//!
//! # Invariants
//!
//! - Within one interval, `local_param` is strictly increasing.
//! - `cumulative_distance` never decreases across the whole table.
//! - [`PathTable::total_length`] equals the distance accumulated by walking
//!   every interval in order. Any structural edit must be followed by
//!   [`PathTable::update_distances`].
//!
//! # Example
//!
//! ```ignore
//! let graph = PathTable::<f32>::identity();
//! assert_eq!(graph.lookup_value(0.25), 0.25);
//! ```

mod lookup;

pub use lookup::TableCursor;

use glam::{Vec2, Vec3, Vec4};
use thiserror::Error;

/// Value types that can be stored in a [`PathTable`].
///
/// Abstracts over scalars and vectors so the same table drives both 1-D
/// motion graphs and 3-D paths.
pub trait TableValue: Copy + Default + PartialEq + std::fmt::Debug {
    /// Euclidean distance between two values.
    fn distance(a: Self, b: Self) -> f32;

    /// Linear interpolation from `a` to `b`.
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl TableValue for f32 {
    #[inline]
    fn distance(a: Self, b: Self) -> f32 {
        (b - a).abs()
    }

    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl TableValue for Vec2 {
    #[inline]
    fn distance(a: Self, b: Self) -> f32 {
        a.distance(b)
    }

    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl TableValue for Vec3 {
    #[inline]
    fn distance(a: Self, b: Self) -> f32 {
        a.distance(b)
    }

    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl TableValue for Vec4 {
    #[inline]
    fn distance(a: Self, b: Self) -> f32 {
        a.distance(b)
    }

    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

/// One sample of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TableEntry<T> {
    /// Sampled value.
    pub value: T,
    /// Parameter within the owning interval, in `[0, 1]`.
    pub local_param: f32,
    /// Distance from the start of the table to this sample.
    pub cumulative_distance: f32,
}

impl<T> TableEntry<T> {
    /// Create a sample. The distance is filled in by `update_distances`.
    pub fn new(value: T, local_param: f32) -> Self {
        Self {
            value,
            local_param,
            cumulative_distance: 0.0,
        }
    }

    /// Create a sample with an explicit cumulative distance.
    pub fn with_distance(value: T, local_param: f32, cumulative_distance: f32) -> Self {
        Self {
            value,
            local_param,
            cumulative_distance,
        }
    }
}

/// Errors raised when building a table from user keys.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// A curve needs at least a start and an end key.
    #[error("a curve needs at least 2 keys, got {found}")]
    TooFewKeys { found: usize },

    /// Key parameters must be strictly increasing.
    #[error("key {index} does not increase the curve parameter")]
    NonIncreasingParam { index: usize },

    /// Key parameters must lie in `[0, 1]`.
    #[error("key {index} has parameter {param} outside [0, 1]")]
    ParamOutOfRange { index: usize, param: f32 },
}

/// Sampled curve with per-interval sample lists and a cached total length.
#[derive(Clone, Debug, PartialEq)]
pub struct PathTable<T> {
    intervals: Vec<Vec<TableEntry<T>>>,
    total_length: f32,
}

impl<T> Default for PathTable<T> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
            total_length: 0.0,
        }
    }
}

impl<T: TableValue> PathTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw intervals and compute distances.
    pub fn from_intervals(intervals: Vec<Vec<TableEntry<T>>>) -> Self {
        let mut table = Self {
            intervals,
            total_length: 0.0,
        };
        table.update_distances();
        table
    }

    /// Append an interval.
    ///
    /// This is a structural edit: call [`update_distances`](Self::update_distances)
    /// before the next lookup.
    pub fn push_interval(&mut self, samples: Vec<TableEntry<T>>) {
        self.intervals.push(samples);
    }

    /// Remove every interval.
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.total_length = 0.0;
    }

    /// Recompute every cumulative distance and the total length.
    ///
    /// Walks intervals in order summing the distance between consecutive
    /// samples. The first sample of each interval starts at the running
    /// total, so interval boundaries share a distance.
    pub fn update_distances(&mut self) {
        // Accumulate in f64 so long tables do not drift.
        let mut total = 0.0f64;
        for interval in &mut self.intervals {
            let mut previous: Option<T> = None;
            for entry in interval.iter_mut() {
                if let Some(prev) = previous {
                    total += T::distance(prev, entry.value) as f64;
                }
                entry.cumulative_distance = total as f32;
                previous = Some(entry.value);
            }
        }
        self.total_length = total as f32;
    }

    /// Length of the sampled curve (not the number of samples).
    #[inline]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Number of intervals (node-to-node spans).
    #[inline]
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Number of samples across all intervals.
    pub fn sample_count(&self) -> usize {
        self.intervals.iter().map(Vec::len).sum()
    }

    /// True when the table holds no samples at all.
    pub fn is_empty(&self) -> bool {
        self.intervals.iter().all(Vec::is_empty)
    }

    /// All intervals in order.
    #[inline]
    pub fn intervals(&self) -> &[Vec<TableEntry<T>>] {
        &self.intervals
    }

    /// Samples of a single interval.
    pub fn interval(&self, index: usize) -> Option<&[TableEntry<T>]> {
        self.intervals.get(index).map(Vec::as_slice)
    }

    /// Iterate every sample in table order.
    pub fn samples(&self) -> impl Iterator<Item = &TableEntry<T>> {
        self.intervals.iter().flatten()
    }
}

impl PathTable<f32> {
    /// The identity motion graph: a straight line from 0 to 1 with slope 1.
    ///
    /// Sampling it returns the query unchanged, so a property driven by it
    /// interpolates linearly between its begin and end values.
    pub fn identity() -> Self {
        Self::from_intervals(vec![vec![
            TableEntry::new(0.0, 0.0),
            TableEntry::new(1.0, 1.0),
        ]])
    }

    /// Build a single-interval motion graph from `(param, value)` keys.
    ///
    /// Parameters must start inside `[0, 1]` and strictly increase.
    ///
    /// ```ignore
    /// // Fade in quickly, then fall off slowly.
    /// let graph = PathTable::curve(&[(0.0, 0.0), (0.1, 1.0), (1.0, 0.0)])?;
    /// ```
    pub fn curve(keys: &[(f32, f32)]) -> Result<Self, TableError> {
        if keys.len() < 2 {
            return Err(TableError::TooFewKeys { found: keys.len() });
        }

        let mut samples = Vec::with_capacity(keys.len());
        for (index, &(param, value)) in keys.iter().enumerate() {
            if !(0.0..=1.0).contains(&param) {
                return Err(TableError::ParamOutOfRange { index, param });
            }
            if index > 0 && param <= keys[index - 1].0 {
                return Err(TableError::NonIncreasingParam { index });
            }
            samples.push(TableEntry::new(value, param));
        }

        Ok(Self::from_intervals(vec![samples]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_path() -> PathTable<Vec3> {
        PathTable::from_intervals(vec![
            vec![
                TableEntry::new(Vec3::ZERO, 0.0),
                TableEntry::new(Vec3::new(5.0, 0.0, 0.0), 0.5),
                TableEntry::new(Vec3::new(10.0, 0.0, 0.0), 1.0),
            ],
            vec![
                TableEntry::new(Vec3::new(10.0, 0.0, 0.0), 0.0),
                TableEntry::new(Vec3::new(10.0, 10.0, 0.0), 1.0),
            ],
        ])
    }

    #[test]
    fn test_update_distances_accumulates_across_intervals() {
        let table = square_path();
        assert_eq!(table.total_length(), 20.0);

        let distances: Vec<f32> = table.samples().map(|e| e.cumulative_distance).collect();
        assert_eq!(distances, vec![0.0, 5.0, 10.0, 10.0, 20.0]);
    }

    #[test]
    fn test_update_distances_idempotent() {
        let mut table = square_path();
        let before = table.clone();
        table.update_distances();
        table.update_distances();
        assert_eq!(table, before);
    }

    #[test]
    fn test_identity_table() {
        let table = PathTable::<f32>::identity();
        assert_eq!(table.interval_count(), 1);
        assert_eq!(table.sample_count(), 2);
        assert_eq!(table.total_length(), 1.0);
    }

    #[test]
    fn test_curve_rejects_bad_keys() {
        assert_eq!(
            PathTable::curve(&[(0.0, 1.0)]),
            Err(TableError::TooFewKeys { found: 1 })
        );
        assert_eq!(
            PathTable::curve(&[(0.0, 1.0), (0.5, 0.0), (0.5, 1.0)]),
            Err(TableError::NonIncreasingParam { index: 2 })
        );
        assert!(matches!(
            PathTable::curve(&[(0.0, 1.0), (1.5, 0.0)]),
            Err(TableError::ParamOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_push_interval_then_update() {
        let mut table = PathTable::<f32>::new();
        assert!(table.is_empty());

        table.push_interval(vec![TableEntry::new(0.0, 0.0), TableEntry::new(3.0, 1.0)]);
        assert_eq!(table.total_length(), 0.0);

        table.update_distances();
        assert_eq!(table.total_length(), 3.0);
    }
}
