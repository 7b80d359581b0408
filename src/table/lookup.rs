//! Distance and parameter lookups on a [`PathTable`].
//!
//! All queries clamp to the table's valid range. The resolved position of a
//! distance query is the last sample, in table order, whose cumulative
//! distance does not exceed the query; the value is interpolated toward the
//! sample that follows it (the next sample in the interval, or the first
//! sample of the next interval).

use super::{PathTable, TableEntry, TableValue};

/// Position of a sample inside a table.
///
/// Returned by [`PathTable::locate`] and reused by
/// [`PathTable::locate_from`] so that queries which move a little each tick
/// only walk a few samples instead of rescanning the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableCursor {
    pub interval: usize,
    pub index: usize,
}

impl<T: TableValue> PathTable<T> {
    /// Clamp to `[0, total_length]`. A NaN query, or a table whose length
    /// is NaN or not positive, resolves to the start.
    fn clamp_distance(&self, distance: f32) -> f32 {
        if distance.is_nan() || !(self.total_length > 0.0) {
            0.0
        } else {
            distance.clamp(0.0, self.total_length)
        }
    }

    /// Sample at a cursor.
    pub fn entry(&self, cursor: TableCursor) -> Option<&TableEntry<T>> {
        self.intervals.get(cursor.interval)?.get(cursor.index)
    }

    /// The sample after `cursor`: the next one in its interval, or the first
    /// sample of the following non-empty interval.
    pub fn next_cursor(&self, cursor: TableCursor) -> Option<TableCursor> {
        let interval = self.intervals.get(cursor.interval)?;
        if cursor.index + 1 < interval.len() {
            return Some(TableCursor {
                interval: cursor.interval,
                index: cursor.index + 1,
            });
        }
        (cursor.interval + 1..self.intervals.len())
            .find(|&i| !self.intervals[i].is_empty())
            .map(|interval| TableCursor { interval, index: 0 })
    }

    /// The sample before `cursor`.
    pub fn prev_cursor(&self, cursor: TableCursor) -> Option<TableCursor> {
        if cursor.index > 0 {
            return Some(TableCursor {
                interval: cursor.interval,
                index: cursor.index - 1,
            });
        }
        (0..cursor.interval.min(self.intervals.len()))
            .rev()
            .find(|&i| !self.intervals[i].is_empty())
            .map(|interval| TableCursor {
                interval,
                index: self.intervals[interval].len() - 1,
            })
    }

    fn first_cursor(&self) -> Option<TableCursor> {
        self.intervals
            .iter()
            .position(|interval| !interval.is_empty())
            .map(|interval| TableCursor { interval, index: 0 })
    }

    /// Index of the last interval whose first sample does not lie beyond
    /// `distance`. Falls back to the first interval.
    pub fn lookup_interval(&self, distance: f32) -> usize {
        let distance = self.clamp_distance(distance);
        self.intervals
            .iter()
            .rposition(|interval| {
                interval
                    .first()
                    .is_some_and(|first| first.cumulative_distance <= distance)
            })
            .unwrap_or(0)
    }

    /// Resolve a distance to a sample position with a full scan.
    ///
    /// Returns `None` only for a table without samples.
    pub fn locate(&self, distance: f32) -> Option<TableCursor> {
        let distance = self.clamp_distance(distance);
        let interval = self.lookup_interval(distance);
        let samples = self.intervals.get(interval)?;
        match samples
            .iter()
            .rposition(|entry| entry.cumulative_distance <= distance)
        {
            Some(index) => Some(TableCursor { interval, index }),
            None => self.first_cursor(),
        }
    }

    /// Resolve a distance starting from a previously resolved position.
    ///
    /// Walks forward or backward from `hint`; gives the same answer as
    /// [`locate`](Self::locate) for any valid hint.
    pub fn locate_from(&self, hint: TableCursor, distance: f32) -> Option<TableCursor> {
        if self.entry(hint).is_none() {
            return self.locate(distance);
        }
        let distance = self.clamp_distance(distance);

        let mut cursor = hint;
        while let Some(entry) = self.entry(cursor) {
            if entry.cumulative_distance <= distance {
                break;
            }
            match self.prev_cursor(cursor) {
                Some(prev) => cursor = prev,
                None => return Some(cursor),
            }
        }
        while let Some(next) = self.next_cursor(cursor) {
            match self.entry(next) {
                Some(entry) if entry.cumulative_distance <= distance => cursor = next,
                _ => break,
            }
        }
        Some(cursor)
    }

    fn interpolate_at(&self, cursor: TableCursor, distance: f32) -> T {
        let Some(current) = self.entry(cursor) else {
            return T::default();
        };
        match self.next_cursor(cursor).and_then(|next| self.entry(next)) {
            Some(next) => {
                let t = crate::math::inv_lerp(
                    distance,
                    current.cumulative_distance,
                    next.cumulative_distance,
                )
                .clamp(0.0, 1.0);
                T::lerp(current.value, next.value, t)
            }
            None => current.value,
        }
    }

    /// Interpolated value at a distance along the whole table.
    ///
    /// Distances outside `[0, total_length]` clamp to the ends.
    pub fn lookup_value(&self, distance: f32) -> T {
        let distance = self.clamp_distance(distance);
        match self.locate(distance) {
            Some(cursor) => self.interpolate_at(cursor, distance),
            None => T::default(),
        }
    }

    /// Like [`lookup_value`](Self::lookup_value) but reduces the distance
    /// modulo the total length first, for followers that loop the path.
    pub fn lookup_wrapped(&self, distance: f32) -> T {
        if self.total_length > 0.0 {
            self.lookup_value(distance.rem_euclid(self.total_length))
        } else {
            self.lookup_value(0.0)
        }
    }

    /// Cursor-accelerated [`lookup_value`](Self::lookup_value).
    ///
    /// `cursor` is updated to the resolved position.
    pub fn lookup_from(&self, cursor: &mut TableCursor, distance: f32) -> T {
        let distance = self.clamp_distance(distance);
        match self.locate_from(*cursor, distance) {
            Some(found) => {
                *cursor = found;
                self.interpolate_at(found, distance)
            }
            None => T::default(),
        }
    }

    /// Interpolate inside one interval using a key function.
    fn lookup_in_interval_by<F>(&self, interval: usize, query: f32, key: F) -> T
    where
        F: Fn(&TableEntry<T>) -> f32,
    {
        let Some(samples) = self.intervals.get(interval) else {
            return T::default();
        };
        match samples.len() {
            0 => T::default(),
            1 => samples[0].value,
            len => {
                // The last sample can never be the lower bracket.
                let index = samples[..len - 1]
                    .iter()
                    .rposition(|entry| key(entry) <= query)
                    .unwrap_or(0);
                let (a, b) = (&samples[index], &samples[index + 1]);
                let t = crate::math::inv_lerp(query, key(a), key(b)).clamp(0.0, 1.0);
                T::lerp(a.value, b.value, t)
            }
        }
    }

    /// Interpolated value at a cumulative distance, restricted to one interval.
    pub fn lookup_in_interval_by_distance(&self, interval: usize, distance: f32) -> T {
        self.lookup_in_interval_by(interval, distance, |entry| entry.cumulative_distance)
    }

    /// Interpolated value at a local parameter within one interval.
    pub fn lookup_in_interval_by_param(&self, interval: usize, local_param: f32) -> T {
        self.lookup_in_interval_by(interval, local_param, |entry| entry.local_param)
    }

    /// Sample a motion graph at a normalized position `x` in `[0, 1]`.
    ///
    /// `x` spans the whole table: with `n` intervals, interval `floor(x * n)`
    /// is sampled at its local parameter `fract(x * n)`.
    pub fn sample_normalized(&self, x: f32) -> T {
        let count = self.intervals.len();
        if count == 0 {
            return T::default();
        }
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let scaled = x * count as f32;
        let interval = (scaled.floor() as usize).min(count - 1);
        self.lookup_in_interval_by_param(interval, scaled - interval as f32)
    }
}
