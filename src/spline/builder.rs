//! Adaptive table generation from a node sequence.
//!
//! Each node-to-node span is seeded with its two end samples and bisected
//! until the curve midpoint lies close enough to the chord. Closeness is
//! measured by triangle-inequality slack:
//!
//! ```text
//! |mid - a| + |mid - b| - |a - b| < tolerance
//! ```
//!
//! Smaller tolerances produce more samples. Every span accepted at a small
//! tolerance is also accepted at any larger one, so sample counts are
//! monotonic in the tolerance.

use glam::Vec3;

use super::node::Node;
use crate::table::{PathTable, TableEntry};

/// Lowest tolerance the builder accepts.
pub const MIN_TOLERANCE: f32 = 1e-6;
/// Highest tolerance the builder accepts.
pub const MAX_TOLERANCE: f32 = 9_999_999.0;
/// Tolerance used by a fresh builder.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Multiplicative step of one tolerance nudge.
const NUDGE_FACTOR: f32 = 1.1;
/// Bisection depth limit. Keeps degenerate input (NaN positions) finite.
const MAX_DEPTH: u32 = 20;

/// Direction of an interactive tolerance step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToleranceNudge {
    /// Fewer samples.
    Coarser,
    /// More samples.
    Finer,
}

/// Owns a node sequence and the table built from it.
#[derive(Clone, Debug)]
pub struct PathBuilder {
    nodes: Vec<Node>,
    tolerance: f32,
    table: PathTable<Vec3>,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
            table: PathTable::new(),
        }
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder over an existing node sequence. The table is not built yet.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    // ========================================================================
    // Node editing
    // ========================================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_linear(&mut self, position: Vec3) -> usize {
        self.push(Node::linear(position))
    }

    pub fn add_bezier(&mut self, position: Vec3, rear: Vec3, front: Vec3) -> usize {
        self.push(Node::bezier(position, rear, front))
    }

    pub fn add_catmull_rom(&mut self, position: Vec3) -> usize {
        self.push(Node::catmull_rom(position))
    }

    /// Insert before `index`. Indices past the end append.
    pub fn insert(&mut self, index: usize, node: Node) -> usize {
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node);
        index
    }

    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.nodes.len()).then(|| self.nodes.remove(index))
    }

    pub fn pop(&mut self) -> Option<Node> {
        self.nodes.pop()
    }

    /// Remove every node and empty the table.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.table.clear();
    }

    /// Move a node. Returns false for an unknown index.
    pub fn set_position(&mut self, index: usize, position: Vec3) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Point on the segment starting at node `index`.
    ///
    /// Neighbours are clamped to the sequence, so the first node acts as its
    /// own predecessor and the last node as its own successor.
    pub fn evaluate(&self, index: usize, t: f32) -> Option<Vec3> {
        let last = self.nodes.len().checked_sub(1)?;
        let node = self.nodes.get(index)?;
        let previous = &self.nodes[index.saturating_sub(1)];
        let next = &self.nodes[(index + 1).min(last)];
        let after_next = &self.nodes[(index + 2).min(last)];
        Some(node.evaluate(previous, next, after_next, t))
    }

    // ========================================================================
    // Tolerance
    // ========================================================================

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Set the tolerance, clamped to `[MIN_TOLERANCE, MAX_TOLERANCE]`.
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = clamp_tolerance(tolerance);
    }

    /// Step the tolerance by a factor of 1.1. Does not rebuild.
    pub fn nudge_tolerance(&mut self, nudge: ToleranceNudge) -> f32 {
        self.tolerance = match nudge {
            ToleranceNudge::Coarser => (self.tolerance * NUDGE_FACTOR).min(MAX_TOLERANCE),
            ToleranceNudge::Finer => (self.tolerance / NUDGE_FACTOR).max(MIN_TOLERANCE),
        };
        self.tolerance
    }

    // ========================================================================
    // Table
    // ========================================================================

    /// The most recently built table.
    pub fn table(&self) -> &PathTable<Vec3> {
        &self.table
    }

    /// Rebuild the table at the current tolerance.
    pub fn rebuild(&mut self) -> &PathTable<Vec3> {
        let mut table = PathTable::new();
        for index in 0..self.nodes.len().saturating_sub(1) {
            table.push_interval(self.sample_interval(index));
        }
        table.update_distances();

        log::debug!(
            "rebuilt path: {} nodes, {} samples, length {:.3} (tolerance {})",
            self.nodes.len(),
            table.sample_count(),
            table.total_length(),
            self.tolerance
        );

        self.table = table;
        &self.table
    }

    /// Set the tolerance and rebuild.
    pub fn rebuild_with(&mut self, tolerance: f32) -> &PathTable<Vec3> {
        self.set_tolerance(tolerance);
        self.rebuild()
    }

    fn sample_interval(&self, index: usize) -> Vec<TableEntry<Vec3>> {
        let start = TableEntry::new(self.nodes[index].position, 0.0);
        let end = TableEntry::new(self.nodes[index + 1].position, 1.0);

        let mut samples = vec![start];
        self.subdivide(index, start, end, 0, &mut samples);
        samples
    }

    /// Append every sample after `a` up to and including `b`.
    fn subdivide(
        &self,
        index: usize,
        a: TableEntry<Vec3>,
        b: TableEntry<Vec3>,
        depth: u32,
        samples: &mut Vec<TableEntry<Vec3>>,
    ) {
        let t = (a.local_param + b.local_param) * 0.5;
        let mid = self.evaluate(index, t).unwrap_or(a.value);

        // Slack is evaluated in f64 so collinear points do not look bent
        // through rounding noise.
        let (pa, pb, pm) = (a.value.as_dvec3(), b.value.as_dvec3(), mid.as_dvec3());
        let slack = pm.distance(pa) + pm.distance(pb) - pa.distance(pb);

        // NaN slack never compares greater, so degenerate spans are accepted.
        if depth >= MAX_DEPTH || !(slack >= self.tolerance as f64) {
            samples.push(b);
            return;
        }

        let middle = TableEntry::new(mid, t);
        self.subdivide(index, a, middle, depth + 1, samples);
        self.subdivide(index, middle, b, depth + 1, samples);
    }
}

fn clamp_tolerance(tolerance: f32) -> f32 {
    if tolerance.is_nan() {
        DEFAULT_TOLERANCE
    } else {
        tolerance.clamp(MIN_TOLERANCE, MAX_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> PathBuilder {
        let mut builder = PathBuilder::new();
        builder.add_linear(Vec3::ZERO);
        builder.add_linear(Vec3::new(10.0, 0.0, 0.0));
        builder.add_linear(Vec3::new(10.0, 10.0, 0.0));
        builder
    }

    fn s_curve() -> PathBuilder {
        let mut builder = PathBuilder::new();
        builder.add_bezier(Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 8.0, 0.0));
        builder.add_catmull_rom(Vec3::new(10.0, 0.0, 0.0));
        builder.add_catmull_rom(Vec3::new(20.0, 5.0, 3.0));
        builder.add_linear(Vec3::new(25.0, -5.0, 0.0));
        builder
    }

    #[test]
    fn test_linear_path_length_at_any_tolerance() {
        let mut builder = l_shape();
        for tolerance in [MIN_TOLERANCE, 0.001, 0.1, 1.0, 100.0, MAX_TOLERANCE] {
            let table = builder.rebuild_with(tolerance);
            assert!(
                (table.total_length() - 20.0).abs() < 1e-4,
                "tolerance {tolerance}: length {}",
                table.total_length()
            );
            assert_eq!(table.interval_count(), 2);
        }
    }

    #[test]
    fn test_fewer_than_two_nodes_is_empty() {
        let mut builder = PathBuilder::new();
        assert!(builder.rebuild().is_empty());
        builder.add_linear(Vec3::ONE);
        assert!(builder.rebuild().is_empty());
        assert_eq!(builder.table().total_length(), 0.0);
    }

    #[test]
    fn test_tolerance_monotonic_sample_count() {
        let mut builder = s_curve();
        let mut previous = usize::MAX;
        for tolerance in [0.0001, 0.001, 0.01, 0.1, 1.0, 10.0] {
            let count = builder.rebuild_with(tolerance).sample_count();
            assert!(count <= previous, "tolerance {tolerance}: {count} > {previous}");
            previous = count;
        }
    }

    #[test]
    fn test_every_span_within_tolerance() {
        let mut builder = s_curve();
        let tolerance = 0.01;
        builder.rebuild_with(tolerance);

        for (index, interval) in builder.table().intervals().iter().enumerate() {
            for pair in interval.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let t = (a.local_param + b.local_param) * 0.5;
                let mid = builder.evaluate(index, t).unwrap();
                let slack = mid.distance(a.value) + mid.distance(b.value) - a.value.distance(b.value);
                assert!(slack < tolerance + 1e-4, "interval {index} t {t}: slack {slack}");
            }
        }
    }

    #[test]
    fn test_finer_tolerance_converges_on_length() {
        let mut builder = s_curve();
        let coarse = builder.rebuild_with(1.0).total_length();
        let fine = builder.rebuild_with(0.0001).total_length();
        let finer = builder.rebuild_with(0.00001).total_length();
        assert!(coarse <= fine + 1e-3);
        assert!((fine - finer).abs() < 0.01);
    }

    #[test]
    fn test_interval_params_strictly_increase() {
        let mut builder = s_curve();
        builder.rebuild_with(0.05);
        for interval in builder.table().intervals() {
            assert_eq!(interval.first().map(|e| e.local_param), Some(0.0));
            assert_eq!(interval.last().map(|e| e.local_param), Some(1.0));
            assert!(interval.windows(2).all(|w| w[0].local_param < w[1].local_param));
        }
    }

    #[test]
    fn test_nan_positions_terminate() {
        let mut builder = PathBuilder::new();
        builder.add_catmull_rom(Vec3::ZERO);
        builder.add_catmull_rom(Vec3::splat(f32::NAN));
        builder.add_catmull_rom(Vec3::X);
        let table = builder.rebuild();
        assert_eq!(table.interval_count(), 2);

        // Lookups on the resulting NaN-length table resolve to the start.
        assert_eq!(table.locate(5.0), Some(crate::table::TableCursor::default()));
        table.lookup_value(5.0);
    }

    #[test]
    fn test_nudge_tolerance_bounds() {
        let mut builder = PathBuilder::new();
        assert_eq!(builder.tolerance(), DEFAULT_TOLERANCE);

        let coarser = builder.nudge_tolerance(ToleranceNudge::Coarser);
        assert!((coarser - 0.11).abs() < 1e-6);

        builder.set_tolerance(MAX_TOLERANCE);
        assert_eq!(builder.nudge_tolerance(ToleranceNudge::Coarser), MAX_TOLERANCE);

        builder.set_tolerance(0.0);
        assert_eq!(builder.tolerance(), MIN_TOLERANCE);
        assert_eq!(builder.nudge_tolerance(ToleranceNudge::Finer), MIN_TOLERANCE);
    }

    #[test]
    fn test_node_editing() {
        let mut builder = l_shape();
        assert_eq!(builder.insert(1, Node::catmull_rom(Vec3::new(5.0, 1.0, 0.0))), 1);
        assert_eq!(builder.len(), 4);
        assert_eq!(builder.insert(99, Node::linear(Vec3::ONE)), 4);

        assert!(builder.set_position(0, Vec3::NEG_X));
        assert!(!builder.set_position(42, Vec3::ZERO));
        assert_eq!(builder.node(0).map(|n| n.position), Some(Vec3::NEG_X));

        assert!(builder.remove(10).is_none());
        assert_eq!(builder.remove(1).map(|n| n.kind), Some(crate::spline::NodeKind::CatmullRom));
        assert_eq!(builder.pop().map(|n| n.position), Some(Vec3::ONE));

        builder.rebuild();
        builder.clear();
        assert!(builder.is_empty());
        assert!(builder.table().is_empty());
    }

    #[test]
    fn test_evaluate_clamps_neighbours() {
        let builder = l_shape();
        assert_eq!(builder.evaluate(0, 0.5), Some(Vec3::new(5.0, 0.0, 0.0)));
        // The last node has no successor and evaluates onto itself.
        assert_eq!(builder.evaluate(2, 0.5), Some(Vec3::new(10.0, 10.0, 0.0)));
        assert_eq!(builder.evaluate(3, 0.5), None);
    }
}
