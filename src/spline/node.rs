//! Control nodes and per-segment curve evaluation.

use glam::{Mat4, Vec3, Vec4};

/// Uniform Catmull-Rom basis, column-major.
///
/// Multiplying by `[t³, t², t, 1]` yields the blend weights for
/// `[previous, own, next, after_next]`.
pub const CATMULL_ROM_BASIS: Mat4 = Mat4::from_cols_array(&[
    -0.5, 1.5, -1.5, 0.5, //
    1.0, -2.5, 2.0, -0.5, //
    -0.5, 0.0, 0.5, 0.0, //
    0.0, 1.0, 0.0, 0.0,
]);

/// How the segment starting at a node is shaped.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Straight line to the next node.
    Linear,
    /// Cubic Bezier.
    ///
    /// `front` shapes the segment leaving this node; `rear` shapes the
    /// segment arriving at it.
    Bezier {
        /// Handle on the incoming side.
        rear: Vec3,
        /// Handle on the outgoing side.
        front: Vec3,
    },
    /// Uniform Catmull-Rom through the neighbouring nodes.
    CatmullRom,
}

/// A control node. Its position always lies on the path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Display name shown by editors.
    pub name: String,
    pub position: Vec3,
    pub kind: NodeKind,
}

impl Node {
    pub fn linear(position: Vec3) -> Self {
        Self {
            name: String::from("Linear"),
            position,
            kind: NodeKind::Linear,
        }
    }

    /// Bezier node with both handles.
    pub fn bezier(position: Vec3, rear: Vec3, front: Vec3) -> Self {
        Self {
            name: String::from("Bezier"),
            position,
            kind: NodeKind::Bezier { rear, front },
        }
    }

    pub fn catmull_rom(position: Vec3) -> Self {
        Self {
            name: String::from("Catmull-Rom"),
            position,
            kind: NodeKind::CatmullRom,
        }
    }

    /// Replace the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The pair of points a segment ending at this node blends toward.
    ///
    /// Bezier nodes return `(rear handle, position)`; every other kind
    /// returns `(position, position)`.
    pub fn control_points(&self) -> (Vec3, Vec3) {
        match self.kind {
            NodeKind::Bezier { rear, .. } => (rear, self.position),
            NodeKind::Linear | NodeKind::CatmullRom => (self.position, self.position),
        }
    }

    /// Point on the segment from this node to `next` at local parameter `t`.
    ///
    /// `previous` and `after_next` are only read by Catmull-Rom nodes. At the
    /// ends of a sequence the caller passes the nearest valid node.
    pub fn evaluate(&self, previous: &Node, next: &Node, after_next: &Node, t: f32) -> Vec3 {
        match self.kind {
            NodeKind::Linear => self.position.lerp(next.position, t),
            NodeKind::Bezier { front, .. } => {
                let (incoming, end) = next.control_points();
                bezier(self.position, front, incoming, end, t)
            }
            NodeKind::CatmullRom => {
                let (_, through) = next.control_points();
                catmull_rom(previous.position, self.position, through, after_next.position, t)
            }
        }
    }
}

/// Cubic Bernstein blend.
#[inline]
pub fn bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Uniform Catmull-Rom segment between `p1` and `p2`.
#[inline]
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let weights = CATMULL_ROM_BASIS * Vec4::new(t * t * t, t * t, t, 1.0);
    p0 * weights.x + p1 * weights.y + p2 * weights.z + p3 * weights.w
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_linear_endpoints() {
        let a = Node::linear(Vec3::ZERO);
        let b = Node::linear(Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(a.evaluate(&a, &b, &b, 0.0), Vec3::ZERO);
        assert_eq!(a.evaluate(&a, &b, &b, 1.0), b.position);
        assert_eq!(a.evaluate(&a, &b, &b, 0.5), Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_bezier_uses_next_rear_handle() {
        let a = Node::bezier(Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let b = Node::bezier(Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 1.0, 0.0), Vec3::ZERO);

        assert!(approx(a.evaluate(&a, &b, &b, 0.0), a.position));
        assert!(approx(a.evaluate(&a, &b, &b, 1.0), b.position));
        // Symmetric handles put the midpoint at x = 1.5, y = 0.75.
        assert!(approx(a.evaluate(&a, &b, &b, 0.5), Vec3::new(1.5, 0.75, 0.0)));
    }

    #[test]
    fn test_bezier_into_plain_node() {
        let a = Node::bezier(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        let b = Node::linear(Vec3::new(2.0, 0.0, 0.0));
        assert!(approx(a.evaluate(&a, &b, &b, 0.5), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_control_points() {
        let linear = Node::linear(Vec3::X);
        assert_eq!(linear.control_points(), (Vec3::X, Vec3::X));

        let bezier = Node::bezier(Vec3::X, Vec3::Y, Vec3::Z);
        assert_eq!(bezier.control_points(), (Vec3::Y, Vec3::X));
    }

    #[test]
    fn test_catmull_rom_interpolates_nodes() {
        let p0 = Node::catmull_rom(Vec3::new(-1.0, 0.0, 0.0));
        let p1 = Node::catmull_rom(Vec3::ZERO);
        let p2 = Node::catmull_rom(Vec3::new(1.0, 1.0, 0.0));
        let p3 = Node::catmull_rom(Vec3::new(2.0, 0.0, 0.0));

        assert!(approx(p1.evaluate(&p0, &p2, &p3, 0.0), p1.position));
        assert!(approx(p1.evaluate(&p0, &p2, &p3, 1.0), p2.position));
    }

    #[test]
    fn test_catmull_rom_collinear_is_straight() {
        let pts: Vec<Node> = (0..4)
            .map(|i| Node::catmull_rom(Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        let mid = pts[1].evaluate(&pts[0], &pts[2], &pts[3], 0.5);
        assert!(approx(mid, Vec3::new(1.5, 0.0, 0.0)));
    }
}
