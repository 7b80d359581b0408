//! Spline paths built from user-placed control nodes.
//!
//! A path is an ordered sequence of [`Node`]s. Each node owns the segment
//! that starts at it and ends at the next node; the node's [`NodeKind`]
//! decides how that segment is evaluated.
//!
//! | Kind | Segment shape | Extra data |
//! |------|---------------|------------|
//! | [`NodeKind::Linear`] | Straight line | none |
//! | [`NodeKind::Bezier`] | Cubic Bezier | rear and front handles |
//! | [`NodeKind::CatmullRom`] | Uniform Catmull-Rom | uses previous and after-next nodes |
//!
//! [`PathBuilder`] owns the node sequence and turns it into a
//! distance-addressable [`PathTable`](crate::table::PathTable) by adaptive
//! subdivision.
//!
//! # Example
//!
//! ```ignore
//! let mut builder = PathBuilder::new();
//! builder.add_linear(Vec3::ZERO);
//! builder.add_catmull_rom(Vec3::new(10.0, 0.0, 0.0));
//! builder.add_linear(Vec3::new(10.0, 10.0, 0.0));
//!
//! let path = builder.rebuild();
//! println!("length = {}", path.total_length());
//! ```

pub mod builder;
pub mod node;

pub use builder::{PathBuilder, ToleranceNudge};
pub use node::{Node, NodeKind, CATMULL_ROM_BASIS};
