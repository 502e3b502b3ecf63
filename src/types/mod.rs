//! Small shared value types.
//!
//! - [`SideBoundaries`]: one value per side of a rectangular domain, used by
//!   [`RasterMeshBuilder`](crate::mesh::RasterMeshBuilder) to assign perimeter
//!   node status without relying on array index conventions.

mod sides;

pub use sides::SideBoundaries;
