//! Builders for [`Mesh`].
//!
//! - [`MeshBuilder`]: arbitrary node/link networks (e.g. Voronoi or hex meshes
//!   generated elsewhere)
//! - [`RasterMeshBuilder`]: regular rasters with per-side boundary status
//!
//! # Example
//!
//! ```
//! use overland_rs::mesh::{NodeStatus, RasterMeshBuilder};
//! use overland_rs::types::SideBoundaries;
//!
//! // 5 x 4 raster, 10 m cells, outlet along the west edge
//! let mesh = RasterMeshBuilder::new(5, 4)
//!     .with_spacing(10.0, 10.0)
//!     .with_side_status(
//!         SideBoundaries::uniform(NodeStatus::Closed).with_west(NodeStatus::FixedValue),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mesh.n_nodes(), 20);
//! assert_eq!(mesh.n_core_nodes(), 6);
//! ```

use super::status::NodeStatus;
use super::topology::{Mesh, MeshError};
use crate::types::SideBoundaries;

/// Builder for unstructured node/link meshes.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    nodes: Vec<((f64, f64), NodeStatus, Option<f64>)>,
    links: Vec<(usize, usize, f64)>,
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index.
    ///
    /// # Arguments
    /// * `x`, `y` - Node position
    /// * `status` - Boundary status
    /// * `cell_area` - Area of the node's cell (required for core nodes)
    pub fn add_node(&mut self, x: f64, y: f64, status: NodeStatus, cell_area: Option<f64>) -> usize {
        self.nodes.push(((x, y), status, cell_area));
        self.nodes.len() - 1
    }

    /// Add a link from `tail` to `head` and return its index.
    ///
    /// The link length is the distance between the two nodes; `face_width`
    /// is the length of the cell face the link crosses.
    pub fn add_link(&mut self, tail: usize, head: usize, face_width: f64) -> usize {
        self.links.push((tail, head, face_width));
        self.links.len() - 1
    }

    /// Validate and assemble the mesh.
    pub fn build(self) -> Result<Mesh, MeshError> {
        Mesh::from_parts(self.nodes, self.links, None)
    }
}

/// Builder for regular raster meshes.
///
/// Nodes are numbered row by row from the south-west corner:
/// `node = row * ncols + col`, at `(x0 + col * dx, y0 + row * dy)`.
///
/// Interior nodes are core with cell area `dx * dy`. Perimeter nodes have no
/// cell and take the status of their side; corner nodes take the south or
/// north status.
#[derive(Clone, Debug)]
pub struct RasterMeshBuilder {
    nrows: usize,
    ncols: usize,
    dx: f64,
    dy: f64,
    origin: (f64, f64),
    sides: SideBoundaries<NodeStatus>,
}

impl RasterMeshBuilder {
    /// Create a builder for an `nrows x ncols` raster with unit spacing and
    /// fixed-value perimeter.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            dx: 1.0,
            dy: 1.0,
            origin: (0.0, 0.0),
            sides: SideBoundaries::uniform(NodeStatus::FixedValue),
        }
    }

    /// Set node spacing in x and y.
    pub fn with_spacing(mut self, dx: f64, dy: f64) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    /// Set the position of node 0.
    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.origin = (x0, y0);
        self
    }

    /// Set perimeter status per side.
    pub fn with_side_status(mut self, sides: SideBoundaries<NodeStatus>) -> Self {
        self.sides = sides;
        self
    }

    /// Set the same status on the whole perimeter.
    pub fn with_uniform_boundary(mut self, status: NodeStatus) -> Self {
        self.sides = SideBoundaries::uniform(status);
        self
    }

    fn perimeter_status(&self, row: usize, col: usize) -> Option<NodeStatus> {
        if row == 0 {
            Some(self.sides.south)
        } else if row == self.nrows - 1 {
            Some(self.sides.north)
        } else if col == 0 {
            Some(self.sides.west)
        } else if col == self.ncols - 1 {
            Some(self.sides.east)
        } else {
            None
        }
    }

    /// Validate and assemble the mesh.
    pub fn build(&self) -> Result<Mesh, MeshError> {
        let (nrows, ncols, dx, dy) = (self.nrows, self.ncols, self.dx, self.dy);
        if nrows < 3 || ncols < 3 {
            return Err(MeshError::RasterTooSmall { nrows, ncols });
        }
        if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
            return Err(MeshError::InvalidSpacing { dx, dy });
        }

        let (x0, y0) = self.origin;
        let cell_area = dx * dy;

        let mut nodes = Vec::with_capacity(nrows * ncols);
        for row in 0..nrows {
            for col in 0..ncols {
                let position = (x0 + col as f64 * dx, y0 + row as f64 * dy);
                match self.perimeter_status(row, col) {
                    Some(status) => nodes.push((position, status, None)),
                    None => nodes.push((position, NodeStatus::Core, Some(cell_area))),
                }
            }
        }

        // Horizontal links first, then vertical links
        let n_links = nrows * (ncols - 1) + (nrows - 1) * ncols;
        let mut links = Vec::with_capacity(n_links);
        for row in 0..nrows {
            for col in 0..ncols - 1 {
                let tail = row * ncols + col;
                links.push((tail, tail + 1, dy));
            }
        }
        for row in 0..nrows - 1 {
            for col in 0..ncols {
                let tail = row * ncols + col;
                links.push((tail, tail + ncols, dx));
            }
        }

        log::debug!(
            "raster mesh {}x{} (dx={}, dy={}), perimeter {}",
            nrows,
            ncols,
            dx,
            dy,
            self.sides
        );
        Mesh::from_parts(nodes, links, Some((nrows, ncols)))
    }
}
