//! Node/link mesh with flat connectivity.
//!
//! The mesh stores:
//! - Node positions, status and (optional) cell area
//! - Links as `(tail, head)` node pairs with length and face width
//! - Link status, derived from endpoint status
//! - Per-node incident links in compressed row form
//!
//! Link direction convention: a link points from its tail to its head. A
//! positive flux along a link moves water from tail to head.

use thiserror::Error;

use super::status::{LinkStatus, NodeStatus};

/// Error type for mesh construction and modification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Node index does not exist.
    #[error("node {node} out of range (mesh has {n_nodes} nodes)")]
    NodeOutOfRange { node: usize, n_nodes: usize },

    /// A link joins a node to itself.
    #[error("link {link} joins node {node} to itself")]
    SelfLink { link: usize, node: usize },

    /// A link has zero or non-finite length.
    #[error("link {link} has invalid length {length}")]
    InvalidLinkLength { link: usize, length: f64 },

    /// A link has a non-positive face width.
    #[error("link {link} has invalid face width {width}")]
    InvalidFaceWidth { link: usize, width: f64 },

    /// A cell area is non-positive or non-finite.
    #[error("node {node} has invalid cell area {area}")]
    InvalidCellArea { node: usize, area: f64 },

    /// A core node needs a cell to hold water.
    #[error("core node {node} has no cell")]
    CoreNodeWithoutCell { node: usize },

    /// Raster needs an interior.
    #[error("raster needs at least 3 rows and 3 columns, got {nrows}x{ncols}")]
    RasterTooSmall { nrows: usize, ncols: usize },

    /// Raster spacing must be positive.
    #[error("invalid raster spacing ({dx}, {dy})")]
    InvalidSpacing { dx: f64, dy: f64 },
}

/// A link incident to a node, as seen from that node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkAtNode {
    /// Link index
    pub link: usize,
    /// +1 if the node is the link's tail, -1 if it is the head.
    ///
    /// Multiplying a link flux by this sign gives the outflow from the node.
    pub sign: f64,
}

/// Node and link topology of a finite-volume mesh.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<(f64, f64)>,
    node_status: Vec<NodeStatus>,
    cell_area: Vec<Option<f64>>,

    links: Vec<(usize, usize)>,
    link_length: Vec<f64>,
    face_width: Vec<f64>,
    link_status: Vec<LinkStatus>,

    /// `node_links[node_link_offsets[i]..node_link_offsets[i + 1]]` are the links at node i
    node_link_offsets: Vec<usize>,
    node_links: Vec<LinkAtNode>,

    /// (nrows, ncols) when built as a raster
    raster_shape: Option<(usize, usize)>,
}

impl Mesh {
    /// Assemble a mesh from validated parts.
    ///
    /// `nodes` are `(position, status, cell_area)`; `links` are
    /// `(tail, head, face_width)`.
    pub(crate) fn from_parts(
        nodes: Vec<((f64, f64), NodeStatus, Option<f64>)>,
        links: Vec<(usize, usize, f64)>,
        raster_shape: Option<(usize, usize)>,
    ) -> Result<Self, MeshError> {
        let n_nodes = nodes.len();

        let mut positions = Vec::with_capacity(n_nodes);
        let mut node_status = Vec::with_capacity(n_nodes);
        let mut cell_area = Vec::with_capacity(n_nodes);

        for (node, (position, status, area)) in nodes.into_iter().enumerate() {
            if let Some(a) = area
                && !(a.is_finite() && a > 0.0)
            {
                return Err(MeshError::InvalidCellArea { node, area: a });
            }
            if status.is_core() && area.is_none() {
                return Err(MeshError::CoreNodeWithoutCell { node });
            }
            positions.push(position);
            node_status.push(status);
            cell_area.push(area);
        }

        let n_links = links.len();
        let mut link_nodes = Vec::with_capacity(n_links);
        let mut link_length = Vec::with_capacity(n_links);
        let mut face_width = Vec::with_capacity(n_links);
        let mut link_status = Vec::with_capacity(n_links);
        let mut degree = vec![0usize; n_nodes];

        for (link, (tail, head, width)) in links.into_iter().enumerate() {
            for node in [tail, head] {
                if node >= n_nodes {
                    return Err(MeshError::NodeOutOfRange { node, n_nodes });
                }
            }
            if tail == head {
                return Err(MeshError::SelfLink { link, node: tail });
            }
            if !(width.is_finite() && width > 0.0) {
                return Err(MeshError::InvalidFaceWidth { link, width });
            }

            let (x0, y0) = positions[tail];
            let (x1, y1) = positions[head];
            let length = (x1 - x0).hypot(y1 - y0);
            if !(length.is_finite() && length > 0.0) {
                return Err(MeshError::InvalidLinkLength { link, length });
            }

            link_nodes.push((tail, head));
            link_length.push(length);
            face_width.push(width);
            link_status.push(LinkStatus::from_endpoints(
                node_status[tail],
                node_status[head],
            ));
            degree[tail] += 1;
            degree[head] += 1;
        }

        // Compressed row storage of incident links
        let mut node_link_offsets = Vec::with_capacity(n_nodes + 1);
        node_link_offsets.push(0);
        for d in &degree {
            let last = node_link_offsets[node_link_offsets.len() - 1];
            node_link_offsets.push(last + d);
        }

        let mut cursor = node_link_offsets[..n_nodes].to_vec();
        let mut node_links = vec![LinkAtNode { link: 0, sign: 0.0 }; 2 * n_links];
        for (link, &(tail, head)) in link_nodes.iter().enumerate() {
            node_links[cursor[tail]] = LinkAtNode { link, sign: 1.0 };
            cursor[tail] += 1;
            node_links[cursor[head]] = LinkAtNode { link, sign: -1.0 };
            cursor[head] += 1;
        }

        Ok(Self {
            positions,
            node_status,
            cell_area,
            links: link_nodes,
            link_length,
            face_width,
            link_status,
            node_link_offsets,
            node_links,
            raster_shape,
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.positions.len()
    }

    /// Number of links.
    #[inline]
    pub fn n_links(&self) -> usize {
        self.links.len()
    }

    /// Position of a node.
    #[inline]
    pub fn node_position(&self, node: usize) -> (f64, f64) {
        self.positions[node]
    }

    /// Status of a node.
    #[inline]
    pub fn node_status(&self, node: usize) -> NodeStatus {
        self.node_status[node]
    }

    /// Cell area of a node, `None` for nodes without a cell.
    #[inline]
    pub fn cell_area(&self, node: usize) -> Option<f64> {
        self.cell_area[node]
    }

    /// `(tail, head)` nodes of a link.
    #[inline]
    pub fn link_nodes(&self, link: usize) -> (usize, usize) {
        self.links[link]
    }

    /// Distance between the two nodes of a link.
    #[inline]
    pub fn link_length(&self, link: usize) -> f64 {
        self.link_length[link]
    }

    /// Width of the face crossed by a link.
    #[inline]
    pub fn face_width(&self, link: usize) -> f64 {
        self.face_width[link]
    }

    /// Status of a link.
    #[inline]
    pub fn link_status(&self, link: usize) -> LinkStatus {
        self.link_status[link]
    }

    /// Links incident to a node.
    #[inline]
    pub fn links_at_node(&self, node: usize) -> &[LinkAtNode] {
        &self.node_links[self.node_link_offsets[node]..self.node_link_offsets[node + 1]]
    }

    /// Change the status of a node.
    ///
    /// Statuses of the links at the node are re-derived.
    pub fn set_node_status(&mut self, node: usize, status: NodeStatus) -> Result<(), MeshError> {
        let n_nodes = self.n_nodes();
        if node >= n_nodes {
            return Err(MeshError::NodeOutOfRange { node, n_nodes });
        }
        if status.is_core() && self.cell_area[node].is_none() {
            return Err(MeshError::CoreNodeWithoutCell { node });
        }

        self.node_status[node] = status;
        let start = self.node_link_offsets[node];
        let end = self.node_link_offsets[node + 1];
        for entry in &self.node_links[start..end] {
            let (tail, head) = self.links[entry.link];
            self.link_status[entry.link] =
                LinkStatus::from_endpoints(self.node_status[tail], self.node_status[head]);
        }
        Ok(())
    }

    /// Indices of core nodes.
    pub fn core_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.node_status
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_core())
            .map(|(i, _)| i)
    }

    /// Indices of active links.
    pub fn active_links(&self) -> impl Iterator<Item = usize> + '_ {
        self.link_status
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_active())
            .map(|(i, _)| i)
    }

    /// Number of core nodes.
    pub fn n_core_nodes(&self) -> usize {
        self.core_nodes().count()
    }

    /// Total cell area of core nodes.
    pub fn core_area(&self) -> f64 {
        self.core_nodes()
            .filter_map(|i| self.cell_area[i])
            .sum()
    }

    /// Shortest active link, `None` if no link is active.
    pub fn min_active_link_length(&self) -> Option<f64> {
        self.active_links()
            .map(|l| self.link_length[l])
            .reduce(f64::min)
    }

    /// `(nrows, ncols)` if this mesh was built as a raster.
    pub fn raster_shape(&self) -> Option<(usize, usize)> {
        self.raster_shape
    }

    /// Node at `(row, col)` of a raster mesh.
    ///
    /// Returns `None` for non-raster meshes or out-of-range indices.
    pub fn node_at(&self, row: usize, col: usize) -> Option<usize> {
        let (nrows, ncols) = self.raster_shape?;
        (row < nrows && col < ncols).then_some(row * ncols + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three nodes in a row: fixed - core - core.
    fn chain() -> Mesh {
        Mesh::from_parts(
            vec![
                ((0.0, 0.0), NodeStatus::FixedValue, None),
                ((1.0, 0.0), NodeStatus::Core, Some(1.0)),
                ((2.0, 0.0), NodeStatus::Core, Some(1.0)),
            ],
            vec![(0, 1, 1.0), (1, 2, 1.0)],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_counts_and_geometry() {
        let mesh = chain();
        assert_eq!(mesh.n_nodes(), 3);
        assert_eq!(mesh.n_links(), 2);
        assert_eq!(mesh.link_nodes(1), (1, 2));
        assert_eq!(mesh.link_length(0), 1.0);
        assert_eq!(mesh.n_core_nodes(), 2);
        assert_eq!(mesh.core_area(), 2.0);
        assert_eq!(mesh.min_active_link_length(), Some(1.0));
    }

    #[test]
    fn test_links_at_node_signs() {
        let mesh = chain();

        let at_middle = mesh.links_at_node(1);
        assert_eq!(at_middle.len(), 2);
        assert!(at_middle.contains(&LinkAtNode { link: 0, sign: -1.0 }));
        assert!(at_middle.contains(&LinkAtNode { link: 1, sign: 1.0 }));

        assert_eq!(mesh.links_at_node(0), &[LinkAtNode { link: 0, sign: 1.0 }]);
    }

    #[test]
    fn test_closing_node_deactivates_links() {
        let mut mesh = chain();
        assert!(mesh.link_status(0).is_active());

        mesh.set_node_status(0, NodeStatus::Closed).unwrap();
        assert!(!mesh.link_status(0).is_active());
        assert!(mesh.link_status(1).is_active());

        mesh.set_node_status(0, NodeStatus::FixedValue).unwrap();
        assert!(mesh.link_status(0).is_active());
    }

    #[test]
    fn test_core_requires_cell() {
        let mut mesh = chain();
        assert_eq!(
            mesh.set_node_status(0, NodeStatus::Core),
            Err(MeshError::CoreNodeWithoutCell { node: 0 })
        );
        assert_eq!(
            mesh.set_node_status(7, NodeStatus::Closed),
            Err(MeshError::NodeOutOfRange { node: 7, n_nodes: 3 })
        );
    }

    #[test]
    fn test_no_active_links() {
        let mesh = Mesh::from_parts(
            vec![
                ((0.0, 0.0), NodeStatus::Closed, None),
                ((1.0, 0.0), NodeStatus::Core, Some(1.0)),
            ],
            vec![(0, 1, 1.0)],
            None,
        )
        .unwrap();
        assert_eq!(mesh.min_active_link_length(), None);
    }

    #[test]
    fn test_rejects_degenerate_links() {
        let coincident = Mesh::from_parts(
            vec![
                ((0.0, 0.0), NodeStatus::Core, Some(1.0)),
                ((0.0, 0.0), NodeStatus::Core, Some(1.0)),
            ],
            vec![(0, 1, 1.0)],
            None,
        );
        assert!(matches!(
            coincident,
            Err(MeshError::InvalidLinkLength { link: 0, .. })
        ));

        let self_link = Mesh::from_parts(
            vec![((0.0, 0.0), NodeStatus::Core, Some(1.0))],
            vec![(0, 0, 1.0)],
            None,
        );
        assert_eq!(self_link.unwrap_err(), MeshError::SelfLink { link: 0, node: 0 });
    }
}
