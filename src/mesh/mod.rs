//! Mesh representation.
//!
//! Provides the node/link topology the overland flow router works on:
//! - Node status (core, fixed value, closed) and derived link status
//! - Flat connectivity with per-node incident link lists
//! - Builders for unstructured networks and regular rasters

mod builder;
mod status;
mod topology;

pub use builder::{MeshBuilder, RasterMeshBuilder};
pub use status::{LinkStatus, NodeStatus};
pub use topology::{LinkAtNode, Mesh, MeshError};
