//! # overland-rs
//!
//! Overland flow routing on node/link meshes with the linear diffusion
//! (zero-inertia) approximation of the shallow water equations.
//!
//! This crate provides:
//! - Mesh representation with boundary status (raster and unstructured)
//! - Named node/link fields on a model grid
//! - An explicit finite-volume router with adaptive stable sub-stepping,
//!   upwind face depths and depth-dependent infiltration
//! - Water balance and flow diagnostics
//! - A rainfall-driven simulation runner with outlet hydrographs
//! - Rainfall file input and CSV time series output
//!
//! # Example
//!
//! ```
//! use overland_rs::{
//!     ModelGrid, NodeStatus, OverlandFlowConfig, OverlandFlowRouter, RasterMeshBuilder,
//!     SideBoundaries, SURFACE_WATER_DEPTH, TOPOGRAPHIC_ELEVATION,
//! };
//!
//! let mesh = RasterMeshBuilder::new(3, 3)
//!     .with_spacing(2.0, 2.0)
//!     .with_side_status(
//!         SideBoundaries::uniform(NodeStatus::Closed).with_east(NodeStatus::FixedValue),
//!     )
//!     .build()
//!     .unwrap();
//! let mut grid = ModelGrid::new(mesh);
//! grid.add_zeros_at_node(TOPOGRAPHIC_ELEVATION).unwrap();
//!
//! let config = OverlandFlowConfig::new(2e-5, 0.01, 1.0);
//! let mut router = OverlandFlowRouter::new(&mut grid, config).unwrap();
//! let report = router.advance(&mut grid, 60.0).unwrap();
//!
//! assert!(report.n_substeps >= 1);
//! assert!(grid.at_node(SURFACE_WATER_DEPTH).unwrap()[4] > 0.0);
//! ```

pub mod diagnostics;
pub mod flow;
pub mod grid;
pub mod io;
pub mod mesh;
pub mod simulation;
pub mod types;

// Re-export main types for convenience
pub use diagnostics::{FlowDiagnostics, WaterBalance, stored_volume};
pub use flow::{
    AdvanceReport, ConfigError, OverlandFlowConfig, OverlandFlowError, OverlandFlowRouter,
    SubStep,
};
pub use grid::{
    FieldError, FieldLocation, ModelGrid, SURFACE_WATER_DEPTH, TOPOGRAPHIC_ELEVATION,
    WATER_SPECIFIC_DISCHARGE, WATER_VELOCITY,
};
pub use io::{
    RainfallFileError, parse_rainfall_schedule, read_rainfall_schedule, write_hydrograph_csv,
};
pub use mesh::{LinkStatus, Mesh, MeshBuilder, MeshError, NodeStatus, RasterMeshBuilder};
pub use simulation::{
    Hydrograph, RainfallSchedule, Simulation, SimulationConfig, SimulationError,
    SimulationResult, outlet_discharge,
};
pub use types::SideBoundaries;
