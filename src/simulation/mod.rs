//! Event simulation: rainfall forcing, a runner and recorded outputs.
//!
//! # Example
//! ```
//! use overland_rs::flow::{OverlandFlowConfig, OverlandFlowRouter};
//! use overland_rs::grid::{ModelGrid, TOPOGRAPHIC_ELEVATION};
//! use overland_rs::mesh::{NodeStatus, RasterMeshBuilder};
//! use overland_rs::simulation::{RainfallSchedule, Simulation, SimulationConfig};
//! use overland_rs::types::SideBoundaries;
//!
//! let mesh = RasterMeshBuilder::new(4, 8)
//!     .with_spacing(5.0, 5.0)
//!     .with_side_status(
//!         SideBoundaries::uniform(NodeStatus::Closed).with_west(NodeStatus::FixedValue),
//!     )
//!     .build()
//!     .unwrap();
//! let outlet = mesh.node_at(1, 0).unwrap();
//! let mut grid = ModelGrid::new(mesh);
//! grid.add_field_at_node_from(TOPOGRAPHIC_ELEVATION, |x, _| 0.005 * x).unwrap();
//!
//! let mut router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();
//! let schedule = RainfallSchedule::storm(3e-5, 300.0).unwrap();
//! let sim = Simulation::new(SimulationConfig::new(900.0, 60.0).with_outlet(outlet));
//!
//! let result = sim.run(&mut router, &mut grid, &schedule).unwrap();
//! let hydrograph = result.hydrograph.unwrap();
//! assert!(hydrograph.peak() > 0.0);
//! ```

mod hydrograph;
mod rainfall;
mod runner;

pub use hydrograph::{Hydrograph, TimeSeries, TimeSeriesPoint, outlet_discharge};
pub use rainfall::{RainfallBreakpoint, RainfallSchedule, ScheduleError};
pub use runner::{Simulation, SimulationConfig, SimulationError, SimulationResult};
