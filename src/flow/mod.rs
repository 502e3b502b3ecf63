//! Overland flow routing.
//!
//! - [`OverlandFlowConfig`]: physical and numerical parameters
//! - [`OverlandFlowRouter`]: adaptive explicit time stepping
//! - [`kernels`]: the per-link and per-node finite-volume updates

mod config;
mod error;
pub mod kernels;
mod router;

pub use config::{
    DEFAULT_INFILTRATION_DEPTH_SCALE, DEFAULT_MIN_DEPTH, DEFAULT_STABILITY_FACTOR,
    OverlandFlowConfig,
};
pub use error::{ConfigError, OverlandFlowError};
pub use router::{AdvanceReport, OverlandFlowRouter, SubStep};
