//! Error types for the overland flow router.

use thiserror::Error;

use crate::grid::FieldError;
use crate::mesh::MeshError;

/// Invalid router parameter, rejected at construction or when updated.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Stability factor outside (0, 1].
    #[error("stability factor must be in (0, 1], got {0}")]
    StabilityFactor(f64),

    /// Manning roughness not positive.
    #[error("roughness must be positive, got {0}")]
    Roughness(f64),

    /// Velocity scale not positive.
    #[error("velocity scale must be positive, got {0}")]
    VelocityScale(f64),

    /// Infiltration capacity negative.
    #[error("infiltration capacity must be non-negative, got {0}")]
    InfiltrationCapacity(f64),

    /// Infiltration depth scale not positive.
    #[error("infiltration depth scale must be positive, got {0}")]
    InfiltrationDepthScale(f64),

    /// Depth floor not positive.
    #[error("minimum depth must be positive, got {0}")]
    MinDepth(f64),

    /// Rain rate not finite.
    #[error("rain rate must be finite, got {0}")]
    RainRate(f64),

    /// Sub-step cap not positive.
    #[error("maximum sub-step must be positive, got {0}")]
    MaxSubstep(f64),
}

/// Error type for router construction and time stepping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlandFlowError {
    /// Invalid parameters.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A required field is missing or malformed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Mesh lookup failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Requested time interval is negative or not finite.
    #[error("invalid time interval {0}")]
    InvalidInterval(f64),

    /// The stability limit degenerated; state is left at the last valid sub-step.
    #[error("numerical instability: step limit {dt_max} at maximum depth {h_max}")]
    NumericalInstability { h_max: f64, dt_max: f64 },
}
