//! Water balance and state diagnostics.
//!
//! - [`WaterBalance`]: volumes exchanged during sub-steps
//! - [`FlowDiagnostics`]: snapshot of depth and flow magnitudes

mod balance;
mod state;

pub use balance::WaterBalance;
pub use state::{FlowDiagnostics, stored_volume};
