//! Water balance bookkeeping.
//!
//! Every sub-step produces a [`WaterBalance`] over the core cells. The
//! storage change over any interval satisfies
//!
//! ```text
//! ΔS = rainfall − infiltration − boundary_outflow + clamp_correction
//! ```
//!
//! up to round-off. `clamp_correction` is the volume added when a depth that
//! would have gone negative is floored at zero.

use std::ops::AddAssign;

/// Volumes (m³) entering and leaving the core cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterBalance {
    /// Rain falling on core cells
    pub rainfall: f64,
    /// Nominal infiltration loss, before depth clamping
    pub infiltration: f64,
    /// Net flow from core cells into boundary nodes (negative = inflow)
    pub boundary_outflow: f64,
    /// Volume added by flooring negative depths at zero
    pub clamp_correction: f64,
}

impl WaterBalance {
    /// Add another balance into this one.
    pub fn accumulate(&mut self, other: &WaterBalance) {
        self.rainfall += other.rainfall;
        self.infiltration += other.infiltration;
        self.boundary_outflow += other.boundary_outflow;
        self.clamp_correction += other.clamp_correction;
    }

    /// Expected storage change from the recorded fluxes.
    pub fn net_input(&self) -> f64 {
        self.rainfall - self.infiltration - self.boundary_outflow + self.clamp_correction
    }

    /// Mismatch between an observed storage change and the recorded fluxes.
    pub fn residual(&self, storage_change: f64) -> f64 {
        storage_change - self.net_input()
    }

    /// One-line summary.
    pub fn summary_line(&self) -> String {
        format!(
            "rain={:.4e} infil={:.4e} out={:.4e} clamp={:.4e} m³",
            self.rainfall, self.infiltration, self.boundary_outflow, self.clamp_correction
        )
    }
}

impl AddAssign for WaterBalance {
    fn add_assign(&mut self, rhs: Self) {
        self.accumulate(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_and_net_input() {
        let mut total = WaterBalance::default();
        total += WaterBalance {
            rainfall: 10.0,
            infiltration: 2.0,
            boundary_outflow: 3.0,
            clamp_correction: 0.5,
        };
        total.accumulate(&WaterBalance {
            rainfall: 1.0,
            ..WaterBalance::default()
        });

        assert_eq!(total.rainfall, 11.0);
        assert_eq!(total.net_input(), 6.5);
        assert_eq!(total.residual(6.5), 0.0);
        assert_eq!(total.residual(7.0), 0.5);
    }
}
