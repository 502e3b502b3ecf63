//! Simulation runner implementation.
//!
//! Drives an [`OverlandFlowRouter`] through a rainfall schedule, sampling
//! outlet discharge and stored volume at a fixed output interval.

use thiserror::Error;

use super::hydrograph::{Hydrograph, TimeSeries, outlet_discharge};
use super::rainfall::RainfallSchedule;
use crate::diagnostics::{WaterBalance, stored_volume};
use crate::flow::{OverlandFlowError, OverlandFlowRouter};
use crate::grid::{FieldError, ModelGrid};

/// Error type for simulation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Run duration negative or not finite.
    #[error("invalid duration {0}")]
    InvalidDuration(f64),

    /// Output interval not positive.
    #[error("invalid output interval {0}")]
    InvalidOutputInterval(f64),

    /// The router failed.
    #[error(transparent)]
    Flow(#[from] OverlandFlowError),

    /// A required field is missing.
    #[error(transparent)]
    Field(#[from] FieldError),
}

// =============================================================================
// Simulation Configuration
// =============================================================================

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    /// Total simulated time (s).
    pub duration: f64,
    /// Interval between recorded samples (s).
    pub output_interval: f64,
    /// Node whose inflow is recorded as the hydrograph.
    pub outlet: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: 3600.0,
            output_interval: 60.0,
            outlet: None,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the given duration and output interval.
    pub fn new(duration: f64, output_interval: f64) -> Self {
        Self {
            duration,
            output_interval,
            outlet: None,
        }
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the output interval.
    pub fn with_output_interval(mut self, interval: f64) -> Self {
        self.output_interval = interval;
        self
    }

    /// Record a hydrograph at an outlet node.
    pub fn with_outlet(mut self, node: usize) -> Self {
        self.outlet = Some(node);
        self
    }

    fn validate(&self) -> Result<(), SimulationError> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(SimulationError::InvalidDuration(self.duration));
        }
        if !(self.output_interval.is_finite() && self.output_interval > 0.0) {
            return Err(SimulationError::InvalidOutputInterval(self.output_interval));
        }
        Ok(())
    }
}

// =============================================================================
// Simulation Result
// =============================================================================

/// Result of a simulation run.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Final simulation time reached (s).
    pub final_time: f64,
    /// Number of router `advance` calls.
    pub n_advances: usize,
    /// Total number of sub-steps.
    pub n_substeps: usize,
    /// Shortest sub-step (s).
    pub dt_min: f64,
    /// Longest sub-step (s).
    pub dt_max: f64,
    /// Water balance over the run.
    pub balance: WaterBalance,
    /// Stored volume at each output time, starting at zero.
    pub storage: TimeSeries,
    /// Outlet hydrograph, if an outlet was configured.
    pub hydrograph: Option<Hydrograph>,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
}

impl SimulationResult {
    fn new(hydrograph: Option<Hydrograph>) -> Self {
        Self {
            final_time: 0.0,
            n_advances: 0,
            n_substeps: 0,
            dt_min: f64::INFINITY,
            dt_max: 0.0,
            balance: WaterBalance::default(),
            storage: TimeSeries::new(),
            hydrograph,
            wall_time: 0.0,
        }
    }

    /// Stored volume change not accounted for by the recorded fluxes (m³).
    pub fn balance_residual(&self) -> f64 {
        match (self.storage.data.first(), self.storage.last()) {
            (Some(first), Some(last)) => self.balance.residual(last.value - first.value),
            _ => 0.0,
        }
    }
}

// =============================================================================
// Simulation Runner
// =============================================================================

/// High-level simulation runner.
///
/// Splits the run into output intervals, and each interval further at
/// rainfall breakpoints so every `advance` call sees a constant rain rate.
/// Schedule times are relative to the start of the run.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Create a simulation with the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// The run configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation.
    pub fn run(
        &self,
        router: &mut OverlandFlowRouter,
        grid: &mut ModelGrid,
        schedule: &RainfallSchedule,
    ) -> Result<SimulationResult, SimulationError> {
        self.run_with_callback(router, grid, schedule, |_, _| {})
    }

    /// Run the simulation with a callback.
    ///
    /// The callback is called with (grid, time) at the start and after
    /// every output interval.
    pub fn run_with_callback<F>(
        &self,
        router: &mut OverlandFlowRouter,
        grid: &mut ModelGrid,
        schedule: &RainfallSchedule,
        mut callback: F,
    ) -> Result<SimulationResult, SimulationError>
    where
        F: FnMut(&ModelGrid, f64),
    {
        self.config.validate()?;
        let start_wall = std::time::Instant::now();

        let mut result = SimulationResult::new(self.config.outlet.map(Hydrograph::new));
        let mut t = 0.0;
        self.record(grid, t, &mut result)?;
        callback(grid, t);

        log::info!(
            "starting overland flow run: {:.1} s, output every {:.1} s",
            self.config.duration,
            self.config.output_interval
        );

        let mut n_output = 1_usize;
        while t < self.config.duration {
            let target = (n_output as f64 * self.config.output_interval).min(self.config.duration);

            while t < target {
                let segment_end = schedule
                    .next_change_after(t)
                    .map_or(target, |change| change.min(target));

                router.set_rain_rate(schedule.rate_at(t)).map_err(OverlandFlowError::from)?;
                let report = router.advance(grid, segment_end - t)?;

                result.n_advances += 1;
                result.n_substeps += report.n_substeps;
                result.dt_min = result.dt_min.min(report.dt_min);
                result.dt_max = result.dt_max.max(report.dt_max);
                result.balance.accumulate(&report.balance);
                t = segment_end;
            }

            self.record(grid, t, &mut result)?;
            callback(grid, t);
            n_output += 1;

            if let Some(sample) = result.storage.last() {
                log::info!(
                    "t = {:.1} s: stored {:.4e} m³, {} sub-steps so far",
                    t,
                    sample.value,
                    result.n_substeps
                );
            }
        }

        result.final_time = t;
        result.wall_time = start_wall.elapsed().as_secs_f64();

        log::info!(
            "run complete: {} sub-steps in {:.2} s wall, {}",
            result.n_substeps,
            result.wall_time,
            result.balance.summary_line()
        );

        Ok(result)
    }

    fn record(
        &self,
        grid: &ModelGrid,
        t: f64,
        result: &mut SimulationResult,
    ) -> Result<(), SimulationError> {
        result.storage.push(t, stored_volume(grid)?);
        if let Some(hydrograph) = result.hydrograph.as_mut() {
            hydrograph.push(t, outlet_discharge(grid, hydrograph.outlet)?);
        }
        Ok(())
    }
}
