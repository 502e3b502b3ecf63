//! Linear diffusion overland flow router with adaptive sub-stepping.
//!
//! Each call to [`OverlandFlowRouter::advance`] covers a caller-chosen
//! interval. Inside it, sub-steps are taken with the largest step the
//! diffusive stability limit allows, recomputed from the current maximum
//! depth before every sub-step:
//!
//! ```text
//! D      = max(H_max, h_floor)^{7/3} / (n² u_c)
//! dt_max = α L_min² / (2 D)
//! ```
//!
//! # Example
//!
//! ```
//! use overland_rs::flow::{OverlandFlowConfig, OverlandFlowRouter};
//! use overland_rs::grid::{ModelGrid, SURFACE_WATER_DEPTH, TOPOGRAPHIC_ELEVATION};
//! use overland_rs::mesh::RasterMeshBuilder;
//!
//! let mesh = RasterMeshBuilder::new(5, 5).with_spacing(2.0, 2.0).build().unwrap();
//! let mut grid = ModelGrid::new(mesh);
//! grid.add_field_at_node_from(TOPOGRAPHIC_ELEVATION, |x, _| 0.01 * x).unwrap();
//!
//! let config = OverlandFlowConfig::new(2e-5, 0.01, 1.0);
//! let mut router = OverlandFlowRouter::new(&mut grid, config).unwrap();
//!
//! for _ in 0..10 {
//!     router.advance(&mut grid, 60.0).unwrap();
//! }
//! router.set_rain_rate(0.0).unwrap();
//! router.advance(&mut grid, 600.0).unwrap();
//!
//! let depth = grid.at_node(SURFACE_WATER_DEPTH).unwrap();
//! assert!(depth.iter().all(|&h| h >= 0.0));
//! ```

use crate::diagnostics::WaterBalance;
use crate::grid::{
    ModelGrid, SURFACE_WATER_DEPTH, TOPOGRAPHIC_ELEVATION, WATER_SPECIFIC_DISCHARGE,
    WATER_VELOCITY,
};
use crate::mesh::Mesh;

use super::config::OverlandFlowConfig;
use super::error::{ConfigError, OverlandFlowError};
use super::kernels;

/// Remaining time below this fraction of the requested interval is treated as zero.
const REMAINING_TIME_TOLERANCE: f64 = 1e-12;

/// Information about a sub-step, passed to observers before it is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubStep {
    /// Sub-step number within the current `advance` call
    pub index: usize,
    /// Offset of the sub-step start from the start of the call (s)
    pub time: f64,
    /// Length of this sub-step (s)
    pub dt: f64,
    /// Stability limit at the start of the sub-step (s)
    pub dt_limit: f64,
    /// Maximum depth used for the limit, after flooring (m)
    pub h_max: f64,
}

/// Summary of one `advance` call.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvanceReport {
    /// Number of sub-steps taken
    pub n_substeps: usize,
    /// Shortest sub-step (s); infinite if none was taken
    pub dt_min: f64,
    /// Longest sub-step (s)
    pub dt_max: f64,
    /// Simulated time covered (s)
    pub elapsed: f64,
    /// Water balance over the call
    pub balance: WaterBalance,
}

impl AdvanceReport {
    fn empty() -> Self {
        Self {
            n_substeps: 0,
            dt_min: f64::INFINITY,
            dt_max: 0.0,
            elapsed: 0.0,
            balance: WaterBalance::default(),
        }
    }

    fn record(&mut self, dt: f64, balance: &WaterBalance) {
        self.n_substeps += 1;
        self.dt_min = self.dt_min.min(dt);
        self.dt_max = self.dt_max.max(dt);
        self.elapsed += dt;
        self.balance.accumulate(balance);
    }
}

/// Explicit finite-volume overland flow router.
///
/// Reads `topographic__elevation` and evolves `surface_water__depth` (nodes),
/// `water__specific_discharge` and `water__velocity` (links) of a
/// [`ModelGrid`]. The router keeps only parameters and scratch space; the
/// simulation state lives in the grid's fields.
#[derive(Clone, Debug)]
pub struct OverlandFlowRouter {
    config: OverlandFlowConfig,
    velocity_coefficient: f64,
    /// Water surface scratch, one value per node
    surface: Vec<f64>,
    elapsed: f64,
    balance: WaterBalance,
}

impl OverlandFlowRouter {
    /// Create a router for a grid.
    ///
    /// The grid must carry `topographic__elevation`. Depth, discharge and
    /// velocity fields are created zero-filled unless already present, so a
    /// pre-set initial depth is kept.
    pub fn new(grid: &mut ModelGrid, config: OverlandFlowConfig) -> Result<Self, OverlandFlowError> {
        config.validate()?;
        grid.at_node(TOPOGRAPHIC_ELEVATION)?;

        let fields = grid.fields_mut();
        fields.at_node.ensure_zeros(SURFACE_WATER_DEPTH);
        fields.at_link.ensure_zeros(WATER_SPECIFIC_DISCHARGE);
        fields.at_link.ensure_zeros(WATER_VELOCITY);

        log::debug!(
            "overland flow router: n={} u_c={} alpha={} over {} core nodes",
            config.roughness,
            config.velocity_scale,
            config.stability_factor,
            grid.mesh().n_core_nodes()
        );

        Ok(Self {
            velocity_coefficient: config.velocity_coefficient(),
            surface: vec![0.0; grid.mesh().n_nodes()],
            config,
            elapsed: 0.0,
            balance: WaterBalance::default(),
        })
    }

    /// Router parameters.
    pub fn config(&self) -> &OverlandFlowConfig {
        &self.config
    }

    /// Current rain rate (m/s).
    pub fn rain_rate(&self) -> f64 {
        self.config.rain_rate
    }

    /// Change the rain rate for subsequent `advance` calls.
    pub fn set_rain_rate(&mut self, rain_rate: f64) -> Result<(), ConfigError> {
        if !rain_rate.is_finite() {
            return Err(ConfigError::RainRate(rain_rate));
        }
        self.config.rain_rate = rain_rate;
        Ok(())
    }

    /// Total simulated time advanced by this router (s).
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    /// Water balance accumulated over all `advance` calls.
    pub fn cumulative_balance(&self) -> &WaterBalance {
        &self.balance
    }

    /// Sub-step length the next sub-step would use, before truncation to
    /// the remaining interval.
    pub fn stability_limit(&self, grid: &ModelGrid) -> Result<f64, OverlandFlowError> {
        let mesh = grid.mesh();
        let depth = grid.at_node(SURFACE_WATER_DEPTH)?;
        let (dt_limit, _) = self.substep_limit(mesh, depth, mesh.min_active_link_length())?;
        Ok(dt_limit)
    }

    /// Stability-limited sub-step and the floored maximum depth behind it.
    fn substep_limit(
        &self,
        mesh: &Mesh,
        depth: &[f64],
        min_link_length: Option<f64>,
    ) -> Result<(f64, f64), OverlandFlowError> {
        let h_max = kernels::max_depth(mesh, depth);
        if !h_max.is_finite() {
            return Err(OverlandFlowError::NumericalInstability {
                h_max,
                dt_max: f64::NAN,
            });
        }
        let h_max = h_max.max(self.config.min_depth);
        let cap = self.config.max_substep.unwrap_or(f64::INFINITY);

        // Without active links nothing limits the step but the cap
        let Some(length) = min_link_length else {
            return Ok((cap, h_max));
        };

        let diffusivity = kernels::effective_diffusivity(h_max, self.velocity_coefficient);
        let dt_max = kernels::stability_limit(length, diffusivity, self.config.stability_factor);
        if !(dt_max.is_finite() && dt_max > 0.0) {
            return Err(OverlandFlowError::NumericalInstability { h_max, dt_max });
        }

        Ok((dt_max.min(cap), h_max))
    }

    /// Advance the grid's water state by exactly `global_dt` seconds.
    pub fn advance(
        &mut self,
        grid: &mut ModelGrid,
        global_dt: f64,
    ) -> Result<AdvanceReport, OverlandFlowError> {
        self.advance_with_observer(grid, global_dt, |_| {})
    }

    /// Advance by `global_dt`, calling `observer` before each sub-step.
    ///
    /// On error the fields hold the state after the last completed sub-step.
    pub fn advance_with_observer<F>(
        &mut self,
        grid: &mut ModelGrid,
        global_dt: f64,
        mut observer: F,
    ) -> Result<AdvanceReport, OverlandFlowError>
    where
        F: FnMut(&SubStep),
    {
        if !(global_dt.is_finite() && global_dt >= 0.0) {
            return Err(OverlandFlowError::InvalidInterval(global_dt));
        }

        let (mesh, fields) = grid.split_mut();
        let (elevation, depth) = fields
            .at_node
            .get_pair_mut(TOPOGRAPHIC_ELEVATION, SURFACE_WATER_DEPTH)?;
        let elevation: &[f64] = elevation;
        let (discharge, velocity) = fields
            .at_link
            .get_pair_mut(WATER_SPECIFIC_DISCHARGE, WATER_VELOCITY)?;

        self.surface.resize(mesh.n_nodes(), 0.0);
        let min_link_length = mesh.min_active_link_length();
        let tolerance = global_dt * REMAINING_TIME_TOLERANCE;

        let mut report = AdvanceReport::empty();
        let mut remaining = global_dt;

        while remaining > tolerance {
            let (dt_limit, h_max) = match self.substep_limit(mesh, depth, min_link_length) {
                Ok(limit) => limit,
                Err(err) => {
                    self.elapsed += report.elapsed;
                    self.balance.accumulate(&report.balance);
                    log::error!(
                        "overland flow aborted after {} sub-steps: {}",
                        report.n_substeps,
                        err
                    );
                    return Err(err);
                }
            };
            let dt = dt_limit.min(remaining);

            observer(&SubStep {
                index: report.n_substeps,
                time: global_dt - remaining,
                dt,
                dt_limit,
                h_max,
            });

            let balance = self.substep(mesh, elevation, depth, discharge, velocity, dt);
            log::trace!(
                "sub-step {}: dt={:.4e} h_max={:.4e}",
                report.n_substeps,
                dt,
                h_max
            );
            if balance.clamp_correction > 0.0 {
                log::debug!(
                    "sub-step {} floored negative depths ({:.3e} m³ added)",
                    report.n_substeps,
                    balance.clamp_correction
                );
            }

            report.record(dt, &balance);
            remaining -= dt;
        }

        self.elapsed += report.elapsed;
        self.balance.accumulate(&report.balance);

        log::debug!(
            "advanced {:.4} s in {} sub-steps (dt {:.3e}..{:.3e})",
            global_dt,
            report.n_substeps,
            report.dt_min,
            report.dt_max
        );

        Ok(report)
    }

    /// One forward-Euler sub-step.
    fn substep(
        &mut self,
        mesh: &Mesh,
        elevation: &[f64],
        depth: &mut [f64],
        discharge: &mut [f64],
        velocity: &mut [f64],
        dt: f64,
    ) -> WaterBalance {
        kernels::water_surface(elevation, depth, &mut self.surface);

        #[cfg(feature = "parallel")]
        kernels::compute_link_discharge_parallel(
            mesh,
            &self.surface,
            depth,
            self.velocity_coefficient,
            discharge,
            velocity,
        );

        #[cfg(not(feature = "parallel"))]
        kernels::compute_link_discharge(
            mesh,
            &self.surface,
            depth,
            self.velocity_coefficient,
            discharge,
            velocity,
        );

        kernels::update_depth(mesh, &self.config, discharge, depth, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::FieldError;
    use crate::mesh::{NodeStatus, RasterMeshBuilder};
    use crate::types::SideBoundaries;

    fn flat_grid(nrows: usize, ncols: usize, boundary: NodeStatus) -> ModelGrid {
        let mesh = RasterMeshBuilder::new(nrows, ncols)
            .with_uniform_boundary(boundary)
            .build()
            .unwrap();
        let mut grid = ModelGrid::new(mesh);
        grid.add_zeros_at_node(TOPOGRAPHIC_ELEVATION).unwrap();
        grid
    }

    #[test]
    fn test_new_creates_fields() {
        let mut grid = flat_grid(3, 3, NodeStatus::FixedValue);
        OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();

        assert_eq!(grid.at_node(SURFACE_WATER_DEPTH).unwrap(), &[0.0; 9]);
        assert_eq!(grid.at_link(WATER_SPECIFIC_DISCHARGE).unwrap(), &[0.0; 12]);
        assert_eq!(grid.at_link(WATER_VELOCITY).unwrap(), &[0.0; 12]);
    }

    #[test]
    fn test_new_keeps_initial_depth() {
        let mut grid = flat_grid(3, 3, NodeStatus::FixedValue);
        grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap()[4] = 0.2;
        OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();
        assert_eq!(grid.at_node(SURFACE_WATER_DEPTH).unwrap()[4], 0.2);
    }

    #[test]
    fn test_new_requires_elevation() {
        let mesh = RasterMeshBuilder::new(3, 3).build().unwrap();
        let mut grid = ModelGrid::new(mesh);
        let err = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            OverlandFlowError::Field(FieldError::Missing { .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut grid = flat_grid(3, 3, NodeStatus::FixedValue);
        let config = OverlandFlowConfig::default().with_stability_factor(2.0);
        assert_eq!(
            OverlandFlowRouter::new(&mut grid, config).unwrap_err(),
            OverlandFlowError::Config(ConfigError::StabilityFactor(2.0))
        );
    }

    #[test]
    fn test_rain_rate_setter() {
        let mut grid = flat_grid(3, 3, NodeStatus::FixedValue);
        let mut router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();

        router.set_rain_rate(3e-5).unwrap();
        assert_eq!(router.rain_rate(), 3e-5);
        assert_eq!(
            router.set_rain_rate(f64::NAN).map_err(|e| e.to_string()),
            Err("rain rate must be finite, got NaN".to_string())
        );
        assert_eq!(router.rain_rate(), 3e-5);
    }

    #[test]
    fn test_zero_interval_takes_no_substeps() {
        let mut grid = flat_grid(3, 3, NodeStatus::FixedValue);
        let mut router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();

        let report = router.advance(&mut grid, 0.0).unwrap();
        assert_eq!(report.n_substeps, 0);
        assert_eq!(grid.at_node(SURFACE_WATER_DEPTH).unwrap()[4], 0.0);
    }

    #[test]
    fn test_invalid_interval() {
        let mut grid = flat_grid(3, 3, NodeStatus::FixedValue);
        let mut router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();

        assert_eq!(
            router.advance(&mut grid, -1.0).unwrap_err(),
            OverlandFlowError::InvalidInterval(-1.0)
        );
        assert!(matches!(
            router.advance(&mut grid, f64::INFINITY),
            Err(OverlandFlowError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_dry_domain_takes_single_step() {
        let mut grid = flat_grid(4, 4, NodeStatus::FixedValue);
        let config = OverlandFlowConfig::new(1e-5, 0.01, 1.0);
        let mut router = OverlandFlowRouter::new(&mut grid, config).unwrap();

        // Dry: the floored depth gives an enormous stability limit
        let report = router.advance(&mut grid, 10.0).unwrap();
        assert_eq!(report.n_substeps, 1);

        let depth = grid.at_node(SURFACE_WATER_DEPTH).unwrap();
        for node in grid.mesh().core_nodes() {
            assert!((depth[node] - 1e-4).abs() < 1e-15);
        }
        assert_eq!(depth[0], 0.0);
        assert_eq!(router.elapsed_time(), 10.0);
    }

    #[test]
    fn test_max_substep_caps_isolated_cell() {
        let mut grid = flat_grid(3, 3, NodeStatus::Closed);
        let config = OverlandFlowConfig::new(1e-5, 0.01, 1.0).with_max_substep(2.5);
        let mut router = OverlandFlowRouter::new(&mut grid, config).unwrap();

        let report = router.advance(&mut grid, 10.0).unwrap();
        assert_eq!(report.n_substeps, 4);
        assert_eq!(report.dt_max, 2.5);
    }

    #[test]
    fn test_observer_sees_every_substep() {
        let mut grid = flat_grid(5, 5, NodeStatus::FixedValue);
        {
            let depth = grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap();
            depth[12] = 0.05;
        }
        let mut router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();

        let mut seen = Vec::new();
        let report = router
            .advance_with_observer(&mut grid, 30.0, |step| seen.push(*step))
            .unwrap();

        assert_eq!(seen.len(), report.n_substeps);
        assert!(report.n_substeps > 1);
        for (i, step) in seen.iter().enumerate() {
            assert_eq!(step.index, i);
            assert!(step.dt <= step.dt_limit);
        }
        let total: f64 = seen.iter().map(|s| s.dt).sum();
        assert!((total - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_depth_aborts_without_mutation() {
        let mesh = RasterMeshBuilder::new(3, 4)
            .with_side_status(SideBoundaries::uniform(NodeStatus::FixedValue))
            .build()
            .unwrap();
        let mut grid = ModelGrid::new(mesh);
        grid.add_zeros_at_node(TOPOGRAPHIC_ELEVATION).unwrap();
        {
            let depth = grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap();
            depth[5] = f64::NAN;
            depth[6] = 0.1;
        }
        let mut router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();

        let err = router.advance(&mut grid, 1.0).unwrap_err();
        assert!(matches!(
            err,
            OverlandFlowError::NumericalInstability { .. }
        ));

        let depth = grid.at_node(SURFACE_WATER_DEPTH).unwrap();
        assert!(depth[5].is_nan());
        assert_eq!(depth[6], 0.1);
        assert!(
            grid.at_link(WATER_SPECIFIC_DISCHARGE)
                .unwrap()
                .iter()
                .all(|&q| q == 0.0)
        );
    }

    #[test]
    fn test_stability_limit_matches_formula() {
        let mut grid = flat_grid(3, 3, NodeStatus::FixedValue);
        grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap()[4] = 0.01;
        let router = OverlandFlowRouter::new(&mut grid, OverlandFlowConfig::default()).unwrap();

        let d = 0.01_f64.powf(7.0 / 3.0) / (0.01 * 0.01 * 1.0);
        let expected = 0.2 * 1.0 / (2.0 * d);
        let actual = router.stability_limit(&grid).unwrap();
        assert!((actual - expected).abs() / expected < 1e-12);
    }
}
