//! Snapshot diagnostics of the overland flow state.

use crate::grid::{
    FieldError, ModelGrid, SURFACE_WATER_DEPTH, WATER_SPECIFIC_DISCHARGE, WATER_VELOCITY,
};

/// Water stored on core cells (m³).
pub fn stored_volume(grid: &ModelGrid) -> Result<f64, FieldError> {
    let mesh = grid.mesh();
    let depth = grid.at_node(SURFACE_WATER_DEPTH)?;
    Ok(mesh
        .core_nodes()
        .filter_map(|node| mesh.cell_area(node).map(|area| depth[node] * area))
        .sum())
}

/// Diagnostic quantities of the surface water state.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowDiagnostics {
    /// Water stored on core cells (m³)
    pub stored_volume: f64,
    /// Maximum core-node depth (m)
    pub max_depth: f64,
    /// Area-weighted mean core-node depth (m)
    pub mean_depth: f64,
    /// Fraction of core area deeper than the wet threshold
    pub wet_fraction: f64,
    /// Maximum |q| over active links (m²/s)
    pub max_discharge: f64,
    /// Maximum |U| over active links (m/s)
    pub max_velocity: f64,
}

impl FlowDiagnostics {
    /// Compute diagnostics from the grid's fields.
    ///
    /// # Arguments
    /// * `grid` - Grid carrying depth, discharge and velocity fields
    /// * `wet_threshold` - Depth above which a cell counts as wet (m)
    pub fn compute(grid: &ModelGrid, wet_threshold: f64) -> Result<Self, FieldError> {
        let mesh = grid.mesh();
        let depth = grid.at_node(SURFACE_WATER_DEPTH)?;
        let discharge = grid.at_link(WATER_SPECIFIC_DISCHARGE)?;
        let velocity = grid.at_link(WATER_VELOCITY)?;

        let mut stored_volume = 0.0;
        let mut total_area = 0.0;
        let mut wet_area = 0.0;
        let mut max_depth = 0.0_f64;

        for node in mesh.core_nodes() {
            let Some(area) = mesh.cell_area(node) else {
                continue;
            };
            let h = depth[node];
            stored_volume += h * area;
            total_area += area;
            if h > wet_threshold {
                wet_area += area;
            }
            max_depth = max_depth.max(h);
        }

        let mut max_discharge = 0.0_f64;
        let mut max_velocity = 0.0_f64;
        for link in mesh.active_links() {
            max_discharge = max_discharge.max(discharge[link].abs());
            max_velocity = max_velocity.max(velocity[link].abs());
        }

        // Grid without core cells
        let (mean_depth, wet_fraction) = if total_area > 0.0 {
            (stored_volume / total_area, wet_area / total_area)
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            stored_volume,
            max_depth,
            mean_depth,
            wet_fraction,
            max_discharge,
            max_velocity,
        })
    }

    /// Format diagnostics as a single-line summary.
    pub fn summary_line(&self) -> String {
        format!(
            "V={:.4e} m³ h_max={:.4e} h_mean={:.4e} wet={:.1}% |q|_max={:.3e} |U|_max={:.3e}",
            self.stored_volume,
            self.max_depth,
            self.mean_depth,
            100.0 * self.wet_fraction,
            self.max_discharge,
            self.max_velocity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::RasterMeshBuilder;
    use approx::assert_relative_eq;

    fn grid_with_state() -> ModelGrid {
        // 4 x 4 raster, dx = 2: four core cells of area 4
        let mesh = RasterMeshBuilder::new(4, 4)
            .with_spacing(2.0, 2.0)
            .build()
            .unwrap();
        let mut grid = ModelGrid::new(mesh);
        {
            let depth = grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap();
            depth[5] = 0.1;
            depth[6] = 0.3;
            // Boundary water does not count
            depth[0] = 10.0;
        }
        {
            let q = grid.add_zeros_at_link(WATER_SPECIFIC_DISCHARGE).unwrap();
            q[4] = -0.02;
            // Link 0 joins two boundary nodes and is inactive
            q[0] = 5.0;
        }
        grid.add_zeros_at_link(WATER_VELOCITY).unwrap()[4] = 0.5;
        grid
    }

    #[test]
    fn test_stored_volume_core_only() {
        let grid = grid_with_state();
        assert_relative_eq!(stored_volume(&grid).unwrap(), 1.6, max_relative = 1e-12);
    }

    #[test]
    fn test_compute() {
        let grid = grid_with_state();
        let diag = FlowDiagnostics::compute(&grid, 0.2).unwrap();

        assert_relative_eq!(diag.stored_volume, 1.6, max_relative = 1e-12);
        assert_eq!(diag.max_depth, 0.3);
        assert_relative_eq!(diag.mean_depth, 0.1, max_relative = 1e-12);
        assert_eq!(diag.wet_fraction, 0.25);
        assert_eq!(diag.max_discharge, 0.02);
        assert_eq!(diag.max_velocity, 0.5);
        assert!(diag.summary_line().contains("wet=25.0%"));
    }

    #[test]
    fn test_missing_fields() {
        let mesh = RasterMeshBuilder::new(3, 3).build().unwrap();
        let grid = ModelGrid::new(mesh);
        assert!(matches!(
            FlowDiagnostics::compute(&grid, 0.0),
            Err(FieldError::Missing { .. })
        ));
    }
}
