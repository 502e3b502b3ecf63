//! Outlet discharge and recorded time series.

use crate::flow::OverlandFlowError;
use crate::grid::{ModelGrid, WATER_SPECIFIC_DISCHARGE};
use crate::mesh::MeshError;

/// Volumetric discharge (m³/s) from core cells into `node`.
///
/// Sums the flux over the node's active links whose other end is a core
/// node. Positive values mean water leaves the domain through `node`.
pub fn outlet_discharge(grid: &ModelGrid, node: usize) -> Result<f64, OverlandFlowError> {
    let mesh = grid.mesh();
    if node >= mesh.n_nodes() {
        return Err(MeshError::NodeOutOfRange {
            node,
            n_nodes: mesh.n_nodes(),
        }
        .into());
    }
    let discharge = grid.at_link(WATER_SPECIFIC_DISCHARGE)?;

    let mut total = 0.0;
    for entry in mesh.links_at_node(node) {
        if !mesh.link_status(entry.link).is_active() {
            continue;
        }
        let (tail, head) = mesh.link_nodes(entry.link);
        let other = if tail == node { head } else { tail };
        if !mesh.node_status(other).is_core() {
            continue;
        }
        // sign is +1 where `node` is the tail, so this counts inflow
        total -= entry.sign * discharge[entry.link] * mesh.face_width(entry.link);
    }
    Ok(total)
}

/// A single time series sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSeriesPoint {
    /// Time in seconds
    pub time: f64,
    /// Sampled value
    pub value: f64,
}

/// Samples of one quantity over a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    pub data: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample.
    pub fn push(&mut self, time: f64, value: f64) {
        self.data.push(TimeSeriesPoint { time, value });
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Last sample.
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.data.last()
    }

    /// Sample with the largest value (first one on ties).
    pub fn max(&self) -> Option<&TimeSeriesPoint> {
        self.data
            .iter()
            .fold(None, |best: Option<&TimeSeriesPoint>, p| match best {
                Some(b) if b.value >= p.value => Some(b),
                _ => Some(p),
            })
    }

    /// Trapezoidal integral of the value over time.
    pub fn integral(&self) -> f64 {
        self.data
            .windows(2)
            .map(|w| 0.5 * (w[0].value + w[1].value) * (w[1].time - w[0].time))
            .sum()
    }
}

/// Outlet discharge (m³/s) over time.
#[derive(Clone, Debug, PartialEq)]
pub struct Hydrograph {
    /// Node the discharge is measured into
    pub outlet: usize,
    pub series: TimeSeries,
}

impl Hydrograph {
    /// Create an empty hydrograph for an outlet node.
    pub fn new(outlet: usize) -> Self {
        Self {
            outlet,
            series: TimeSeries::new(),
        }
    }

    /// Record a discharge sample.
    pub fn push(&mut self, time: f64, discharge: f64) {
        self.series.push(time, discharge);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Peak discharge (m³/s), zero if empty.
    pub fn peak(&self) -> f64 {
        self.series.max().map_or(0.0, |p| p.value)
    }

    /// Time of the peak discharge (s).
    pub fn time_to_peak(&self) -> Option<f64> {
        self.series.max().map(|p| p.time)
    }

    /// Discharged volume (m³), trapezoidal in time.
    pub fn volume(&self) -> f64 {
        self.series.integral()
    }

    /// `(time, discharge)` samples.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series.data.iter().map(|p| (p.time, p.value))
    }
}
