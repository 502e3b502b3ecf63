//! Piecewise-constant rainfall forcing.

use thiserror::Error;

/// Error type for building a [`RainfallSchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScheduleError {
    /// Breakpoint time negative or not finite.
    #[error("breakpoint {index} has invalid start time {time}")]
    InvalidTime { index: usize, time: f64 },

    /// Breakpoint rate not finite.
    #[error("breakpoint {index} has invalid rate {rate}")]
    InvalidRate { index: usize, rate: f64 },

    /// Start times not strictly increasing.
    #[error("breakpoint {index} does not start after the previous one")]
    NonMonotonic { index: usize },
}

/// A rain rate switch: `rate` (m/s) applies from `start` (s) until the next
/// breakpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RainfallBreakpoint {
    pub start: f64,
    pub rate: f64,
}

/// Rain rate as a step function of time.
///
/// The rate is zero before the first breakpoint and holds the last
/// breakpoint's value forever after it.
///
/// ```
/// use overland_rs::simulation::RainfallSchedule;
///
/// let storm = RainfallSchedule::storm(2e-5, 600.0).unwrap();
/// assert_eq!(storm.rate_at(0.0), 2e-5);
/// assert_eq!(storm.rate_at(600.0), 0.0);
/// assert_eq!(storm.next_change_after(10.0), Some(600.0));
/// assert_eq!(storm.next_change_after(600.0), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RainfallSchedule {
    breakpoints: Vec<RainfallBreakpoint>,
}

impl RainfallSchedule {
    /// Build a schedule from `(start, rate)` pairs in increasing time order.
    pub fn new(breakpoints: Vec<(f64, f64)>) -> Result<Self, ScheduleError> {
        let mut validated: Vec<RainfallBreakpoint> = Vec::with_capacity(breakpoints.len());
        for (index, (start, rate)) in breakpoints.into_iter().enumerate() {
            if !(start.is_finite() && start >= 0.0) {
                return Err(ScheduleError::InvalidTime { index, time: start });
            }
            if !rate.is_finite() {
                return Err(ScheduleError::InvalidRate { index, rate });
            }
            if let Some(prev) = validated.last()
                && start <= prev.start
            {
                return Err(ScheduleError::NonMonotonic { index });
            }
            validated.push(RainfallBreakpoint { start, rate });
        }
        Ok(Self {
            breakpoints: validated,
        })
    }

    /// The same rate for all time.
    pub fn constant(rate: f64) -> Result<Self, ScheduleError> {
        Self::new(vec![(0.0, rate)])
    }

    /// A block storm of `rate` from time zero to `duration`, then dry.
    pub fn storm(rate: f64, duration: f64) -> Result<Self, ScheduleError> {
        Self::new(vec![(0.0, rate), (duration, 0.0)])
    }

    /// Breakpoints in time order.
    pub fn breakpoints(&self) -> &[RainfallBreakpoint] {
        &self.breakpoints
    }

    /// Rain rate in effect at time `t`.
    pub fn rate_at(&self, t: f64) -> f64 {
        let n_started = self.breakpoints.partition_point(|b| b.start <= t);
        match n_started {
            0 => 0.0,
            n => self.breakpoints[n - 1].rate,
        }
    }

    /// First breakpoint strictly after `t`.
    pub fn next_change_after(&self, t: f64) -> Option<f64> {
        let n_started = self.breakpoints.partition_point(|b| b.start <= t);
        self.breakpoints.get(n_started).map(|b| b.start)
    }

    /// Rain depth (m) delivered over `[t0, t1]`.
    pub fn depth_between(&self, t0: f64, t1: f64) -> f64 {
        if t1 <= t0 {
            return 0.0;
        }
        let mut depth = 0.0;
        let mut t = t0;
        while t < t1 {
            let end = self.next_change_after(t).map_or(t1, |c| c.min(t1));
            depth += self.rate_at(t) * (end - t);
            t = end;
        }
        depth
    }
}

impl Default for RainfallSchedule {
    /// A dry schedule.
    fn default() -> Self {
        Self {
            breakpoints: Vec::new(),
        }
    }
}
