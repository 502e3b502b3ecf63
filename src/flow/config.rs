//! Router parameters.

use super::error::ConfigError;

/// Default stability factor (fraction of the diffusive CFL limit).
pub const DEFAULT_STABILITY_FACTOR: f64 = 0.2;

/// Default floor on the maximum depth used in the stability limit (m).
pub const DEFAULT_MIN_DEPTH: f64 = 1e-9;

/// Default characteristic infiltration depth (m).
pub const DEFAULT_INFILTRATION_DEPTH_SCALE: f64 = 0.001;

/// Parameters of the linear diffusion overland flow router.
///
/// Units are SI: rates in m/s, depths in m, roughness in s/m^(1/3).
///
/// # Example
///
/// ```
/// use overland_rs::flow::OverlandFlowConfig;
///
/// let config = OverlandFlowConfig::new(2e-5, 0.03, 1.0)
///     .with_infiltration(1e-6, 0.002)
///     .with_stability_factor(0.3);
///
/// assert!(config.validate().is_ok());
/// assert!(config.with_stability_factor(1.5).validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct OverlandFlowConfig {
    /// Rainfall rate R (m/s)
    pub rain_rate: f64,
    /// Infiltration capacity I_c (m/s)
    pub infiltration_capacity: f64,
    /// Characteristic infiltration depth H_i (m)
    pub infiltration_depth_scale: f64,
    /// Manning roughness n (s/m^(1/3))
    pub roughness: f64,
    /// Characteristic velocity scale u_c (m/s)
    pub velocity_scale: f64,
    /// Stability factor α in (0, 1]
    pub stability_factor: f64,
    /// Floor on the maximum depth in the stability limit (m)
    pub min_depth: f64,
    /// Optional cap on sub-step length (s)
    pub max_substep: Option<f64>,
}

impl Default for OverlandFlowConfig {
    fn default() -> Self {
        Self {
            rain_rate: 1e-5,
            infiltration_capacity: 0.0,
            infiltration_depth_scale: DEFAULT_INFILTRATION_DEPTH_SCALE,
            roughness: 0.01,
            velocity_scale: 1.0,
            stability_factor: DEFAULT_STABILITY_FACTOR,
            min_depth: DEFAULT_MIN_DEPTH,
            max_substep: None,
        }
    }
}

impl OverlandFlowConfig {
    /// Create a configuration with the given rain rate, roughness and
    /// velocity scale; everything else at defaults.
    pub fn new(rain_rate: f64, roughness: f64, velocity_scale: f64) -> Self {
        Self {
            rain_rate,
            roughness,
            velocity_scale,
            ..Self::default()
        }
    }

    /// Set the rain rate.
    pub fn with_rain_rate(mut self, rain_rate: f64) -> Self {
        self.rain_rate = rain_rate;
        self
    }

    /// Enable infiltration.
    ///
    /// # Arguments
    /// * `capacity` - Infiltration capacity I_c (m/s)
    /// * `depth_scale` - Depth H_i at which infiltration reaches ~63% of capacity (m)
    pub fn with_infiltration(mut self, capacity: f64, depth_scale: f64) -> Self {
        self.infiltration_capacity = capacity;
        self.infiltration_depth_scale = depth_scale;
        self
    }

    /// Set the stability factor α.
    pub fn with_stability_factor(mut self, alpha: f64) -> Self {
        self.stability_factor = alpha;
        self
    }

    /// Set the depth floor used in the stability limit.
    pub fn with_min_depth(mut self, min_depth: f64) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Cap the sub-step length.
    ///
    /// Useful when no link is active (the flux limit is then unbounded) or to
    /// resolve infiltration more finely.
    pub fn with_max_substep(mut self, max_substep: f64) -> Self {
        self.max_substep = Some(max_substep);
        self
    }

    /// Check all parameters.
    ///
    /// NaN fails every check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.stability_factor;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::StabilityFactor(alpha));
        }
        if !(self.roughness > 0.0 && self.roughness.is_finite()) {
            return Err(ConfigError::Roughness(self.roughness));
        }
        if !(self.velocity_scale > 0.0 && self.velocity_scale.is_finite()) {
            return Err(ConfigError::VelocityScale(self.velocity_scale));
        }
        if !(self.infiltration_capacity >= 0.0 && self.infiltration_capacity.is_finite()) {
            return Err(ConfigError::InfiltrationCapacity(self.infiltration_capacity));
        }
        if !(self.infiltration_depth_scale > 0.0 && self.infiltration_depth_scale.is_finite()) {
            return Err(ConfigError::InfiltrationDepthScale(
                self.infiltration_depth_scale,
            ));
        }
        if !(self.min_depth > 0.0 && self.min_depth.is_finite()) {
            return Err(ConfigError::MinDepth(self.min_depth));
        }
        if !self.rain_rate.is_finite() {
            return Err(ConfigError::RainRate(self.rain_rate));
        }
        if let Some(dt) = self.max_substep
            && !(dt > 0.0)
        {
            return Err(ConfigError::MaxSubstep(dt));
        }
        Ok(())
    }

    /// Velocity coefficient 1 / (n² u_c).
    #[inline]
    pub fn velocity_coefficient(&self) -> f64 {
        1.0 / (self.roughness * self.roughness * self.velocity_scale)
    }
}
