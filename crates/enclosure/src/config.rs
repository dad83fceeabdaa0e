use hottel_solvers::view_factor::correct;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{angle::degree, f64::Angle};

/// Configuration for building enclosures and calculating exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeConfig {
    /// View-factor corrector settings.
    pub correct: correct::Config,

    /// Orientation difference, in degrees, below which the estimator treats
    /// two surfaces as facing the same way.
    pub same_angle_limit_deg: f64,

    /// Smallest difference between construction and insulation absorptivity
    /// for which movable insulation changes trigger a script-F rebuild.
    pub insulation_absorptivity_threshold: f64,

    /// Whether the registry keeps a view-factor report for each enclosure.
    pub view_factor_report: bool,
}

/// Errors that can occur when validating an [`ExchangeConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Correct(#[from] correct::ConfigError),

    #[error("same_angle_limit_deg must be in [0, 180]")]
    SameAngleLimit,

    #[error("insulation_absorptivity_threshold must be finite and non-negative")]
    InsulationThreshold,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            correct: correct::Config::default(),
            same_angle_limit_deg: 10.0,
            insulation_absorptivity_threshold: 0.01,
            view_factor_report: false,
        }
    }
}

impl ExchangeConfig {
    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the corrector settings are invalid or any limit is
    /// out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.correct.validate()?;

        if !(0.0..=180.0).contains(&self.same_angle_limit_deg) {
            return Err(ConfigError::SameAngleLimit);
        }
        if !self.insulation_absorptivity_threshold.is_finite()
            || self.insulation_absorptivity_threshold < 0.0
        {
            return Err(ConfigError::InsulationThreshold);
        }

        Ok(())
    }

    /// Returns the same-angle limit as an angle.
    #[must_use]
    pub fn same_angle_limit(&self) -> Angle {
        Angle::new::<degree>(self.same_angle_limit_deg)
    }
}
