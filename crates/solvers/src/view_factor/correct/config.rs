use thiserror::Error;

/// Configuration for the view-factor corrector.
///
/// Deserialized configs are checked with [`Config::validate`] before use.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct Config {
    max_iters: usize,
    primary_tol: f64,
    difference_tol: f64,
    negligible: f64,
    warn_tol: f64,
    non_enclosure_overflow: f64,
    oversized_fraction: f64,
    oversized_gain: f64,
    oversized_cap: f64,
}

/// Errors that can occur when validating a corrector config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error("{0} must be finite and non-negative")]
    Tolerance(&'static str),

    #[error("oversized_fraction must be in (0, 1]")]
    OversizedFraction,

    #[error("oversized_cap must be in [0, 1)")]
    OversizedCap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 400,
            primary_tol: 1e-3,
            difference_tol: 1e-5,
            negligible: 1e-10,
            warn_tol: 0.005,
            non_enclosure_overflow: 0.01,
            oversized_fraction: 0.5,
            oversized_gain: 1.2,
            oversized_cap: 0.9,
        }
    }
}

impl Config {
    /// Creates a config with the given convergence settings and default
    /// thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is zero or either tolerance is negative
    /// or non-finite.
    pub fn new(
        max_iters: usize,
        primary_tol: f64,
        difference_tol: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            max_iters,
            primary_tol,
            difference_tol,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with new negligible, warning, and overflow thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if any threshold is negative or non-finite.
    pub fn with_thresholds(
        self,
        negligible: f64,
        warn_tol: f64,
        non_enclosure_overflow: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            negligible,
            warn_tol,
            non_enclosure_overflow,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with new oversized-surface settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `fraction` is outside `(0, 1]`, `gain` is negative
    /// or non-finite, or `cap` is outside `[0, 1)`.
    pub fn with_oversized(self, fraction: f64, gain: f64, cap: f64) -> Result<Self, ConfigError> {
        let config = Self {
            oversized_fraction: fraction,
            oversized_gain: gain,
            oversized_cap: cap,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the maximum fixed-point iterations before giving up.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the deviation `|ΣF − N|` at or below which the matrix counts as
    /// complete.
    #[must_use]
    pub fn primary_tol(&self) -> f64 {
        self.primary_tol
    }

    /// Returns the change in deviation between iterations below which
    /// iteration stops.
    #[must_use]
    pub fn difference_tol(&self) -> f64 {
        self.difference_tol
    }

    /// Returns the view factor below which entries are set to zero.
    #[must_use]
    pub fn negligible(&self) -> f64 {
        self.negligible
    }

    /// Returns the deviation above which an unconverged result deserves a
    /// warning.
    #[must_use]
    pub fn warn_tol(&self) -> f64 {
        self.warn_tol
    }

    /// Returns how far `ΣF` may exceed `N` in a non-enclosure before it is
    /// rescaled.
    #[must_use]
    pub fn non_enclosure_overflow(&self) -> f64 {
        self.non_enclosure_overflow
    }

    /// Returns the share of the total area beyond which the largest surface
    /// sees itself.
    #[must_use]
    pub fn oversized_fraction(&self) -> f64 {
        self.oversized_fraction
    }

    /// Returns the multiplier on the area share giving the oversized self view
    /// factor.
    #[must_use]
    pub fn oversized_gain(&self) -> f64 {
        self.oversized_gain
    }

    /// Returns the upper bound on the oversized self view factor.
    #[must_use]
    pub fn oversized_cap(&self) -> f64 {
        self.oversized_cap
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is zero, if any tolerance is negative or
    /// non-finite, or if the oversized-surface settings are out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }

        for (name, value) in [
            ("primary_tol", self.primary_tol),
            ("difference_tol", self.difference_tol),
            ("negligible", self.negligible),
            ("warn_tol", self.warn_tol),
            ("non_enclosure_overflow", self.non_enclosure_overflow),
            ("oversized_gain", self.oversized_gain),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Tolerance(name));
            }
        }

        if !(self.oversized_fraction > 0.0 && self.oversized_fraction <= 1.0) {
            return Err(ConfigError::OversizedFraction);
        }
        if !(0.0..1.0).contains(&self.oversized_cap) {
            return Err(ConfigError::OversizedCap);
        }

        Ok(())
    }
}
