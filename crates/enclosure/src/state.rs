//! Per-call surface state supplied by the surrounding heat balance.

use std::f64::consts::PI;

use ndarray::Array1;
use ninterp::{
    error::ValidateError,
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use uom::si::{
    angle::radian,
    f64::{Angle, ThermodynamicTemperature},
};

/// Window shading status for one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// No shading device, or the device is retracted.
    #[default]
    None,
    InteriorShade,
    InteriorBlind,
    /// Any exterior or between-glass device; irrelevant to interior exchange.
    Other,
}

impl Shading {
    /// Returns `true` for devices on the room side of the glass.
    #[must_use]
    pub fn is_interior(self) -> bool {
        matches!(self, Self::InteriorShade | Self::InteriorBlind)
    }
}

/// A property tabulated over blind slat angles from 0 to π.
///
/// Tables with a single entry describe shades or fixed-angle blinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlatTable(Vec<f64>);

impl SlatTable {
    /// Creates a table from values at evenly spaced slat angles spanning 0 to π.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Creates a table whose value does not depend on slat angle.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self(vec![value])
    }

    /// Returns the value at the first tabulated angle, or zero if empty.
    #[must_use]
    pub fn first(&self) -> f64 {
        self.0.first().copied().unwrap_or_default()
    }

    /// Returns the value at a slat angle.
    ///
    /// Movable slats interpolate linearly, with the angle clamped to `[0, π]`.
    /// Fixed slats and single-entry tables always use the first entry.
    #[must_use]
    pub fn interpolate(&self, slat_angle: Angle, movable_slats: bool) -> f64 {
        if !movable_slats || self.0.len() < 2 {
            return self.first();
        }

        let angle = slat_angle.get::<radian>();
        let value = self
            .linear()
            .ok()
            .and_then(|interp| interp.interpolate(&[angle]).ok());

        value.unwrap_or_else(|| {
            tracing::warn!(angle, "slat angle could not be interpolated; using the first entry");
            self.first()
        })
    }

    /// Linear interpolant over evenly spaced slat angles from 0 to π.
    fn linear(&self) -> Result<Interp1DOwned<f64, Linear>, ValidateError> {
        let angles = Array1::linspace(0.0, PI, self.0.len());
        Interp1DOwned::new(angles, Array1::from(self.0.clone()), Linear, Extrapolate::Clamp)
    }
}

/// Window state for one timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    pub shading: Shading,
    pub previous_shading: Shading,
    pub slat_angle: Angle,
    pub movable_slats: bool,

    /// Effective emissivity of the interior shade or blind.
    pub shade_emissivity: SlatTable,

    /// Effective emissivity of the glass behind the shade or blind.
    pub glass_emissivity: SlatTable,

    /// Temperature of the innermost glass face.
    pub glass_temperature: ThermodynamicTemperature,

    /// Effective inside temperature of the glazing and shading combination.
    pub effective_temperature: ThermodynamicTemperature,

    /// Effective inside emissivity reported by the equivalent-layer model.
    pub effective_emissivity: f64,
}

impl WindowState {
    /// Returns the combined shade and glass emissivity at the current slat angle.
    #[must_use]
    pub fn shaded_emissivity(&self) -> f64 {
        self.shade_emissivity
            .interpolate(self.slat_angle, self.movable_slats)
            + self
                .glass_emissivity
                .interpolate(self.slat_angle, self.movable_slats)
    }
}

/// Whether interior movable insulation covers a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsulationState {
    pub present: bool,
    pub previously_present: bool,
}

/// State of one building surface for the current call.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    /// Inside surface temperature from the heat balance.
    pub temperature: ThermodynamicTemperature,

    pub window: Option<WindowState>,
    pub insulation: Option<InsulationState>,
}

impl SurfaceState {
    /// Creates the state of a surface with only a temperature.
    #[must_use]
    pub fn opaque(temperature: ThermodynamicTemperature) -> Self {
        Self {
            temperature,
            window: None,
            insulation: None,
        }
    }
}

/// Where the heat balance is in its iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepContext {
    /// Heat-balance iteration within the timestep; zero is the first.
    pub iteration: usize,

    /// First timestep of a new environment period.
    pub begin_environment: bool,

    /// Sizing or kickoff pass; no exchange is calculated.
    pub kickoff: bool,
}
