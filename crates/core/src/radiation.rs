//! Radiation constants and temperature helpers.

use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};

/// Stefan-Boltzmann constant in W/(m²·K⁴).
pub const STEFAN_BOLTZMANN: f64 = 5.6697e-8;

/// Largest thermal emissivity accepted by the exchange calculation.
///
/// An emissivity of exactly one makes the surface resistance `(1 - ε) / ε`
/// vanish, so larger values are pulled down to this limit.
pub const MAX_EMISSIVITY: f64 = 0.99999;

/// Returns the absolute temperature raised to the fourth power, in K⁴.
#[must_use]
pub fn kelvin_fourth(temperature: ThermodynamicTemperature) -> f64 {
    let t = temperature.get::<kelvin>();
    let t2 = t * t;
    t2 * t2
}

/// Clamps emissivities above [`MAX_EMISSIVITY`] in place.
///
/// Returns `true` if any value was changed.
pub fn clamp_emissivities(emissivity: &mut [f64]) -> bool {
    let mut clamped = false;
    for e in emissivity.iter_mut().filter(|e| **e > MAX_EMISSIVITY) {
        *e = MAX_EMISSIVITY;
        clamped = true;
    }
    clamped
}
