//! The per-iteration radiant exchange engine.
//!
//! # Output
//!
//! Net long-wave radiation is accumulated into [`ExchangeOutput::net`] in
//! watts, positive when a surface gains heat. Within an enclosure the values
//! sum to zero. Windows also accumulate the long-wave irradiance arriving from
//! the rest of the enclosure in [`ExchangeOutput::window_ir`].
//!
//! # Parallelism
//!
//! Every enclosure writes only to its zone's surface range, and zone ranges
//! never overlap. With the `parallel` feature, enclosures are processed
//! concurrently on the rayon thread pool.

use std::ops::Range;

use hottel_core::radiation::kelvin_fourth;
use uom::si::{
    f64::{HeatFluxDensity, Power, ThermodynamicTemperature},
    heat_flux_density::watt_per_square_meter,
    power::watt,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    Building, Enclosure, ExchangeConfig, ExchangeError, Registry, Shading, StepContext,
    SurfaceClass, SurfaceState, WindowKind, effective_emissivities, enclosure_requires_rebuild,
};

/// Which enclosures a call processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every zone.
    All,
    /// A single zone, leaving all others untouched.
    Zone(usize),
}

/// Caller-owned accumulators, one entry per building surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeOutput {
    /// Net long-wave radiation to each surface from the rest of its enclosure.
    pub net: Vec<Power>,

    /// Long-wave irradiance on each window from the rest of its enclosure.
    /// Zero for other surfaces.
    pub window_ir: Vec<HeatFluxDensity>,
}

impl ExchangeOutput {
    /// Creates zeroed accumulators for `surfaces` building surfaces.
    #[must_use]
    pub fn new(surfaces: usize) -> Self {
        Self {
            net: vec![Power::new::<watt>(0.0); surfaces],
            window_ir: vec![HeatFluxDensity::new::<watt_per_square_meter>(0.0); surfaces],
        }
    }

    fn reset(&mut self, range: Range<usize>) {
        self.net[range.clone()].fill(Power::new::<watt>(0.0));
        self.window_ir[range].fill(HeatFluxDensity::new::<watt_per_square_meter>(0.0));
    }
}

/// Call counts since the engine was created or last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    /// Calls covering every zone.
    pub full_passes: u64,

    /// Calls covering a single zone.
    pub zone_passes: u64,

    /// Script-F matrices re-solved because emissivities changed.
    pub rebuilds: u64,
}

/// Interior long-wave radiant exchange for a building.
///
/// The enclosure registry is built on the first call and reused until
/// [`RadiantExchange::reset`].
#[derive(Debug, Clone)]
pub struct RadiantExchange {
    config: ExchangeConfig,
    registry: Option<Registry>,
    counters: Counters,
}

impl RadiantExchange {
    #[must_use]
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            config,
            registry: None,
            counters: Counters::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// The registry, once the first call has built it.
    #[must_use]
    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    #[must_use]
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Discards the registry and counters; the next call rebuilds everything.
    pub fn reset(&mut self) {
        self.registry = None;
        self.counters = Counters::default();
    }

    /// Calculates interior long-wave exchange for the enclosures in `scope`.
    ///
    /// The accumulators for the scope's surfaces are reset to zero first. On
    /// the first heat-balance iteration of a timestep, each enclosure whose
    /// emissivities may have changed has its script-F matrix re-solved.
    ///
    /// Kickoff passes build the registry but calculate nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be built, if `states` or
    /// `output` do not match the building's surface count, if the zone index
    /// is out of range, or if a script-F re-solve fails.
    pub fn calculate(
        &mut self,
        building: &Building,
        states: &[SurfaceState],
        step: &StepContext,
        scope: Scope,
        output: &mut ExchangeOutput,
    ) -> Result<(), ExchangeError> {
        let expected = building.surfaces.len();
        if states.len() != expected {
            return Err(ExchangeError::StateCount {
                expected,
                actual: states.len(),
            });
        }
        for actual in [output.net.len(), output.window_ir.len()] {
            if actual != expected {
                return Err(ExchangeError::OutputSize { expected, actual });
            }
        }

        let registry = match self.registry.take() {
            Some(registry) => registry,
            None => Registry::build(building, &self.config)?,
        };
        let registry = self.registry.insert(registry);

        if step.kickoff {
            return Ok(());
        }

        let enclosures = registry.enclosures_mut();
        let selected: &mut [Enclosure] = match scope {
            Scope::All => {
                self.counters.full_passes += 1;
                output.reset(0..expected);
                enclosures
            }
            Scope::Zone(zone) => {
                let count = enclosures.len();
                let Some(enclosure) = enclosures.get_mut(zone) else {
                    return Err(ExchangeError::UnknownZone { zone, count });
                };
                self.counters.zone_passes += 1;
                output.reset(enclosure.surface_range());
                std::slice::from_mut(enclosure)
            }
        };

        let net_chunks = split_ranges(&mut output.net, selected);
        let ir_chunks = split_ranges(&mut output.window_ir, selected);
        let jobs: Vec<_> = selected
            .iter_mut()
            .zip(net_chunks)
            .zip(ir_chunks)
            .map(|((enclosure, net), window_ir)| (enclosure, net, window_ir))
            .collect();

        #[cfg(feature = "parallel")]
        let jobs = jobs.into_par_iter();
        #[cfg(not(feature = "parallel"))]
        let jobs = jobs.into_iter();

        let config = &self.config;
        let results: Vec<Result<bool, ExchangeError>> = jobs
            .map(|(enclosure, net, window_ir)| {
                exchange_enclosure(enclosure, states, step, config, net, window_ir)
            })
            .collect();

        for rebuilt in results {
            if rebuilt? {
                self.counters.rebuilds += 1;
            }
        }

        Ok(())
    }
}

/// Splits `values` into one disjoint sub-slice per enclosure surface range.
///
/// Ranges are ascending and non-overlapping, which the registry guarantees.
fn split_ranges<'a, T>(values: &'a mut [T], enclosures: &[Enclosure]) -> Vec<&'a mut [T]> {
    let mut chunks = Vec::with_capacity(enclosures.len());
    let mut rest = values;
    let mut offset = 0;

    for enclosure in enclosures {
        let range = enclosure.surface_range();
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(range.start - offset);
        let (chunk, tail) = tail.split_at_mut(range.len());
        chunks.push(chunk);
        rest = tail;
        offset = range.end;
    }

    chunks
}

/// Runs one enclosure, writing into its zone's slices of the output.
///
/// Returns whether script F was re-solved.
fn exchange_enclosure(
    enclosure: &mut Enclosure,
    states: &[SurfaceState],
    step: &StepContext,
    config: &ExchangeConfig,
    net: &mut [Power],
    window_ir: &mut [HeatFluxDensity],
) -> Result<bool, ExchangeError> {
    let rebuild = step.iteration == 0
        && enclosure_requires_rebuild(
            enclosure,
            states,
            step,
            config.insulation_absorptivity_threshold,
        );

    if rebuild {
        let emissivity = effective_emissivities(enclosure, states);
        enclosure
            .resolve(&emissivity)
            .map_err(|source| ExchangeError::ScriptF {
                zone: enclosure.name.clone(),
                source,
            })?;
        tracing::debug!(zone = %enclosure.name, "script F rebuilt for new emissivities");
    }

    let (t4, emissivity): (Vec<f64>, Vec<f64>) = enclosure
        .surfaces
        .iter()
        .map(|surface| {
            let (temperature, emissivity) = radiating_state(
                surface.window,
                surface.class,
                surface.base_emissivity,
                &states[surface.id],
                step.iteration,
            );
            (kelvin_fourth(temperature), emissivity)
        })
        .unzip();

    let offset = enclosure.range.start;
    let exchange = &enclosure.exchange;
    let n = enclosure.surfaces.len();

    for (r, surface) in enclosure.surfaces.iter().enumerate() {
        let local = surface.id - offset;
        let t4_r = t4[r];

        if surface.window.is_some() {
            let mut incident = 0.0;
            let mut off_diagonal = 0.0;
            for s in 0..n {
                let factor = exchange[(s, r)];
                incident += factor * t4[s];
                if s != r {
                    off_diagonal += factor;
                }
            }
            let self_term = exchange[(r, r)] * t4_r;
            net[local] += Power::new::<watt>(incident - self_term - off_diagonal * t4_r);

            let absorbing_area = emissivity[r] * enclosure.areas[r];
            if absorbing_area > 0.0 {
                window_ir[local] +=
                    HeatFluxDensity::new::<watt_per_square_meter>(incident / absorbing_area);
            }
        } else {
            let gain: f64 = (0..n)
                .filter(|&s| s != r)
                .map(|s| exchange[(s, r)] * (t4[s] - t4_r))
                .sum();
            net[local] += Power::new::<watt>(gain);
        }
    }

    Ok(rebuild)
}

/// Returns the temperature and emissivity a surface radiates with this call.
fn radiating_state(
    window: Option<WindowKind>,
    class: SurfaceClass,
    base_emissivity: f64,
    state: &SurfaceState,
    iteration: usize,
) -> (ThermodynamicTemperature, f64) {
    let standard = (state.temperature, base_emissivity);
    let (Some(kind), Some(w)) = (window, state.window.as_ref()) else {
        return standard;
    };

    match kind {
        WindowKind::EquivalentLayer => (w.effective_temperature, w.effective_emissivity),
        WindowKind::Bsdf => (
            w.effective_temperature,
            w.shade_emissivity.first() + w.glass_emissivity.first(),
        ),
        WindowKind::Standard if class == SurfaceClass::TubularDaylightDiffuser => standard,
        WindowKind::Standard if iteration == 0 && w.shading == Shading::None => {
            (w.glass_temperature, base_emissivity)
        }
        WindowKind::Standard if w.shading.is_interior() => {
            (w.effective_temperature, w.shaded_emissivity())
        }
        WindowKind::Standard => standard,
    }
}

#[cfg(test)]
mod tests;
