use hottel_core::DenseMatrix;
use hottel_solvers::view_factor::{
    EstimateSurface,
    correct::{self, Status},
    estimate,
};
use uom::si::angle::degree;

use crate::{
    BuildError, Building, CheckValues, ConstructionKind, Enclosure, EnclosureReport,
    EnclosureSurface, ExchangeConfig, FactorSource, InputError, Report, ReportSurface, Zone,
};

/// Every zone's enclosure, built once per simulation.
#[derive(Debug, Clone)]
pub struct Registry {
    enclosures: Vec<Enclosure>,
    max_surfaces: usize,
    report: Option<Report>,
}

impl Registry {
    /// Builds one enclosure per zone, in zone order.
    ///
    /// Each enclosure gets user view factors if any are given for its zone,
    /// or estimated ones otherwise. The factors are then corrected and an
    /// initial script-F matrix is solved from construction emissivities.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, if zone surface ranges are
    /// out of bounds or overlap, if a zone has no heat transfer surfaces, if a
    /// surface refers to an unknown construction, if correction or script F
    /// fails, or if any user view-factor input is invalid. Input errors from
    /// all zones are reported together.
    pub fn build(building: &Building, config: &ExchangeConfig) -> Result<Self, BuildError> {
        config.validate()?;
        validate_ranges(building)?;

        let mut input_errors: Vec<InputError> = building
            .user_view_factors
            .iter()
            .filter(|user| !building.zones.iter().any(|zone| zone.name == user.zone))
            .map(|user| InputError::UnknownZone {
                zone: user.zone.clone(),
            })
            .collect();
        for error in &input_errors {
            tracing::error!("{error}");
        }

        let mut report = config.view_factor_report.then(Report::default);
        let mut enclosures = Vec::with_capacity(building.zones.len());

        for (index, zone) in building.zones.iter().enumerate() {
            let built = build_enclosure(
                index,
                zone,
                building,
                config,
                &mut input_errors,
                report.as_mut(),
            )?;
            enclosures.extend(built);
        }

        if !input_errors.is_empty() {
            return Err(BuildError::Input(input_errors));
        }

        let max_surfaces = enclosures.iter().map(Enclosure::len).max().unwrap_or(0);

        Ok(Self {
            enclosures,
            max_surfaces,
            report,
        })
    }

    /// Enclosures in zone order.
    #[must_use]
    pub fn enclosures(&self) -> &[Enclosure] {
        &self.enclosures
    }

    /// The enclosure of a zone.
    #[must_use]
    pub fn enclosure(&self, zone: usize) -> Option<&Enclosure> {
        self.enclosures.get(zone)
    }

    /// Number of surfaces in the largest enclosure.
    #[must_use]
    pub fn max_surfaces(&self) -> usize {
        self.max_surfaces
    }

    /// The view-factor report, if it was requested.
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub(crate) fn enclosures_mut(&mut self) -> &mut [Enclosure] {
        &mut self.enclosures
    }
}

/// Checks that zone ranges are in bounds, ascending, and disjoint.
fn validate_ranges(building: &Building) -> Result<(), BuildError> {
    let total = building.surfaces.len();
    let mut previous_end = 0;

    for zone in &building.zones {
        let range = &zone.surfaces;
        if range.start > range.end || range.end > total {
            return Err(BuildError::RangeOutOfBounds {
                zone: zone.name.clone(),
                start: range.start,
                end: range.end,
                total,
            });
        }
        if range.start < previous_end {
            return Err(BuildError::RangeOverlap {
                zone: zone.name.clone(),
            });
        }
        previous_end = range.end;
    }

    Ok(())
}

/// Builds one enclosure, or records its input errors and returns `None`.
fn build_enclosure(
    index: usize,
    zone: &Zone,
    building: &Building,
    config: &ExchangeConfig,
    input_errors: &mut Vec<InputError>,
    report: Option<&mut Report>,
) -> Result<Option<Enclosure>, BuildError> {
    let mut surfaces = Vec::new();
    let mut geometry = Vec::new();

    for id in zone.surfaces.clone() {
        let surface = &building.surfaces[id];
        if !surface.heat_transfer {
            continue;
        }
        let construction =
            building
                .construction_of(surface)
                .ok_or_else(|| BuildError::UnknownConstruction {
                    surface: surface.name.clone(),
                    construction: surface.construction,
                })?;

        surfaces.push(EnclosureSurface {
            id,
            name: surface.name.clone(),
            class: surface.class,
            window: match construction.kind {
                ConstructionKind::Window(kind) => Some(kind),
                ConstructionKind::Opaque => None,
            },
            base_emissivity: construction.inside_absorptivity,
            insulation_absorptivity: surface.movable_insulation.map(|m| m.absorptivity),
        });
        geometry.push(EstimateSurface {
            area: surface.radiating_area(construction),
            azimuth: surface.azimuth,
            tilt: surface.tilt,
            kind: surface.estimate_kind(),
        });
    }

    if surfaces.is_empty() {
        return Err(BuildError::NoSurfaces {
            zone: zone.name.clone(),
        });
    }

    let n = surfaces.len();
    let areas: Vec<f64> = geometry.iter().map(|g| g.area).collect();
    let base_emissivity: Vec<f64> = surfaces.iter().map(|s| s.base_emissivity).collect();

    let mut enclosure = Enclosure {
        zone: index,
        name: zone.name.clone(),
        range: zone.surfaces.clone(),
        surfaces,
        areas,
        view_factors: DenseMatrix::zeros(n),
        emissivity: base_emissivity.clone(),
        script_f: DenseMatrix::zeros(n),
        exchange: DenseMatrix::zeros(n),
    };

    if n == 1 {
        enclosure.clamp_emissivity();
        if let Some(report) = report {
            report.enclosures.push(EnclosureReport {
                zone: zone.name.clone(),
                surfaces: report_surfaces(&enclosure, &geometry),
                source: FactorSource::SingleSurface,
                initial: DenseMatrix::zeros(1),
                factors: DenseMatrix::zeros(1),
                script_f: DenseMatrix::zeros(1),
                check: CheckValues::single_surface(),
            });
        }
        return Ok(Some(enclosure));
    }

    let Some((initial, source)) =
        initial_factors(zone, building, config, &enclosure, &geometry, input_errors)
    else {
        return Ok(None);
    };

    let solution = correct::correct(
        &enclosure.areas,
        &initial,
        &config.correct,
        |event: &correct::Event| -> Option<correct::Action> {
            tracing::trace!(
                zone = %zone.name,
                iter = event.iter,
                deviation = event.deviation,
                change = event.change,
                "view factor correction"
            );
            None
        },
    )
    .map_err(|source| BuildError::Correct {
        zone: zone.name.clone(),
        source,
    })?;

    warn_about_correction(&zone.name, &solution, &config.correct);

    #[allow(clippy::cast_precision_loss)]
    let target = n as f64;
    let check = CheckValues {
        original_deviation: solution.original_deviation,
        fixed_deviation: solution.fixed_deviation,
        final_deviation: solution.final_deviation,
        iterations: Some(solution.iters),
        fixed_row_sum_deviation: (solution.row_sum - target).abs(),
        final_row_sum_deviation: (solution.factors.sum() - target).abs(),
    };
    tracing::debug!(
        zone = %zone.name,
        original = check.original_deviation,
        fixed = check.fixed_deviation,
        final_deviation = check.final_deviation,
        iterations = solution.iters,
        "view factor check values"
    );

    enclosure.view_factors = solution.factors;
    enclosure
        .resolve(&base_emissivity)
        .map_err(|source| BuildError::ScriptF {
            zone: zone.name.clone(),
            source,
        })?;

    if let Some(report) = report {
        report.enclosures.push(EnclosureReport {
            zone: zone.name.clone(),
            surfaces: report_surfaces(&enclosure, &geometry),
            source,
            initial,
            factors: enclosure.view_factors.clone(),
            script_f: enclosure.script_f.clone(),
            check,
        });
    }

    Ok(Some(enclosure))
}

/// Returns user or estimated view factors, or `None` if user input is invalid.
fn initial_factors(
    zone: &Zone,
    building: &Building,
    config: &ExchangeConfig,
    enclosure: &Enclosure,
    geometry: &[EstimateSurface],
    input_errors: &mut Vec<InputError>,
) -> Option<(DenseMatrix, FactorSource)> {
    if let Some(user) = building
        .user_view_factors
        .iter()
        .find(|user| user.zone == zone.name)
    {
        let names: Vec<&str> = enclosure.surfaces.iter().map(|s| s.name.as_str()).collect();
        return match user.to_matrix(&names) {
            Ok(factors) => Some((factors, FactorSource::User)),
            Err(errors) => {
                for error in &errors {
                    tracing::error!("{error}");
                }
                input_errors.extend(errors);
                None
            }
        };
    }

    let estimate = estimate(geometry, config.same_angle_limit());
    for &index in &estimate.unseen {
        tracing::warn!(
            zone = %zone.name,
            surface = %enclosure.surfaces[index].name,
            "zero area for all other zone surfaces"
        );
    }
    Some((estimate.factors, FactorSource::Estimated))
}

fn warn_about_correction(zone: &str, solution: &correct::Solution, config: &correct::Config) {
    match solution.status {
        Status::NonEnclosure => tracing::warn!(
            zone,
            "surfaces do not define an enclosure; view factors enforce reciprocity but may not be complete"
        ),
        Status::Incomplete => tracing::warn!(
            zone,
            deviation = solution.fixed_deviation,
            "view factors not complete; check for bad surface descriptions or an unenclosed zone"
        ),
        Status::MaxIters | Status::StoppedByObserver
            if solution.fixed_deviation > config.warn_tol() =>
        {
            tracing::warn!(
                zone,
                deviation = solution.fixed_deviation,
                row_sum = solution.row_sum,
                "view factors not complete; check for bad surface descriptions or an unenclosed zone"
            );
        }
        _ => {}
    }
}

fn report_surfaces(enclosure: &Enclosure, geometry: &[EstimateSurface]) -> Vec<ReportSurface> {
    enclosure
        .surfaces
        .iter()
        .zip(geometry)
        .zip(&enclosure.emissivity)
        .map(|((surface, g), &emissivity)| ReportSurface {
            name: surface.name.clone(),
            class: surface.class,
            area: g.area,
            azimuth_deg: g.azimuth.get::<degree>(),
            tilt_deg: g.tilt.get::<degree>(),
            emissivity,
        })
        .collect()
}
