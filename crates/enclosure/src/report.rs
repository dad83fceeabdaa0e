//! View-factor report: geometry, factors, and check values per enclosure.

use std::fmt;

use hottel_core::DenseMatrix;

use crate::{SurfaceClass, UserViewFactors, ViewFactorValues};

/// Where an enclosure's initial view factors came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorSource {
    Estimated,
    User,
    /// A single surface has no exchange, so no factors were needed.
    SingleSurface,
}

/// One surface as the view-factor calculation saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSurface {
    pub name: String,
    pub class: SurfaceClass,

    /// Radiating area in m².
    pub area: f64,
    pub azimuth_deg: f64,
    pub tilt_deg: f64,
    pub emissivity: f64,
}

/// Completeness check values from view-factor correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckValues {
    pub original_deviation: f64,
    pub fixed_deviation: f64,
    pub final_deviation: f64,

    /// Corrector iterations, or `None` when no correction ran.
    pub iterations: Option<usize>,

    pub fixed_row_sum_deviation: f64,
    pub final_row_sum_deviation: f64,
}

impl CheckValues {
    pub(crate) fn single_surface() -> Self {
        Self {
            original_deviation: 0.0,
            fixed_deviation: 0.0,
            final_deviation: 0.0,
            iterations: None,
            fixed_row_sum_deviation: 0.0,
            final_row_sum_deviation: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnclosureReport {
    pub zone: String,
    pub surfaces: Vec<ReportSurface>,
    pub source: FactorSource,

    /// View factors before correction.
    pub initial: DenseMatrix,

    /// Corrected view factors.
    pub factors: DenseMatrix,

    /// Area-weighted script-F from construction emissivities.
    pub script_f: DenseMatrix,

    pub check: CheckValues,
}

/// View-factor report for every enclosure, in zone order.
///
/// The [`Display`](fmt::Display) impl renders comma-separated records, one
/// line each. Matrix rows list, for each sending surface, the value toward
/// every receiving surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub enclosures: Vec<EnclosureReport>,
}

impl Report {
    /// Exports the corrected view factors as by-name user input.
    ///
    /// Single-surface enclosures are skipped since they take no user input.
    #[must_use]
    pub fn to_user_view_factors(&self) -> Vec<UserViewFactors> {
        self.enclosures
            .iter()
            .filter(|e| e.source != FactorSource::SingleSurface)
            .map(|e| {
                let mut values = Vec::with_capacity(e.surfaces.len() * e.surfaces.len());
                for (from, sender) in e.surfaces.iter().enumerate() {
                    for (to, receiver) in e.surfaces.iter().enumerate() {
                        values.push((
                            sender.name.clone(),
                            receiver.name.clone(),
                            e.factors[(to, from)],
                        ));
                    }
                }
                UserViewFactors {
                    zone: e.zone.clone(),
                    values: ViewFactorValues::ByName(values),
                }
            })
            .collect()
    }
}

impl fmt::Display for SurfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Wall => "Wall",
            Self::Floor => "Floor",
            Self::Ceiling => "Ceiling",
            Self::Roof => "Roof",
            Self::InternalMass => "Internal Mass",
            Self::Window => "Window",
            Self::Door => "Door",
            Self::TubularDaylightDiffuser => "Tubular Daylighting Device Diffuser",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "! <Surface View Factor and Grey Interchange Information>")?;
        writeln!(f, "! <View Factor - Zone Information>,Zone Name,Number of Surfaces")?;
        writeln!(
            f,
            "! <View Factor - Surface Information>,Surface Name,Surface Class,Area {{m2}},Azimuth,Tilt,Thermal Emissivity"
        )?;
        writeln!(f, "! <View Factor / Grey Interchange Type>,Surface Name(s)")?;
        writeln!(
            f,
            "! <View Factor>,Surface Name,Surface Class,Column Sum,View Factors for each Surface"
        )?;
        writeln!(
            f,
            "! <Surface View Factor Check Values>,Zone Name,Original Check Value,Calculated Fixed Check Value,Final Check Value,Number of Iterations,Fixed RowSum Convergence,Used RowSum Convergence"
        )?;
        for enclosure in &self.enclosures {
            write!(f, "{enclosure}")?;
        }
        Ok(())
    }
}

impl fmt::Display for EnclosureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Surface View Factor - Zone Information,{},{}",
            self.zone,
            self.surfaces.len()
        )?;
        for s in &self.surfaces {
            writeln!(
                f,
                "Surface View Factor - Surface Information,{},{},{:.4},{:.4},{:.4},{:.4}",
                s.name, s.class, s.area, s.azimuth_deg, s.tilt_deg, s.emissivity
            )?;
        }

        let initial_label = match self.source {
            FactorSource::User => "User Input ViewFactors",
            FactorSource::Estimated | FactorSource::SingleSurface => "Approximate ViewFactors",
        };
        self.write_matrix(f, initial_label, "View Factor", &self.initial)?;
        self.write_matrix(f, "Final ViewFactors", "View Factor", &self.factors)?;
        self.write_matrix(f, "Script F Factors", "Script F Factor", &self.script_f)?;

        let c = &self.check;
        let iterations = c
            .iterations
            .map_or_else(|| "-1".to_owned(), |n| n.to_string());
        writeln!(
            f,
            "Surface View Factor Check Values,{},{:.6},{:.6},{:.6},{},{:.6},{:.6}",
            self.zone,
            c.original_deviation,
            c.fixed_deviation,
            c.final_deviation,
            iterations,
            c.fixed_row_sum_deviation,
            c.final_row_sum_deviation
        )
    }
}

impl EnclosureReport {
    fn write_matrix(
        &self,
        f: &mut fmt::Formatter<'_>,
        heading: &str,
        row_label: &str,
        matrix: &DenseMatrix,
    ) -> fmt::Result {
        write!(f, "{heading},To Surface")?;
        for s in &self.surfaces {
            write!(f, ",{}", s.name)?;
        }
        writeln!(f)?;

        for (from, s) in self.surfaces.iter().enumerate() {
            let column = matrix.column(from);
            write!(f, "{row_label},{},{},{:.4}", s.name, s.class, column.sum())?;
            for value in column {
                write!(f, ",{value:.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
