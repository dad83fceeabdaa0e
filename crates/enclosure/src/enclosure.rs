use std::ops::Range;

use hottel_core::{
    DenseMatrix,
    radiation::{STEFAN_BOLTZMANN, clamp_emissivities},
};
use hottel_solvers::script_f::{self, ScriptF};

use crate::{SurfaceClass, WindowKind};

/// The radiative properties of one enclosure surface, fixed at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosureSurface {
    /// Building surface id.
    pub id: usize,
    pub name: String,
    pub class: SurfaceClass,

    /// Window model, if the construction is a window.
    pub window: Option<WindowKind>,

    /// Construction inside absorptivity.
    pub base_emissivity: f64,

    /// Absorptivity of the interior movable insulation material, if any.
    pub insulation_absorptivity: Option<f64>,
}

/// The heat transfer surfaces of one zone and their exchange factors.
///
/// Row and column `k` of every matrix refer to `surfaces()[k]`.
#[derive(Debug, Clone)]
pub struct Enclosure {
    pub(crate) zone: usize,
    pub(crate) name: String,
    pub(crate) range: Range<usize>,
    pub(crate) surfaces: Vec<EnclosureSurface>,
    pub(crate) areas: Vec<f64>,
    pub(crate) view_factors: DenseMatrix,
    pub(crate) emissivity: Vec<f64>,
    pub(crate) script_f: DenseMatrix,

    /// `σ · script_f`, in W/K⁴.
    pub(crate) exchange: DenseMatrix,
}

impl Enclosure {
    /// Zone index.
    #[must_use]
    pub fn zone(&self) -> usize {
        self.zone
    }

    /// Zone name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The building surface ids owned by the zone, heat transfer or not.
    #[must_use]
    pub fn surface_range(&self) -> Range<usize> {
        self.range.clone()
    }

    #[must_use]
    pub fn surfaces(&self) -> &[EnclosureSurface] {
        &self.surfaces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Radiating areas in m².
    #[must_use]
    pub fn areas(&self) -> &[f64] {
        &self.areas
    }

    /// Corrected direct view factors.
    #[must_use]
    pub fn view_factors(&self) -> &DenseMatrix {
        &self.view_factors
    }

    /// Emissivities the current script-F matrix was computed with.
    #[must_use]
    pub fn emissivity(&self) -> &[f64] {
        &self.emissivity
    }

    /// Area-weighted script-F matrix in m².
    #[must_use]
    pub fn script_f(&self) -> &DenseMatrix {
        &self.script_f
    }

    /// Re-solves script-F for new emissivities and caches the exchange matrix.
    ///
    /// Returns whether any emissivity was clamped.
    pub(crate) fn resolve(&mut self, emissivity: &[f64]) -> Result<bool, script_f::Error> {
        let ScriptF {
            matrix,
            emissivity,
            clamped,
        } = script_f::solve(&self.areas, &self.view_factors, emissivity)?;

        if clamped {
            self.warn_clamped();
        }

        let mut exchange = matrix.clone();
        exchange.scale(STEFAN_BOLTZMANN);

        self.emissivity = emissivity;
        self.script_f = matrix;
        self.exchange = exchange;
        Ok(clamped)
    }

    /// Clamps emissivities without solving, for enclosures with no exchange.
    ///
    /// Returns whether any emissivity was clamped.
    pub(crate) fn clamp_emissivity(&mut self) -> bool {
        let clamped = clamp_emissivities(&mut self.emissivity);
        if clamped {
            self.warn_clamped();
        }
        clamped
    }

    fn warn_clamped(&self) {
        tracing::warn!(
            zone = %self.name,
            "emissivity above the limit was clamped for script F"
        );
    }
}
