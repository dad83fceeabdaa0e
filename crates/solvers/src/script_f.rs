//! Grey-body exchange factors (Hottel's script-F) for a closed enclosure.
//!
//! # Algorithm
//!
//! Each surface is a node in a radiosity network. With `F` the direct view
//! factors, `A` the areas, and `ε` the emissivities, the solver forms
//!
//! ```text
//! M = F · diag(A) − diag(A / (1 − ε))
//! ```
//!
//! inverts it, and scales the inverse so that entry `[(k, i)]` of the result
//! is `A[k] · ℱ(k, i)` in m². Multiplying by the Stefan-Boltzmann constant and
//! a difference of fourth-power temperatures gives watts. The result is
//! symmetric whenever the view factors are reciprocal.
//!
//! For two surfaces of area `A` that see only each other, the off-diagonal
//! entry reduces to `A · ε² / (2ε − ε²)`.

use hottel_core::{DenseMatrix, MatrixError, radiation::clamp_emissivities};
use thiserror::Error;

/// The area-weighted script-F matrix and the emissivities it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptF {
    /// Entry `[(k, i)]` is `A[k] · ℱ(k, i)` in m².
    pub matrix: DenseMatrix,

    /// Emissivities used, after clamping to
    /// [`MAX_EMISSIVITY`](hottel_core::radiation::MAX_EMISSIVITY).
    pub emissivity: Vec<f64>,

    /// Whether any emissivity was clamped.
    pub clamped: bool,
}

/// Errors that can occur while computing script-F factors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("expected {expected} values but got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("surface {index} has invalid area {area}")]
    InvalidArea { index: usize, area: f64 },

    #[error("surface {index} has invalid emissivity {emissivity}")]
    InvalidEmissivity { index: usize, emissivity: f64 },

    #[error("radiosity system could not be solved")]
    Singular(#[source] MatrixError),
}

/// Computes script-F factors from areas, direct view factors, and emissivities.
///
/// Emissivities above
/// [`MAX_EMISSIVITY`](hottel_core::radiation::MAX_EMISSIVITY) are clamped;
/// the caller decides whether to report it using [`ScriptF::clamped`]. A
/// single surface has no exchange and yields a zero matrix.
///
/// # Errors
///
/// Returns an error if the input lengths disagree, if an area is not positive
/// and finite, if an emissivity is not positive and finite, or if the
/// radiosity system is singular.
pub fn solve(areas: &[f64], factors: &DenseMatrix, emissivity: &[f64]) -> Result<ScriptF, Error> {
    let n = areas.len();
    for actual in [factors.dim(), emissivity.len()] {
        if actual != n {
            return Err(Error::DimensionMismatch { expected: n, actual });
        }
    }
    if let Some((index, &area)) = areas
        .iter()
        .enumerate()
        .find(|(_, a)| !a.is_finite() || **a <= 0.0)
    {
        return Err(Error::InvalidArea { index, area });
    }
    if let Some((index, &emissivity)) = emissivity
        .iter()
        .enumerate()
        .find(|(_, e)| !e.is_finite() || **e <= 0.0)
    {
        return Err(Error::InvalidEmissivity { index, emissivity });
    }

    let mut emissivity = emissivity.to_vec();
    let clamped = clamp_emissivities(&mut emissivity);

    if n == 1 {
        return Ok(ScriptF {
            matrix: DenseMatrix::zeros(1),
            emissivity,
            clamped,
        });
    }

    // Surface resistance terms A / (1 − ε).
    let resistance: Vec<f64> = areas
        .iter()
        .zip(&emissivity)
        .map(|(a, e)| a / (1.0 - e))
        .collect();

    let mut system = factors.clone();
    system.scale_columns(areas);
    system.add_to_diagonal(&resistance.iter().map(|r| -r).collect::<Vec<_>>());

    let mut matrix = system.invert().map_err(Error::Singular)?;

    let column_scale: Vec<f64> = resistance
        .iter()
        .zip(&emissivity)
        .map(|(r, e)| -e * r)
        .collect();
    matrix.scale_columns(&column_scale);
    matrix.add_to_diagonal(&emissivity.iter().map(|e| -e).collect::<Vec<_>>());

    let row_scale: Vec<f64> = areas
        .iter()
        .zip(&emissivity)
        .map(|(a, e)| a * e / (1.0 - e))
        .collect();
    matrix.scale_rows(&row_scale);

    Ok(ScriptF {
        matrix,
        emissivity,
        clamped,
    })
}
