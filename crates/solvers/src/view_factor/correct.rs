//! Reciprocity and completeness correction for approximate view factors.
//!
//! # Algorithm
//!
//! A physically consistent view-factor matrix `F` satisfies two constraints:
//!
//! - **Reciprocity**: `A[i] · F[(j, i)] == A[j] · F[(i, j)]`
//! - **Completeness**: every column sums to one
//!
//! The corrector works on the area-weighted matrix `AF[(j, i)] = A[i] · F[(j, i)]`,
//! which is symmetric when reciprocity holds. Each iteration rescales every
//! column of `AF` to sum to its surface area, averages `AF` with its transpose,
//! divides back by area, and drops negligible entries. Iteration stops when the
//! total deviation `|ΣF − N|` is small enough or stops changing.
//!
//! If the largest surface has more than half of the total area, no closed
//! enclosure can exist unless it sees itself, so it is given a self view
//! factor first.
//!
//! Enclosures with three or fewer surfaces are never iterated. Only reciprocity
//! is enforced, and the result is scaled down if any surface would emit more
//! than it has.
//!
//! # Observer Events
//!
//! The corrector emits one [`Event`] per fixed-point iteration. Returning
//! [`Action::StopEarly`] ends the iteration the same way the iteration cap
//! does: reciprocity is enforced one final time and the better of the
//! original and corrected matrices is kept.

mod action;
mod config;
mod error;
mod event;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use hottel_core::{DenseMatrix, Observer};

/// Corrects approximate view factors for reciprocity and completeness.
///
/// Entry `[(j, i)]` of `factors` is the fraction of radiation leaving surface
/// `i` that reaches surface `j`, and `areas[i]` is the area of surface `i`.
///
/// The observer receives an [`Event`] after every fixed-point iteration.
///
/// # Errors
///
/// Returns an error if the config is invalid, if `areas` is empty, if the
/// matrix and area dimensions differ, or if any area is not positive and finite.
#[allow(clippy::cast_precision_loss)]
pub fn correct<Obs>(
    areas: &[f64],
    factors: &DenseMatrix,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    config.validate()?;
    validate_inputs(areas, factors)?;

    let n = areas.len();
    let target = n as f64;
    let original_deviation = (factors.sum() - target).abs();

    if n == 1 {
        return Ok(Solution {
            factors: DenseMatrix::zeros(1),
            status: Status::NonEnclosure,
            original_deviation,
            fixed_deviation: 1.0,
            final_deviation: 1.0,
            iters: 0,
            row_sum: 0.0,
            oversized: None,
            used_fixed: true,
        });
    }

    let inverse_areas: Vec<f64> = areas.iter().map(|a| a.recip()).collect();

    let mut af = factors.clone();
    let oversized = give_self_view_to_oversized(areas, &mut af, config);
    af.scale_columns(areas);
    af.symmetrize();

    if n <= 3 {
        return Ok(non_enclosure(
            &af,
            &inverse_areas,
            original_deviation,
            oversized,
            config,
        ));
    }

    let mut fixed;
    let mut previous = 10.0;
    let mut iters = 0;

    let status = loop {
        iters += 1;

        let column_sums = af.column_sums();
        let coefficients: Vec<f64> = column_sums
            .iter()
            .zip(areas)
            .map(|(&sum, &area)| {
                if sum.abs() > config.negligible() {
                    area / sum
                } else {
                    1.0
                }
            })
            .collect();
        af.scale_columns(&coefficients);
        af.symmetrize();

        fixed = per_unit_area(&af, &inverse_areas);
        drop_negligible(&mut af, &mut fixed, config.negligible());

        let deviation = (fixed.sum() - target).abs();
        let change = (previous - deviation).abs();
        previous = deviation;

        let action = observer.observe(&Event {
            iter: iters,
            deviation,
            change,
        });

        if change < config.difference_tol() || deviation <= config.primary_tol() {
            break Status::Converged;
        }
        if matches!(action, Some(Action::StopEarly)) {
            break Status::StoppedByObserver;
        }
        if iters >= config.max_iters() {
            break Status::MaxIters;
        }
    };

    if status != Status::Converged {
        af.symmetrize();
        fixed = per_unit_area(&af, &inverse_areas);
    }

    let row_sum = fixed.sum();
    let fixed_deviation = (row_sum - target).abs();

    let keep_fixed = fixed_deviation < original_deviation
        || (status == Status::Converged && fixed_deviation < config.primary_tol());

    let status = if !keep_fixed && status == Status::Converged {
        Status::Incomplete
    } else {
        status
    };

    Ok(Solution {
        factors: if keep_fixed { fixed } else { factors.clone() },
        status,
        original_deviation,
        fixed_deviation,
        final_deviation: if keep_fixed {
            fixed_deviation
        } else {
            original_deviation
        },
        iters,
        row_sum,
        oversized,
        used_fixed: keep_fixed,
    })
}

/// Corrects approximate view factors without observer support.
///
/// This is a convenience wrapper around [`correct`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the config or the inputs are invalid.
pub fn correct_unobserved(
    areas: &[f64],
    factors: &DenseMatrix,
    config: &Config,
) -> Result<Solution, Error> {
    correct(areas, factors, config, ())
}

fn validate_inputs(areas: &[f64], factors: &DenseMatrix) -> Result<(), Error> {
    if areas.is_empty() {
        return Err(Error::Empty);
    }
    if factors.dim() != areas.len() {
        return Err(Error::DimensionMismatch {
            areas: areas.len(),
            factors: factors.dim(),
        });
    }
    if let Some((index, &area)) = areas
        .iter()
        .enumerate()
        .find(|(_, a)| !a.is_finite() || **a <= 0.0)
    {
        return Err(Error::InvalidArea { index, area });
    }
    Ok(())
}

/// Gives the largest surface a self view factor if it dominates the enclosure.
fn give_self_view_to_oversized(
    areas: &[f64],
    factors: &mut DenseMatrix,
    config: &Config,
) -> Option<usize> {
    let total: f64 = areas.iter().sum();
    let (largest, &area) = areas
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;

    if area <= config.oversized_fraction() * total {
        return None;
    }

    let self_view = config.oversized_gain() * area / total;
    factors[(largest, largest)] = config.oversized_cap().min(self_view);
    Some(largest)
}

/// Reciprocity-only result for enclosures too small to be closed.
#[allow(clippy::cast_precision_loss)]
fn non_enclosure(
    af: &DenseMatrix,
    inverse_areas: &[f64],
    original_deviation: f64,
    oversized: Option<usize>,
    config: &Config,
) -> Solution {
    let target = af.dim() as f64;
    let mut fixed = per_unit_area(af, inverse_areas);

    let mut row_sum = fixed.sum();
    if row_sum > target + config.non_enclosure_overflow() {
        // Some surface emits more than it has; cap the largest column at one.
        let largest = fixed
            .column_sums()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        fixed.scale(largest.recip());
        row_sum = fixed.sum();
    }

    let deviation = (row_sum - target).abs();
    Solution {
        factors: fixed,
        status: Status::NonEnclosure,
        original_deviation,
        fixed_deviation: deviation,
        final_deviation: deviation,
        iters: 0,
        row_sum,
        oversized,
        used_fixed: true,
    }
}

/// Divides each column of an area-weighted matrix by its surface area.
fn per_unit_area(af: &DenseMatrix, inverse_areas: &[f64]) -> DenseMatrix {
    let mut factors = af.clone();
    factors.scale_columns(inverse_areas);
    factors
}

/// Zeroes entries whose view factor is negligible in both matrices.
fn drop_negligible(af: &mut DenseMatrix, factors: &mut DenseMatrix, negligible: f64) {
    let n = factors.dim();
    for r in 0..n {
        for c in 0..n {
            if factors[(r, c)].abs() < negligible {
                factors[(r, c)] = 0.0;
                af[(r, c)] = 0.0;
            }
        }
    }
}
