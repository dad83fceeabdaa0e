//! Orientation-based approximation of direct view factors.
//!
//! Without real geometry, the estimator assumes that a surface sees every
//! other surface that faces a different direction, distributing its outgoing
//! radiation in proportion to the areas it can see. A few surface kinds are
//! special-cased:
//!
//! - internal mass is seen by everything
//! - floors are seen by everything except other floors
//! - roofs and ceilings are seen by everything
//!
//! Two surfaces face the same direction when both their azimuths and their
//! tilts differ by no more than the same-angle limit.

use hottel_core::DenseMatrix;
use uom::si::{angle::degree, f64::Angle};

/// Surface classification used by the visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceKind {
    Floor,
    Roof,
    Ceiling,
    InternalMass,
    Other,
}

/// The geometry the estimator needs for one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateSurface {
    /// Radiating area in m².
    pub area: f64,
    pub azimuth: Angle,
    pub tilt: Angle,
    pub kind: SurfaceKind,
}

/// Approximate view factors and the surfaces that see nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Entry `[(j, i)]` is the fraction of radiation leaving `i` that reaches `j`.
    pub factors: DenseMatrix,

    /// Indices of surfaces with no visible area; their columns are all zero.
    pub unseen: Vec<usize>,
}

/// Default limit below which two orientations count as the same direction.
#[must_use]
pub fn default_same_angle_limit() -> Angle {
    Angle::new::<degree>(10.0)
}

/// Estimates direct view factors from surface orientation.
///
/// Every column with visible area sums to exactly one.
#[must_use]
pub fn estimate(surfaces: &[EstimateSurface], same_angle_limit: Angle) -> Estimate {
    let n = surfaces.len();
    let limit = same_angle_limit.get::<degree>();

    let mut factors = DenseMatrix::zeros(n);
    let mut unseen = Vec::new();

    for (i, viewer) in surfaces.iter().enumerate() {
        let visible: Vec<usize> = (0..n)
            .filter(|&j| j != i && sees(viewer, &surfaces[j], limit))
            .collect();

        let visible_area: f64 = visible.iter().map(|&j| surfaces[j].area).sum();
        if visible_area <= 0.0 {
            unseen.push(i);
            continue;
        }

        for j in visible {
            factors[(j, i)] = surfaces[j].area / visible_area;
        }
    }

    Estimate { factors, unseen }
}

/// Returns `true` if `viewer` is assumed to see `target`.
fn sees(viewer: &EstimateSurface, target: &EstimateSurface, limit: f64) -> bool {
    match target.kind {
        SurfaceKind::InternalMass | SurfaceKind::Roof | SurfaceKind::Ceiling => true,
        SurfaceKind::Floor if viewer.kind != SurfaceKind::Floor => true,
        _ => {
            let azimuth = (viewer.azimuth - target.azimuth).get::<degree>().abs();
            let tilt = (viewer.tilt - target.tilt).get::<degree>().abs();
            azimuth > limit || tilt > limit
        }
    }
}
