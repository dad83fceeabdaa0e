use hottel_core::DenseMatrix;

/// How the correction finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged,

    /// Converged, but the corrected matrix was no closer to complete than the
    /// original, so the original was kept.
    Incomplete,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,

    /// Three or fewer surfaces; only reciprocity was enforced.
    NonEnclosure,
}

/// The result of view-factor correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The view factors to use.
    pub factors: DenseMatrix,

    /// Final corrector status.
    pub status: Status,

    /// `|ΣF − N|` of the input matrix.
    pub original_deviation: f64,

    /// `|ΣF − N|` of the corrected matrix.
    pub fixed_deviation: f64,

    /// `|ΣF − N|` of [`Solution::factors`].
    pub final_deviation: f64,

    /// Fixed-point iterations performed.
    pub iters: usize,

    /// Sum of every entry of the corrected matrix.
    pub row_sum: f64,

    /// The surface given a self view factor, if one dominated the area.
    pub oversized: Option<usize>,

    /// Whether [`Solution::factors`] is the corrected matrix rather than the input.
    pub used_fixed: bool,
}
