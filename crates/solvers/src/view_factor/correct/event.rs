/// Progress of one fixed-point iteration of the corrector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// One-based iteration number.
    pub iter: usize,

    /// Deviation `|ΣF − N|` after this iteration.
    pub deviation: f64,

    /// Absolute change in deviation from the previous iteration.
    pub change: f64,
}
