/// Actions an observer can take during view-factor correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop iterating and keep the better of the original and corrected matrices.
    StopEarly,
}
