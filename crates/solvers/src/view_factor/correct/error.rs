use super::ConfigError;

/// Errors that can occur during view-factor correction.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("no surfaces to correct")]
    Empty,

    #[error("view factor matrix is {factors}x{factors} but {areas} areas were given")]
    DimensionMismatch { areas: usize, factors: usize },

    #[error("surface {index} has invalid area {area}")]
    InvalidArea { index: usize, area: f64 },
}
