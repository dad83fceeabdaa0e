use hottel_solvers::{script_f, view_factor::correct};
use thiserror::Error;

use crate::ConfigError;

/// Problems in user view-factor input.
///
/// The registry collects these across all zones before failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("user view factors refer to unknown zone \"{zone}\"")]
    UnknownZone { zone: String },

    #[error("zone \"{zone}\" needs {expected} user view factors but {actual} were given")]
    TooFewValues {
        zone: String,
        expected: usize,
        actual: usize,
    },

    #[error("zone \"{zone}\" has no heat transfer surface named \"{name}\"")]
    UnknownSurface { zone: String, name: String },

    #[error("zone \"{zone}\" user view factor index {index} is out of range for {count} surfaces")]
    IndexOutOfRange {
        zone: String,
        index: usize,
        count: usize,
    },
}

/// Errors that prevent the enclosure registry from being built.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("zone \"{zone}\" surface range {start}..{end} is outside the {total} building surfaces")]
    RangeOutOfBounds {
        zone: String,
        start: usize,
        end: usize,
        total: usize,
    },

    #[error("zone \"{zone}\" surface range overlaps or precedes the previous zone's range")]
    RangeOverlap { zone: String },

    #[error("zone \"{zone}\" has no heat transfer surfaces")]
    NoSurfaces { zone: String },

    #[error("surface \"{surface}\" refers to unknown construction {construction}")]
    UnknownConstruction { surface: String, construction: usize },

    #[error("view factor correction failed in zone \"{zone}\"")]
    Correct {
        zone: String,
        #[source]
        source: correct::Error,
    },

    #[error("script F calculation failed in zone \"{zone}\"")]
    ScriptF {
        zone: String,
        #[source]
        source: script_f::Error,
    },

    #[error("{} user view factor input error(s)", .0.len())]
    Input(Vec<InputError>),
}

/// Errors that can occur while calculating interior radiant exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("enclosure registry could not be built")]
    Build(#[from] BuildError),

    #[error("expected {expected} surface states but got {actual}")]
    StateCount { expected: usize, actual: usize },

    #[error("output holds {actual} surfaces but the building has {expected}")]
    OutputSize { expected: usize, actual: usize },

    #[error("zone index {zone} is out of range for {count} zones")]
    UnknownZone { zone: usize, count: usize },

    #[error("script F calculation failed in zone \"{zone}\"")]
    ScriptF {
        zone: String,
        #[source]
        source: script_f::Error,
    },
}
