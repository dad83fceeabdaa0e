//! Interior long-wave radiant exchange for the zones of a building.
//!
//! Each zone's heat transfer surfaces form an [`Enclosure`]. The
//! [`Registry`] builds every enclosure once: it estimates or reads view
//! factors, corrects them, and seeds the script-F exchange matrix. The
//! [`RadiantExchange`] engine then runs every heat-balance iteration,
//! re-solving script-F when window shading or movable insulation changes the
//! surface emissivities, and turns surface temperatures into net radiant
//! heat flow per surface.
//!
//! ```text
//! Building ──► Registry::build ──► Enclosure (per zone)
//!                                      │
//! SurfaceState + StepContext ──► RadiantExchange::calculate ──► ExchangeOutput
//! ```

mod building;
mod config;
mod enclosure;
mod error;
mod exchange;
mod rebuild;
mod registry;
mod report;
mod state;
mod user_view_factors;

#[cfg(test)]
pub(crate) mod test_utils;

pub use building::{
    Building, Construction, ConstructionKind, MovableInsulation, Surface, SurfaceClass,
    WindowKind, Zone,
};
pub use config::{ConfigError, ExchangeConfig};
pub use enclosure::{Enclosure, EnclosureSurface};
pub use error::{BuildError, ExchangeError, InputError};
pub use exchange::{Counters, ExchangeOutput, RadiantExchange, Scope};
pub use rebuild::{effective_emissivities, enclosure_requires_rebuild};
pub use registry::Registry;
pub use report::{CheckValues, EnclosureReport, FactorSource, Report, ReportSurface};
pub use state::{InsulationState, Shading, SlatTable, StepContext, SurfaceState, WindowState};
pub use user_view_factors::{UserViewFactors, ViewFactorValues};
