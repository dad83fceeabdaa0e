//! Direct view factors between the surfaces of an enclosure.

pub mod correct;
pub mod estimate;

pub use estimate::{Estimate, EstimateSurface, SurfaceKind, estimate};
