//! Numerical routines for grey-body radiant exchange in an enclosure.
//!
//! - [`view_factor::estimate`] approximates direct view factors from surface
//!   orientation alone
//! - [`view_factor::correct`] enforces reciprocity and completeness on an
//!   approximate view-factor matrix
//! - [`script_f`] turns corrected view factors and emissivities into the
//!   grey-body exchange matrix
//!
//! All matrices use the same layout: entry `[(j, i)]` describes radiation
//! leaving surface `i` (the column) and arriving at surface `j` (the row).

pub mod script_f;
pub mod view_factor;
