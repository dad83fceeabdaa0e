//! Core types for grey-body radiant exchange in building enclosures.
//!
//! This crate holds the pieces shared by the solvers and the enclosure driver:
//!
//! - [`DenseMatrix`]: a square matrix with the scaling, symmetrizing, and
//!   inversion operations the view-factor and script-F algorithms need
//! - [`Observer`]: receives iteration events and optionally returns control actions
//! - [`radiation`]: the Stefan-Boltzmann constant, the emissivity limit, and
//!   temperature helpers

mod matrix;
mod observer;

pub mod radiation;

pub use matrix::{DenseMatrix, MatrixError};
pub use observer::Observer;
