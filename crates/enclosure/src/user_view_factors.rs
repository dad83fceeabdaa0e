//! View factors supplied by the user instead of the geometric estimate.

use hottel_core::DenseMatrix;
use serde::{Deserialize, Serialize};

use crate::InputError;

/// User view factors for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserViewFactors {
    /// Name of the zone these factors apply to.
    pub zone: String,
    pub values: ViewFactorValues,
}

/// `(from, to, factor)` triples, each the fraction of radiation leaving
/// `from` that reaches `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewFactorValues {
    /// Surfaces identified by their 0-based position within the enclosure.
    ByIndex(Vec<(usize, usize, f64)>),

    /// Surfaces identified by name.
    ByName(Vec<(String, String, f64)>),
}

impl ViewFactorValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::ByIndex(values) => values.len(),
            Self::ByName(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserViewFactors {
    /// Builds the view-factor matrix for an enclosure with the given surface names.
    ///
    /// # Errors
    ///
    /// Returns every problem found: fewer than `N²` values, indices outside
    /// the enclosure, or names that match no surface in it.
    pub(crate) fn to_matrix(&self, surface_names: &[&str]) -> Result<DenseMatrix, Vec<InputError>> {
        let n = surface_names.len();
        let expected = n * n;
        if self.values.len() < expected {
            return Err(vec![InputError::TooFewValues {
                zone: self.zone.clone(),
                expected,
                actual: self.values.len(),
            }]);
        }

        let mut factors = DenseMatrix::zeros(n);
        let mut errors = Vec::new();

        match &self.values {
            ViewFactorValues::ByIndex(values) => {
                for &(from, to, value) in values {
                    match [from, to].into_iter().find(|&index| index >= n) {
                        Some(index) => errors.push(InputError::IndexOutOfRange {
                            zone: self.zone.clone(),
                            index,
                            count: n,
                        }),
                        None => factors[(to, from)] = value,
                    }
                }
            }
            ViewFactorValues::ByName(values) => {
                let position =
                    |name: &str| surface_names.iter().position(|candidate| *candidate == name);
                for (from, to, value) in values {
                    let mut lookup = |name: &String| {
                        let found = position(name.as_str());
                        if found.is_none() {
                            errors.push(InputError::UnknownSurface {
                                zone: self.zone.clone(),
                                name: name.clone(),
                            });
                        }
                        found
                    };
                    if let (Some(from), Some(to)) = (lookup(from), lookup(to)) {
                        factors[(to, from)] = *value;
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(factors)
        } else {
            Err(errors)
        }
    }
}
