//! Runtime parameters shared by the identification engine
//!
//! Every threshold-consuming component receives these values explicitly.
//! The constants below are the compiled defaults; callers override them
//! through [`crate::config::ResolvedConfig`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default novelty threshold (40% confidence)
///
/// A prediction with confidence at or above this value is "known";
/// anything below it is a candidate for an undocumented species.
pub const NOVELTY_THRESHOLD: f64 = 0.40;

/// Default number of neighbours returned by similarity ranking
pub const DEFAULT_NEIGHBOUR_COUNT: usize = 3;

/// Validated novelty threshold
///
/// Valid range: [0.0, 1.0], finite.
/// Default: 0.40
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct NoveltyThreshold(f64);

impl NoveltyThreshold {
    /// Threshold used everywhere novelty is rendered unless overridden
    pub const DEFAULT: NoveltyThreshold = NoveltyThreshold(NOVELTY_THRESHOLD);

    /// Create a threshold, rejecting NaN, infinities and values outside [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(Error::InvalidInput(format!(
                "novelty threshold must be a finite value in [0.0, 1.0], got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Raw threshold value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for NoveltyThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for NoveltyThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for NoveltyThreshold {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<NoveltyThreshold> for f64 {
    fn from(threshold: NoveltyThreshold) -> f64 {
        threshold.0
    }
}

/// Validate a neighbour count (must be at least 1)
pub fn validate_neighbour_count(count: usize) -> Result<usize> {
    if count == 0 {
        return Err(Error::InvalidInput(
            "neighbour count must be at least 1".to_string(),
        ));
    }
    Ok(count)
}
