//! Canonical domain types
//!
//! Every accepted prediction-service payload reduces to a list of
//! [`SpeciesRecord`] values. Nothing downstream sees raw JSON.

use serde::{Deserialize, Serialize};

/// Source confidence score, nominally 0.0-1.0
///
/// Always finite after normalization. Values above 1.0 are legal
/// (upstream occasionally sends percentages) and are not clamped.
pub type Confidence = f64;

/// Species name used when the payload provides none
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// Provenance tag used for flat-array records without a `source`
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One normalized prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    /// Stable identifier, never empty
    pub id: String,

    /// Species label, `"Unknown"` when absent
    pub name: String,

    pub confidence: Confidence,

    /// Raw sequence text (empty string for flat records without one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,

    /// Provenance tag; absent for nested-shape records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SpeciesRecord {
    /// Minimal record with only identity, name and confidence
    pub fn new(id: impl Into<String>, name: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            confidence,
            sequence: None,
            source: None,
        }
    }

    /// Key used to recognise "the same record" during curation:
    /// `id` when present, otherwise `name`
    pub fn identity_key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// Run-level metrics carried alongside the nested payload shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reads: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_species: Option<u64>,
}

/// Which accepted payload shape a response used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// Top-level array of prediction objects
    Flat,
    /// Object with a `species` array and optional `metrics`
    Nested,
}

impl std::fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadShape::Flat => write!(f, "flat"),
            PayloadShape::Nested => write!(f, "nested"),
        }
    }
}

/// Normalizer output including shape and metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPayload {
    pub shape: PayloadShape,
    pub records: Vec<SpeciesRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<RunMetrics>,
}
