//! edna-id library interface
//!
//! Result normalization, novelty classification, differential detection and
//! similarity ranking for environmental-DNA species predictions.
//!
//! The prediction service, file upload, rendering and export formatting are
//! external collaborators: this crate receives already-deserialized JSON and
//! returns plain values.

pub mod curation;
pub mod engine;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod types;

pub use crate::engine::{
    aggregate, bottom_different, classify, detect_new, normalize, normalize_payload,
    suggest_neighbours, top_similar, Novelty, NoveltyClassifier, NoveltySummary, RankedRecord,
};
pub use crate::error::{CurationError, NormalizeError};
pub use crate::types::{NormalizedPayload, PayloadShape, RunMetrics, SpeciesRecord};
pub use edna_common::{NoveltyThreshold, NOVELTY_THRESHOLD};
