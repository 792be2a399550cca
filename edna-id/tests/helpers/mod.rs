//! Test Helper Utilities
//!
//! Shared fixtures for edna-id integration tests

#![allow(dead_code)]

pub mod log_capture;

use edna_id::types::SpeciesRecord;
use serde_json::{json, Value};

pub use log_capture::{capture_logs, LogCapture};

/// Record with id, name and confidence only
pub fn record(id: &str, name: &str, confidence: f64) -> SpeciesRecord {
    SpeciesRecord::new(id, name, confidence)
}

/// Flat (Shape A) payload as produced by the /analyze endpoint
pub fn flat_payload() -> Value {
    json!([
        {"sequence_id": "seq1", "sequence": "ATGCGTACGTAGCTAGCTAG",
         "predicted_species": "Salmo trutta", "confidence": 0.91, "source": "sandipan_local"},
        {"sequence_id": "seq2", "sequence": "TTGACGATCGATCGATGCAA",
         "predicted_species": "Unknown", "confidence": 0.0, "source": "none"},
        {"id": "seq3", "label": "Esox lucius", "score": 0.62},
        {"name": "Perca fluviatilis", "match": 0.38}
    ])
}

/// Nested (Shape B) payload with metrics
pub fn nested_payload() -> Value {
    json!({
        "species": [
            {"id": "sp1", "name": "Salmo trutta", "confidence": 0.88},
            {"sequence_id": "sp2", "predicted_species": "Unknown species A", "score": 0.25},
            {"label": "Esox lucius"}
        ],
        "metrics": {"totalReads": 15230, "totalSpecies": 3}
    })
}
