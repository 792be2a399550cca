//! Similarity Ranker
//!
//! Suggests taxonomic neighbours for a curator-selected record.
//!
//! "Similar" is approximated by confidence magnitude only, not by taxonomic
//! distance. It is a sorting aid for human curation, not a biological
//! similarity measure.

use crate::types::{Confidence, SpeciesRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Name/confidence pair returned by ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub name: String,
    pub confidence: Confidence,
}

impl From<&SpeciesRecord> for RankedRecord {
    fn from(record: &SpeciesRecord) -> Self {
        Self {
            name: record.name.clone(),
            confidence: record.confidence,
        }
    }
}

/// Both neighbour lists for one target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurationSuggestions {
    /// Most confident other records, descending
    pub similar: Vec<RankedRecord>,
    /// Least confident other records, ascending
    pub different: Vec<RankedRecord>,
}

/// Up to `n` other records with the highest confidence
pub fn top_similar(target: &SpeciesRecord, all: &[SpeciesRecord], n: usize) -> Vec<RankedRecord> {
    let mut others = others_of(target, all);
    // sort_by is stable: equal confidences keep their order from `all`
    others.sort_by(|a, b| by_confidence(b, a));
    take_ranked(others, n)
}

/// Up to `n` other records with the lowest confidence
pub fn bottom_different(
    target: &SpeciesRecord,
    all: &[SpeciesRecord],
    n: usize,
) -> Vec<RankedRecord> {
    let mut others = others_of(target, all);
    others.sort_by(|a, b| by_confidence(a, b));
    take_ranked(others, n)
}

/// Similar and different neighbours in one call
pub fn suggest_neighbours(
    target: &SpeciesRecord,
    all: &[SpeciesRecord],
    n: usize,
) -> CurationSuggestions {
    CurationSuggestions {
        similar: top_similar(target, all, n),
        different: bottom_different(target, all, n),
    }
}

/// Numeric comparison, so -0.0 and 0.0 tie (confidences are always finite)
fn by_confidence(a: &SpeciesRecord, b: &SpeciesRecord) -> Ordering {
    a.confidence
        .partial_cmp(&b.confidence)
        .unwrap_or(Ordering::Equal)
}

fn others_of<'a>(target: &SpeciesRecord, all: &'a [SpeciesRecord]) -> Vec<&'a SpeciesRecord> {
    let key = target.identity_key();
    all.iter().filter(|r| r.identity_key() != key).collect()
}

fn take_ranked(sorted: Vec<&SpeciesRecord>, n: usize) -> Vec<RankedRecord> {
    sorted.into_iter().take(n).map(RankedRecord::from).collect()
}
