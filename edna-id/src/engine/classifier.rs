//! Novelty Classifier
//!
//! Labels records as known or novel against a single threshold and derives
//! run-level aggregates for the dashboards.
//!
//! The threshold boundary is inclusive on the known side: a record at exactly
//! the threshold is known.

use crate::types::{Confidence, SpeciesRecord};
use edna_common::NoveltyThreshold;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Novelty label for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Novelty {
    /// Confidence at or above threshold
    Known,
    /// Confidence below threshold (candidate undocumented species)
    Novel,
}

impl Novelty {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Novelty::Known => "known",
            Novelty::Novel => "novel",
        }
    }
}

impl std::fmt::Display for Novelty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-level aggregate over a list of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoveltySummary {
    pub total: usize,
    pub known_count: usize,
    pub novel_count: usize,
    /// Rounded percentage of known records (0 for an empty list)
    pub familiarity_pct: u32,
    /// Rounded percentage of novel records (0 for an empty list)
    pub novelty_pct: u32,
    /// Distinct names, case-sensitive exact match
    pub unique_species_count: usize,
}

/// Threshold-based classifier
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoveltyClassifier {
    threshold: NoveltyThreshold,
}

impl NoveltyClassifier {
    pub fn new(threshold: NoveltyThreshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> NoveltyThreshold {
        self.threshold
    }

    /// Label a bare confidence value
    pub fn classify_confidence(&self, confidence: Confidence) -> Novelty {
        if confidence >= self.threshold.value() {
            Novelty::Known
        } else {
            Novelty::Novel
        }
    }

    pub fn classify(&self, record: &SpeciesRecord) -> Novelty {
        self.classify_confidence(record.confidence)
    }

    /// Compute totals, percentages and distinct species count
    ///
    /// An empty list is valid and yields all-zero aggregates.
    pub fn aggregate(&self, records: &[SpeciesRecord]) -> NoveltySummary {
        let total = records.len();
        let known_count = records
            .iter()
            .filter(|r| self.classify(r) == Novelty::Known)
            .count();
        let novel_count = total - known_count;

        let unique_species_count = records
            .iter()
            .map(|r| r.name.as_str())
            .collect::<HashSet<_>>()
            .len();

        NoveltySummary {
            total,
            known_count,
            novel_count,
            familiarity_pct: percent(known_count, total),
            novelty_pct: percent(novel_count, total),
            unique_species_count,
        }
    }

    /// Split records into (known, novel), each preserving input order
    pub fn partition<'a>(
        &self,
        records: &'a [SpeciesRecord],
    ) -> (Vec<&'a SpeciesRecord>, Vec<&'a SpeciesRecord>) {
        records
            .iter()
            .partition(|r| self.classify(r) == Novelty::Known)
    }
}

/// Classify with the default 0.40 threshold
pub fn classify(record: &SpeciesRecord) -> Novelty {
    NoveltyClassifier::default().classify(record)
}

/// Aggregate with the default 0.40 threshold
pub fn aggregate(records: &[SpeciesRecord]) -> NoveltySummary {
    NoveltyClassifier::default().aggregate(records)
}

/// Round-half-up percentage; 0 when `total` is 0
fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = count as f64 / total as f64 * 100.0;
    (ratio + 0.5).floor() as u32
}
