//! Analysis snapshots and caller-side run history
//!
//! The engine never stores snapshots. These types belong to the caller: they
//! hold the current run and exactly one previous run, and hand both to the
//! pure engine functions as plain slices.

use crate::engine::{detect_new, Novelty, NoveltyClassifier, NoveltySummary};
use crate::types::{NormalizedPayload, RunMetrics, SpeciesRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// One analysis run's full ordered record list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub analysis_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub records: Vec<SpeciesRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<RunMetrics>,
}

impl AnalysisSnapshot {
    /// Fresh snapshot for a newly normalized payload
    pub fn from_payload(payload: NormalizedPayload, file_name: Option<String>) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            created_at: Utc::now(),
            file_name,
            records: payload.records,
            metrics: payload.metrics,
        }
    }
}

/// Current run plus exactly one prior run
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    current: Option<AnalysisSnapshot>,
    previous: Option<AnalysisSnapshot>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a persisted run; the next `record` makes it the previous run
    pub fn resume(last: AnalysisSnapshot) -> Self {
        Self {
            current: Some(last),
            previous: None,
        }
    }

    /// Supersede the current run; the old current becomes previous and the
    /// old previous is dropped
    pub fn record(&mut self, snapshot: AnalysisSnapshot) {
        info!(
            "Recording analysis {} ({} records)",
            snapshot.analysis_id,
            snapshot.records.len()
        );
        self.previous = self.current.replace(snapshot);
    }

    pub fn current(&self) -> Option<&AnalysisSnapshot> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&AnalysisSnapshot> {
        self.previous.as_ref()
    }

    /// Records in the current run whose species were absent from the previous
    /// run (all records on the first run)
    pub fn newly_observed(&self) -> Vec<SpeciesRecord> {
        let Some(current) = &self.current else {
            return Vec::new();
        };
        let previous = self
            .previous
            .as_ref()
            .map(|s| s.records.as_slice())
            .unwrap_or(&[]);
        detect_new(&current.records, previous)
    }
}

/// Novelty label attached to one record for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    #[serde(flatten)]
    pub record: SpeciesRecord,
    pub novelty: Novelty,
}

/// Everything the dashboards render for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_analysis_id: Option<Uuid>,
    pub threshold: f64,
    pub summary: NoveltySummary,
    pub records: Vec<LabeledRecord>,
    pub newly_observed: Vec<SpeciesRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<RunMetrics>,
}

impl AnalysisReport {
    /// Build the report for the history's current run
    ///
    /// Returns `None` before any run has been recorded.
    pub fn from_history(history: &SnapshotHistory, classifier: &NoveltyClassifier) -> Option<Self> {
        let current = history.current()?;

        let records = current
            .records
            .iter()
            .map(|r| LabeledRecord {
                record: r.clone(),
                novelty: classifier.classify(r),
            })
            .collect();

        Some(Self {
            analysis_id: current.analysis_id,
            previous_analysis_id: history.previous().map(|s| s.analysis_id),
            threshold: classifier.threshold().value(),
            summary: classifier.aggregate(&current.records),
            records,
            newly_observed: history.newly_observed(),
            metrics: current.metrics.clone(),
        })
    }
}
