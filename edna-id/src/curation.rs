//! Curation workflow: species correction proposals and familiarity feedback
//!
//! A curator who disagrees with a prediction files a [`Proposal`] to rename
//! it. Proposals start pending and are decided exactly once.

use crate::engine::NoveltySummary;
use crate::error::CurationError;
use crate::types::SpeciesRecord;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Proposal lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
        }
    }
}

/// Request to relabel one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposal_id: Uuid,
    pub analysis_id: Uuid,
    /// Record as it was when the proposal was filed
    pub from: SpeciesRecord,
    /// Proposed species name
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    pub status: ProposalStatus,
}

impl Proposal {
    /// File a new pending proposal
    ///
    /// # Errors
    /// `EmptyTarget` when `to` is blank.
    pub fn new(
        analysis_id: Uuid,
        from: SpeciesRecord,
        to: impl Into<String>,
        reason: Option<String>,
        by: Option<String>,
    ) -> Result<Self, CurationError> {
        let to = to.into();
        if to.trim().is_empty() {
            return Err(CurationError::EmptyTarget);
        }

        Ok(Self {
            proposal_id: Uuid::new_v4(),
            analysis_id,
            from,
            to,
            reason,
            by,
            status: ProposalStatus::Pending,
        })
    }

    pub fn accept(&mut self) -> Result<(), CurationError> {
        self.decide(ProposalStatus::Accepted)
    }

    pub fn reject(&mut self) -> Result<(), CurationError> {
        self.decide(ProposalStatus::Rejected)
    }

    /// The record with the proposed name applied
    ///
    /// Only meaningful once accepted; returns `None` otherwise.
    pub fn applied(&self) -> Option<SpeciesRecord> {
        (self.status == ProposalStatus::Accepted).then(|| SpeciesRecord {
            name: self.to.clone(),
            ..self.from.clone()
        })
    }

    fn decide(&mut self, status: ProposalStatus) -> Result<(), CurationError> {
        if self.status != ProposalStatus::Pending {
            return Err(CurationError::AlreadyDecided {
                proposal_id: self.proposal_id.to_string(),
                status: self.status.as_str().to_string(),
            });
        }

        info!(
            "Proposal {} ({} -> {}) {}",
            self.proposal_id,
            self.from.name,
            self.to,
            status.as_str()
        );
        self.status = status;
        Ok(())
    }
}

/// Reviewer feedback on one analysis, carrying its familiarity split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackComment {
    pub analysis_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
    pub familiarity_pct: u32,
    pub unfamiliarity_pct: u32,
}

impl FeedbackComment {
    /// Empty comment with percentages taken from the run summary
    pub fn for_summary(analysis_id: Uuid, summary: &NoveltySummary) -> Self {
        Self {
            analysis_id,
            author_name: None,
            job: None,
            goal: None,
            comment_text: None,
            familiarity_pct: summary.familiarity_pct,
            unfamiliarity_pct: summary.novelty_pct,
        }
    }
}

/// Apply accepted proposals to a record list, matching by id
///
/// Pending and rejected proposals are ignored. Input order is preserved.
pub fn apply_accepted(records: &[SpeciesRecord], proposals: &[Proposal]) -> Vec<SpeciesRecord> {
    records
        .iter()
        .map(|record| {
            proposals
                .iter()
                .filter(|p| p.from.id == record.id)
                .filter_map(Proposal::applied)
                .last()
                .map(|applied| SpeciesRecord {
                    name: applied.name,
                    ..record.clone()
                })
                .unwrap_or_else(|| record.clone())
        })
        .collect()
}
