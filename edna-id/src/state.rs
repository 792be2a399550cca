//! Persistence of the last analysis snapshot for the CLI
//!
//! Only the command-line caller uses this; the engine stays free of I/O.

use crate::snapshot::AnalysisSnapshot;
use edna_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the persisted previous snapshot inside the state directory
pub const LAST_SNAPSHOT_FILE: &str = "last_snapshot.json";

/// Reads and writes the single retained snapshot
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(LAST_SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last snapshot, `None` on first run
    pub fn load(&self) -> Result<Option<AnalysisSnapshot>> {
        if !self.path.exists() {
            debug!("No previous snapshot at {}", self.path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let snapshot: AnalysisSnapshot = serde_json::from_str(&content)?;
        debug!(
            "Loaded previous snapshot {} ({} records)",
            snapshot.analysis_id,
            snapshot.records.len()
        );
        Ok(Some(snapshot))
    }

    /// Replace the stored snapshot atomically (temp file + rename)
    pub fn save(&self, snapshot: &AnalysisSnapshot) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Config(format!("Invalid state path {}", self.path.display())))?;
        std::fs::create_dir_all(parent)?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serde_json::to_vec_pretty(snapshot)?)?;
        std::fs::rename(&temp_path, &self.path)?;

        info!(
            "Stored snapshot {} at {}",
            snapshot.analysis_id,
            self.path.display()
        );
        Ok(())
    }
}
