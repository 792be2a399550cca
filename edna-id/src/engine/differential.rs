//! Differential Detector
//!
//! Compares the current run against the immediately preceding run by species
//! name. The previous list is read-only input owned by the caller.

use crate::types::SpeciesRecord;
use std::collections::HashSet;
use tracing::debug;

/// Records in `current` whose name never appears in `previous`
///
/// Order follows `current`. Repeated new names are all returned, one per
/// sequence-level prediction. Against an empty `previous`, everything is new.
pub fn detect_new(current: &[SpeciesRecord], previous: &[SpeciesRecord]) -> Vec<SpeciesRecord> {
    let seen: HashSet<&str> = previous.iter().map(|r| r.name.as_str()).collect();

    let new_records: Vec<SpeciesRecord> = current
        .iter()
        .filter(|r| !seen.contains(r.name.as_str()))
        .cloned()
        .collect();

    debug!(
        "Differential: {} of {} records new against {} previous names",
        new_records.len(),
        current.len(),
        seen.len()
    );

    new_records
}

/// Distinct newly observed names in first-seen order
pub fn new_species_names(current: &[SpeciesRecord], previous: &[SpeciesRecord]) -> Vec<String> {
    let mut emitted = HashSet::new();
    detect_new(current, previous)
        .into_iter()
        .filter_map(|r| emitted.insert(r.name.clone()).then_some(r.name))
        .collect()
}
