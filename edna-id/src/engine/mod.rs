// Engine Module - Result normalization, novelty, differential and ranking
//
// Flow: normalizer (once per response) -> classifier + differential (in parallel)
//       ranker runs on demand when a curator selects a record
//
// All functions are pure over immutable inputs; the caller owns any
// "previous run" state.

pub mod classifier;
pub mod differential;
pub mod normalizer;
pub mod ranker;

pub use classifier::{aggregate, classify, Novelty, NoveltyClassifier, NoveltySummary};
pub use differential::{detect_new, new_species_names};
pub use normalizer::{normalize, normalize_payload, RawPayload};
pub use ranker::{
    bottom_different, suggest_neighbours, top_similar, CurationSuggestions, RankedRecord,
};
