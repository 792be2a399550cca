//! # EDNA Common Library
//!
//! Shared code for the EDNA species-identification crates:
//! - Error and result types
//! - Configuration loading (TOML, environment, compiled defaults)
//! - Runtime parameters (novelty threshold, neighbour count)

pub mod config;
pub mod error;
pub mod params;

pub use error::{Error, Result};
pub use params::{NoveltyThreshold, NOVELTY_THRESHOLD};
