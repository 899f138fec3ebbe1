//! # aira-readiness
//!
//! Batch analysis of the WHO/Europe AIRA survey (country-level categorical
//! responses on AI readiness for health). One run loads the long-form table,
//! pivots it to a country x item matrix, ordinal-encodes and imputes it,
//! computes 0-100 maturity scores per thematic topic, selects a cluster
//! count by silhouette sweep over seeded k-means fits, classifies each
//! cluster into one of seven maturity typologies, and exports the tables the
//! display layer consumes.
//!
//! The pipeline is deterministic by construction: identical input and seed
//! reproduce identical scores and an identical (canonically labeled)
//! partition.

pub mod countries;
pub mod error;
pub mod export;
pub mod kmeans;
pub mod loader;
pub mod matrix;
pub mod pipeline;
pub mod profiles;
pub mod report;
pub mod scores;
pub mod select;
pub mod summary;
pub mod taxonomy;
pub mod topics;

pub use error::AnalysisError;
pub use pipeline::{run, RunConfig, RunOutcome};
