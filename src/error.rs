//! Error taxonomy for the analysis pipeline.
//!
//! Every variant is raised at the boundary of the component that detects it
//! and propagates to the caller unchanged - no stage substitutes a default
//! for a failed precondition.

use crate::topics::TopicGroup;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Required column or structure missing from the source table. Fatal to
    /// the run.
    #[error("input schema invalid: required column `{column}` not found (have: {found})")]
    Schema { column: String, found: String },

    /// The same (country, item) pair appears more than once in the source;
    /// the reshape is ambiguous and must not pick a winner.
    #[error("duplicate observation for country `{country}`, item `{item}`")]
    DuplicateKey { country: String, item: String },

    /// A topic group has no matching items in the matrix. Scores omitting a
    /// topic would silently change the meaning of the overall score.
    #[error("topic group `{0:?}` has no items in the data")]
    MissingTopic(TopicGroup),

    /// Not enough countries or variation for the clustering stage. Scoring
    /// may still proceed independently.
    #[error("degenerate clustering input: {0}")]
    DegenerateInput(String),

    /// Imputation post-condition violated. Indicates a bug upstream, never
    /// expected on valid input.
    #[error("imputation left a missing or non-finite cell for country `{country}`, item `{item}`")]
    NonFinite { country: String, item: String },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse input: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
