//! Per-country maturity scores over the imputed matrix.
//!
//! `topic_score = 100 * mean(encoded values of the group's items) / 2`,
//! `overall = mean of the five topic scores`. A topic group with no items in
//! the matrix is a schema mismatch and fails the run; silently dropping it
//! would change what "overall" means.

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::matrix::ImputedMatrix;
use crate::taxonomy::MAX_ORDINAL;
use crate::topics::TopicGroup;

/// Score row for one country, topic scores in [`TopicGroup::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryScores {
    pub country: String,
    pub by_topic: [f64; 5],
    pub overall: f64,
}

impl CountryScores {
    pub fn topic(&self, topic: TopicGroup) -> f64 {
        let idx = TopicGroup::ALL.iter().position(|t| *t == topic).unwrap();
        self.by_topic[idx]
    }
}

/// Scores for every country in the matrix, in matrix row order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    pub rows: Vec<CountryScores>,
}

impl ScoreTable {
    pub fn get(&self, country: &str) -> Option<&CountryScores> {
        self.rows.iter().find(|r| r.country == country)
    }
}

/// Compute topic and overall scores for every country.
pub fn score_table(matrix: &ImputedMatrix) -> Result<ScoreTable> {
    // resolve group columns up front so a missing topic fails before any row
    // is scored
    let mut group_columns = Vec::with_capacity(TopicGroup::ALL.len());
    for topic in TopicGroup::ALL {
        let columns = matrix.columns_for(&topic.items());
        if columns.is_empty() {
            return Err(AnalysisError::MissingTopic(topic));
        }
        group_columns.push(columns);
    }

    let rows = (0..matrix.n_rows())
        .map(|row| {
            let mut by_topic = [0.0; 5];
            for (slot, columns) in by_topic.iter_mut().zip(&group_columns) {
                let sum: f64 = columns.iter().map(|&c| matrix.value(row, c)).sum();
                let mean = sum / columns.len() as f64;
                *slot = 100.0 * mean / MAX_ORDINAL;
            }
            let overall = by_topic.iter().sum::<f64>() / by_topic.len() as f64;
            CountryScores {
                country: matrix.countries[row].clone(),
                by_topic,
                overall,
            }
        })
        .collect();

    debug!("Scores computed - countries={}", matrix.n_rows());
    Ok(ScoreTable { rows })
}
