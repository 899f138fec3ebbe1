//! Long-to-wide reshape, ordinal encoding and median imputation.
//!
//! Three matrix stages, each row-major over the same (country, item) axes:
//! raw categories -> encoded-with-gaps -> fully imputed. Row order is the
//! sorted country codes, column order the numeric item order; both are stable
//! within a run.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::loader::Observation;
use crate::taxonomy::ResponseCategory;
use crate::topics::item_order_key;

/// Country x item grid of raw response symbols.
#[derive(Debug, Clone)]
pub struct CountryMatrix {
    pub countries: Vec<String>,
    pub items: Vec<String>,
    cells: Vec<Option<String>>,
}

impl CountryMatrix {
    /// Pivot the long-form table. Fails on duplicate (country, item) pairs:
    /// the reshape is ambiguous and must not silently pick a winner.
    pub fn pivot(observations: &[Observation]) -> Result<Self> {
        let countries: Vec<String> = observations
            .iter()
            .map(|o| o.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut items: Vec<String> = observations
            .iter()
            .map(|o| o.item.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        items.sort_by_key(|i| item_order_key(i));

        let country_idx: BTreeMap<&str, usize> = countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let item_idx: BTreeMap<&str, usize> = items
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();

        let mut cells: Vec<Option<String>> = vec![None; countries.len() * items.len()];
        for obs in observations {
            let r = country_idx[obs.country.as_str()];
            let c = item_idx[obs.item.as_str()];
            let slot = &mut cells[r * items.len() + c];
            if slot.is_some() {
                return Err(AnalysisError::DuplicateKey {
                    country: obs.country.clone(),
                    item: obs.item.clone(),
                });
            }
            *slot = Some(obs.response.clone());
        }

        debug!(
            "Pivot complete - countries={}, items={}",
            countries.len(),
            items.len()
        );
        Ok(Self {
            countries,
            items,
            cells,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.countries.len()
    }

    pub fn n_cols(&self) -> usize {
        self.items.len()
    }

    /// Raw symbol at (row, col); `None` when the pair was absent from the
    /// source.
    pub fn raw(&self, row: usize, col: usize) -> Option<&str> {
        self.cells[row * self.items.len() + col].as_deref()
    }

    /// Ordinal-encode every cell. Symbols outside the fixed taxonomy become
    /// missing, never a default.
    pub fn encode(&self) -> EncodedMatrix {
        let values = self
            .cells
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .and_then(ResponseCategory::from_symbol)
                    .map(|cat| cat.ordinal())
            })
            .collect();
        EncodedMatrix {
            countries: self.countries.clone(),
            items: self.items.clone(),
            values,
        }
    }
}

/// Encoded matrix before imputation; gaps are unrecognized symbols or absent
/// pairs.
#[derive(Debug, Clone)]
pub struct EncodedMatrix {
    pub countries: Vec<String>,
    pub items: Vec<String>,
    values: Vec<Option<f64>>,
}

impl EncodedMatrix {
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row * self.items.len() + col]
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Fill gaps with the column median; a column with no observed values
    /// falls back to 0. The no-gaps-no-NaN post-condition is enforced, not
    /// assumed.
    pub fn impute(&self) -> Result<ImputedMatrix> {
        let n_cols = self.items.len();
        let mut filled: Vec<f64> = Vec::with_capacity(self.values.len());
        let mut fallback_cols = 0usize;

        let mut medians = Vec::with_capacity(n_cols);
        for col in 0..n_cols {
            let mut observed: Vec<f64> = (0..self.countries.len())
                .filter_map(|row| self.value(row, col))
                .collect();
            if observed.is_empty() {
                fallback_cols += 1;
                medians.push(0.0);
            } else {
                observed.sort_by(|a, b| a.total_cmp(b));
                medians.push(median_of_sorted(&observed));
            }
        }

        for row in 0..self.countries.len() {
            for col in 0..n_cols {
                filled.push(self.value(row, col).unwrap_or(medians[col]));
            }
        }

        let matrix = ImputedMatrix {
            countries: self.countries.clone(),
            items: self.items.clone(),
            values: filled,
        };
        matrix.assert_total()?;

        let imputed = self.missing_count();
        if imputed > 0 {
            info!(
                "Imputation complete - filled={} cells, empty_columns={}",
                imputed, fallback_cols
            );
        } else {
            debug!("Imputation complete - no missing cells");
        }
        Ok(matrix)
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Fully imputed numeric matrix: the single input of both the score
/// aggregator and the cluster selector. Immutable snapshot for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedMatrix {
    pub countries: Vec<String>,
    pub items: Vec<String>,
    values: Vec<f64>,
}

impl ImputedMatrix {
    pub fn n_rows(&self) -> usize {
        self.countries.len()
    }

    pub fn n_cols(&self) -> usize {
        self.items.len()
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let w = self.items.len();
        &self.values[row * w..(row + 1) * w]
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.items.len() + col]
    }

    fn assert_total(&self) -> Result<()> {
        for row in 0..self.n_rows() {
            for col in 0..self.n_cols() {
                if !self.value(row, col).is_finite() {
                    return Err(AnalysisError::NonFinite {
                        country: self.countries[row].clone(),
                        item: self.items[col].clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Column indices of `wanted` items actually present in the matrix, in
    /// matrix column order.
    pub fn columns_for(&self, wanted: &[String]) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| wanted.contains(item))
            .map(|(i, _)| i)
            .collect()
    }

    #[cfg(test)]
    pub fn from_rows(countries: Vec<String>, items: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        let values = rows.into_iter().flatten().collect();
        Self {
            countries,
            items,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(country: &str, item: &str, response: &str) -> Observation {
        Observation {
            country: country.to_string(),
            item: item.to_string(),
            response: response.to_string(),
        }
    }

    #[test]
    fn pivot_orders_rows_and_columns_stably() {
        let m = CountryMatrix::pivot(&[
            obs("FRA", "AIRA_10", "NO"),
            obs("ESP", "AIRA_2", "YES"),
            obs("FRA", "AIRA_2", "UD"),
            obs("ESP", "AIRA_10", "NO"),
        ])
        .unwrap();
        assert_eq!(m.countries, ["ESP", "FRA"]);
        assert_eq!(m.items, ["AIRA_2", "AIRA_10"]);
        assert_eq!(m.raw(0, 0), Some("YES"));
        assert_eq!(m.raw(1, 0), Some("UD"));
    }

    #[test]
    fn pivot_rejects_duplicate_pairs() {
        let err = CountryMatrix::pivot(&[
            obs("ESP", "AIRA_1", "YES"),
            obs("ESP", "AIRA_1", "NO"),
        ])
        .unwrap_err();
        match err {
            AnalysisError::DuplicateKey { country, item } => {
                assert_eq!(country, "ESP");
                assert_eq!(item, "AIRA_1");
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn encode_maps_taxonomy_and_leaves_unknown_missing() {
        let m = CountryMatrix::pivot(&[
            obs("ESP", "AIRA_1", "YES"),
            obs("ESP", "AIRA_2", "DNK"),
            obs("FRA", "AIRA_1", "WAT"),
            obs("FRA", "AIRA_2", "N/A"),
        ])
        .unwrap();
        let e = m.encode();
        assert_eq!(e.value(0, 0), Some(2.0));
        assert_eq!(e.value(0, 1), Some(1.0)); // DNK collapses to 1
        assert_eq!(e.value(1, 0), None); // unrecognized, not defaulted
        assert_eq!(e.value(1, 1), Some(0.0)); // N/A collapses to 0
        assert_eq!(e.missing_count(), 1);
    }

    #[test]
    fn impute_fills_with_column_median() {
        // column AIRA_1 observed values: 2, 0, 2 -> median 2
        let m = CountryMatrix::pivot(&[
            obs("AAA", "AIRA_1", "YES"),
            obs("BBB", "AIRA_1", "NO"),
            obs("CCC", "AIRA_1", "YES"),
            obs("DDD", "AIRA_1", "???"),
        ])
        .unwrap();
        let filled = m.encode().impute().unwrap();
        assert_eq!(filled.value(3, 0), 2.0);
    }

    #[test]
    fn impute_even_count_takes_middle_mean() {
        let m = CountryMatrix::pivot(&[
            obs("AAA", "AIRA_1", "YES"),
            obs("BBB", "AIRA_1", "UD"),
            obs("CCC", "AIRA_1", "NO"),
            obs("DDD", "AIRA_1", "YES"),
            obs("EEE", "AIRA_1", "???"),
        ])
        .unwrap();
        // observed 2, 1, 0, 2 -> sorted [0,1,2,2] -> median 1.5
        let filled = m.encode().impute().unwrap();
        assert_eq!(filled.value(4, 0), 1.5);
    }

    #[test]
    fn fully_missing_column_falls_back_to_zero() {
        let m = CountryMatrix::pivot(&[
            obs("AAA", "AIRA_1", "YES"),
            obs("AAA", "AIRA_2", "???"),
            obs("BBB", "AIRA_1", "NO"),
            obs("BBB", "AIRA_2", "???"),
        ])
        .unwrap();
        let filled = m.encode().impute().unwrap();
        assert_eq!(filled.value(0, 1), 0.0);
        assert_eq!(filled.value(1, 1), 0.0);
    }

    #[test]
    fn imputed_matrix_is_total_and_finite() {
        let m = CountryMatrix::pivot(&[
            obs("AAA", "AIRA_1", "YES"),
            obs("AAA", "AIRA_2", "bogus"),
            obs("BBB", "AIRA_2", "NO"),
        ])
        .unwrap();
        let filled = m.encode().impute().unwrap();
        for row in 0..filled.n_rows() {
            for value in filled.row(row) {
                assert!(value.is_finite());
            }
        }
    }
}
