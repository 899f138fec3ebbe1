//! Exploratory summaries of the raw matrix for the display layer: per-item
//! response distributions, countries grouped by answer, and per-topic wide
//! tables with human-readable labels.

use serde::Serialize;

use crate::countries::display_name;
use crate::matrix::CountryMatrix;
use crate::taxonomy::ResponseCategory;
use crate::topics::{item_title, TopicGroup};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub symbol: &'static str,
    pub label: &'static str,
    pub count: usize,
    /// Display names of the countries that gave this answer, sorted.
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub item: String,
    pub title: Option<&'static str>,
    pub topic: Option<&'static str>,
    /// Breakdown in the fixed logical order of [`ResponseCategory::ALL`].
    pub breakdown: Vec<CategoryBreakdown>,
    /// Cells whose symbol fell outside the taxonomy; kept visible rather
    /// than folded into any category.
    pub unrecognized: usize,
}

/// Summarize every item column of the raw matrix.
pub fn summarize_items(matrix: &CountryMatrix) -> Vec<ItemSummary> {
    (0..matrix.n_cols())
        .map(|col| {
            let item = &matrix.items[col];
            let mut breakdown: Vec<CategoryBreakdown> = ResponseCategory::ALL
                .iter()
                .map(|cat| CategoryBreakdown {
                    symbol: cat.symbol(),
                    label: cat.label(),
                    count: 0,
                    countries: Vec::new(),
                })
                .collect();
            let mut unrecognized = 0usize;

            for row in 0..matrix.n_rows() {
                match matrix.raw(row, col) {
                    None => {}
                    Some(raw) => match ResponseCategory::from_symbol(raw) {
                        Some(cat) => {
                            let slot = ResponseCategory::ALL
                                .iter()
                                .position(|c| *c == cat)
                                .unwrap();
                            breakdown[slot].count += 1;
                            breakdown[slot]
                                .countries
                                .push(display_name(&matrix.countries[row]).to_string());
                        }
                        None => unrecognized += 1,
                    },
                }
            }
            for entry in &mut breakdown {
                entry.countries.sort();
            }

            ItemSummary {
                item: item.clone(),
                title: item_title(item),
                topic: TopicGroup::of_item(item).map(|t| t.label()),
                breakdown,
                unrecognized,
            }
        })
        .collect()
}

/// One wide-form row of a section table: country plus one label per item.
#[derive(Debug, Clone)]
pub struct SectionRow {
    pub country: String,
    pub name: String,
    /// Display label per section item; raw symbol when unrecognized, empty
    /// when the pair was absent.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SectionTable {
    pub topic: TopicGroup,
    pub items: Vec<String>,
    pub rows: Vec<SectionRow>,
}

/// Wide raw-label matrix for one topic group, restricted to the group's
/// items actually present in the data.
pub fn section_table(matrix: &CountryMatrix, topic: TopicGroup) -> SectionTable {
    let wanted = topic.items();
    let columns: Vec<usize> = matrix
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| wanted.contains(item))
        .map(|(i, _)| i)
        .collect();

    let rows = (0..matrix.n_rows())
        .map(|row| SectionRow {
            country: matrix.countries[row].clone(),
            name: display_name(&matrix.countries[row]).to_string(),
            labels: columns
                .iter()
                .map(|&col| match matrix.raw(row, col) {
                    None => String::new(),
                    Some(raw) => ResponseCategory::from_symbol(raw)
                        .map(|cat| cat.label().to_string())
                        .unwrap_or_else(|| raw.to_string()),
                })
                .collect(),
        })
        .collect();

    SectionTable {
        topic,
        items: columns.iter().map(|&c| matrix.items[c].clone()).collect(),
        rows,
    }
}
