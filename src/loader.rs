use std::path::Path;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};

pub const COL_COUNTRY: &str = "COUNTRY_REGION";
pub const COL_ITEM: &str = "Measure_code";
pub const COL_RESPONSE: &str = "AIRA_SIMPLE";

/// One (country, item, raw category) observation from the source table.
/// Immutable once loaded; the response stays a raw string here so the
/// encoder can distinguish unrecognized symbols from intentional collapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub country: String,
    pub item: String,
    pub response: String,
}

/// Read the long-form survey table from a delimited text file.
///
/// Only the three required columns are consumed; the source carries extra
/// columns (full response codes, survey year) that the pipeline ignores.
pub fn read_observations(path: &Path) -> Result<Vec<Observation>> {
    let start = std::time::Instant::now();
    debug!("Reading source table - path={}", path.display());

    let mut reader = csv::Reader::from_path(path)?;
    let observations = parse_observations(&mut reader)?;

    info!(
        "Source table loaded - duration={:.2}s, rows={}",
        start.elapsed().as_secs_f32(),
        observations.len()
    );
    Ok(observations)
}

/// Parse from any CSV reader; split out so tests can feed in-memory data.
pub fn parse_observations<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Observation>> {
    let headers = reader.headers()?.clone();
    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalysisError::Schema {
                column: name.to_string(),
                found: headers.iter().collect::<Vec<_>>().join(", "),
            })
    };
    let country_idx = col(COL_COUNTRY)?;
    let item_idx = col(COL_ITEM)?;
    let response_idx = col(COL_RESPONSE)?;

    let mut observations = Vec::new();
    for record in reader.records() {
        let record = record?;
        observations.push(Observation {
            country: record.get(country_idx).unwrap_or_default().trim().to_string(),
            item: record.get(item_idx).unwrap_or_default().trim().to_string(),
            response: record.get(response_idx).unwrap_or_default().trim().to_string(),
        });
    }
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_from(data: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(data.as_bytes())
    }

    #[test]
    fn parses_required_columns_and_ignores_extras() {
        let data = "COUNTRY_REGION,Measure_code,AIRA,AIRA_SIMPLE,YEAR\n\
                    ESP,AIRA_1,YES_FULL,YES,2024\n\
                    FRA,AIRA_1, UD ,UD,2024\n";
        let obs = parse_observations(&mut reader_from(data)).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].country, "ESP");
        assert_eq!(obs[0].response, "YES");
        // whitespace trimmed
        assert_eq!(obs[1].response, "UD");
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let data = "COUNTRY_REGION,Measure_code\nESP,AIRA_1\n";
        let err = parse_observations(&mut reader_from(data)).unwrap_err();
        match err {
            AnalysisError::Schema { column, .. } => assert_eq!(column, "AIRA_SIMPLE"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_fatal() {
        assert!(read_observations(Path::new("/nonexistent/aira.csv")).is_err());
    }
}
