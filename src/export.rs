//! Artifact bundle for the display layer, written into the output
//! directory with a per-run `index.json` listing everything produced.

use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::countries::display_name;
use crate::error::Result;
use crate::matrix::CountryMatrix;
use crate::profiles::ClusterProfile;
use crate::scores::ScoreTable;
use crate::select::ClusterSelection;
use crate::summary::{section_table, ItemSummary};
use crate::topics::TopicGroup;

pub const INDEX_FILE: &str = "index.json";

/// Artifacts written only when the clustering stage ran.
const CLUSTER_FILES: [&str; 4] = [
    "clusters.csv",
    "cluster_profiles.json",
    "diagnostics.json",
    "report.md",
];

/// Everything one run produces, borrowed for the duration of the export.
pub struct RunArtifacts<'a> {
    pub matrix: &'a CountryMatrix,
    pub scores: &'a ScoreTable,
    /// Absent when the clustering stage declined the input; the bundle then
    /// carries scores and summaries only and the index says so.
    pub clustering: Option<ClusteringArtifacts<'a>>,
    pub item_summaries: &'a [ItemSummary],
    /// xxh3 of the raw input bytes; keys the skip-if-unchanged check.
    pub input_fingerprint: &'a str,
}

pub struct ClusteringArtifacts<'a> {
    pub selection: &'a ClusterSelection,
    pub profiles: &'a [ClusterProfile],
    pub report_md: &'a str,
}

/// Write the full artifact bundle. The index goes last so a present index
/// always describes a complete bundle.
pub fn write_all(out_dir: &Path, artifacts: &RunArtifacts) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let mut files = Vec::new();
    for topic in TopicGroup::ALL {
        let name = format!("section_{}.csv", topic.slug());
        write_section_csv(&out_dir.join(&name), artifacts.matrix, topic)?;
        files.push(name);
    }

    write_scores_csv(&out_dir.join("scores.csv"), artifacts.scores)?;
    files.push("scores.csv".to_string());

    if let Some(clustering) = &artifacts.clustering {
        write_clusters_csv(
            &out_dir.join("clusters.csv"),
            artifacts.scores,
            &clustering.selection.assignment,
        )?;
        files.push("clusters.csv".to_string());

        write_json(
            out_dir.join("cluster_profiles.json"),
            &profiles_json(clustering.profiles),
        )?;
        files.push("cluster_profiles.json".to_string());

        write_json(
            out_dir.join("diagnostics.json"),
            &json!({
                "chosen_k": clustering.selection.chosen_k,
                "series": clustering.selection.diagnostics,
            }),
        )?;
        files.push("diagnostics.json".to_string());

        fs::write(out_dir.join("report.md"), clustering.report_md.as_bytes())?;
        files.push("report.md".to_string());
    } else {
        // a previous complete run may have left cluster artifacts here; the
        // index must keep describing exactly what is on disk
        for stale in CLUSTER_FILES {
            match fs::remove_file(out_dir.join(stale)) {
                Ok(()) => debug!("Removed stale artifact - {stale}"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    write_json(out_dir.join("summary.json"), &artifacts.item_summaries)?;
    files.push("summary.json".to_string());

    let index = json!({
        "version": 1,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "input_fingerprint": artifacts.input_fingerprint,
        "clustering": if artifacts.clustering.is_some() { "complete" } else { "skipped" },
        "counts": {
            "countries": artifacts.matrix.n_rows(),
            "items": artifacts.matrix.n_cols(),
            "clusters": artifacts.clustering.as_ref().map(|c| c.profiles.len()),
        },
        "files": files,
    });
    write_json(out_dir.join(INDEX_FILE), &index)?;

    debug!("Artifact bundle written - directory={}", out_dir.display());
    Ok(())
}

/// Fingerprint recorded by a previous run's index, if a complete bundle
/// exists in `out_dir`.
pub fn recorded_fingerprint(out_dir: &Path) -> Option<String> {
    let bytes = fs::read(out_dir.join(INDEX_FILE)).ok()?;
    let index: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    index
        .get("input_fingerprint")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn write_json<P: AsRef<Path>, T: ?Sized + Serialize>(path: P, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(std::io::Error::from)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn write_section_csv(path: &Path, matrix: &CountryMatrix, topic: TopicGroup) -> Result<()> {
    let table = section_table(matrix, topic);
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["COUNTRY_REGION".to_string(), "Country".to_string()];
    header.extend(table.items.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.country.clone(), row.name.clone()];
        record.extend(row.labels.iter().cloned());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_scores_csv(path: &Path, scores: &ScoreTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["COUNTRY_REGION".to_string(), "Country".to_string()];
    header.extend(TopicGroup::ALL.iter().map(|t| t.label().to_string()));
    header.push("Overall".to_string());
    writer.write_record(&header)?;

    for row in &scores.rows {
        let mut record = vec![row.country.clone(), display_name(&row.country).to_string()];
        record.extend(row.by_topic.iter().map(|s| format!("{s:.2}")));
        record.push(format!("{:.2}", row.overall));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Assignment table, sorted by cluster then descending overall score so the
/// strongest member of each cluster leads.
fn write_clusters_csv(path: &Path, scores: &ScoreTable, assignment: &[usize]) -> Result<()> {
    let mut rows: Vec<(usize, &str, f64)> = scores
        .rows
        .iter()
        .zip(assignment)
        .map(|(row, &cluster)| (cluster, row.country.as_str(), row.overall))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then(b.2.total_cmp(&a.2)).then(a.1.cmp(b.1)));

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["COUNTRY_REGION", "Country", "Cluster", "Overall"])?;
    for (cluster, country, overall) in rows {
        writer.write_record([
            country.to_string(),
            display_name(country).to_string(),
            cluster.to_string(),
            format!("{overall:.2}"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn profiles_json(profiles: &[ClusterProfile]) -> serde_json::Value {
    let entries: Vec<_> = profiles
        .iter()
        .map(|p| {
            let topic_means: serde_json::Map<String, serde_json::Value> = TopicGroup::ALL
                .iter()
                .zip(p.topic_means)
                .map(|(topic, mean)| (topic.label().to_string(), json!(mean)))
                .collect();
            json!({
                "cluster_id": p.cluster_id,
                "typology": p.typology.label(),
                "color": p.typology.color(),
                "size": p.size(),
                "overall_mean": p.overall_mean,
                "topic_means": topic_means,
                "countries": p.countries.iter()
                    .map(|c| json!({ "code": c, "name": display_name(c) }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    json!(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Observation;
    use crate::profiles::build_profiles;
    use crate::scores::score_table;
    use crate::select::sweep;
    use crate::summary::summarize_items;

    fn full_coverage_observations() -> Vec<Observation> {
        let mut observations = Vec::new();
        for (country, response) in [("AAA", "YES"), ("BBB", "NO"), ("CCC", "UD"), ("DDD", "UD")] {
            for group in TopicGroup::ALL {
                for item in group.items() {
                    observations.push(Observation {
                        country: country.to_string(),
                        item,
                        response: response.to_string(),
                    });
                }
            }
        }
        observations
    }

    #[test]
    fn bundle_is_complete_and_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let matrix = CountryMatrix::pivot(&full_coverage_observations()).unwrap();
        let imputed = matrix.encode().impute().unwrap();
        let scores = score_table(&imputed).unwrap();
        let selection = sweep(&imputed, 2, 3, 42).unwrap();
        let profiles = build_profiles(&selection.assignment, &scores);
        let summaries = summarize_items(&matrix);

        write_all(
            dir.path(),
            &RunArtifacts {
                matrix: &matrix,
                scores: &scores,
                clustering: Some(ClusteringArtifacts {
                    selection: &selection,
                    profiles: &profiles,
                    report_md: "# report\n",
                }),
                item_summaries: &summaries,
                input_fingerprint: "deadbeefdeadbeef",
            },
        )
        .unwrap();

        let index: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(INDEX_FILE)).unwrap()).unwrap();
        for file in index["files"].as_array().unwrap() {
            let file = file.as_str().unwrap();
            assert!(dir.path().join(file).exists(), "{file} missing from bundle");
        }
        assert_eq!(index["counts"]["countries"], 4);
        assert_eq!(index["clustering"], "complete");
        assert_eq!(
            recorded_fingerprint(dir.path()).as_deref(),
            Some("deadbeefdeadbeef")
        );
    }

    #[test]
    fn skipped_clustering_yields_a_scores_only_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let matrix = CountryMatrix::pivot(&full_coverage_observations()).unwrap();
        let imputed = matrix.encode().impute().unwrap();
        let scores = score_table(&imputed).unwrap();
        let selection = sweep(&imputed, 2, 3, 42).unwrap();
        let profiles = build_profiles(&selection.assignment, &scores);
        let summaries = summarize_items(&matrix);

        // complete bundle first, then a rerun without clustering over it
        write_all(
            dir.path(),
            &RunArtifacts {
                matrix: &matrix,
                scores: &scores,
                clustering: Some(ClusteringArtifacts {
                    selection: &selection,
                    profiles: &profiles,
                    report_md: "# report\n",
                }),
                item_summaries: &summaries,
                input_fingerprint: "deadbeefdeadbeef",
            },
        )
        .unwrap();
        write_all(
            dir.path(),
            &RunArtifacts {
                matrix: &matrix,
                scores: &scores,
                clustering: None,
                item_summaries: &summaries,
                input_fingerprint: "0123456789abcdef",
            },
        )
        .unwrap();

        assert!(dir.path().join("scores.csv").exists());
        assert!(dir.path().join("summary.json").exists());
        for stale in CLUSTER_FILES {
            assert!(!dir.path().join(stale).exists(), "{stale} left behind");
        }

        let index: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(INDEX_FILE)).unwrap()).unwrap();
        assert_eq!(index["clustering"], "skipped");
        assert!(index["counts"]["clusters"].is_null());
        assert!(!index["files"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "clusters.csv"));
    }

    #[test]
    fn scores_csv_has_one_row_per_country() {
        let dir = tempfile::tempdir().unwrap();
        let matrix = CountryMatrix::pivot(&full_coverage_observations()).unwrap();
        let imputed = matrix.encode().impute().unwrap();
        let scores = score_table(&imputed).unwrap();
        let path = dir.path().join("scores.csv");
        write_scores_csv(&path, &scores).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 4);
    }

    #[test]
    fn missing_index_means_no_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(recorded_fingerprint(dir.path()), None);
    }
}
