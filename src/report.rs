//! Markdown run report: the human-readable companion to the JSON/CSV
//! artifacts.

use itertools::Itertools;

use crate::countries::display_name;
use crate::profiles::ClusterProfile;
use crate::select::ClusterSelection;
use crate::topics::TopicGroup;

pub fn render_report(selection: &ClusterSelection, profiles: &[ClusterProfile]) -> String {
    let mut md = String::new();
    md.push_str("# AIRA Readiness Analysis\n\n");

    md.push_str("## Cluster Count Selection\n\n");
    md.push_str(&format!(
        "Chosen k = **{}** (highest silhouette across {} candidates; ties go to the smaller k).\n\n",
        selection.chosen_k,
        selection.diagnostics.len()
    ));
    md.push_str("| k | Inertia | Silhouette |\n|---|---------|------------|\n");
    for d in &selection.diagnostics {
        let marker = if d.k == selection.chosen_k { " ←" } else { "" };
        md.push_str(&format!(
            "| {} | {:.1} | {:.3}{} |\n",
            d.k, d.inertia, d.silhouette, marker
        ));
    }
    md.push('\n');

    md.push_str("## Cluster Profiles\n\n");
    for p in profiles {
        md.push_str(&format!(
            "### Cluster {} — {}\n\n",
            p.cluster_id,
            p.typology.label()
        ));
        md.push_str(&format!(
            "{} countries, overall score {:.1}/100.\n\n",
            p.size(),
            p.overall_mean
        ));
        for (topic, mean) in TopicGroup::ALL.iter().zip(p.topic_means) {
            md.push_str(&format!("- {}: {:.1}\n", topic.label(), mean));
        }
        md.push_str(&format!(
            "\nMembers: {}\n\n",
            p.countries.iter().map(|c| display_name(c)).join(", ")
        ));
    }

    // spread between the strongest and weakest cluster per topic
    if profiles.len() >= 2 {
        md.push_str("## Gaps Between Clusters\n\n");
        for (i, topic) in TopicGroup::ALL.iter().enumerate() {
            let (min, max) = profiles
                .iter()
                .map(|p| p.topic_means[i])
                .minmax_by(|a, b| a.total_cmp(b))
                .into_option()
                .unwrap();
            md.push_str(&format!(
                "- **{}**: {:.1} point spread between clusters\n",
                topic.label(),
                max - min
            ));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{ClusterProfile, Typology};
    use crate::select::{ClusterSelection, KDiagnostics};

    fn fixture() -> (ClusterSelection, Vec<ClusterProfile>) {
        let selection = ClusterSelection {
            chosen_k: 2,
            diagnostics: vec![
                KDiagnostics {
                    k: 2,
                    inertia: 10.0,
                    silhouette: 0.8,
                },
                KDiagnostics {
                    k: 3,
                    inertia: 5.0,
                    silhouette: 0.6,
                },
            ],
            assignment: vec![0, 0, 1],
        };
        let profiles = vec![
            ClusterProfile {
                cluster_id: 0,
                countries: vec!["ESP".into(), "FRA".into()],
                topic_means: [80.0; 5],
                overall_mean: 80.0,
                typology: Typology::Leaders,
            },
            ClusterProfile {
                cluster_id: 1,
                countries: vec!["TKM".into()],
                topic_means: [10.0; 5],
                overall_mean: 10.0,
                typology: Typology::Laggards,
            },
        ];
        (selection, profiles)
    }

    #[test]
    fn report_names_typologies_and_members() {
        let (selection, profiles) = fixture();
        let md = render_report(&selection, &profiles);
        assert!(md.contains("Chosen k = **2**"));
        assert!(md.contains("Cluster 0 — Leaders"));
        assert!(md.contains("Cluster 1 — Laggards"));
        assert!(md.contains("Spain, France"));
        assert!(md.contains("Turkmenistan"));
    }

    #[test]
    fn gap_section_reports_topic_spread() {
        let (selection, profiles) = fixture();
        let md = render_report(&selection, &profiles);
        assert!(md.contains("70.0 point spread"));
    }
}
