//! Cluster profiles and the typology decision table.
//!
//! A profile is built once per run by joining the score table with the
//! cluster assignment, then read-only. Classification walks an ordered rule
//! list top to bottom; the rules overlap, so the order is the semantics.

use serde::Serialize;
use tracing::debug;

use crate::scores::ScoreTable;
use crate::topics::TopicGroup;

/// The five topic means plus overall mean a typology rule looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreProfile {
    pub strategy: f64,
    pub regulation: f64,
    pub data_governance: f64,
    pub applications: f64,
    pub capabilities: f64,
    pub overall: f64,
}

impl ScoreProfile {
    pub fn from_topic_means(by_topic: [f64; 5], overall: f64) -> Self {
        Self {
            strategy: by_topic[0],
            regulation: by_topic[1],
            data_governance: by_topic[2],
            applications: by_topic[3],
            capabilities: by_topic[4],
            overall,
        }
    }
}

/// The seven fixed maturity typologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Typology {
    Leaders,
    AdvancedTransition,
    StrategyWithoutImplementation,
    RegulationWithoutCapabilities,
    ImplementationWithoutRegulation,
    Laggards,
    IrregularDevelopment,
}

impl Typology {
    pub fn label(self) -> &'static str {
        match self {
            Self::Leaders => "Leaders",
            Self::AdvancedTransition => "Advanced Transition",
            Self::StrategyWithoutImplementation => "Strategy without Implementation",
            Self::RegulationWithoutCapabilities => "Regulation without Capabilities",
            Self::ImplementationWithoutRegulation => "Implementation without Regulation",
            Self::Laggards => "Laggards",
            Self::IrregularDevelopment => "Irregular Development",
        }
    }

    /// Display color carried through to the profile artifact. Not
    /// behaviorally significant.
    pub fn color(self) -> &'static str {
        match self {
            Self::Leaders => "#4caf50",
            Self::AdvancedTransition => "#ffd600",
            Self::StrategyWithoutImplementation => "#2196f3",
            Self::RegulationWithoutCapabilities => "#ff9800",
            Self::ImplementationWithoutRegulation => "#9c27b0",
            Self::Laggards => "#f44336",
            Self::IrregularDevelopment => "#9e9e9e",
        }
    }
}

struct Rule {
    label: Typology,
    applies: fn(&ScoreProfile) -> bool,
}

/// Evaluated top to bottom, first match wins. `IrregularDevelopment` is the
/// catch-all and deliberately absent here.
const RULES: &[Rule] = &[
    Rule {
        label: Typology::Leaders,
        applies: |p| p.overall > 70.0,
    },
    Rule {
        label: Typology::AdvancedTransition,
        applies: |p| p.overall > 50.0,
    },
    Rule {
        label: Typology::StrategyWithoutImplementation,
        applies: |p| p.strategy > 60.0 && p.applications < 40.0,
    },
    Rule {
        label: Typology::RegulationWithoutCapabilities,
        applies: |p| p.regulation > 60.0 && p.capabilities < 40.0,
    },
    Rule {
        label: Typology::ImplementationWithoutRegulation,
        applies: |p| p.applications > 50.0 && p.regulation < 40.0,
    },
    Rule {
        label: Typology::Laggards,
        applies: |p| p.overall < 35.0,
    },
];

/// Assign a typology to a score profile.
pub fn classify(profile: &ScoreProfile) -> Typology {
    RULES
        .iter()
        .find(|rule| (rule.applies)(profile))
        .map(|rule| rule.label)
        .unwrap_or(Typology::IrregularDevelopment)
}

/// Derived view of one cluster: members, mean scores, typology.
#[derive(Debug, Clone)]
pub struct ClusterProfile {
    pub cluster_id: usize,
    /// Member country codes, in score-table (row) order.
    pub countries: Vec<String>,
    pub topic_means: [f64; 5],
    pub overall_mean: f64,
    pub typology: Typology,
}

impl ClusterProfile {
    pub fn size(&self) -> usize {
        self.countries.len()
    }

    pub fn topic_mean(&self, topic: TopicGroup) -> f64 {
        let idx = TopicGroup::ALL.iter().position(|t| *t == topic).unwrap();
        self.topic_means[idx]
    }
}

/// Join the canonical assignment with the score table into one profile per
/// cluster, ascending cluster id.
///
/// `assignment` must be index-aligned with `scores.rows`; both come from the
/// same imputed matrix in the same row order.
pub fn build_profiles(assignment: &[usize], scores: &ScoreTable) -> Vec<ClusterProfile> {
    assert_eq!(
        assignment.len(),
        scores.rows.len(),
        "assignment and score table must cover the same countries"
    );
    let n_clusters = assignment.iter().max().map_or(0, |m| m + 1);

    let mut profiles = Vec::with_capacity(n_clusters);
    for cluster_id in 0..n_clusters {
        let member_rows: Vec<usize> = assignment
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == cluster_id)
            .map(|(i, _)| i)
            .collect();

        let size = member_rows.len() as f64;
        let mut topic_means = [0.0; 5];
        let mut overall_mean = 0.0;
        for &row in &member_rows {
            for (mean, score) in topic_means.iter_mut().zip(scores.rows[row].by_topic) {
                *mean += score / size;
            }
            overall_mean += scores.rows[row].overall / size;
        }

        let typology = classify(&ScoreProfile::from_topic_means(topic_means, overall_mean));
        profiles.push(ClusterProfile {
            cluster_id,
            countries: member_rows
                .iter()
                .map(|&row| scores.rows[row].country.clone())
                .collect(),
            topic_means,
            overall_mean,
            typology,
        });
    }

    debug!("Profiles built - clusters={}", profiles.len());
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::CountryScores;

    fn profile(overall: f64) -> ScoreProfile {
        ScoreProfile {
            strategy: 0.0,
            regulation: 0.0,
            data_governance: 0.0,
            applications: 0.0,
            capabilities: 0.0,
            overall,
        }
    }

    #[test]
    fn thresholds_map_to_expected_labels() {
        assert_eq!(classify(&profile(75.0)), Typology::Leaders);
        assert_eq!(classify(&profile(70.0)), Typology::AdvancedTransition); // boundary: strict >
        assert_eq!(classify(&profile(55.0)), Typology::AdvancedTransition);
        assert_eq!(classify(&profile(20.0)), Typology::Laggards);
        assert_eq!(classify(&profile(40.0)), Typology::IrregularDevelopment);
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        // would also satisfy StrategyWithoutImplementation, but overall > 70
        // is evaluated first
        let p = ScoreProfile {
            strategy: 90.0,
            regulation: 80.0,
            data_governance: 80.0,
            applications: 20.0,
            capabilities: 80.0,
            overall: 75.0,
        };
        assert_eq!(classify(&p), Typology::Leaders);
    }

    #[test]
    fn pattern_rules_fire_below_the_overall_tiers() {
        let p = ScoreProfile {
            strategy: 65.0,
            regulation: 30.0,
            data_governance: 30.0,
            applications: 35.0,
            capabilities: 30.0,
            overall: 38.0,
        };
        assert_eq!(classify(&p), Typology::StrategyWithoutImplementation);
    }

    #[test]
    fn regulation_without_capabilities_rule() {
        let p = ScoreProfile {
            strategy: 30.0,
            regulation: 65.0,
            data_governance: 40.0,
            applications: 45.0,
            capabilities: 35.0,
            overall: 43.0,
        };
        assert_eq!(classify(&p), Typology::RegulationWithoutCapabilities);
    }

    #[test]
    fn implementation_without_regulation_rule() {
        let p = ScoreProfile {
            strategy: 40.0,
            regulation: 30.0,
            data_governance: 45.0,
            applications: 60.0,
            capabilities: 50.0,
            overall: 45.0,
        };
        assert_eq!(classify(&p), Typology::ImplementationWithoutRegulation);
    }

    #[test]
    fn profiles_join_assignment_with_scores() {
        let scores = ScoreTable {
            rows: vec![
                CountryScores {
                    country: "AAA".into(),
                    by_topic: [100.0; 5],
                    overall: 100.0,
                },
                CountryScores {
                    country: "BBB".into(),
                    by_topic: [0.0; 5],
                    overall: 0.0,
                },
                CountryScores {
                    country: "CCC".into(),
                    by_topic: [100.0; 5],
                    overall: 100.0,
                },
            ],
        };
        let profiles = build_profiles(&[0, 1, 0], &scores);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].countries, ["AAA", "CCC"]);
        assert_eq!(profiles[0].size(), 2);
        assert_eq!(profiles[0].overall_mean, 100.0);
        assert_eq!(profiles[0].typology, Typology::Leaders);
        assert_eq!(profiles[1].countries, ["BBB"]);
        assert_eq!(profiles[1].typology, Typology::Laggards);
    }
}
