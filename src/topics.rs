use serde::{Deserialize, Serialize};

/// The five thematic groups the AIRA items are scored under.
///
/// Group membership is static questionnaire structure, not derived data. The
/// groups are disjoint but deliberately not exhaustive: oversight items
/// (AIRA_3-7) and the 54-70 block exist in the source table and participate
/// in clustering, they just feed no topic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TopicGroup {
    Strategy,
    Regulation,
    DataGovernance,
    Applications,
    Capabilities,
}

impl TopicGroup {
    pub const ALL: [TopicGroup; 5] = [
        TopicGroup::Strategy,
        TopicGroup::Regulation,
        TopicGroup::DataGovernance,
        TopicGroup::Applications,
        TopicGroup::Capabilities,
    ];

    /// Inclusive item-number range for this group.
    fn item_range(self) -> (u32, u32) {
        match self {
            Self::Strategy => (1, 2),
            Self::Regulation => (8, 36),
            Self::DataGovernance => (37, 46),
            Self::Applications => (47, 53),
            Self::Capabilities => (71, 75),
        }
    }

    /// Item identifiers belonging to this group, in numeric order.
    pub fn items(self) -> Vec<String> {
        let (lo, hi) = self.item_range();
        (lo..=hi).map(|n| format!("AIRA_{n}")).collect()
    }

    /// Group owning `item`, if any.
    pub fn of_item(item: &str) -> Option<TopicGroup> {
        let n = item_number(item)?;
        TopicGroup::ALL.into_iter().find(|g| {
            let (lo, hi) = g.item_range();
            (lo..=hi).contains(&n)
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Strategy => "Strategy",
            Self::Regulation => "Regulation",
            Self::DataGovernance => "Data Governance",
            Self::Applications => "Applications",
            Self::Capabilities => "Capabilities",
        }
    }

    /// Short slug for file names (`section_strategy.csv` etc).
    pub fn slug(self) -> &'static str {
        match self {
            Self::Strategy => "strategy",
            Self::Regulation => "regulation",
            Self::DataGovernance => "data_governance",
            Self::Applications => "applications",
            Self::Capabilities => "capabilities",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Strategy => "National AI strategies and oversight mechanisms for health",
            Self::Regulation => "Regulatory framework, ethics, liability and legal standards",
            Self::DataGovernance => "Health data strategies, infrastructure and data-use regulation",
            Self::Applications => "Practical deployment of AI systems in the health sector",
            Self::Capabilities => "Training, talent and human capacity for AI",
        }
    }
}

/// Numeric suffix of an `AIRA_<n>` identifier. `None` when the identifier
/// does not follow the `PREFIX_<integer>` format.
pub fn item_number(item: &str) -> Option<u32> {
    let (_, suffix) = item.rsplit_once('_')?;
    suffix.parse().ok()
}

/// Sort key giving matrix columns a stable numeric order (`AIRA_2` before
/// `AIRA_10`); identifiers without a numeric suffix sort last, lexically.
pub fn item_order_key(item: &str) -> (u32, String) {
    match item_number(item) {
        Some(n) => (n, String::new()),
        None => (u32::MAX, item.to_string()),
    }
}

/// Short English title for a questionnaire item, for exported tables.
pub fn item_title(item: &str) -> Option<&'static str> {
    let title = match item_number(item)? {
        1 => "National AI strategy for the health sector",
        2 => "Cross-sector national AI strategy",
        3 => "Oversight through an existing government agency",
        4 => "Oversight through a new government agency",
        5 => "Oversight through an expert advisory council",
        6 => "Oversight through an independent body",
        7 => "Oversight shared across multiple agencies",
        8 => "Legislative measures for AI governance in health",
        9 => "Gap assessment of existing legislation",
        10 => "Guidance on existing legislation",
        11 => "Amendment of existing legislation and policies",
        12 => "New binding cross-sector AI laws",
        13 => "Binding sector-specific AI laws",
        14 => "Soft-law norms or sector ethics principles",
        15 => "Voluntary codes of practice and standards",
        16 => "Adoption of a risk-based approach",
        17 => "Guidance on ethical implications",
        18 => "Ethics checklists or assessment tools",
        19 => "Guidance on algorithmic impact assessment",
        20 => "Guidance on data-protection impact assessment",
        21 => "Guidance on fundamental-rights impact assessment",
        22 => "Guidance on existing liability regimes",
        23 => "New liability regime specific to AI in health",
        24 => "New liability regime for AI (not health-specific)",
        25 => "Identification of regulatory agencies",
        26 => "Cooperation between regulatory agencies",
        27 => "Documentation and traceability requirements",
        28 => "Transparency and explainability requirements",
        29 => "Robustness and safety requirements",
        30 => "Privacy and data-protection requirements",
        31 => "Post-market monitoring requirements",
        32 => "Public procurement policies for AI",
        33 => "Audit mechanisms",
        34 => "Redress and recourse mechanisms",
        35 => "Certification of AI systems",
        36 => "Environmental impact requirements",
        37 => "Health data governance strategy",
        38 => "Health data governance framework",
        39 => "Health data authority",
        40 => "National health data hub or platform",
        41 => "Standards for data warehouses",
        42 => "Regulation of secondary data use",
        43 => "Routine extraction of EHR data into registries",
        44 => "Regional or national database creation",
        45 => "Rules for data sharing with the private sector",
        46 => "Rules for cross-border data exchange",
        47 => "AI applications in diagnostics",
        48 => "AI applications in treatment",
        49 => "AI applications in epidemiological surveillance",
        50 => "AI applications in resource management",
        51 => "AI applications in research",
        52 => "AI applications in telemedicine",
        53 => "AI applications in public health",
        71 => "AI training programmes for health professionals",
        72 => "Academic programmes in AI and health",
        73 => "Research centres for AI and health",
        74 => "AI talent attraction policies",
        75 => "International cooperation on capacity building",
        _ => return None,
    };
    Some(title)
}
