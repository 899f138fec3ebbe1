use serde::{Deserialize, Serialize};

/// Top of the ordinal encoding range (`YES` → 2). Topic scores rescale
/// against this, so it must track [`ResponseCategory::ordinal`].
pub const MAX_ORDINAL: f64 = 2.0;

/// The five raw answer symbols the AIRA questionnaire allows.
///
/// Anything outside this closed set is *not* mapped to a default anywhere in
/// the pipeline; it becomes a missing cell so that "unrecognized" stays
/// distinguishable from the intentional collapses below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCategory {
    /// `YES` - measure fully implemented.
    Yes,
    /// `UD` - measure under development.
    InDevelopment,
    /// `NO` - measure not implemented.
    No,
    /// `DNK` - respondent does not know.
    DontKnow,
    /// `N/A` - measure not applicable to the country.
    NotApplicable,
}

impl ResponseCategory {
    /// Logical display order used by distribution tables: best to worst,
    /// with the two non-answers last.
    pub const ALL: [ResponseCategory; 5] = [
        ResponseCategory::Yes,
        ResponseCategory::InDevelopment,
        ResponseCategory::No,
        ResponseCategory::DontKnow,
        ResponseCategory::NotApplicable,
    ];

    /// Parse a raw symbol from the source table. Returns `None` for anything
    /// outside the fixed set.
    pub fn from_symbol(raw: &str) -> Option<Self> {
        match raw.trim() {
            "YES" => Some(Self::Yes),
            "UD" => Some(Self::InDevelopment),
            "NO" => Some(Self::No),
            "DNK" => Some(Self::DontKnow),
            "N/A" => Some(Self::NotApplicable),
            _ => None,
        }
    }

    /// Raw symbol as it appears in the source table.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::InDevelopment => "UD",
            Self::No => "NO",
            Self::DontKnow => "DNK",
            Self::NotApplicable => "N/A",
        }
    }

    /// Human-readable label for exported tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::InDevelopment => "In development",
            Self::No => "No",
            Self::DontKnow => "Does not know",
            Self::NotApplicable => "Not applicable",
        }
    }

    /// Ordinal encoding on the 0-2 implementation scale.
    ///
    /// Policy choice carried over from the source analysis, not a neutral
    /// fact: `DNK` collapses into the in-development tier and `N/A` into the
    /// not-implemented tier. Countries with many inapplicable items score
    /// lower than a "skip N/A" encoding would give them.
    pub fn ordinal(self) -> f64 {
        match self {
            Self::Yes => 2.0,
            Self::InDevelopment | Self::DontKnow => 1.0,
            Self::No | Self::NotApplicable => 0.0,
        }
    }
}
