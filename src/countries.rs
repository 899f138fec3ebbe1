//! ISO-3 code to English name lookup for the 53 WHO/Europe member states
//! covered by the AIRA survey. Display enrichment only; scoring and
//! clustering key on the codes.

static COUNTRY_NAMES: &[(&str, &str)] = &[
    ("ALB", "Albania"),
    ("AND", "Andorra"),
    ("ARM", "Armenia"),
    ("AUT", "Austria"),
    ("AZE", "Azerbaijan"),
    ("BLR", "Belarus"),
    ("BEL", "Belgium"),
    ("BIH", "Bosnia and Herzegovina"),
    ("BGR", "Bulgaria"),
    ("HRV", "Croatia"),
    ("CYP", "Cyprus"),
    ("CZE", "Czechia"),
    ("DNK", "Denmark"),
    ("EST", "Estonia"),
    ("FIN", "Finland"),
    ("FRA", "France"),
    ("GEO", "Georgia"),
    ("DEU", "Germany"),
    ("GRC", "Greece"),
    ("HUN", "Hungary"),
    ("ISL", "Iceland"),
    ("IRL", "Ireland"),
    ("ISR", "Israel"),
    ("ITA", "Italy"),
    ("KAZ", "Kazakhstan"),
    ("KGZ", "Kyrgyzstan"),
    ("LVA", "Latvia"),
    ("LTU", "Lithuania"),
    ("LUX", "Luxembourg"),
    ("MLT", "Malta"),
    ("MDA", "Republic of Moldova"),
    ("MCO", "Monaco"),
    ("MNE", "Montenegro"),
    ("NLD", "Netherlands"),
    ("MKD", "North Macedonia"),
    ("NOR", "Norway"),
    ("POL", "Poland"),
    ("PRT", "Portugal"),
    ("ROU", "Romania"),
    ("RUS", "Russian Federation"),
    ("SMR", "San Marino"),
    ("SRB", "Serbia"),
    ("SVK", "Slovakia"),
    ("SVN", "Slovenia"),
    ("ESP", "Spain"),
    ("SWE", "Sweden"),
    ("CHE", "Switzerland"),
    ("TJK", "Tajikistan"),
    ("TKM", "Turkmenistan"),
    ("TUR", "Turkey"),
    ("UKR", "Ukraine"),
    ("GBR", "United Kingdom"),
    ("UZB", "Uzbekistan"),
];

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Name when known, otherwise the code itself. Unknown codes are kept, not
/// dropped - the survey may cover territories outside the static table.
pub fn display_name(code: &str) -> &str {
    country_name(code).unwrap_or(code)
}
