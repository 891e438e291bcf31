//! Static rating classification tables.
//!
//! Two granularities exist per rating axis. The *strict* sets carry only the
//! two extreme labels on each side; the *broad* sets add the "Moderately"
//! tier. Outcome success is always judged on the broad definition, while
//! HIGH/LOW comparison-group membership is judged on the strict definition
//! unless a broad variant is explicitly requested; callers must not conflate
//! the two.
//!
//! All membership tests trim the candidate string before matching, so data
//! artifacts such as `"Modest "` resolve to their canonical label.

// ── Rating sets ───────────────────────────────────────────────────────────────

/// Strict satisfactory ratings (S / HS).
pub const STRICT_SATISFACTORY: &[&str] = &["Highly Satisfactory", "Satisfactory"];

/// Strict unsatisfactory ratings (U / HU).
pub const STRICT_UNSATISFACTORY: &[&str] = &["Highly Unsatisfactory", "Unsatisfactory"];

/// Broad satisfactory ratings (MS / S / HS).
pub const BROAD_SATISFACTORY: &[&str] = &[
    "Highly Satisfactory",
    "Satisfactory",
    "Moderately Satisfactory",
];

/// Broad unsatisfactory ratings (MU / U / HU).
pub const BROAD_UNSATISFACTORY: &[&str] = &[
    "Highly Unsatisfactory",
    "Unsatisfactory",
    "Moderately Unsatisfactory",
];

/// The six-point outcome scale, best to worst. Used for per-label breakdowns.
pub const OUTCOME_LABELS: &[&str] = &[
    "Highly Satisfactory",
    "Satisfactory",
    "Moderately Satisfactory",
    "Moderately Unsatisfactory",
    "Unsatisfactory",
    "Highly Unsatisfactory",
];

/// The four-point M&E quality scale, best to worst ("Not Applicable" is
/// scored but not reported as a level of its own).
pub const ME_LEVELS: &[&str] = &["High", "Substantial", "Modest", "Negligible"];

// ── Geographic groups ─────────────────────────────────────────────────────────

/// Small Island Developing States as named in the IEG dataset.
///
/// Alternate spellings of the same country appear as separate entries; a
/// record matches the group when its trimmed country name equals any listed
/// variant.
pub const SIDS_COUNTRIES: &[&str] = &[
    "Antigua and Barbuda",
    "Bahamas, The",
    "Barbados",
    "Belize",
    "Cabo Verde",
    "Comoros",
    "Cuba",
    "Dominica",
    "Dominican Republic",
    "Fiji",
    "Grenada",
    "Guinea-Bissau",
    "Guyana",
    "Haiti",
    "Jamaica",
    "Kiribati",
    "Maldives",
    "Marshall Islands",
    "Mauritius",
    "Micronesia, Fed. Sts.",
    "Nauru",
    "Palau",
    "Papua New Guinea",
    "St. Kitts and Nevis",
    "St. Lucia",
    "St. Vincent and the Grenadines",
    "Samoa",
    "São Tomé and Príncipe",
    "Sao Tome and Principe",
    "Seychelles",
    "Singapore",
    "Solomon Islands",
    "Suriname",
    "Timor-Leste",
    "Tonga",
    "Trinidad and Tobago",
    "Tuvalu",
    "Vanuatu",
    // Alternate spellings seen in World Bank data.
    "Cape Verde",
    "Saint Kitts and Nevis",
    "Saint Lucia",
    "Saint Vincent and the Grenadines",
    "Federated States of Micronesia",
];

/// Pacific island members of the SIDS group.
pub const PACIFIC_COUNTRIES: &[&str] = &[
    "Fiji",
    "Kiribati",
    "Marshall Islands",
    "Micronesia, Fed. Sts.",
    "Nauru",
    "Palau",
    "Papua New Guinea",
    "Samoa",
    "Solomon Islands",
    "Timor-Leste",
    "Tonga",
    "Tuvalu",
    "Vanuatu",
    "Federated States of Micronesia",
];

// ── Classification helpers ────────────────────────────────────────────────────

/// HIGH/LOW comparison group for a quality rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBand {
    /// Satisfactory side of the scale.
    High,
    /// Unsatisfactory side of the scale.
    Low,
}

/// `true` when the trimmed rating is broad-satisfactory (MS / S / HS).
pub fn is_broad_satisfactory(rating: &str) -> bool {
    BROAD_SATISFACTORY.contains(&rating.trim())
}

/// `true` when the trimmed rating is broad-unsatisfactory (MU / U / HU).
pub fn is_broad_unsatisfactory(rating: &str) -> bool {
    BROAD_UNSATISFACTORY.contains(&rating.trim())
}

/// Strict HIGH/LOW band for a quality rating.
///
/// Only the extreme labels place a record in a band; the "Moderately" tier
/// and everything else returns `None`.
pub fn strict_band(rating: &str) -> Option<QualityBand> {
    let trimmed = rating.trim();
    if STRICT_SATISFACTORY.contains(&trimmed) {
        Some(QualityBand::High)
    } else if STRICT_UNSATISFACTORY.contains(&trimmed) {
        Some(QualityBand::Low)
    } else {
        None
    }
}

/// Broad HIGH/LOW band for a quality rating (the "broad QE" variant).
pub fn broad_band(rating: &str) -> Option<QualityBand> {
    let trimmed = rating.trim();
    if BROAD_SATISFACTORY.contains(&trimmed) {
        Some(QualityBand::High)
    } else if BROAD_UNSATISFACTORY.contains(&trimmed) {
        Some(QualityBand::Low)
    } else {
        None
    }
}

/// Severity score for a Quality at Entry label, 5 (best) down to 1 (worst).
///
/// Both `Unsatisfactory` and `Highly Unsatisfactory` score 1. Returns `None`
/// for unmapped labels, which excludes the record from combined-score
/// analysis entirely.
pub fn qae_score(label: &str) -> Option<u8> {
    match label.trim() {
        "Highly Satisfactory" => Some(5),
        "Satisfactory" => Some(4),
        "Moderately Satisfactory" => Some(3),
        "Moderately Unsatisfactory" => Some(2),
        "Unsatisfactory" | "Highly Unsatisfactory" => Some(1),
        _ => None,
    }
}

/// Severity score for an M&E quality label, 5 (best) down to 1.
pub fn me_score(label: &str) -> Option<u8> {
    match label.trim() {
        "High" => Some(5),
        "Substantial" => Some(4),
        "Modest" => Some(3),
        "Negligible" => Some(2),
        "Not Applicable" => Some(1),
        _ => None,
    }
}

/// `true` when the trimmed country name is a listed SIDS member.
pub fn is_sids(country: &str) -> bool {
    SIDS_COUNTRIES.contains(&country.trim())
}

/// `true` when the trimmed country name is a listed Pacific member.
pub fn is_pacific(country: &str) -> bool {
    PACIFIC_COUNTRIES.contains(&country.trim())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
