//! Stratified 2×2 aggregation over the loaded record set.
//!
//! Every comparative analysis in the report is the same computation: filter
//! to records with a non-blank quality rating and outcome, split into HIGH
//! and LOW strict-rating bands, count broad-satisfactory outcomes per band.
//! [`stratify`] runs that computation once per stratum of a categorical key;
//! [`compare_bands`] runs it over the whole filtered set.

use std::collections::BTreeMap;

use report_core::classify::{self, QualityBand};
use report_core::models::ProjectRecord;
use report_core::stats::{odds_ratio, percentage, OddsRatio};
use serde::{Deserialize, Serialize};

// ── GroupCounts ───────────────────────────────────────────────────────────────

/// 2×2 contingency counts for one stratum: HIGH/LOW quality band crossed
/// with broad-satisfactory outcome or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    /// Broad-satisfactory outcomes in the HIGH band.
    pub high_sat: u64,
    /// All records in the HIGH band.
    pub high_total: u64,
    /// Broad-satisfactory outcomes in the LOW band.
    pub low_sat: u64,
    /// All records in the LOW band.
    pub low_total: u64,
}

impl GroupCounts {
    /// Failures (not broad-satisfactory) in the HIGH band.
    pub fn high_fail(&self) -> u64 {
        self.high_total - self.high_sat
    }

    /// Failures in the LOW band.
    pub fn low_fail(&self) -> u64 {
        self.low_total - self.low_sat
    }

    /// Total records across both bands.
    pub fn n(&self) -> u64 {
        self.high_total + self.low_total
    }

    /// Success rate of the HIGH band (0 when empty).
    pub fn high_rate(&self) -> f64 {
        percentage(self.high_sat, self.high_total)
    }

    /// Success rate of the LOW band (0 when empty).
    pub fn low_rate(&self) -> f64 {
        percentage(self.low_sat, self.low_total)
    }

    /// Odds ratio of the 2×2 table.
    pub fn odds_ratio(&self) -> OddsRatio {
        odds_ratio(self.high_sat, self.high_fail(), self.low_sat, self.low_fail())
    }

    fn add(&mut self, band: QualityBand, success: bool) {
        match band {
            QualityBand::High => {
                self.high_total += 1;
                if success {
                    self.high_sat += 1;
                }
            }
            QualityBand::Low => {
                self.low_total += 1;
                if success {
                    self.low_sat += 1;
                }
            }
        }
    }
}

// ── RateCell / GroupComparison ────────────────────────────────────────────────

/// Success count and rate for one group of records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RateCell {
    /// Records in the group.
    pub n: u64,
    /// Broad-satisfactory outcomes in the group.
    pub successes: u64,
    /// `successes / n * 100`, 0 when the group is empty.
    pub rate: f64,
}

impl RateCell {
    /// Build a cell, computing the rate with the zero-on-empty convention.
    pub fn from_counts(successes: u64, n: u64) -> Self {
        Self {
            n,
            successes,
            rate: percentage(successes, n),
        }
    }

    /// Records in the group that were not broad-satisfactory.
    pub fn failures(&self) -> u64 {
        self.n - self.successes
    }
}

/// Head-to-head comparison of the HIGH and LOW quality bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupComparison {
    pub high: RateCell,
    pub low: RateCell,
    /// HIGH rate minus LOW rate, in percentage points.
    pub gap_pp: f64,
    pub odds: OddsRatio,
}

impl GroupComparison {
    /// Derive the comparison from accumulated counts.
    pub fn from_counts(counts: &GroupCounts) -> Self {
        let high = RateCell::from_counts(counts.high_sat, counts.high_total);
        let low = RateCell::from_counts(counts.low_sat, counts.low_total);
        Self {
            gap_pp: high.rate - low.rate,
            odds: counts.odds_ratio(),
            high,
            low,
        }
    }
}

// ── Aggregation drivers ───────────────────────────────────────────────────────

/// Accumulate the 2×2 counts over all records the band classifier accepts.
///
/// Records with a blank outcome, or for which `band_of` returns `None`
/// (blank or non-strict rating, missing companion fields), contribute
/// nothing. Success is always the broad-satisfactory outcome test.
pub fn count_bands<'a, I, Q>(records: I, band_of: Q) -> GroupCounts
where
    I: IntoIterator<Item = &'a ProjectRecord>,
    Q: Fn(&ProjectRecord) -> Option<QualityBand>,
{
    let mut counts = GroupCounts::default();
    for record in records {
        let outcome = match record.outcome.as_deref() {
            Some(o) => o,
            None => continue,
        };
        let band = match band_of(record) {
            Some(b) => b,
            None => continue,
        };
        counts.add(band, classify::is_broad_satisfactory(outcome));
    }
    counts
}

/// [`count_bands`] folded into a ready-to-render comparison.
pub fn compare_bands<'a, I, Q>(records: I, band_of: Q) -> GroupComparison
where
    I: IntoIterator<Item = &'a ProjectRecord>,
    Q: Fn(&ProjectRecord) -> Option<QualityBand>,
{
    GroupComparison::from_counts(&count_bands(records, band_of))
}

/// Group records by a categorical key and accumulate 2×2 counts per stratum.
///
/// The one reusable routine behind the sector, region, decade, lending-group
/// and FCS tables: `band_of` assigns the HIGH/LOW band (strict rating sets),
/// `key_of` extracts the stratum key. Records missing the outcome, the band
/// or the key are skipped for this dimension only. Strata come back sorted
/// by key.
pub fn stratify<'a, I, K, Q, S>(
    records: I,
    band_of: Q,
    key_of: S,
) -> BTreeMap<K, GroupCounts>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
    K: Ord,
    Q: Fn(&ProjectRecord) -> Option<QualityBand>,
    S: Fn(&ProjectRecord) -> Option<K>,
{
    let mut strata: BTreeMap<K, GroupCounts> = BTreeMap::new();
    for record in records {
        let outcome = match record.outcome.as_deref() {
            Some(o) => o,
            None => continue,
        };
        let band = match band_of(record) {
            Some(b) => b,
            None => continue,
        };
        let key = match key_of(record) {
            Some(k) => k,
            None => continue,
        };
        strata
            .entry(key)
            .or_default()
            .add(band, classify::is_broad_satisfactory(outcome));
    }
    strata
}

/// Broad-satisfactory success rate over records with a non-blank outcome.
pub fn success_rate<'a, I>(records: I) -> RateCell
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    let mut n = 0;
    let mut successes = 0;
    for record in records {
        let outcome = match record.outcome.as_deref() {
            Some(o) => o,
            None => continue,
        };
        n += 1;
        if classify::is_broad_satisfactory(outcome) {
            successes += 1;
        }
    }
    RateCell::from_counts(successes, n)
}

/// Decade bucket for a fiscal year: `(fy / 10) * 10`, floored at 1970.
///
/// Years before 1970 are excluded entirely rather than pooled.
pub fn decade_bucket(fy: i32) -> Option<i32> {
    let decade = (fy / 10) * 10;
    if decade < 1970 {
        None
    } else {
        Some(decade)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
