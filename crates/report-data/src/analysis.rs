//! Full analysis pipeline for the ratings report.
//!
//! Runs every section of the replication report over the loaded record set
//! and returns a structured [`AnalysisReport`]. Rendering to text or JSON is
//! a consumer concern; nothing here touches stdout.

use std::collections::BTreeMap;

use chrono::Utc;
use report_core::classify::{self, QualityBand};
use report_core::models::ProjectRecord;
use report_core::stats::OddsRatio;
use serde::{Deserialize, Serialize};

use crate::aggregator::{
    compare_bands, count_bands, decade_bucket, stratify, success_rate, GroupComparison,
    GroupCounts, RateCell,
};
use crate::reader::DatasetVerification;

// ── Suppression thresholds ────────────────────────────────────────────────────

/// Minimum stratum size before a sector row is reported.
pub const SECTOR_MIN_N: u64 = 20;
/// Minimum stratum size for region rows.
pub const REGION_MIN_N: u64 = 10;
/// Minimum stratum size for decade rows.
pub const DECADE_MIN_N: u64 = 10;
/// Minimum stratum size for lending-group and FCS rows.
pub const LENDING_MIN_N: u64 = 5;

// ── Report value types ────────────────────────────────────────────────────────

/// One label and how many records carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Non-blank value counts for one column, sorted by label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueDistribution {
    pub field: String,
    pub counts: Vec<LabelCount>,
}

/// Headline outcome figures over the full record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeOverview {
    /// Records with a non-blank outcome rating.
    pub with_outcome: u64,
    /// Broad-satisfactory outcomes, rated against `with_outcome`.
    pub broad_satisfactory: RateCell,
    /// Broad-unsatisfactory outcomes, rated against `with_outcome`.
    pub broad_unsatisfactory: RateCell,
    /// Records with no outcome rating at all.
    pub unrated: u64,
    /// Per-label counts over the six-point scale, best to worst.
    pub label_breakdown: Vec<LabelCount>,
}

/// Success rate for one M&E quality level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRate {
    pub level: String,
    pub cell: RateCell,
}

/// The certification analysis: projects rated strict-satisfactory on both
/// Quality at Entry and Quality of Supervision against projects rated
/// strict-unsatisfactory on both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationAnalysis {
    pub certify: RateCell,
    pub reject: RateCell,
    pub gap_pp: f64,
    /// Present only when both groups are non-empty.
    pub odds: Option<OddsRatio>,
}

/// Success figures for one island membership group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslandGroupAnalysis {
    pub name: String,
    /// Success rate over all group members with an outcome rating.
    pub overall: RateCell,
    /// Strict-QE comparison within the group, when both bands are populated.
    pub qe_comparison: Option<GroupComparison>,
}

/// One reported stratum of a stratified table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratumRow {
    pub key: String,
    pub n: u64,
    pub high: RateCell,
    pub low: RateCell,
    pub odds: OddsRatio,
}

/// Strict-QE 2×2 results per stratum of one categorical dimension.
///
/// Strata below `min_group_size` are suppressed from `rows` (not from any
/// cross-table total).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratifiedTable {
    pub dimension: String,
    pub min_group_size: u64,
    pub rows: Vec<StratumRow>,
}

/// One combined QAE + M&E score bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBin {
    pub score: u8,
    pub cell: RateCell,
}

/// Success rates per combined QAE + M&E severity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedScoreTable {
    pub bins: Vec<ScoreBin>,
    /// Records contributing to any bin.
    pub total: u64,
}

/// Metadata produced alongside the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// RFC 3339 timestamp when this report was generated.
    pub generated_at: String,
    /// Wall-clock seconds spent reading and parsing the dataset.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent on the analysis itself.
    pub analysis_time_seconds: f64,
}

/// The complete output of [`run_analysis`], in report section order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub verification: DatasetVerification,
    pub total_records: u64,
    pub distributions: Vec<ValueDistribution>,
    pub outcome_overview: OutcomeOverview,
    pub qe_strict: GroupComparison,
    pub qe_broad: GroupComparison,
    pub qos_strict: GroupComparison,
    pub me_levels: Vec<LevelRate>,
    pub certification: CertificationAnalysis,
    pub sids: IslandGroupAnalysis,
    pub pacific: IslandGroupAnalysis,
    pub sectors: StratifiedTable,
    pub regions: StratifiedTable,
    pub decades: StratifiedTable,
    pub lending_groups: StratifiedTable,
    pub fcs_status: StratifiedTable,
    pub combined_scores: CombinedScoreTable,
    pub metadata: ReportMetadata,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the full analysis over the loaded record set.
///
/// The record sequence is read-only; every section filters and counts it
/// independently, so a record excluded from one slice (say, an unparseable
/// fiscal year) still contributes to every other.
pub fn run_analysis(
    verification: DatasetVerification,
    records: &[ProjectRecord],
    load_time_seconds: f64,
) -> AnalysisReport {
    let analysis_start = std::time::Instant::now();

    let strict_qe =
        |r: &ProjectRecord| r.quality_at_entry.as_deref().and_then(classify::strict_band);
    let broad_qe =
        |r: &ProjectRecord| r.quality_at_entry.as_deref().and_then(classify::broad_band);
    let strict_qos = |r: &ProjectRecord| {
        r.quality_of_supervision
            .as_deref()
            .and_then(classify::strict_band)
    };

    let distributions = vec![
        distribution(records, "Outcome", |r| r.outcome.as_deref()),
        distribution(records, "Quality at Entry", |r| {
            r.quality_at_entry.as_deref()
        }),
        distribution(records, "Quality of Supervision", |r| {
            r.quality_of_supervision.as_deref()
        }),
        distribution(records, "M&E Quality", |r| r.me_quality.as_deref()),
        distribution(records, "Evaluation Type", |r| r.evaluation_type.as_deref()),
    ];

    let sectors = table_from_strata(
        "Sector",
        SECTOR_MIN_N,
        stratify(records, strict_qe, |r| r.sector().map(str::to_string)),
        String::clone,
    );
    let regions = table_from_strata(
        "Region",
        REGION_MIN_N,
        stratify(records, strict_qe, |r| r.wb_region.clone()),
        String::clone,
    );
    let decades = table_from_strata(
        "Decade",
        DECADE_MIN_N,
        stratify(records, strict_qe, |r| r.approval_fy.and_then(decade_bucket)),
        |decade| format!("{}s", decade),
    );
    let lending_groups = table_from_strata(
        "Lending Group",
        LENDING_MIN_N,
        stratify(records, strict_qe, |r| r.lending_group.clone()),
        String::clone,
    );
    let fcs_status = table_from_strata(
        "FCS Status",
        LENDING_MIN_N,
        stratify(records, strict_qe, |r| r.fcs_status.clone()),
        String::clone,
    );

    let report = AnalysisReport {
        total_records: records.len() as u64,
        distributions,
        outcome_overview: outcome_overview(records),
        qe_strict: compare_bands(records, strict_qe),
        qe_broad: compare_bands(records, broad_qe),
        qos_strict: compare_bands(records, strict_qos),
        me_levels: me_levels(records),
        certification: certification(records),
        sids: island_group(records, "SIDS", classify::is_sids),
        pacific: island_group(records, "Pacific", classify::is_pacific),
        sectors,
        regions,
        decades,
        lending_groups,
        fcs_status,
        combined_scores: combined_scores(records),
        metadata: ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            load_time_seconds,
            analysis_time_seconds: analysis_start.elapsed().as_secs_f64(),
        },
        verification,
    };

    tracing::debug!(
        "Analysed {} records in {:.3}s",
        report.total_records,
        report.metadata.analysis_time_seconds
    );

    report
}

// ── Section builders ──────────────────────────────────────────────────────────

/// Count non-blank values of one column, sorted by label.
fn distribution(
    records: &[ProjectRecord],
    field: &str,
    extract: fn(&ProjectRecord) -> Option<&str>,
) -> ValueDistribution {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        if let Some(value) = extract(record) {
            *counts.entry(value.to_string()).or_default() += 1;
        }
    }
    ValueDistribution {
        field: field.to_string(),
        counts: counts
            .into_iter()
            .map(|(label, count)| LabelCount { label, count })
            .collect(),
    }
}

fn outcome_overview(records: &[ProjectRecord]) -> OutcomeOverview {
    let rated: Vec<&str> = records.iter().filter_map(|r| r.outcome.as_deref()).collect();
    let with_outcome = rated.len() as u64;
    let n_sat = rated
        .iter()
        .filter(|o| classify::is_broad_satisfactory(o))
        .count() as u64;
    let n_unsat = rated
        .iter()
        .filter(|o| classify::is_broad_unsatisfactory(o))
        .count() as u64;

    let label_breakdown = classify::OUTCOME_LABELS
        .iter()
        .map(|&label| LabelCount {
            label: label.to_string(),
            count: rated.iter().filter(|&&o| o == label).count() as u64,
        })
        .collect();

    OutcomeOverview {
        with_outcome,
        broad_satisfactory: RateCell::from_counts(n_sat, with_outcome),
        broad_unsatisfactory: RateCell::from_counts(n_unsat, with_outcome),
        unrated: records.len() as u64 - with_outcome,
        label_breakdown,
    }
}

/// Success rate per M&E quality level, in scale order.
fn me_levels(records: &[ProjectRecord]) -> Vec<LevelRate> {
    classify::ME_LEVELS
        .iter()
        .map(|level| LevelRate {
            level: level.to_string(),
            cell: success_rate(
                records
                    .iter()
                    .filter(|r| r.me_quality.as_deref() == Some(*level)),
            ),
        })
        .collect()
}

fn certification(records: &[ProjectRecord]) -> CertificationAnalysis {
    // CERTIFY requires strict-satisfactory on both axes, REJECT requires
    // strict-unsatisfactory on both; mixed or moderate ratings join neither.
    let counts = count_bands(records, |r| {
        let qe = classify::strict_band(r.quality_at_entry.as_deref()?);
        let qos = classify::strict_band(r.quality_of_supervision.as_deref()?);
        match (qe, qos) {
            (Some(QualityBand::High), Some(QualityBand::High)) => Some(QualityBand::High),
            (Some(QualityBand::Low), Some(QualityBand::Low)) => Some(QualityBand::Low),
            _ => None,
        }
    });

    let certify = RateCell::from_counts(counts.high_sat, counts.high_total);
    let reject = RateCell::from_counts(counts.low_sat, counts.low_total);
    let odds = if counts.high_total > 0 && counts.low_total > 0 {
        Some(counts.odds_ratio())
    } else {
        None
    };

    CertificationAnalysis {
        gap_pp: certify.rate - reject.rate,
        certify,
        reject,
        odds,
    }
}

fn island_group(
    records: &[ProjectRecord],
    name: &str,
    member: fn(&str) -> bool,
) -> IslandGroupAnalysis {
    let members: Vec<&ProjectRecord> = records
        .iter()
        .filter(|r| r.outcome.is_some())
        .filter(|r| r.country.as_deref().map(member).unwrap_or(false))
        .collect();

    let overall = success_rate(members.iter().copied());

    let comparison = compare_bands(members.iter().copied(), |r| {
        r.quality_at_entry.as_deref().and_then(classify::strict_band)
    });
    let qe_comparison = if comparison.high.n > 0 && comparison.low.n > 0 {
        Some(comparison)
    } else {
        None
    };

    IslandGroupAnalysis {
        name: name.to_string(),
        overall,
        qe_comparison,
    }
}

/// Fold stratified counts into reported rows, applying the suppression
/// threshold and formatting the stratum key for display.
fn table_from_strata<K, F>(
    dimension: &str,
    min_group_size: u64,
    strata: BTreeMap<K, GroupCounts>,
    label: F,
) -> StratifiedTable
where
    K: Ord,
    F: Fn(&K) -> String,
{
    let rows = strata
        .iter()
        .filter(|(_, counts)| counts.n() >= min_group_size)
        .map(|(key, counts)| StratumRow {
            key: label(key),
            n: counts.n(),
            high: RateCell::from_counts(counts.high_sat, counts.high_total),
            low: RateCell::from_counts(counts.low_sat, counts.low_total),
            odds: counts.odds_ratio(),
        })
        .collect();

    StratifiedTable {
        dimension: dimension.to_string(),
        min_group_size,
        rows,
    }
}

fn combined_scores(records: &[ProjectRecord]) -> CombinedScoreTable {
    // (satisfactory, total) per combined score.
    let mut bins: BTreeMap<u8, (u64, u64)> = BTreeMap::new();

    for record in records {
        let outcome = match record.outcome.as_deref() {
            Some(o) => o,
            None => continue,
        };
        // Unmapped labels exclude the record entirely, never coerce to a
        // default score.
        let qae = match record.quality_at_entry.as_deref().and_then(classify::qae_score) {
            Some(s) => s,
            None => continue,
        };
        let me = match record.me_quality.as_deref().and_then(classify::me_score) {
            Some(s) => s,
            None => continue,
        };

        let bin = bins.entry(qae + me).or_default();
        bin.1 += 1;
        if classify::is_broad_satisfactory(outcome) {
            bin.0 += 1;
        }
    }

    let total = bins.values().map(|(_, total)| total).sum();
    CombinedScoreTable {
        bins: bins
            .into_iter()
            .map(|(score, (sat, n))| ScoreBin {
                score,
                cell: RateCell::from_counts(sat, n),
            })
            .collect(),
        total,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::EXPECTED_MD5;
    use std::path::PathBuf;

    fn verification() -> DatasetVerification {
        DatasetVerification {
            path: PathBuf::from("test.csv"),
            computed_md5: "0".repeat(32),
            expected_md5: EXPECTED_MD5.to_string(),
            matches: false,
        }
    }

    fn record(qe: Option<&str>, outcome: Option<&str>) -> ProjectRecord {
        ProjectRecord {
            quality_at_entry: qe.map(str::to_string),
            outcome: outcome.map(str::to_string),
            ..Default::default()
        }
    }

    fn run(records: &[ProjectRecord]) -> AnalysisReport {
        run_analysis(verification(), records, 0.0)
    }

    // ── QE strict end-to-end scenario ─────────────────────────────────────────

    #[test]
    fn test_qe_strict_four_record_scenario() {
        let records = vec![
            record(Some("Satisfactory"), Some("Satisfactory")),
            record(Some("Satisfactory"), Some("Unsatisfactory")),
            record(Some("Unsatisfactory"), Some("Satisfactory")),
            record(Some("Unsatisfactory"), Some("Unsatisfactory")),
        ];
        let report = run(&records);

        assert_eq!(report.qe_strict.high.n, 2);
        assert_eq!(report.qe_strict.high.successes, 1);
        assert_eq!(report.qe_strict.high.rate, 50.0);
        assert_eq!(report.qe_strict.low.n, 2);
        assert_eq!(report.qe_strict.low.rate, 50.0);
        assert_eq!(report.qe_strict.odds.ratio, 1.0);
    }

    #[test]
    fn test_qe_broad_includes_moderate_ratings() {
        let records = vec![
            record(Some("Moderately Satisfactory"), Some("Satisfactory")),
            record(Some("Moderately Unsatisfactory"), Some("Unsatisfactory")),
        ];
        let report = run(&records);

        // Strict analysis sees neither record; broad sees both.
        assert_eq!(report.qe_strict.high.n, 0);
        assert_eq!(report.qe_broad.high.n, 1);
        assert_eq!(report.qe_broad.low.n, 1);
    }

    // ── Outcome overview ──────────────────────────────────────────────────────

    #[test]
    fn test_outcome_overview_rates_against_rated_denominator() {
        let records = vec![
            record(None, Some("Satisfactory")),
            record(None, Some("Moderately Satisfactory")),
            record(None, Some("Unsatisfactory")),
            record(None, None),
        ];
        let report = run(&records);
        let overview = &report.outcome_overview;

        assert_eq!(report.total_records, 4);
        assert_eq!(overview.with_outcome, 3);
        assert_eq!(overview.unrated, 1);
        assert_eq!(overview.broad_satisfactory.successes, 2);
        assert!((overview.broad_satisfactory.rate - 66.666_666).abs() < 1e-3);
        assert_eq!(overview.broad_unsatisfactory.successes, 1);
    }

    #[test]
    fn test_outcome_label_breakdown_in_scale_order() {
        let records = vec![
            record(None, Some("Highly Satisfactory")),
            record(None, Some("Unsatisfactory")),
            record(None, Some("Unsatisfactory")),
        ];
        let report = run(&records);
        let breakdown = &report.outcome_overview.label_breakdown;

        assert_eq!(breakdown.len(), 6);
        assert_eq!(breakdown[0].label, "Highly Satisfactory");
        assert_eq!(breakdown[0].count, 1);
        assert_eq!(breakdown[4].label, "Unsatisfactory");
        assert_eq!(breakdown[4].count, 2);
    }

    // ── Distributions ─────────────────────────────────────────────────────────

    #[test]
    fn test_distributions_count_non_blank_sorted() {
        let mut a = record(Some("Satisfactory"), Some("Satisfactory"));
        a.evaluation_type = Some("PPAR".to_string());
        let mut b = record(None, Some("Unsatisfactory"));
        b.evaluation_type = Some("ICR Review".to_string());
        let c = record(None, None);

        let report = run(&[a, b, c]);
        let eval_types = report
            .distributions
            .iter()
            .find(|d| d.field == "Evaluation Type")
            .unwrap();

        let labels: Vec<&str> = eval_types.counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["ICR Review", "PPAR"]);
    }

    // ── M&E levels ────────────────────────────────────────────────────────────

    #[test]
    fn test_me_levels_success_rates() {
        let mut a = record(None, Some("Satisfactory"));
        a.me_quality = Some("High".to_string());
        let mut b = record(None, Some("Unsatisfactory"));
        b.me_quality = Some("High".to_string());
        let mut c = record(None, Some("Satisfactory"));
        c.me_quality = Some("Negligible".to_string());

        let report = run(&[a, b, c]);
        assert_eq!(report.me_levels.len(), 4);

        let high = &report.me_levels[0];
        assert_eq!(high.level, "High");
        assert_eq!(high.cell.n, 2);
        assert_eq!(high.cell.rate, 50.0);

        let substantial = &report.me_levels[1];
        assert_eq!(substantial.cell.n, 0);
        assert_eq!(substantial.cell.rate, 0.0);
    }

    // ── Certification ─────────────────────────────────────────────────────────

    #[test]
    fn test_certification_requires_both_axes() {
        let mut certify = record(Some("Satisfactory"), Some("Satisfactory"));
        certify.quality_of_supervision = Some("Highly Satisfactory".to_string());
        let mut reject = record(Some("Unsatisfactory"), Some("Unsatisfactory"));
        reject.quality_of_supervision = Some("Unsatisfactory".to_string());
        // Mixed ratings join neither group.
        let mut mixed = record(Some("Satisfactory"), Some("Satisfactory"));
        mixed.quality_of_supervision = Some("Unsatisfactory".to_string());

        let report = run(&[certify, reject, mixed]);
        let cert = &report.certification;

        assert_eq!(cert.certify.n, 1);
        assert_eq!(cert.reject.n, 1);
        assert!(cert.odds.is_some());
    }

    #[test]
    fn test_certification_odds_absent_when_group_empty() {
        let mut certify = record(Some("Satisfactory"), Some("Satisfactory"));
        certify.quality_of_supervision = Some("Satisfactory".to_string());

        let report = run(&[certify]);
        assert_eq!(report.certification.certify.n, 1);
        assert_eq!(report.certification.reject.n, 0);
        assert!(report.certification.odds.is_none());
    }

    // ── Island groups ─────────────────────────────────────────────────────────

    #[test]
    fn test_fiji_counts_in_both_island_groups() {
        let mut fiji = record(None, Some("Satisfactory"));
        fiji.country = Some("Fiji".to_string());
        let mut singapore = record(None, Some("Satisfactory"));
        singapore.country = Some("Singapore".to_string());

        let report = run(&[fiji, singapore]);
        assert_eq!(report.sids.overall.n, 2);
        assert_eq!(report.pacific.overall.n, 1);
    }

    #[test]
    fn test_island_qe_comparison_needs_both_bands() {
        let mut fiji_high = record(Some("Satisfactory"), Some("Satisfactory"));
        fiji_high.country = Some("Fiji".to_string());

        let report = run(&[fiji_high.clone()]);
        // Only the HIGH band is populated; the comparison is withheld.
        assert!(report.pacific.qe_comparison.is_none());

        let mut fiji_low = record(Some("Unsatisfactory"), Some("Unsatisfactory"));
        fiji_low.country = Some("Fiji".to_string());
        let report = run(&[fiji_high, fiji_low]);
        let cmp = report.pacific.qe_comparison.unwrap();
        assert_eq!(cmp.high.n, 1);
        assert_eq!(cmp.low.n, 1);
    }

    // ── Stratified tables ─────────────────────────────────────────────────────

    #[test]
    fn test_region_table_suppresses_small_strata() {
        let mut records = Vec::new();
        // 10 strict-rated records in AFR: reported.
        for i in 0..10 {
            let mut r = record(
                Some(if i % 2 == 0 { "Satisfactory" } else { "Unsatisfactory" }),
                Some("Satisfactory"),
            );
            r.wb_region = Some("AFR".to_string());
            records.push(r);
        }
        // 3 in EAP: below the threshold of 10, suppressed.
        for _ in 0..3 {
            let mut r = record(Some("Satisfactory"), Some("Satisfactory"));
            r.wb_region = Some("EAP".to_string());
            records.push(r);
        }

        let report = run(&records);
        assert_eq!(report.regions.min_group_size, REGION_MIN_N);
        assert_eq!(report.regions.rows.len(), 1);
        assert_eq!(report.regions.rows[0].key, "AFR");
        assert_eq!(report.regions.rows[0].n, 10);
    }

    #[test]
    fn test_sector_falls_back_to_practice_group() {
        let mut records = Vec::new();
        for _ in 0..20 {
            let mut r = record(Some("Satisfactory"), Some("Satisfactory"));
            r.practice_group = Some("Sustainable Development".to_string());
            records.push(r);
        }
        let report = run(&records);
        assert_eq!(report.sectors.rows.len(), 1);
        assert_eq!(report.sectors.rows[0].key, "Sustainable Development");
    }

    #[test]
    fn test_decade_table_buckets_and_floors() {
        let mut records = Vec::new();
        for _ in 0..10 {
            let mut r = record(Some("Satisfactory"), Some("Satisfactory"));
            r.approval_fy = Some(1987);
            records.push(r);
        }
        // Pre-1970 years are excluded entirely.
        for _ in 0..10 {
            let mut r = record(Some("Satisfactory"), Some("Satisfactory"));
            r.approval_fy = Some(1965);
            records.push(r);
        }
        let report = run(&records);
        assert_eq!(report.decades.rows.len(), 1);
        assert_eq!(report.decades.rows[0].key, "1980s");
    }

    #[test]
    fn test_stratum_row_unbounded_odds() {
        let mut records = Vec::new();
        // All HIGH-band records succeed: b == 0, the sentinel applies.
        for i in 0..10 {
            let mut r = record(
                Some(if i < 8 { "Satisfactory" } else { "Unsatisfactory" }),
                Some(if i < 9 { "Satisfactory" } else { "Unsatisfactory" }),
            );
            r.wb_region = Some("SAR".to_string());
            records.push(r);
        }
        let report = run(&records);
        assert!(report.regions.rows[0].odds.is_unbounded());
    }

    // ── Combined scores ───────────────────────────────────────────────────────

    #[test]
    fn test_combined_score_buckets() {
        let mut a = record(Some("Highly Satisfactory"), Some("Satisfactory"));
        a.me_quality = Some("Substantial".to_string());
        let mut b = record(Some("Satisfactory"), Some("Unsatisfactory"));
        b.me_quality = Some("Not Applicable".to_string());

        let report = run(&[a, b]);
        let scores: Vec<u8> = report.combined_scores.bins.iter().map(|b| b.score).collect();
        // HS(5) + Substantial(4) = 9; S(4) + Not Applicable(1) = 5.
        assert_eq!(scores, [5, 9]);
        assert_eq!(report.combined_scores.total, 2);

        let bin9 = report.combined_scores.bins.iter().find(|b| b.score == 9).unwrap();
        assert_eq!(bin9.cell.successes, 1);
    }

    #[test]
    fn test_combined_score_excludes_unmapped_labels() {
        let mut unmapped = record(Some("Satisfactory"), Some("Satisfactory"));
        unmapped.me_quality = Some("Unknown Level".to_string());
        let missing_me = record(Some("Satisfactory"), Some("Satisfactory"));

        let report = run(&[unmapped, missing_me]);
        assert!(report.combined_scores.bins.is_empty());
        assert_eq!(report.combined_scores.total, 0);
    }

    // ── Record exclusion is per-slice ─────────────────────────────────────────

    #[test]
    fn test_bad_year_excluded_from_decades_only() {
        let mut r = record(Some("Satisfactory"), Some("Satisfactory"));
        r.wb_region = Some("AFR".to_string());
        r.approval_fy = None; // unparseable at load

        let records: Vec<ProjectRecord> = (0..10).map(|_| r.clone()).collect();
        let report = run(&records);

        assert!(report.decades.rows.is_empty());
        assert_eq!(report.regions.rows.len(), 1);
        assert_eq!(report.qe_strict.high.n, 10);
    }

    // ── Full pipeline from CSV bytes ──────────────────────────────────────────

    #[test]
    fn test_pipeline_from_csv_bytes() {
        let data = "Outcome,Quality at Entry,Country / Economy\n\
                    Satisfactory,Satisfactory,Fiji\n\
                    Unsatisfactory,Unsatisfactory,Singapore\n";
        let records = crate::reader::load_records(data.as_bytes()).unwrap();
        let report = run(&records);

        assert_eq!(report.total_records, 2);
        assert_eq!(report.qe_strict.high.n, 1);
        assert_eq!(report.qe_strict.low.n, 1);
        // Fiji is in both island groups; Singapore only in SIDS.
        assert_eq!(report.sids.overall.n, 2);
        assert_eq!(report.pacific.overall.n, 1);
    }

    // ── Metadata ──────────────────────────────────────────────────────────────

    #[test]
    fn test_metadata_carries_timings() {
        let report = run(&[]);
        assert_eq!(report.metadata.load_time_seconds, 0.0);
        assert!(report.metadata.analysis_time_seconds >= 0.0);
        assert!(!report.metadata.generated_at.is_empty());
    }
}
