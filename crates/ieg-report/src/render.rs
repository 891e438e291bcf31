//! Plain-text rendering of the analysis report.
//!
//! Emits 14 numbered steps plus a closing summary block, with fixed-width
//! aligned columns. The layout is presentation only; every number comes
//! from the structured [`AnalysisReport`], which JSON consumers read
//! directly.

use report_core::formatting::{format_ci, format_count, format_odds, format_rate};
use report_data::aggregator::{GroupComparison, RateCell};
use report_data::analysis::{AnalysisReport, StratifiedTable};

/// Render the full report as plain text.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();

    // ── Step 1: verification ──────────────────────────────────────────────────
    section(&mut out, "STEP 1: DATASET VERIFICATION");
    let v = &report.verification;
    result(&mut out, "File", &v.path.display().to_string());
    result(&mut out, "MD5 (computed)", &v.computed_md5);
    result(&mut out, "MD5 (expected)", &v.expected_md5);
    result(&mut out, "MD5 MATCH", if v.matches { "YES" } else { "NO" });

    // ── Step 2: loading ───────────────────────────────────────────────────────
    section(&mut out, "STEP 2: DATA LOADING");
    result(
        &mut out,
        "Total records loaded",
        &format_count(report.total_records),
    );

    // ── Step 3: distributions ─────────────────────────────────────────────────
    section(&mut out, "STEP 3: COLUMN VALUE DISTRIBUTIONS");
    for dist in &report.distributions {
        pushln(&mut out, format!("\n  {}:", dist.field.to_uppercase()));
        for count in &dist.counts {
            pushln(
                &mut out,
                format!("    {:<30} {:>5}", count.label, count.count),
            );
        }
    }

    // ── Step 4: core statistics ───────────────────────────────────────────────
    section(&mut out, "STEP 4: CORE STATISTICS");
    let overview = &report.outcome_overview;
    pushln(
        &mut out,
        format!(
            "\n  Projects with Outcome rating:    {:>6}",
            format_count(overview.with_outcome)
        ),
    );
    pushln(
        &mut out,
        format!(
            "  Satisfactory (MS+S+HS):          {:>6} ({})",
            format_count(overview.broad_satisfactory.successes),
            format_rate(overview.broad_satisfactory.rate)
        ),
    );
    pushln(
        &mut out,
        format!(
            "  Unsatisfactory (MU+U+HU):        {:>6} ({})",
            format_count(overview.broad_unsatisfactory.successes),
            format_rate(overview.broad_unsatisfactory.rate)
        ),
    );
    pushln(
        &mut out,
        format!(
            "  Other/Missing:                   {:>6}",
            format_count(overview.unrated)
        ),
    );
    pushln(&mut out, "\n  Breakdown:".to_string());
    for label_count in &overview.label_breakdown {
        pushln(
            &mut out,
            format!(
                "    {:<30} {:>6}",
                format!("{}:", label_count.label),
                format_count(label_count.count)
            ),
        );
    }

    // ── Steps 5, 5b, 6: quality comparisons ───────────────────────────────────
    section(&mut out, "STEP 5: QUALITY AT ENTRY - STRICT ANALYSIS");
    comparison(&mut out, "QE", "S/HS", "U/HU", &report.qe_strict);

    section(&mut out, "STEP 5b: QUALITY AT ENTRY - BROAD ANALYSIS");
    comparison(&mut out, "QE Broad", "MS/S/HS", "MU/U/HU", &report.qe_broad);

    section(&mut out, "STEP 6: QUALITY OF SUPERVISION - STRICT ANALYSIS");
    comparison(&mut out, "QoS", "S/HS", "U/HU", &report.qos_strict);

    // ── Step 7: M&E levels ────────────────────────────────────────────────────
    section(&mut out, "STEP 7: M&E QUALITY ANALYSIS");
    for level in &report.me_levels {
        pushln(
            &mut out,
            format!(
                "  M&E {:<15} n={:>5}, Success={:>5}/{:>5} = {}",
                level.level,
                level.cell.n,
                level.cell.successes,
                level.cell.n,
                format_rate(level.cell.rate)
            ),
        );
    }

    // ── Step 8: certification ─────────────────────────────────────────────────
    section(&mut out, "STEP 8: CERTIFICATION (QE=S/HS AND QoS=S/HS)");
    let cert = &report.certification;
    pushln(
        &mut out,
        format!(
            "\n  CERTIFY (QE=S/HS & QoS=S/HS): n={}, Success={}/{} = {}",
            format_count(cert.certify.n),
            cert.certify.successes,
            cert.certify.n,
            format_rate(cert.certify.rate)
        ),
    );
    pushln(
        &mut out,
        format!(
            "  REJECT  (QE=U/HU & QoS=U/HU): n={}, Success={}/{} = {}",
            format_count(cert.reject.n),
            cert.reject.successes,
            cert.reject.n,
            format_rate(cert.reject.rate)
        ),
    );
    pushln(&mut out, format!("  GAP: {:.1} pp", cert.gap_pp));
    if let Some(odds) = &cert.odds {
        pushln(
            &mut out,
            format!("  OR = {} {}", format_odds(odds), format_ci(odds)),
        );
    }

    // ── Step 9: island groups ─────────────────────────────────────────────────
    section(&mut out, "STEP 9: SIDS ANALYSIS");
    island(&mut out, "ALL SIDS", &report.sids.overall);
    island(&mut out, "PACIFIC", &report.pacific.overall);
    if let Some(cmp) = &report.sids.qe_comparison {
        island_comparison(&mut out, "SIDS", cmp);
    }
    if let Some(cmp) = &report.pacific.qe_comparison {
        island_comparison(&mut out, "PACIFIC", cmp);
    }

    // ── Steps 10–13: stratified tables ────────────────────────────────────────
    section(&mut out, "STEP 10: SECTOR ANALYSIS (STRICT QE)");
    table(&mut out, &report.sectors);

    section(&mut out, "STEP 11: REGION ANALYSIS (STRICT QE)");
    table(&mut out, &report.regions);

    section(&mut out, "STEP 12: DECADE ANALYSIS (STRICT QE)");
    table(&mut out, &report.decades);

    section(&mut out, "STEP 13: INCOME GROUP & FCS ANALYSIS (STRICT QE)");
    table(&mut out, &report.lending_groups);
    table(&mut out, &report.fcs_status);

    // ── Step 14: combined scores ──────────────────────────────────────────────
    section(&mut out, "STEP 14: QAE + M&E COMBINED SCORE");
    pushln(
        &mut out,
        format!(
            "\n  {:<8} {:>6} {:>8} {:>8}",
            "Score", "n", "Success", "Rate"
        ),
    );
    for bin in &report.combined_scores.bins {
        pushln(
            &mut out,
            format!(
                "  {:<8} {:>6} {:>8} {:>8}",
                bin.score,
                bin.cell.n,
                bin.cell.successes,
                format_rate(bin.cell.rate)
            ),
        );
    }
    pushln(
        &mut out,
        format!("  {:<8} {:>6}", "TOTAL", report.combined_scores.total),
    );

    // ── Summary ───────────────────────────────────────────────────────────────
    section(&mut out, "SUMMARY: HEADLINE NUMBERS");
    pushln(
        &mut out,
        format!(
            "\n  Total projects:              {:>8}",
            format_count(report.total_records)
        ),
    );
    pushln(
        &mut out,
        format!(
            "  Projects with Outcome:       {:>8}",
            format_count(overview.with_outcome)
        ),
    );
    pushln(
        &mut out,
        format!(
            "  Overall success rate:        {:>8}",
            format_rate(overview.broad_satisfactory.rate)
        ),
    );
    summary_comparison(&mut out, "QE STRICT (S/HS vs U/HU)", &report.qe_strict);
    summary_comparison(&mut out, "QoS STRICT (S/HS vs U/HU)", &report.qos_strict);
    pushln(&mut out, "\n  CERTIFICATION:".to_string());
    pushln(
        &mut out,
        format!(
            "    CERTIFY success:           {:>8}  (n={})",
            format_rate(cert.certify.rate),
            format_count(cert.certify.n)
        ),
    );
    pushln(
        &mut out,
        format!(
            "    REJECT success:            {:>8}  (n={})",
            format_rate(cert.reject.rate),
            format_count(cert.reject.n)
        ),
    );
    pushln(
        &mut out,
        format!(
            "\n  SIDS: n={}, success={}",
            format_count(report.sids.overall.n),
            format_rate(report.sids.overall.rate)
        ),
    );
    pushln(
        &mut out,
        format!(
            "  PACIFIC: n={}, success={}",
            format_count(report.pacific.overall.n),
            format_rate(report.pacific.overall.rate)
        ),
    );
    pushln(
        &mut out,
        format!("\n  Generated at: {}", report.metadata.generated_at),
    );

    out
}

// ── Rendering helpers ─────────────────────────────────────────────────────────

fn pushln(out: &mut String, line: String) {
    out.push_str(&line);
    out.push('\n');
}

fn section(out: &mut String, title: &str) {
    pushln(out, format!("\n{}", "=".repeat(70)));
    pushln(out, format!("  {}", title));
    pushln(out, "=".repeat(70));
}

fn result(out: &mut String, label: &str, value: &str) {
    pushln(out, format!("  {:<45} {}", label, value));
}

/// Render one HIGH vs LOW comparison the way steps 5, 5b and 6 do.
fn comparison(out: &mut String, axis: &str, high_label: &str, low_label: &str, cmp: &GroupComparison) {
    pushln(
        out,
        format!(
            "\n  HIGH {} ({}): n={}, Success={}/{} = {}",
            axis,
            high_label,
            format_count(cmp.high.n),
            cmp.high.successes,
            cmp.high.n,
            format_rate(cmp.high.rate)
        ),
    );
    pushln(
        out,
        format!(
            "  LOW {} ({}):  n={}, Success={}/{} = {}",
            axis,
            low_label,
            format_count(cmp.low.n),
            cmp.low.successes,
            cmp.low.n,
            format_rate(cmp.low.rate)
        ),
    );
    pushln(
        out,
        format!("  TOTAL n = {}", format_count(cmp.high.n + cmp.low.n)),
    );
    pushln(out, format!("  GAP: {:.1} percentage points", cmp.gap_pp));
    pushln(
        out,
        format!("  OR = {} {}", format_odds(&cmp.odds), format_ci(&cmp.odds)),
    );
}

fn island(out: &mut String, label: &str, cell: &RateCell) {
    pushln(
        out,
        format!(
            "  {:<9} n={}, Success={}/{} = {}",
            format!("{}:", label),
            format_count(cell.n),
            cell.successes,
            cell.n,
            format_rate(cell.rate)
        ),
    );
}

fn island_comparison(out: &mut String, name: &str, cmp: &GroupComparison) {
    pushln(
        out,
        format!(
            "\n  {} QE HIGH: n={}, Success={}",
            name,
            cmp.high.n,
            format_rate(cmp.high.rate)
        ),
    );
    pushln(
        out,
        format!(
            "  {} QE LOW:  n={}, Success={}",
            name,
            cmp.low.n,
            format_rate(cmp.low.rate)
        ),
    );
    pushln(out, format!("  {} OR = {}", name, format_odds(&cmp.odds)));
}

/// Render one stratified table with its header and aligned columns.
fn table(out: &mut String, table: &StratifiedTable) {
    pushln(
        out,
        format!(
            "\n  {:<40} {:>5} {:>7} {:>7} {:>8}",
            table.dimension, "n", "HIGH%", "LOW%", "OR"
        ),
    );
    pushln(
        out,
        format!(
            "  {:<40} {:>5} {:>7} {:>7} {:>8}",
            "-".repeat(40),
            "---",
            "-----",
            "-----",
            "------"
        ),
    );
    for row in &table.rows {
        pushln(
            out,
            format!(
                "  {:<40} {:>5} {:>6.1}% {:>6.1}% {:>8}",
                row.key,
                row.n,
                row.high.rate,
                row.low.rate,
                format_odds(&row.odds)
            ),
        );
    }
}

fn summary_comparison(out: &mut String, title: &str, cmp: &GroupComparison) {
    pushln(out, format!("\n  {}:", title));
    pushln(
        out,
        format!(
            "    HIGH success:              {:>8}  (n={})",
            format_rate(cmp.high.rate),
            format_count(cmp.high.n)
        ),
    );
    pushln(
        out,
        format!(
            "    LOW success:               {:>8}  (n={})",
            format_rate(cmp.low.rate),
            format_count(cmp.low.n)
        ),
    );
    pushln(
        out,
        format!(
            "    OR:                        {:>8}  {}",
            format_odds(&cmp.odds),
            format_ci(&cmp.odds)
        ),
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
