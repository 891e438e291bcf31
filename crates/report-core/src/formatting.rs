//! Display helpers for counts, rates and odds ratios.

use crate::stats::OddsRatio;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use report_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a rate as a percentage with one decimal place, e.g. `"50.0%"`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// Format an odds ratio for display: one decimal place, or the infinity
/// symbol when the table had perfect separation.
pub fn format_odds(or: &OddsRatio) -> String {
    if or.is_unbounded() {
        "∞".to_string()
    } else {
        format!("{:.1}", or.ratio)
    }
}

/// Format the 95% confidence interval, e.g. `"(95% CI: 1.2 – 3.4)"`.
///
/// Any infinite bound (perfect separation, or a degenerate interval from an
/// empty cell) renders as `∞`.
pub fn format_ci(or: &OddsRatio) -> String {
    format!(
        "(95% CI: {} – {})",
        format_bound(or.ci_low),
        format_bound(or.ci_high)
    )
}

fn format_bound(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{:.1}", value)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::odds_ratio;

    // ── format_count ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(5), "5");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_thousands() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
    }

    #[test]
    fn test_format_count_millions() {
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    // ── format_rate ───────────────────────────────────────────────────────────

    #[test]
    fn test_format_rate_one_decimal() {
        assert_eq!(format_rate(50.0), "50.0%");
        assert_eq!(format_rate(33.333), "33.3%");
        assert_eq!(format_rate(0.0), "0.0%");
    }

    // ── format_odds / format_ci ───────────────────────────────────────────────

    #[test]
    fn test_format_odds_finite() {
        let or = odds_ratio(10, 5, 4, 8);
        assert_eq!(format_odds(&or), "4.0");
    }

    #[test]
    fn test_format_odds_unbounded_shows_infinity() {
        let or = odds_ratio(10, 0, 4, 8);
        assert_eq!(format_odds(&or), "∞");
    }

    #[test]
    fn test_format_ci_finite() {
        let or = odds_ratio(1, 1, 1, 1);
        let ci = format_ci(&or);
        assert!(ci.starts_with("(95% CI: 0.0 – "), "ci = {ci}");
        assert!(ci.ends_with(')'));
    }

    #[test]
    fn test_format_ci_unbounded() {
        let or = odds_ratio(3, 0, 2, 1);
        assert_eq!(format_ci(&or), "(95% CI: ∞ – ∞)");
    }

    #[test]
    fn test_format_ci_degenerate_upper_bound() {
        // a == 0 leaves the ratio finite but the interval (0, ∞).
        let or = odds_ratio(0, 5, 4, 8);
        assert_eq!(format_ci(&or), "(95% CI: 0.0 – ∞)");
    }
}
