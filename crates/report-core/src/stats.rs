//! Statistics primitives: safe percentage and the 2×2 odds ratio with
//! Woolf's log-odds confidence interval.
//!
//! Every aggregate table in the report composes these two functions, so
//! their edge-case behaviour is load-bearing: empty denominators yield 0,
//! and perfect separation yields an infinity sentinel rather than an error.

use serde::{Deserialize, Serialize};

// ── Percentage ────────────────────────────────────────────────────────────────

/// `successes / total * 100`, or `0.0` when `total` is zero.
///
/// The zero-on-empty convention is deliberate: tiny or absent groups report
/// a 0% rate instead of failing, and every downstream table relies on it.
pub fn percentage(successes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    successes as f64 / total as f64 * 100.0
}

// ── Odds ratio ────────────────────────────────────────────────────────────────

/// Odds ratio with its 95% confidence interval.
///
/// When `is_unbounded()` reports `true` the table had perfect separation and
/// all three values are positive infinity; renderers must display a distinct
/// symbol (`∞`) rather than a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsRatio {
    pub ratio: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl OddsRatio {
    /// `true` when the ratio is the perfect-separation sentinel.
    pub fn is_unbounded(&self) -> bool {
        self.ratio.is_infinite()
    }
}

/// Odds ratio from a 2×2 contingency table.
///
/// * `a` – successes in the high-quality group
/// * `b` – failures in the high-quality group
/// * `c` – successes in the low-quality group
/// * `d` – failures in the low-quality group
///
/// `b == 0` or `c == 0` makes the ratio unbounded: all three outputs are
/// positive infinity. Otherwise the ratio is `(a·d)/(b·c)` and the interval
/// follows Woolf's method: the standard error of the log ratio is
/// `sqrt(1/a + 1/b + 1/c + 1/d)`, treated as infinite when any cell is zero
/// (the interval then degenerates to `(0, ∞)`), and the 95% bounds are
/// `exp(ln(ratio) ± 1.96·SE)`.
pub fn odds_ratio(a: u64, b: u64, c: u64, d: u64) -> OddsRatio {
    if b == 0 || c == 0 {
        return OddsRatio {
            ratio: f64::INFINITY,
            ci_low: f64::INFINITY,
            ci_high: f64::INFINITY,
        };
    }

    let ratio = (a as f64 * d as f64) / (b as f64 * c as f64);

    if a == 0 || d == 0 {
        // An empty cell makes the log-variance estimate infinite.
        return OddsRatio {
            ratio,
            ci_low: 0.0,
            ci_high: f64::INFINITY,
        };
    }

    let se_ln = (1.0 / a as f64 + 1.0 / b as f64 + 1.0 / c as f64 + 1.0 / d as f64).sqrt();
    let ln_or = ratio.ln();
    OddsRatio {
        ratio,
        ci_low: (ln_or - 1.96 * se_ln).exp(),
        ci_high: (ln_or + 1.96 * se_ln).exp(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
