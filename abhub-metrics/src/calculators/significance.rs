use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::statistical::{normal_cdf, Alpha};

/// Tests read out before running this many days get the peeking flag.
pub const RECOMMENDED_TEST_DURATION_DAYS: u32 = 14;

/// Critical value for the reported confidence interval. The interval is
/// always a 95% band even when the verdict uses a different alpha; callers
/// depend on that width staying put.
const INTERVAL_Z: f64 = 1.96;

/// Observed counts for a finished (or peeked-at) two-variant test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificanceInput {
    pub control_visitors: u64,
    pub control_conversions: u64,
    pub variant_visitors: u64,
    pub variant_conversions: u64,
    /// How long the test has been running.
    pub test_duration_days: u32,
    #[serde(default)]
    pub alpha: Alpha,
}

/// Verdict of a pooled two-proportion z-test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificanceReport {
    /// Observed control conversion rate in percent.
    pub control_rate: f64,
    /// Observed variant conversion rate in percent.
    pub variant_rate: f64,
    /// Relative uplift of the variant over control, in percent. Negative
    /// when the variant underperforms.
    pub improvement: f64,
    pub z_score: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// True when the p-value is strictly below the chosen alpha.
    pub significant: bool,
    /// Lower bound of the 95% interval on the relative uplift, percent.
    pub ci_lower: f64,
    /// Upper bound of the 95% interval on the relative uplift, percent.
    pub ci_upper: f64,
    /// True when the test was read out before the recommended duration.
    pub peeking: bool,
    pub recommended_duration_days: u32,
}

/// Judges a two-variant conversion test with the pooled z statistic:
///
/// ```text
/// z = (p2 - p1) / sqrt(p_pool * (1 - p_pool) * (1/n1 + 1/n2))
/// ```
///
/// where p_pool treats both groups as one sample. The p-value is two-sided.
pub struct SignificanceEvaluator;

impl SignificanceEvaluator {
    pub fn evaluate(input: &SignificanceInput) -> Result<SignificanceReport> {
        validate(input)?;

        let n1 = input.control_visitors as f64;
        let n2 = input.variant_visitors as f64;
        let p1 = input.control_conversions as f64 / n1;
        let p2 = input.variant_conversions as f64 / n2;

        let p_pool = (input.control_conversions + input.variant_conversions) as f64 / (n1 + n2);
        let se = (p_pool * (1.0 - p_pool) * (1.0 / n1 + 1.0 / n2)).sqrt();
        if se == 0.0 {
            return Err(StatsError::degenerate(
                "standard error is zero, every visitor converted or none did",
            ));
        }
        if p1 == 0.0 {
            return Err(StatsError::degenerate(
                "control rate is zero, relative uplift is undefined",
            ));
        }

        let diff = p2 - p1;
        let z_score = diff / se;
        let p_value = 2.0 * (1.0 - normal_cdf(z_score.abs()));
        let half_width = INTERVAL_Z * se;

        debug!(z_score, p_value, "evaluated significance");
        Ok(SignificanceReport {
            control_rate: p1 * 100.0,
            variant_rate: p2 * 100.0,
            improvement: diff / p1 * 100.0,
            z_score,
            p_value,
            significant: p_value < input.alpha.level(),
            ci_lower: (diff - half_width) / p1 * 100.0,
            ci_upper: (diff + half_width) / p1 * 100.0,
            peeking: input.test_duration_days < RECOMMENDED_TEST_DURATION_DAYS,
            recommended_duration_days: RECOMMENDED_TEST_DURATION_DAYS,
        })
    }
}

fn validate(input: &SignificanceInput) -> Result<()> {
    if input.control_visitors == 0 || input.variant_visitors == 0 {
        return Err(StatsError::invalid(
            "both variants need at least one visitor",
        ));
    }
    if input.control_conversions > input.control_visitors {
        return Err(StatsError::invalid(format!(
            "control conversions ({}) exceed visitors ({})",
            input.control_conversions, input.control_visitors
        )));
    }
    if input.variant_conversions > input.variant_visitors {
        return Err(StatsError::invalid(format!(
            "variant conversions ({}) exceed visitors ({})",
            input.variant_conversions, input.variant_visitors
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(
        control: (u64, u64),
        variant: (u64, u64),
        days: u32,
        alpha: Alpha,
    ) -> SignificanceInput {
        SignificanceInput {
            control_visitors: control.0,
            control_conversions: control.1,
            variant_visitors: variant.0,
            variant_conversions: variant.1,
            test_duration_days: days,
            alpha,
        }
    }

    #[test]
    fn test_reference_evaluation() {
        let report =
            SignificanceEvaluator::evaluate(&input((5000, 150), (5000, 175), 7, Alpha::P05))
                .unwrap();
        assert_relative_eq!(report.control_rate, 3.0, epsilon = 1e-9);
        assert_relative_eq!(report.variant_rate, 3.5, epsilon = 1e-9);
        assert_relative_eq!(report.improvement, 16.6667, epsilon = 1e-3);
        assert_relative_eq!(report.z_score, 1.4098, epsilon = 1e-3);
        assert_relative_eq!(report.p_value, 0.1586, epsilon = 1e-3);
        assert!(!report.significant);
        assert_relative_eq!(report.ci_lower, -6.50, epsilon = 1e-2);
        assert_relative_eq!(report.ci_upper, 39.84, epsilon = 1e-2);
        assert!(report.peeking);
        assert_eq!(report.recommended_duration_days, 14);
    }

    #[test]
    fn test_clear_winner() {
        let report =
            SignificanceEvaluator::evaluate(&input((10000, 300), (10000, 400), 21, Alpha::P05))
                .unwrap();
        assert!(report.significant);
        assert!(report.p_value < 0.001);
        assert_relative_eq!(report.improvement, 33.3333, epsilon = 1e-3);
        assert!(!report.peeking);
    }

    #[test]
    fn test_losing_variant_mirrors_winner() {
        let winner =
            SignificanceEvaluator::evaluate(&input((5000, 150), (5000, 200), 14, Alpha::P05))
                .unwrap();
        let loser =
            SignificanceEvaluator::evaluate(&input((5000, 200), (5000, 150), 14, Alpha::P05))
                .unwrap();
        assert!(loser.improvement < 0.0);
        assert!(loser.z_score < 0.0);
        assert_relative_eq!(loser.z_score, -winner.z_score, epsilon = 1e-12);
        assert_relative_eq!(loser.p_value, winner.p_value, epsilon = 1e-12);
    }

    #[test]
    fn test_peeking_boundary() {
        let at_threshold =
            SignificanceEvaluator::evaluate(&input((5000, 150), (5000, 175), 14, Alpha::P05))
                .unwrap();
        assert!(!at_threshold.peeking);
        let one_short =
            SignificanceEvaluator::evaluate(&input((5000, 150), (5000, 175), 13, Alpha::P05))
                .unwrap();
        assert!(one_short.peeking);
    }

    #[test]
    fn test_alpha_changes_verdict_not_interval() {
        // z near 1.8 sits between the 0.10 and 0.05 thresholds.
        let strict =
            SignificanceEvaluator::evaluate(&input((5000, 150), (5000, 182), 14, Alpha::P05))
                .unwrap();
        let loose =
            SignificanceEvaluator::evaluate(&input((5000, 150), (5000, 182), 14, Alpha::P10))
                .unwrap();
        assert!(!strict.significant);
        assert!(loose.significant);
        assert_eq!(strict.ci_lower, loose.ci_lower);
        assert_eq!(strict.ci_upper, loose.ci_upper);
    }

    #[test]
    fn test_no_conversions_is_degenerate() {
        let result = SignificanceEvaluator::evaluate(&input((5000, 0), (5000, 0), 14, Alpha::P05));
        assert!(matches!(result, Err(StatsError::Degenerate(_))));
    }

    #[test]
    fn test_everyone_converted_is_degenerate() {
        let result =
            SignificanceEvaluator::evaluate(&input((500, 500), (500, 500), 14, Alpha::P05));
        assert!(matches!(result, Err(StatsError::Degenerate(_))));
    }

    #[test]
    fn test_zero_control_rate_is_degenerate() {
        let result = SignificanceEvaluator::evaluate(&input((5000, 0), (5000, 25), 14, Alpha::P05));
        assert!(matches!(result, Err(StatsError::Degenerate(_))));
    }

    #[test]
    fn test_rejects_zero_visitors() {
        let result = SignificanceEvaluator::evaluate(&input((0, 0), (5000, 25), 14, Alpha::P05));
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_conversions_over_visitors() {
        let result = SignificanceEvaluator::evaluate(&input((100, 101), (100, 50), 14, Alpha::P05));
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));
    }
}
