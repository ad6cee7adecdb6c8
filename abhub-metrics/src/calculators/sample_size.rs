use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::statistical::{Alpha, Power};

/// Tests projected to run longer than this many days get flagged.
pub const LONG_TEST_WARNING_DAYS: u64 = 30;

/// Required sample sizes beyond this are rejected rather than reported.
/// Keeps the ceil and the doubling inside u64.
const SAMPLE_SIZE_LIMIT: f64 = 1e15;

/// Parameters for sizing a two-variant conversion test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSizeInput {
    /// Current conversion rate in percent, in (0, 100].
    pub baseline_rate: f64,
    /// Minimum detectable effect in percent, relative to baseline. Must be
    /// positive.
    pub mde: f64,
    #[serde(default)]
    pub alpha: Alpha,
    #[serde(default)]
    pub power: Power,
    /// Visitors per day across both variants combined.
    pub daily_traffic: u64,
}

/// Result of a sample size estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSizeEstimate {
    /// Visitors required in each variant.
    pub per_variant: u64,
    /// Visitors required across both variants.
    pub total: u64,
    /// Days of traffic needed to reach the total, rounded up.
    pub days_needed: u64,
    /// Conversion rate in percent the test is sized to detect.
    pub expected_rate: f64,
    /// Set when the projected duration exceeds [`LONG_TEST_WARNING_DAYS`].
    pub long_test: bool,
}

/// Sizes a two-proportion z-test using the pooled-variance normal
/// approximation:
///
/// ```text
/// n = (z_alpha + z_beta)^2 * 2 * p_avg * (1 - p_avg) / (p2 - p1)^2
/// ```
///
/// per variant, where p1 is the baseline rate, p2 the rate after the
/// minimum detectable uplift and p_avg their mean.
pub struct SampleSizeEstimator;

impl SampleSizeEstimator {
    pub fn estimate(input: &SampleSizeInput) -> Result<SampleSizeEstimate> {
        validate(input)?;

        let p1 = input.baseline_rate / 100.0;
        let p2 = p1 * (1.0 + input.mde / 100.0);
        if p2 > 1.0 {
            return Err(StatsError::invalid(format!(
                "a {}% uplift pushes the rate to {:.2}%, beyond 100%",
                input.mde,
                p2 * 100.0
            )));
        }
        if p2 == p1 {
            return Err(StatsError::degenerate(
                "effect size is zero at this baseline, nothing to detect",
            ));
        }

        let p_avg = (p1 + p2) / 2.0;
        let z = input.alpha.z_value() + input.power.z_value();
        let effect = p2 - p1;
        let required = (z * z * 2.0 * p_avg * (1.0 - p_avg)) / (effect * effect);
        if !required.is_finite() || required > SAMPLE_SIZE_LIMIT {
            return Err(StatsError::invalid(format!(
                "an mde of {}% at a {}% baseline needs an impractically large sample",
                input.mde, input.baseline_rate
            )));
        }

        let per_variant = required.ceil() as u64;
        let total = per_variant * 2;
        let days_needed = total.div_ceil(input.daily_traffic);

        debug!(per_variant, total, days_needed, "estimated sample size");
        Ok(SampleSizeEstimate {
            per_variant,
            total,
            days_needed,
            expected_rate: p2 * 100.0,
            long_test: days_needed > LONG_TEST_WARNING_DAYS,
        })
    }
}

fn validate(input: &SampleSizeInput) -> Result<()> {
    if !input.baseline_rate.is_finite()
        || input.baseline_rate <= 0.0
        || input.baseline_rate > 100.0
    {
        return Err(StatsError::invalid(format!(
            "baseline rate must be in (0, 100], got {}",
            input.baseline_rate
        )));
    }
    if !input.mde.is_finite() || input.mde <= 0.0 {
        return Err(StatsError::invalid(format!(
            "minimum detectable effect must be positive, got {}",
            input.mde
        )));
    }
    if input.daily_traffic == 0 {
        return Err(StatsError::invalid("daily traffic must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(baseline_rate: f64, mde: f64, daily_traffic: u64) -> SampleSizeInput {
        SampleSizeInput {
            baseline_rate,
            mde,
            alpha: Alpha::P05,
            power: Power::P80,
            daily_traffic,
        }
    }

    #[test]
    fn test_reference_estimate() {
        let estimate = SampleSizeEstimator::estimate(&input(3.0, 10.0, 5000)).unwrap();
        assert_eq!(estimate.per_variant, 53152);
        assert_eq!(estimate.total, 106304);
        assert_eq!(estimate.days_needed, 22);
        assert_relative_eq!(estimate.expected_rate, 3.3, epsilon = 1e-9);
        assert!(!estimate.long_test);
    }

    #[test]
    fn test_days_round_up() {
        // 106304 visitors at 106303/day is just over one day.
        let estimate = SampleSizeEstimator::estimate(&input(3.0, 10.0, 106_303)).unwrap();
        assert_eq!(estimate.days_needed, 2);
        let exact = SampleSizeEstimator::estimate(&input(3.0, 10.0, 106_304)).unwrap();
        assert_eq!(exact.days_needed, 1);
    }

    #[test]
    fn test_long_test_flag() {
        let slow = SampleSizeEstimator::estimate(&input(3.0, 10.0, 3000)).unwrap();
        assert_eq!(slow.days_needed, 36);
        assert!(slow.long_test);
    }

    #[test]
    fn test_rejects_bad_baseline() {
        assert!(matches!(
            SampleSizeEstimator::estimate(&input(0.0, 10.0, 5000)),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            SampleSizeEstimator::estimate(&input(101.0, 10.0, 5000)),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            SampleSizeEstimator::estimate(&input(f64::NAN, 10.0, 5000)),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_mde() {
        assert!(matches!(
            SampleSizeEstimator::estimate(&input(3.0, 0.0, 5000)),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            SampleSizeEstimator::estimate(&input(3.0, -5.0, 5000)),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_zero_traffic() {
        assert!(matches!(
            SampleSizeEstimator::estimate(&input(3.0, 10.0, 0)),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_uplift_beyond_certainty() {
        // 80% baseline with a 30% relative uplift would exceed 100%.
        assert!(matches!(
            SampleSizeEstimator::estimate(&input(80.0, 30.0, 5000)),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_vanishing_effect_is_degenerate() {
        // Small enough that baseline * (1 + mde/100) rounds back to baseline.
        let result = SampleSizeEstimator::estimate(&input(3.0, 1e-14, 5000));
        assert!(matches!(result, Err(StatsError::Degenerate(_))));
    }
}
