use abhub_core::TestIdea;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StatsError};

/// Kahneman-Tversky loss aversion factor: a loss weighs about 2.5 times
/// the equivalent gain.
pub const LOSS_AVERSION_MULTIPLIER: f64 = 2.5;

/// Average order value assumed when the caller does not supply one.
pub const DEFAULT_AVG_ORDER_VALUE: f64 = 50.0;

/// Delay the cost projection covers when the caller does not supply one.
pub const DEFAULT_DELAY_DAYS: u32 = 7;

/// Revenue profile of a test idea that is sitting unlaunched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityCostInput {
    pub monthly_traffic: u64,
    /// Current conversion rate in percent, in (0, 100].
    pub conversion_rate: f64,
    /// Expected relative uplift in percent, non-negative.
    pub expected_improvement: f64,
    /// Average order value in dollars.
    pub avg_order_value: f64,
    /// Days the launch is delayed.
    pub delay_days: u32,
}

/// What postponing a test costs, as money amounts rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityCost {
    /// Revenue foregone per day of delay.
    pub daily: Decimal,
    pub weekly: Decimal,
    pub monthly: Decimal,
    /// Daily loss scaled by [`LOSS_AVERSION_MULTIPLIER`].
    pub psychological_daily: Decimal,
    /// Loss accumulated over the requested delay.
    pub total_for_delay: Decimal,
    /// Delay loss scaled by [`LOSS_AVERSION_MULTIPLIER`].
    pub psychological_total: Decimal,
}

/// Prices the revenue left on the table while a test idea waits.
///
/// Projects current monthly revenue from traffic, conversion rate and
/// order value, applies the expected uplift and spreads the difference
/// over a 30-day month.
pub struct OpportunityCostCalculator;

impl OpportunityCostCalculator {
    pub fn calculate(input: &OpportunityCostInput) -> Result<OpportunityCost> {
        validate(input)?;

        let current = input.monthly_traffic as f64 * input.conversion_rate / 100.0
            * input.avg_order_value;
        let potential = current * (1.0 + input.expected_improvement / 100.0);
        let daily = (potential - current) / 30.0;
        let delay = daily * input.delay_days as f64;

        debug!(daily, delay, "calculated opportunity cost");
        Ok(OpportunityCost {
            daily: money(daily),
            weekly: money(daily * 7.0),
            monthly: money(daily * 30.0),
            psychological_daily: money(daily * LOSS_AVERSION_MULTIPLIER),
            total_for_delay: money(delay),
            psychological_total: money(delay * LOSS_AVERSION_MULTIPLIER),
        })
    }

    /// Prices a backlog idea directly, using its stored conversion profile.
    pub fn for_idea(idea: &TestIdea, avg_order_value: f64, delay_days: u32) -> Result<OpportunityCost> {
        Self::calculate(&OpportunityCostInput {
            monthly_traffic: idea.monthly_traffic,
            conversion_rate: idea.current_conversion_rate,
            expected_improvement: idea.expected_improvement,
            avg_order_value,
            delay_days,
        })
    }
}

fn money(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default().round_dp(2)
}

fn validate(input: &OpportunityCostInput) -> Result<()> {
    if !input.conversion_rate.is_finite()
        || input.conversion_rate <= 0.0
        || input.conversion_rate > 100.0
    {
        return Err(StatsError::invalid(format!(
            "conversion rate must be in (0, 100], got {}",
            input.conversion_rate
        )));
    }
    if !input.expected_improvement.is_finite() || input.expected_improvement < 0.0 {
        return Err(StatsError::invalid(format!(
            "expected improvement must be non-negative, got {}",
            input.expected_improvement
        )));
    }
    if !input.avg_order_value.is_finite() || input.avg_order_value < 0.0 {
        return Err(StatsError::invalid(format!(
            "average order value must be non-negative, got {}",
            input.avg_order_value
        )));
    }
    Ok(())
}
