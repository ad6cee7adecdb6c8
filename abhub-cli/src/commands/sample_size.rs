//! Sample size estimation command

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use abhub_metrics::calculators::{
    SampleSizeEstimate, SampleSizeEstimator, SampleSizeInput, LONG_TEST_WARNING_DAYS,
};
use abhub_metrics::statistical::{Alpha, Power};

use crate::context::Context;
use crate::output::{format_percent, print_field, print_section, OutputFormat, TableDisplay};

/// Estimate how many visitors a two-variant test needs
#[derive(Debug, Args)]
pub struct SampleSizeCommand {
    /// Current conversion rate in percent
    #[arg(short, long)]
    pub baseline: f64,

    /// Minimum detectable effect in percent, relative to the baseline
    #[arg(short, long)]
    pub mde: f64,

    /// Significance level (0.01, 0.05 or 0.10)
    #[arg(long, default_value = "0.05")]
    pub alpha: Alpha,

    /// Statistical power (0.80, 0.90 or 0.95)
    #[arg(long, default_value = "0.80")]
    pub power: Power,

    /// Visitors per day across both variants
    #[arg(short = 't', long)]
    pub daily_traffic: u64,
}

pub fn execute(ctx: &Context, cmd: SampleSizeCommand) -> Result<()> {
    let input = SampleSizeInput {
        baseline_rate: cmd.baseline,
        mde: cmd.mde,
        alpha: cmd.alpha,
        power: cmd.power,
        daily_traffic: cmd.daily_traffic,
    };

    let estimate = SampleSizeEstimator::estimate(&input)?;
    let display = SampleSizeDisplay::new(&input, &estimate);
    ctx.output.write(&display)?;

    // Advisory lines are table-only so json and yaml stay parseable.
    if ctx.output_format == OutputFormat::Table && estimate.long_test {
        ctx.output.warning(&format!(
            "At this traffic the test runs {} days (over {}). \
             Consider a larger effect or a higher-traffic page.",
            estimate.days_needed, LONG_TEST_WARNING_DAYS
        ));
    }

    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SampleSizeDisplay {
    baseline_rate: f64,
    mde: f64,
    alpha: String,
    power: String,
    daily_traffic: u64,
    expected_rate: f64,
    per_variant: u64,
    total: u64,
    days_needed: u64,
    long_test: bool,
}

impl SampleSizeDisplay {
    fn new(input: &SampleSizeInput, estimate: &SampleSizeEstimate) -> Self {
        Self {
            baseline_rate: input.baseline_rate,
            mde: input.mde,
            alpha: input.alpha.to_string(),
            power: input.power.to_string(),
            daily_traffic: input.daily_traffic,
            expected_rate: estimate.expected_rate,
            per_variant: estimate.per_variant,
            total: estimate.total,
            days_needed: estimate.days_needed,
            long_test: estimate.long_test,
        }
    }
}

impl TableDisplay for SampleSizeDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(format_percent(self.baseline_rate)),
            Cell::new(format_percent(self.mde)),
            Cell::new(self.per_variant),
            Cell::new(self.total),
            Cell::new(self.days_needed),
        ]
    }

    fn display_single(&self) {
        print_section("Test Parameters");
        print_field("Baseline rate", &format_percent(self.baseline_rate));
        print_field(
            "Detectable uplift",
            &format!(
                "{} (to {})",
                format_percent(self.mde),
                format_percent(self.expected_rate)
            ),
        );
        print_field("Alpha", &self.alpha);
        print_field("Power", &self.power);
        print_field("Daily traffic", &self.daily_traffic.to_string());

        print_section("Required Sample");
        print_field("Per variant", &self.per_variant.to_string());
        print_field("Total visitors", &self.total.to_string());
        print_field("Days needed", &self.days_needed.to_string());
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}",
            self.per_variant, self.total, self.days_needed
        );
    }
}
