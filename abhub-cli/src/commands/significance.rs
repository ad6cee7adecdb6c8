//! Significance evaluation command

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use abhub_metrics::calculators::{SignificanceEvaluator, SignificanceInput, SignificanceReport};
use abhub_metrics::statistical::Alpha;

use crate::context::Context;
use crate::output::{format_percent, print_field, print_section, OutputFormat, TableDisplay};

/// Evaluate the results of a finished or running test
#[derive(Debug, Args)]
pub struct SignificanceCommand {
    /// Visitors in the control group
    #[arg(long)]
    pub control_visitors: u64,

    /// Conversions in the control group
    #[arg(long)]
    pub control_conversions: u64,

    /// Visitors in the variant group
    #[arg(long)]
    pub variant_visitors: u64,

    /// Conversions in the variant group
    #[arg(long)]
    pub variant_conversions: u64,

    /// How many days the test has been running
    #[arg(short = 'd', long)]
    pub duration_days: u32,

    /// Significance level (0.01, 0.05 or 0.10)
    #[arg(long, default_value = "0.05")]
    pub alpha: Alpha,
}

pub fn execute(ctx: &Context, cmd: SignificanceCommand) -> Result<()> {
    let input = SignificanceInput {
        control_visitors: cmd.control_visitors,
        control_conversions: cmd.control_conversions,
        variant_visitors: cmd.variant_visitors,
        variant_conversions: cmd.variant_conversions,
        test_duration_days: cmd.duration_days,
        alpha: cmd.alpha,
    };

    let report = SignificanceEvaluator::evaluate(&input)?;
    let display = SignificanceDisplay::new(cmd.alpha, &report);
    ctx.output.write(&display)?;

    // Advisory lines are table-only so json and yaml stay parseable.
    if ctx.output_format == OutputFormat::Table {
        if report.significant {
            ctx.output.success(&format!(
                "Significant at alpha {} (p = {:.4})",
                cmd.alpha, report.p_value
            ));
        } else {
            ctx.output.info(&format!(
                "Not significant at alpha {} (p = {:.4}). Keep collecting data.",
                cmd.alpha, report.p_value
            ));
        }

        if report.peeking {
            ctx.output.warning(&format!(
                "Read out after {} days, before the recommended {}. \
                 Early peeks inflate the false positive rate.",
                cmd.duration_days, report.recommended_duration_days
            ));
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignificanceDisplay {
    alpha: String,
    control_rate: f64,
    variant_rate: f64,
    improvement: f64,
    z_score: f64,
    p_value: f64,
    significant: bool,
    ci_lower: f64,
    ci_upper: f64,
    peeking: bool,
    recommended_duration_days: u32,
}

impl SignificanceDisplay {
    fn new(alpha: Alpha, report: &SignificanceReport) -> Self {
        Self {
            alpha: alpha.to_string(),
            control_rate: report.control_rate,
            variant_rate: report.variant_rate,
            improvement: report.improvement,
            z_score: report.z_score,
            p_value: report.p_value,
            significant: report.significant,
            ci_lower: report.ci_lower,
            ci_upper: report.ci_upper,
            peeking: report.peeking,
            recommended_duration_days: report.recommended_duration_days,
        }
    }
}

impl TableDisplay for SignificanceDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(format_percent(self.control_rate)),
            Cell::new(format_percent(self.variant_rate)),
            Cell::new(format!("{:.4}", self.z_score)),
            Cell::new(format!("{:.4}", self.p_value)),
            Cell::new(self.significant),
        ]
    }

    fn display_single(&self) {
        print_section("Observed Rates");
        print_field("Control", &format_percent(self.control_rate));
        print_field("Variant", &format_percent(self.variant_rate));
        print_field("Improvement", &format_percent(self.improvement));

        print_section("Statistics");
        print_field("Z-score", &format!("{:.4}", self.z_score));
        print_field("P-value", &format!("{:.4}", self.p_value));
        print_field("Alpha", &self.alpha);
        print_field("Significant", if self.significant { "yes" } else { "no" });
        print_field(
            "95% CI for uplift",
            &format!(
                "[{}, {}]",
                format_percent(self.ci_lower),
                format_percent(self.ci_upper)
            ),
        );
    }

    fn display_compact(&self) {
        println!(
            "z={:.4}\tp={:.4}\tsignificant={}",
            self.z_score, self.p_value, self.significant
        );
    }
}
