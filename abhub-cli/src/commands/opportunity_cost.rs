//! Opportunity cost command

use anyhow::{anyhow, bail, Result};
use clap::Args;
use comfy_table::Cell;
use rust_decimal::Decimal;
use serde::Serialize;

use abhub_metrics::calculators::{
    OpportunityCost, OpportunityCostCalculator, OpportunityCostInput, LOSS_AVERSION_MULTIPLIER,
};

use crate::commands::ideas::resolve_id;
use crate::context::Context;
use crate::output::{format_money, format_percent, print_field, print_section, TableDisplay};

/// Price the cost of delaying a test idea
#[derive(Debug, Args)]
pub struct OpportunityCostCommand {
    /// Price an idea from the backlog by id, or a unique prefix of it
    #[arg(long, conflicts_with_all = ["traffic", "rate", "improvement"])]
    pub id: Option<String>,

    /// Monthly traffic on the affected page
    #[arg(long, required_unless_present = "id")]
    pub traffic: Option<u64>,

    /// Current conversion rate in percent
    #[arg(long, required_unless_present = "id")]
    pub rate: Option<f64>,

    /// Expected relative improvement in percent
    #[arg(long, required_unless_present = "id")]
    pub improvement: Option<f64>,

    /// Average order value in dollars
    #[arg(long)]
    pub aov: Option<f64>,

    /// Days of delay to price
    #[arg(long)]
    pub delay_days: Option<u32>,
}

pub fn execute(ctx: &Context, cmd: OpportunityCostCommand) -> Result<()> {
    let aov = cmd.aov.unwrap_or_else(|| ctx.default_aov());
    let delay_days = cmd.delay_days.unwrap_or_else(|| ctx.default_delay_days());

    let (label, cost) = match cmd.id {
        Some(ref needle) => {
            let backlog = ctx.store().load()?;
            let target = resolve_id(&backlog, needle)?;
            let idea = backlog
                .get(&target)
                .ok_or_else(|| anyhow!("No idea with id {}", target))?;
            let cost = OpportunityCostCalculator::for_idea(idea, aov, delay_days)?;
            (idea.name.clone(), cost)
        }
        None => {
            // clap enforces presence when --id is absent.
            let (Some(traffic), Some(rate), Some(improvement)) =
                (cmd.traffic, cmd.rate, cmd.improvement)
            else {
                bail!("Provide --id or all of --traffic, --rate and --improvement");
            };
            let input = OpportunityCostInput {
                monthly_traffic: traffic,
                conversion_rate: rate,
                expected_improvement: improvement,
                avg_order_value: aov,
                delay_days,
            };
            let cost = OpportunityCostCalculator::calculate(&input)?;
            (format!("{} visitors/month at {}", traffic, format_percent(rate)), cost)
        }
    };

    ctx.output
        .write(&CostDisplay::new(&label, aov, delay_days, &cost))?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CostDisplay {
    subject: String,
    avg_order_value: f64,
    delay_days: u32,
    daily: Decimal,
    weekly: Decimal,
    monthly: Decimal,
    psychological_daily: Decimal,
    total_for_delay: Decimal,
    psychological_total: Decimal,
}

impl CostDisplay {
    fn new(subject: &str, avg_order_value: f64, delay_days: u32, cost: &OpportunityCost) -> Self {
        Self {
            subject: subject.to_string(),
            avg_order_value,
            delay_days,
            daily: cost.daily,
            weekly: cost.weekly,
            monthly: cost.monthly,
            psychological_daily: cost.psychological_daily,
            total_for_delay: cost.total_for_delay,
            psychological_total: cost.psychological_total,
        }
    }
}

impl TableDisplay for CostDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.subject),
            Cell::new(format_money(&self.daily)),
            Cell::new(format_money(&self.weekly)),
            Cell::new(format_money(&self.monthly)),
            Cell::new(format_money(&self.total_for_delay)),
        ]
    }

    fn display_single(&self) {
        print_section("Opportunity Cost");
        print_field("Subject", &self.subject);
        print_field("Avg order value", &format!("${:.2}", self.avg_order_value));
        print_field("Daily", &format_money(&self.daily));
        print_field("Weekly", &format_money(&self.weekly));
        print_field("Monthly", &format_money(&self.monthly));
        print_field(
            &format!("Total for {} days of delay", self.delay_days),
            &format_money(&self.total_for_delay),
        );

        print_section(&format!(
            "Felt Loss ({}x loss aversion)",
            LOSS_AVERSION_MULTIPLIER
        ));
        print_field("Daily", &format_money(&self.psychological_daily));
        print_field(
            &format!("Total for {} days", self.delay_days),
            &format_money(&self.psychological_total),
        );
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}",
            format_money(&self.daily),
            format_money(&self.total_for_delay),
            format_money(&self.psychological_total)
        );
    }
}
