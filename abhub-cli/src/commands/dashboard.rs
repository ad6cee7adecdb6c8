//! Portfolio dashboard command

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use console::style;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use abhub_core::Backlog;
use abhub_metrics::aggregators::PortfolioSummary;

use crate::context::Context;
use crate::output::{
    format_money, format_percent, format_uuid_short, print_field, print_section, priority_badge,
    status_badge, OutputFormat, TableDisplay,
};

/// Summarize the whole backlog in one view
#[derive(Debug, Args)]
pub struct DashboardCommand {}

pub fn execute(ctx: &Context, _cmd: DashboardCommand) -> Result<()> {
    let spinner = ctx.output.spinner("Crunching the backlog...");

    let backlog = ctx.store().load()?;
    let summary = PortfolioSummary::from_ideas(backlog.as_slice());
    let display = DashboardDisplay::new(&summary, &backlog);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    ctx.output.write(&display)?;

    // Advisory lines are table-only so json and yaml stay parseable.
    if ctx.output_format == OutputFormat::Table && summary.cost_alert {
        ctx.output.warning(&format!(
            "Planned ideas are leaving {} on the table every day. Start the top one.",
            format_money(&summary.daily_opportunity_cost)
        ));
    }

    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardDisplay {
    total: usize,
    planned: usize,
    running: usize,
    completed: usize,
    avg_actual_uplift: Option<f64>,
    daily_opportunity_cost: Decimal,
    cost_alert: bool,
    top_ideas: Vec<TopIdeaDisplay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopIdeaDisplay {
    id: Uuid,
    name: String,
    ice_score: u16,
    priority: String,
    status: String,
}

impl DashboardDisplay {
    fn new(summary: &PortfolioSummary, backlog: &Backlog) -> Self {
        let top_ideas = summary
            .top_ideas
            .iter()
            .filter_map(|id| backlog.get(id))
            .map(|idea| TopIdeaDisplay {
                id: idea.id.into(),
                name: idea.name.clone(),
                ice_score: idea.ice_score,
                priority: idea.priority_band().to_string(),
                status: idea.status.to_string(),
            })
            .collect();

        Self {
            total: summary.total,
            planned: summary.planned,
            running: summary.running,
            completed: summary.completed,
            avg_actual_uplift: summary.avg_actual_uplift,
            daily_opportunity_cost: summary.daily_opportunity_cost,
            cost_alert: summary.cost_alert,
            top_ideas,
        }
    }
}

impl TableDisplay for DashboardDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.total),
            Cell::new(self.planned),
            Cell::new(self.running),
            Cell::new(self.completed),
            Cell::new(format_money(&self.daily_opportunity_cost)),
        ]
    }

    fn display_single(&self) {
        print_section("Portfolio");
        print_field("Ideas", &self.total.to_string());
        print_field("Planned", &self.planned.to_string());
        print_field("Running", &self.running.to_string());
        print_field("Completed", &self.completed.to_string());
        match self.avg_actual_uplift {
            Some(uplift) => print_field("Avg measured uplift", &format_percent(uplift)),
            None => print_field("Avg measured uplift", "-"),
        }

        print_section("Opportunity Cost");
        let daily = format_money(&self.daily_opportunity_cost);
        if self.cost_alert {
            print_field("Daily (planned ideas)", &style(daily).red().bold().to_string());
        } else {
            print_field("Daily (planned ideas)", &daily);
        }

        if !self.top_ideas.is_empty() {
            print_section("Top Ideas");
            for (rank, idea) in self.top_ideas.iter().enumerate() {
                println!(
                    "  {}. [{}] {} ({}, {}, {})",
                    rank + 1,
                    idea.ice_score,
                    idea.name,
                    format_uuid_short(&idea.id),
                    priority_badge(&idea.priority),
                    status_badge(&idea.status),
                );
            }
        }
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            self.total,
            self.planned,
            self.running,
            self.completed,
            format_money(&self.daily_opportunity_cost)
        );
    }
}
