use abhub_core::{IdeaId, IdeaStatus, TestIdea};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculators::opportunity_cost::{OpportunityCostCalculator, DEFAULT_DELAY_DAYS};

/// Average order value the portfolio rollup assumes for every idea.
pub const PORTFOLIO_AVG_ORDER_VALUE: f64 = 50.0;

/// Combined daily loss above this trips the portfolio cost alert.
pub const COST_ALERT_THRESHOLD: Decimal = Decimal::ONE_THOUSAND;

/// How many ideas the ranking keeps.
pub const TOP_IDEAS_LIMIT: usize = 5;

/// One-screen rollup of a whole idea backlog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total: usize,
    pub planned: usize,
    pub running: usize,
    pub completed: usize,
    /// Mean measured uplift across completed ideas, in percent. Completed
    /// ideas without a recorded result count as zero. None when nothing
    /// has completed yet.
    pub avg_actual_uplift: Option<f64>,
    /// Daily revenue foregone across all planned ideas, priced at
    /// [`PORTFOLIO_AVG_ORDER_VALUE`].
    pub daily_opportunity_cost: Decimal,
    /// True when the daily loss exceeds [`COST_ALERT_THRESHOLD`].
    pub cost_alert: bool,
    /// Up to [`TOP_IDEAS_LIMIT`] idea ids, best ICE score first.
    pub top_ideas: Vec<IdeaId>,
}

impl PortfolioSummary {
    pub fn from_ideas(ideas: &[TestIdea]) -> Self {
        let planned = ideas
            .iter()
            .filter(|idea| idea.status == IdeaStatus::Planned)
            .count();
        let running = ideas.iter().filter(|idea| idea.status.is_running()).count();
        let completed: Vec<&TestIdea> = ideas
            .iter()
            .filter(|idea| idea.status.is_completed())
            .collect();

        let avg_actual_uplift = if completed.is_empty() {
            None
        } else {
            let sum: f64 = completed
                .iter()
                .map(|idea| idea.actual_result.unwrap_or(0.0))
                .sum();
            Some(sum / completed.len() as f64)
        };

        // Ideas whose stored profile cannot be priced contribute nothing.
        let daily_opportunity_cost: Decimal = ideas
            .iter()
            .filter(|idea| idea.status == IdeaStatus::Planned)
            .filter_map(|idea| {
                OpportunityCostCalculator::for_idea(
                    idea,
                    PORTFOLIO_AVG_ORDER_VALUE,
                    DEFAULT_DELAY_DAYS,
                )
                .ok()
            })
            .map(|cost| cost.daily)
            .sum();

        let mut ranked: Vec<&TestIdea> = ideas.iter().collect();
        ranked.sort_by(|a, b| b.ice_score.cmp(&a.ice_score));
        let top_ideas = ranked
            .iter()
            .take(TOP_IDEAS_LIMIT)
            .map(|idea| idea.id)
            .collect();

        PortfolioSummary {
            total: ideas.len(),
            planned,
            running,
            completed: completed.len(),
            avg_actual_uplift,
            daily_opportunity_cost,
            cost_alert: daily_opportunity_cost > COST_ALERT_THRESHOLD,
            top_ideas,
        }
    }
}
