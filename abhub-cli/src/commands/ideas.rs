//! Idea backlog commands

use anyhow::{anyhow, bail, Context as _, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde::Serialize;
use uuid::Uuid;

use abhub_core::{Backlog, IdeaId, IdeaQuery, IdeaSort, IdeaStatus, TestIdea};

use crate::context::Context;
use crate::output::{
    format_percent, format_relative_time, format_uuid_short, print_field, print_optional_field,
    print_section, priority_badge, status_badge, OutputFormat, TableDisplay,
};

/// Idea backlog management commands
#[derive(Debug, Args)]
pub struct IdeasCommands {
    #[command(subcommand)]
    pub command: IdeasSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum IdeasSubcommand {
    /// Add a new test idea
    Add {
        /// Idea name
        name: String,

        /// Impact score (1-10)
        #[arg(short, long)]
        impact: u8,

        /// Confidence score (1-10)
        #[arg(short, long)]
        confidence: u8,

        /// Ease score (1-10)
        #[arg(short, long)]
        ease: u8,

        /// Current conversion rate in percent
        #[arg(short, long)]
        rate: f64,

        /// Expected relative improvement in percent
        #[arg(long)]
        improvement: f64,

        /// Monthly traffic on the affected page
        #[arg(long)]
        traffic: u64,
    },

    /// List ideas, sorted by ICE score by default
    List {
        /// Filter by status (planned, running, completed)
        #[arg(short, long)]
        status: Option<IdeaStatus>,

        /// Only ideas whose name contains this text
        #[arg(long)]
        search: Option<String>,

        /// Sort order (ice, created, improvement)
        #[arg(long, default_value = "ice")]
        sort: IdeaSort,
    },

    /// Show one idea in full
    Show {
        /// Idea id, or a unique prefix of it
        id: String,
    },

    /// Update an idea's scores or conversion profile
    Update {
        /// Idea id, or a unique prefix of it
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Impact score (1-10)
        #[arg(short, long)]
        impact: Option<u8>,

        /// Confidence score (1-10)
        #[arg(short, long)]
        confidence: Option<u8>,

        /// Ease score (1-10)
        #[arg(short, long)]
        ease: Option<u8>,

        /// Current conversion rate in percent
        #[arg(short, long)]
        rate: Option<f64>,

        /// Expected relative improvement in percent
        #[arg(long)]
        improvement: Option<f64>,

        /// Monthly traffic on the affected page
        #[arg(long)]
        traffic: Option<u64>,

        /// Test duration in days
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Mark a planned idea as running
    Start {
        /// Idea id, or a unique prefix of it
        id: String,
    },

    /// Mark a running idea as completed and record the result
    Complete {
        /// Idea id, or a unique prefix of it
        id: String,

        /// Measured relative uplift in percent
        #[arg(short = 'r', long)]
        result: f64,

        /// How many days the test ran
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Send a completed idea back to planned for a retest
    Reopen {
        /// Idea id, or a unique prefix of it
        id: String,
    },

    /// Remove an idea from the backlog
    Remove {
        /// Idea id, or a unique prefix of it
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub fn execute(ctx: &Context, cmd: IdeasCommands) -> Result<()> {
    match cmd.command {
        IdeasSubcommand::Add {
            name,
            impact,
            confidence,
            ease,
            rate,
            improvement,
            traffic,
        } => add(ctx, name, impact, confidence, ease, rate, improvement, traffic),
        IdeasSubcommand::List {
            status,
            search,
            sort,
        } => list(ctx, status, search, sort),
        IdeasSubcommand::Show { id } => show(ctx, &id),
        IdeasSubcommand::Update {
            id,
            name,
            impact,
            confidence,
            ease,
            rate,
            improvement,
            traffic,
            duration,
        } => update(
            ctx,
            &id,
            name,
            impact,
            confidence,
            ease,
            rate,
            improvement,
            traffic,
            duration,
        ),
        IdeasSubcommand::Start { id } => start(ctx, &id),
        IdeasSubcommand::Complete {
            id,
            result,
            duration,
        } => complete(ctx, &id, result, duration),
        IdeasSubcommand::Reopen { id } => reopen(ctx, &id),
        IdeasSubcommand::Remove { id, force } => remove(ctx, &id, force),
    }
}

/// Find an idea by full id or by a unique prefix of its id.
pub(crate) fn resolve_id(backlog: &Backlog, needle: &str) -> Result<IdeaId> {
    if let Ok(id) = needle.parse::<IdeaId>() {
        if backlog.get(&id).is_some() {
            return Ok(id);
        }
        bail!("No idea with id {}", id);
    }

    let needle = needle.to_lowercase();
    let matches: Vec<IdeaId> = backlog
        .iter()
        .map(|idea| idea.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No idea matches '{}'", needle),
        _ => bail!(
            "'{}' is ambiguous, {} ideas match. Use more characters.",
            needle,
            matches.len()
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn add(
    ctx: &Context,
    name: String,
    impact: u8,
    confidence: u8,
    ease: u8,
    rate: f64,
    improvement: f64,
    traffic: u64,
) -> Result<()> {
    let store = ctx.store();
    let mut backlog = store.load()?;

    let idea = TestIdea::new(name, impact, confidence, ease, rate, improvement, traffic)?;
    let display = IdeaDisplay::from(&idea);
    let id = backlog.add(idea)?;
    store.save(&backlog)?;

    if ctx.output_format == OutputFormat::Table {
        ctx.output.success(&format!("Added idea {}", id));
    }
    ctx.output.write(&display)?;
    Ok(())
}

fn list(
    ctx: &Context,
    status: Option<IdeaStatus>,
    search: Option<String>,
    sort: IdeaSort,
) -> Result<()> {
    let backlog = ctx.store().load()?;

    let mut query = IdeaQuery::new().with_sort(sort);
    if let Some(status) = status {
        query = query.with_status(status);
    }
    if let Some(search) = search {
        query = query.with_search(search);
    }

    let ideas: Vec<IdeaDisplay> = backlog
        .query(&query)
        .into_iter()
        .map(IdeaDisplay::from)
        .collect();

    ctx.output.write_list(
        &ideas,
        &["ID", "Name", "ICE", "Priority", "Status", "Created"],
    )?;
    Ok(())
}

fn show(ctx: &Context, id: &str) -> Result<()> {
    let backlog = ctx.store().load()?;
    let target = resolve_id(&backlog, id)?;
    let idea = backlog
        .get(&target)
        .ok_or_else(|| anyhow!("No idea with id {}", target))?;

    ctx.output.write(&IdeaDisplay::from(idea))?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn update(
    ctx: &Context,
    id: &str,
    name: Option<String>,
    impact: Option<u8>,
    confidence: Option<u8>,
    ease: Option<u8>,
    rate: Option<f64>,
    improvement: Option<f64>,
    traffic: Option<u64>,
    duration: Option<u32>,
) -> Result<()> {
    let nothing_to_do = name.is_none()
        && impact.is_none()
        && confidence.is_none()
        && ease.is_none()
        && rate.is_none()
        && improvement.is_none()
        && traffic.is_none()
        && duration.is_none();
    if nothing_to_do {
        bail!("Nothing to update. Pass at least one field.");
    }

    let store = ctx.store();
    let mut backlog = store.load()?;
    let target = resolve_id(&backlog, id)?;
    let idea = backlog
        .get_mut(&target)
        .ok_or_else(|| anyhow!("No idea with id {}", target))?;

    if let Some(name) = name {
        idea.rename(name)?;
    }
    if impact.is_some() || confidence.is_some() || ease.is_some() {
        idea.set_factors(
            impact.unwrap_or(idea.impact),
            confidence.unwrap_or(idea.confidence),
            ease.unwrap_or(idea.ease),
        )?;
    }
    if rate.is_some() || improvement.is_some() || traffic.is_some() {
        idea.set_conversion_profile(
            rate.unwrap_or(idea.current_conversion_rate),
            improvement.unwrap_or(idea.expected_improvement),
            traffic.unwrap_or(idea.monthly_traffic),
        )?;
    }
    if let Some(days) = duration {
        idea.set_test_duration(days);
    }

    let display = IdeaDisplay::from(&*idea);
    store.save(&backlog)?;

    if ctx.output_format == OutputFormat::Table {
        ctx.output.success("Idea updated");
    }
    ctx.output.write(&display)?;
    Ok(())
}

fn start(ctx: &Context, id: &str) -> Result<()> {
    let store = ctx.store();
    let mut backlog = store.load()?;
    let target = resolve_id(&backlog, id)?;
    let idea = backlog
        .get_mut(&target)
        .ok_or_else(|| anyhow!("No idea with id {}", target))?;

    idea.start()?;
    let name = idea.name.clone();
    store.save(&backlog)?;

    ctx.output
        .success(&format!("Started test for '{}'", name));
    Ok(())
}

fn complete(ctx: &Context, id: &str, result: f64, duration: Option<u32>) -> Result<()> {
    let store = ctx.store();
    let mut backlog = store.load()?;
    let target = resolve_id(&backlog, id)?;
    let idea = backlog
        .get_mut(&target)
        .ok_or_else(|| anyhow!("No idea with id {}", target))?;

    idea.complete(result)?;
    if let Some(days) = duration {
        idea.set_test_duration(days);
    }
    let name = idea.name.clone();
    let accuracy = idea.prediction_accuracy();
    store.save(&backlog)?;

    ctx.output.success(&format!(
        "Completed '{}' with a measured uplift of {}",
        name,
        format_percent(result)
    ));
    if let Some(accuracy) = accuracy {
        ctx.output.info(&format!(
            "Prediction accuracy: {}",
            format_percent(accuracy)
        ));
    }
    Ok(())
}

fn reopen(ctx: &Context, id: &str) -> Result<()> {
    let store = ctx.store();
    let mut backlog = store.load()?;
    let target = resolve_id(&backlog, id)?;
    let idea = backlog
        .get_mut(&target)
        .ok_or_else(|| anyhow!("No idea with id {}", target))?;

    idea.reopen()?;
    let name = idea.name.clone();
    store.save(&backlog)?;

    ctx.output
        .success(&format!("Reopened '{}' for a retest", name));
    Ok(())
}

fn remove(ctx: &Context, id: &str, force: bool) -> Result<()> {
    let store = ctx.store();
    let mut backlog = store.load()?;
    let target = resolve_id(&backlog, id)?;
    let name = backlog
        .get(&target)
        .map(|idea| idea.name.clone())
        .unwrap_or_default();

    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Remove idea '{}'?", name))
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;
        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    backlog.remove(&target)?;
    store.save(&backlog)?;

    ctx.output.success(&format!("Removed idea '{}'", name));
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdeaDisplay {
    id: Uuid,
    name: String,
    impact: u8,
    confidence: u8,
    ease: u8,
    ice_score: u16,
    priority: String,
    status: String,
    current_conversion_rate: f64,
    expected_improvement: f64,
    expected_conversion_rate: f64,
    monthly_traffic: u64,
    additional_monthly_conversions: u64,
    created: String,
    test_duration: Option<u32>,
    actual_result: Option<f64>,
    prediction_accuracy: Option<f64>,
}

impl From<&TestIdea> for IdeaDisplay {
    fn from(idea: &TestIdea) -> Self {
        Self {
            id: idea.id.into(),
            name: idea.name.clone(),
            impact: idea.impact,
            confidence: idea.confidence,
            ease: idea.ease,
            ice_score: idea.ice_score,
            priority: idea.priority_band().to_string(),
            status: idea.status.to_string(),
            current_conversion_rate: idea.current_conversion_rate,
            expected_improvement: idea.expected_improvement,
            expected_conversion_rate: idea.expected_conversion_rate(),
            monthly_traffic: idea.monthly_traffic,
            additional_monthly_conversions: idea.additional_monthly_conversions(),
            created: format_relative_time(&idea.created_at),
            test_duration: idea.test_duration,
            actual_result: idea.actual_result,
            prediction_accuracy: idea.prediction_accuracy(),
        }
    }
}

impl TableDisplay for IdeaDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(format_uuid_short(&self.id)),
            Cell::new(&self.name),
            Cell::new(self.ice_score),
            Cell::new(priority_badge(&self.priority)),
            Cell::new(status_badge(&self.status)),
            Cell::new(&self.created),
        ]
    }

    fn display_single(&self) {
        print_section("Idea");
        print_field("ID", &self.id.to_string());
        print_field("Name", &self.name);
        print_field("Status", &status_badge(&self.status));
        print_field("Created", &self.created);

        print_section("Scores");
        print_field("Impact", &self.impact.to_string());
        print_field("Confidence", &self.confidence.to_string());
        print_field("Ease", &self.ease.to_string());
        print_field("ICE", &self.ice_score.to_string());
        print_field("Priority", &priority_badge(&self.priority));

        print_section("Conversion Profile");
        print_field("Current rate", &format_percent(self.current_conversion_rate));
        print_field(
            "Expected improvement",
            &format_percent(self.expected_improvement),
        );
        print_field(
            "Expected rate",
            &format_percent(self.expected_conversion_rate),
        );
        print_field("Monthly traffic", &self.monthly_traffic.to_string());
        print_field(
            "Extra conversions/month",
            &self.additional_monthly_conversions.to_string(),
        );

        if self.test_duration.is_some() || self.actual_result.is_some() {
            print_section("Test Run");
            print_optional_field(
                "Duration (days)",
                self.test_duration.map(|d| d.to_string()).as_deref(),
            );
            print_optional_field(
                "Measured uplift",
                self.actual_result.map(format_percent).as_deref(),
            );
            print_optional_field(
                "Prediction accuracy",
                self.prediction_accuracy.map(format_percent).as_deref(),
            );
        }
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            format_uuid_short(&self.id),
            self.name,
            self.ice_score,
            self.priority,
            self.status
        );
    }
}
