//! Generation segment reference command

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use abhub_core::{most_sensitive_to, Generation, PersuasionPrinciple, SegmentProfile};

use crate::context::Context;
use crate::output::{
    format_money, format_percent, print_field, print_list_field, print_section, OutputFormat,
    TableDisplay,
};

/// Browse the generation segment benchmarks
#[derive(Debug, Args)]
pub struct SegmentsCommand {
    /// Show one segment in full (gen-z, millennial, gen-x, boomer)
    pub generation: Option<Generation>,

    /// Rank segments by sensitivity to a persuasion principle
    #[arg(long, conflicts_with = "generation")]
    pub principle: Option<PersuasionPrinciple>,
}

pub fn execute(ctx: &Context, cmd: SegmentsCommand) -> Result<()> {
    if let Some(principle) = cmd.principle {
        return rank_by_principle(ctx, principle);
    }

    match cmd.generation {
        Some(generation) => {
            let display = SegmentDisplay::from(SegmentProfile::for_generation(generation));
            ctx.output.write(&display)?;
        }
        None => {
            let segments: Vec<SegmentDisplay> = SegmentProfile::all()
                .into_iter()
                .map(SegmentDisplay::from)
                .collect();
            ctx.output.write_list(
                &segments,
                &["Segment", "Born", "Conv %", "AOV", "Mobile %", "Best lever"],
            )?;
        }
    }
    Ok(())
}

fn rank_by_principle(ctx: &Context, principle: PersuasionPrinciple) -> Result<()> {
    let mut ranked: Vec<RankDisplay> = SegmentProfile::all()
        .into_iter()
        .filter_map(|profile| {
            profile.sensitivity(principle).map(|score| RankDisplay {
                generation: profile.generation.to_string(),
                name: profile.name.to_string(),
                score,
            })
        })
        .collect();

    if ranked.is_empty() {
        ctx.output.info(&format!(
            "The catalog does not score segments for '{}'.",
            principle
        ));
        return Ok(());
    }

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ctx.output
        .write_list(&ranked, &["Segment", "Name", "Sensitivity"])?;

    if ctx.output_format == OutputFormat::Table {
        if let Some(best) = most_sensitive_to(principle) {
            ctx.output.success(&format!(
                "'{}' lands hardest with {}",
                principle,
                SegmentProfile::for_generation(best).name
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RankDisplay {
    generation: String,
    name: String,
    score: u8,
}

impl TableDisplay for RankDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.generation),
            Cell::new(&self.name),
            Cell::new(format!("{}/10", self.score)),
        ]
    }

    fn display_single(&self) {
        print_field(&self.name, &format!("{}/10", self.score));
    }

    fn display_compact(&self) {
        println!("{}\t{}", self.generation, self.score);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentDisplay {
    generation: String,
    name: String,
    birth_years: String,
    description: String,
    conversion_rate: f64,
    avg_order_value: rust_decimal::Decimal,
    mobile_share: u8,
    desktop_share: u8,
    tablet_share: u8,
    social_proof_sensitivity: u8,
    scarcity_sensitivity: u8,
    authority_sensitivity: u8,
    behaviors: Vec<String>,
    recommendations: Vec<String>,
}

impl From<SegmentProfile> for SegmentDisplay {
    fn from(profile: SegmentProfile) -> Self {
        Self {
            generation: profile.generation.to_string(),
            name: profile.name.to_string(),
            birth_years: profile.birth_years.to_string(),
            description: profile.description.to_string(),
            conversion_rate: profile.conversion_rate,
            avg_order_value: profile.avg_order_value,
            mobile_share: profile.mobile_share,
            desktop_share: profile.desktop_share,
            tablet_share: profile.tablet_share,
            social_proof_sensitivity: profile.social_proof_sensitivity,
            scarcity_sensitivity: profile.scarcity_sensitivity,
            authority_sensitivity: profile.authority_sensitivity,
            behaviors: profile.behaviors.iter().map(|s| s.to_string()).collect(),
            recommendations: profile
                .recommendations
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SegmentDisplay {
    /// The principle this segment responds to most, by catalog score.
    fn best_lever(&self) -> &'static str {
        let scores = [
            ("social proof", self.social_proof_sensitivity),
            ("scarcity", self.scarcity_sensitivity),
            ("authority", self.authority_sensitivity),
        ];
        scores
            .into_iter()
            .max_by_key(|(_, score)| *score)
            .map(|(name, _)| name)
            .unwrap_or("-")
    }
}

impl TableDisplay for SegmentDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.name),
            Cell::new(&self.birth_years),
            Cell::new(format_percent(self.conversion_rate)),
            Cell::new(format_money(&self.avg_order_value)),
            Cell::new(format!("{}%", self.mobile_share)),
            Cell::new(self.best_lever()),
        ]
    }

    fn display_single(&self) {
        print_section(&format!("{} ({})", self.name, self.birth_years));
        print_field("Description", &self.description);

        print_section("Benchmarks");
        print_field("Conversion rate", &format_percent(self.conversion_rate));
        print_field("Avg order value", &format_money(&self.avg_order_value));
        print_field(
            "Devices",
            &format!(
                "{}% mobile / {}% desktop / {}% tablet",
                self.mobile_share, self.desktop_share, self.tablet_share
            ),
        );

        print_section("Principle Sensitivities");
        print_field(
            "Social proof",
            &format!("{}/10", self.social_proof_sensitivity),
        );
        print_field("Scarcity", &format!("{}/10", self.scarcity_sensitivity));
        print_field("Authority", &format!("{}/10", self.authority_sensitivity));

        print_section("Behaviors");
        print_list_field("Typical", &self.behaviors);

        print_section("Recommendations");
        print_list_field("Try", &self.recommendations);
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}\t{}",
            self.generation,
            format_percent(self.conversion_rate),
            format_money(&self.avg_order_value),
            self.best_lever()
        );
    }
}
