//! Persuasion principle reference command

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use abhub_core::{PersuasionPrinciple, PrincipleCard};

use crate::context::Context;
use crate::output::{print_field, print_list_field, print_section, TableDisplay};

/// Browse the persuasion principle reference cards
#[derive(Debug, Args)]
pub struct PrinciplesCommand {
    /// Show one principle in full (e.g. social-proof, scarcity)
    pub principle: Option<PersuasionPrinciple>,
}

pub fn execute(ctx: &Context, cmd: PrinciplesCommand) -> Result<()> {
    match cmd.principle {
        Some(principle) => {
            let display = CardDisplay::from(PrincipleCard::for_principle(principle));
            ctx.output.write(&display)?;
        }
        None => {
            let cards: Vec<CardDisplay> = PrincipleCard::all()
                .into_iter()
                .map(CardDisplay::from)
                .collect();
            ctx.output
                .write_list(&cards, &["Principle", "Name", "Description"])?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CardDisplay {
    principle: String,
    name: String,
    description: String,
    examples: Vec<String>,
    implementation_tip: String,
}

impl From<PrincipleCard> for CardDisplay {
    fn from(card: PrincipleCard) -> Self {
        Self {
            principle: card.principle.to_string(),
            name: card.name.to_string(),
            description: card.description.to_string(),
            examples: card.examples.iter().map(|s| s.to_string()).collect(),
            implementation_tip: card.implementation_tip.to_string(),
        }
    }
}

impl TableDisplay for CardDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.principle),
            Cell::new(&self.name),
            Cell::new(&self.description),
        ]
    }

    fn display_single(&self) {
        print_section(&self.name);
        print_field("Principle", &self.principle);
        print_field("Description", &self.description);

        print_section("Examples");
        print_list_field("Try", &self.examples);

        print_section("Implementation");
        print_field("Tip", &self.implementation_tip);
    }

    fn display_compact(&self) {
        println!("{}\t{}", self.principle, self.name);
    }
}
