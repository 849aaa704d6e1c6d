use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use roster::{HeroId, PetStatus};
use tracing::instrument;

use super::{HeroView, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a hero")]
pub struct Show {
    /// The identifier of the hero to display
    id: HeroId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let roster = super::open_roster(&root);
        let hero = roster.get(self.id)?;
        let view = HeroView::new(&hero, roster.now());

        match self.output {
            OutputFormat::Pretty => output_pretty(&view),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &view)
                    .context("failed to render json output")?;
                println!();
            }
        }

        Ok(())
    }
}

fn output_pretty(view: &HeroView<'_>) {
    println!("# {} {}", view.alias, format!("#{}", view.id).dim());
    println!("{}\n", view.name);

    println!("{}", "Details".dim());
    if let Some(city) = view.city {
        println!("  City:  {city}");
    }
    if let Some(team) = view.team {
        println!("  Team:  {team}");
    }

    let Some(pet) = &view.pet else {
        println!("  Pet:   {}", "none".dim());
        return;
    };

    println!();
    println!("{}", "Pet".dim());
    println!("  Name:      {}", pet.status.name);
    println!("  Type:      {}", pet.kind);
    if let Some(age) = pet.age {
        println!("  Age:       {age}");
    }
    if !pet.abilities.is_empty() {
        println!("  Abilities: {}", pet.abilities.join(", "));
    }
    println!();
    print_status(&pet.status);
}

/// Prints the vitals of a pet as meters.
pub fn print_status(status: &PetStatus) {
    use super::terminal::meter;

    println!("  Life:      {}", meter(status.life));
    println!("  Hunger:    {}", meter(status.hunger));
    println!("  Happiness: {}", meter(status.happiness));
    println!("  Hygiene:   {}", meter(status.hygiene));
    if status.alive {
        println!("  {}", "alive".success());
    } else {
        println!("  {}", "deceased".danger());
    }
}
