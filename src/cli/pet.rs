use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roster::{CareAction, HeroId, PetSpec, PetStatus};
use tracing::instrument;

use super::{show::print_status, terminal::Colorize};

/// Command arguments for `roster pet`.
#[derive(Debug, Parser)]
#[command(about = "Adopt and look after a hero's pet")]
pub struct Pet {
    #[command(subcommand)]
    command: PetCommand,
}

#[derive(Debug, Subcommand)]
enum PetCommand {
    /// Adopt a pet for a hero, replacing any pet the hero already has
    Adopt(Adopt),

    /// Feed a hero's pet
    Feed(Care),

    /// Play with a hero's pet
    Play(Care),

    /// Bathe a hero's pet
    Bathe(Care),

    /// Show the current well-being of a hero's pet
    Status(Care),
}

#[derive(Debug, Parser)]
struct Adopt {
    /// The identifier of the adopting hero
    id: HeroId,

    /// The pet's name
    #[arg(long, short)]
    name: String,

    /// The pet's type (species or kind)
    #[arg(long = "type", short = 't')]
    kind: String,

    /// The pet's age
    #[arg(long, short)]
    age: Option<u32>,

    /// A special ability (repeatable)
    #[arg(long = "ability", value_name = "ABILITY")]
    abilities: Vec<String>,
}

#[derive(Debug, Parser)]
struct Care {
    /// The identifier of the pet's hero
    id: HeroId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Pet {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self.command {
            PetCommand::Adopt(adopt) => adopt.run(root),
            PetCommand::Feed(care) => care.act(root, CareAction::Feed),
            PetCommand::Play(care) => care.act(root, CareAction::Play),
            PetCommand::Bathe(care) => care.act(root, CareAction::Bathe),
            PetCommand::Status(care) => care.status(root),
        }
    }
}

impl Adopt {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut roster = super::open_roster(&root);
        let spec = PetSpec {
            name: self.name,
            kind: self.kind,
            age: self.age,
            abilities: self.abilities,
        };

        let hero = roster.adopt_pet(self.id, spec)?;
        if let Some(pet) = hero.pet() {
            println!(
                "{}",
                format!("✅ {} adopted {} the {}", hero.alias(), pet.name(), pet.kind()).success()
            );
        }
        Ok(())
    }
}

impl Care {
    fn act(self, root: PathBuf, action: CareAction) -> anyhow::Result<()> {
        let mut roster = super::open_roster(&root);
        let status = roster.care_for_pet(self.id, action)?;

        match self.output {
            OutputFormat::Pretty => {
                println!("{}", care_message(action, &status.name).success());
                print_status(&status);
                Ok(())
            }
            OutputFormat::Json => print_json(&status),
        }
    }

    fn status(self, root: PathBuf) -> anyhow::Result<()> {
        let roster = super::open_roster(&root);
        let status = roster.pet_status(self.id)?;

        match self.output {
            OutputFormat::Pretty => {
                println!("{}", status.name);
                print_status(&status);
                Ok(())
            }
            OutputFormat::Json => print_json(&status),
        }
    }
}

fn care_message(action: CareAction, name: &str) -> String {
    match action {
        CareAction::Feed => format!("{name} has been fed!"),
        CareAction::Play => format!("You played with {name}!"),
        CareAction::Bathe => format!("{name} has been bathed!"),
    }
}

fn print_json(status: &PetStatus) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), status)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(CareAction::Feed, "Ace has been fed!")]
    #[test_case(CareAction::Play, "You played with Ace!")]
    #[test_case(CareAction::Bathe, "Ace has been bathed!")]
    fn care_messages_name_the_pet(action: CareAction, expected: &str) {
        assert_eq!(care_message(action, "Ace"), expected);
    }
}
