use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
};

mod list;
mod pet;
mod show;
mod terminal;

use chrono::{DateTime, Utc};
use clap::ArgAction;
use list::{City, List};
use pet::Pet;
use roster::{Hero, HeroId, HeroPatch, JsonStore, NewHero, PetStatus, Roster, Store};
use serde::Serialize;
use show::Show;
use tracing::instrument;

/// Location of the configuration file, relative to the roster root.
const CONFIG_FILE: &str = ".roster/config.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the roster
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List every hero (default)
    List(List),

    /// Initialize a new roster
    Init,

    /// Show detailed information about a hero
    Show(Show),

    /// Recruit a new hero
    Add(Add),

    /// Change a hero's details
    ///
    /// Only the given fields change. The identifier never does.
    Update(Update),

    /// Remove a hero and its pet
    Delete(Delete),

    /// List the heroes based in a city
    City(City),

    /// Send a hero to face a villain
    Face(Face),

    /// Adopt and look after pets
    Pet(Pet),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Show(command) => command.run(root)?,
            Self::Add(command) => command.run(root)?,
            Self::Update(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::City(command) => command.run(root)?,
            Self::Face(command) => command.run(root)?,
            Self::Pet(command) => command.run(root)?,
            Self::Config(command) => command.run(&root)?,
        }
        Ok(())
    }
}

/// Loads the configuration for the roster at `root`.
///
/// A missing or unreadable configuration falls back to the defaults.
fn load_config(root: &Path) -> roster::Config {
    let path = root.join(CONFIG_FILE);
    match roster::Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(path = %path.display(), "Using default configuration: {e}");
            roster::Config::default()
        }
    }
}

/// Opens the roster at `root`, backed by the configured JSON collection.
fn open_roster(root: &Path) -> Roster<JsonStore> {
    let config = load_config(root);
    let store = JsonStore::from_config(root, &config);
    tracing::debug!(path = %store.path().display(), "Opening roster");
    Roster::new(store)
}

/// Asks the operator to confirm, exiting if they decline.
fn prompt_to_proceed() -> anyhow::Result<()> {
    eprint!("\nProceed? (y/N) ");
    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    if !line.trim().eq_ignore_ascii_case("y") {
        println!("Cancelled");
        std::process::exit(130);
    }
    Ok(())
}

/// A hero as presented to the operator, with the pet's current status.
#[derive(Debug, Serialize)]
struct HeroView<'a> {
    id: HeroId,
    name: &'a str,
    alias: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    team: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pet: Option<PetView<'a>>,
}

/// A pet's identity and care times alongside its current status.
#[derive(Debug, Serialize)]
struct PetView<'a> {
    #[serde(flatten)]
    status: PetStatus,
    #[serde(rename = "tipo")]
    kind: &'a str,
    #[serde(rename = "edad")]
    age: Option<u32>,
    #[serde(rename = "poderes")]
    abilities: &'a [String],
    #[serde(rename = "ultimaAlimentacion")]
    last_fed: DateTime<Utc>,
    #[serde(rename = "ultimoJuego")]
    last_played: DateTime<Utc>,
    #[serde(rename = "ultimoBano")]
    last_bathed: DateTime<Utc>,
}

impl<'a> PetView<'a> {
    fn new(pet: &'a roster::Pet, now: DateTime<Utc>) -> Self {
        let care = pet.care_log();
        Self {
            status: pet.status(now),
            kind: pet.kind(),
            age: pet.age(),
            abilities: pet.abilities(),
            last_fed: care.last_fed,
            last_played: care.last_played,
            last_bathed: care.last_bathed,
        }
    }
}

impl<'a> HeroView<'a> {
    fn new(hero: &'a Hero, now: DateTime<Utc>) -> Self {
        Self {
            id: hero.id(),
            name: hero.name(),
            alias: hero.alias(),
            city: hero.city(),
            team: hero.team(),
            pet: hero.pet().map(|pet| PetView::new(pet, now)),
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_dir = root.join(".roster");
        if config_dir.exists() {
            anyhow::bail!("Roster already initialized (found existing .roster directory)");
        }

        std::fs::create_dir_all(&config_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create .roster directory: {e}"))?;

        let config = roster::Config::default();
        config
            .save(&root.join(CONFIG_FILE))
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        let mut store = JsonStore::from_config(root, &config);
        let created_collection = if store.path().exists() {
            false
        } else {
            store.save(&[])?;
            true
        };

        println!("Initialized roster in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        if created_collection {
            println!("  Created: {}", config.data_file().display());
        }
        println!();
        println!("Next steps:");
        println!("  roster add --name \"Bruce Wayne\" --alias Batman --city Gotham");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// The hero's real name
    #[arg(long, short)]
    name: String,

    /// The name the hero is known by
    #[arg(long, short)]
    alias: String,

    /// The city the hero protects
    #[arg(long, short)]
    city: Option<String>,

    /// The team the hero belongs to
    #[arg(long, short)]
    team: Option<String>,
}

impl Add {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut roster = open_roster(&root);
        let hero = roster.add(NewHero {
            name: self.name,
            alias: self.alias,
            city: self.city,
            team: self.team,
        })?;

        println!(
            "{}",
            format!("✅ Added {} as hero {}", hero.alias(), hero.id()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Update {
    /// The identifier of the hero to change
    id: HeroId,

    /// A new real name
    #[arg(long, short)]
    name: Option<String>,

    /// A new alias
    #[arg(long, short)]
    alias: Option<String>,

    /// A new city
    #[arg(long, short)]
    city: Option<String>,

    /// A new team
    #[arg(long, short)]
    team: Option<String>,
}

impl Update {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let patch = HeroPatch {
            name: self.name,
            alias: self.alias,
            city: self.city,
            team: self.team,
        };
        if patch.is_empty() {
            anyhow::bail!("Nothing to update (pass at least one of --name, --alias, --city, --team)");
        }

        let mut roster = open_roster(&root);
        let hero = roster.update(self.id, patch)?;

        println!(
            "{}",
            format!("✅ Updated hero {} ({})", hero.id(), hero.alias()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The identifier of the hero to delete
    id: HeroId,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut roster = open_roster(&root);

        if !self.yes {
            let hero = roster.get(self.id)?;
            println!("Will delete {} ({})", hero.alias(), hero.name());
            if let Some(pet) = hero.pet() {
                println!(
                    "{}",
                    format!("  {} the {} will be removed too", pet.name(), pet.kind()).warning()
                );
            }
            prompt_to_proceed()?;
        }

        let removed = roster.delete(self.id)?;

        println!(
            "{}",
            format!("✅ Deleted {} from the roster", removed.alias()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Face {
    /// The identifier of the hero
    id: HeroId,

    /// The villain to face
    villain: String,
}

impl Face {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let roster = open_roster(&root);
        println!("{}", roster.face_villain(self.id, &self.villain)?);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Print a single configuration value
    Get {
        /// Configuration key to read
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: ConfigKey,

        /// Value to set
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ConfigKey {
    /// Path of the JSON collection, relative to the root
    #[value(name = "data_file")]
    DataFile,
    /// Whether the JSON collection is indented
    Pretty,
}

impl ConfigKey {
    const fn name(self) -> &'static str {
        match self {
            Self::DataFile => "data_file",
            Self::Pretty => "pretty",
        }
    }

    fn get(self, config: &roster::Config) -> String {
        match self {
            Self::DataFile => config.data_file().display().to_string(),
            Self::Pretty => config.pretty.to_string(),
        }
    }

    fn set(self, config: &mut roster::Config, value: &str) -> anyhow::Result<()> {
        match self {
            Self::DataFile => {
                if value.trim().is_empty() {
                    anyhow::bail!("data_file cannot be empty");
                }
                config.set_data_file(PathBuf::from(value));
            }
            Self::Pretty => {
                config.pretty = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("pretty must be 'true' or 'false'"))?;
            }
        }
        Ok(())
    }
}

impl Config {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let config_path = root.join(CONFIG_FILE);

        match self.command {
            ConfigCommand::Show => {
                let config = load_config(root);

                println!("Configuration:");
                println!(
                    "  data_file: {} ({})",
                    config.data_file().display(),
                    config.data_path(root).display().to_string().dim()
                );
                println!(
                    "  pretty: {} ({})",
                    config.pretty,
                    if config.pretty {
                        "indented".dim()
                    } else {
                        "compact".dim()
                    }
                );
            }
            ConfigCommand::Get { key } => {
                println!("{}", key.get(&load_config(root)));
            }
            ConfigCommand::Set { key, value } => {
                let mut config = if config_path.exists() {
                    roster::Config::load(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?
                } else {
                    roster::Config::default()
                };

                key.set(&mut config, &value)?;

                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                config
                    .save(&config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;

                println!("{}", format!("✅ Set {} to {}", key.name(), key.get(&config)).success());
            }
        }

        Ok(())
    }
}
