use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use roster::Hero;
use tracing::instrument;

use super::{HeroView, terminal};

/// Command arguments for `roster list`.
#[derive(Debug, Default, Parser)]
#[command(about = "List every hero on the roster")]
pub struct List {
    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let roster = super::open_roster(&root);
        let heroes = roster.list()?;
        render(&heroes, roster.now(), self.output)
    }
}

/// Command arguments for `roster city`.
#[derive(Debug, Parser)]
#[command(about = "List the heroes based in a city")]
pub struct City {
    /// The city to search for (case-insensitive)
    city: String,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl City {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let roster = super::open_roster(&root);
        let heroes = roster.find_by_city(&self.city)?;

        if heroes.is_empty() && matches!(self.output, OutputFormat::Table) {
            println!("No heroes found in {}", self.city);
            return Ok(());
        }
        render(&heroes, roster.now(), self.output)
    }
}

fn render(heroes: &[Hero], now: DateTime<Utc>, output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Table if terminal::is_narrow() => {
            render_compact(heroes, now);
            Ok(())
        }
        OutputFormat::Table => {
            render_table(heroes, now);
            Ok(())
        }
        OutputFormat::Json => render_json(heroes, now),
    }
}

fn pet_summary(view: &HeroView<'_>) -> String {
    view.pet.as_ref().map_or_else(String::new, |pet| {
        let status = &pet.status;
        if status.alive {
            format!("{} ({})", status.name, status.life)
        } else {
            format!("{} (deceased)", status.name)
        }
    })
}

fn rows(heroes: &[Hero], now: DateTime<Utc>) -> Vec<[String; 6]> {
    heroes
        .iter()
        .map(|hero| {
            let view = HeroView::new(hero, now);
            [
                view.id.to_string(),
                view.alias.to_string(),
                view.name.to_string(),
                view.city.unwrap_or_default().to_string(),
                view.team.unwrap_or_default().to_string(),
                pet_summary(&view),
            ]
        })
        .collect()
}

fn render_table(heroes: &[Hero], now: DateTime<Utc>) {
    use terminal::Colorize;

    const HEADERS: [&str; 6] = ["ID", "Alias", "Name", "City", "Team", "Pet"];

    if heroes.is_empty() {
        println!("{}", "The roster is empty.".dim());
        return;
    }

    let data = rows(heroes, now);

    // Determine column widths for alignment.
    let widths: Vec<usize> = HEADERS
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    for (header, width) in HEADERS.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();

    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in data {
        for (value, width) in row.iter().zip(&widths) {
            print!("{value:<width$}  ");
        }
        println!();
    }
}

fn render_compact(heroes: &[Hero], now: DateTime<Utc>) {
    use terminal::Colorize;

    for hero in heroes {
        let view = HeroView::new(hero, now);
        let city = view
            .city
            .map(|city| format!(" {}", format!("({city})").dim()))
            .unwrap_or_default();
        println!("{:>3} {}{city}", view.id, view.alias.info());
    }
}

fn render_json(heroes: &[Hero], now: DateTime<Utc>) -> anyhow::Result<()> {
    let views: Vec<HeroView<'_>> = heroes.iter().map(|hero| HeroView::new(hero, now)).collect();

    serde_json::to_writer_pretty(std::io::stdout(), &views)
        .context("failed to render json output")?;
    println!();
    Ok(())
}
