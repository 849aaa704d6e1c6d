//! A JSON-file backed store of heroes
//!
//! The whole collection lives in a single JSON array. Every load reads the
//! full file and every save rewrites it.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tracing::instrument;

use super::{Store, StoreError, record::HeroRecord};
use crate::{Config, Hero};

/// A store that keeps the collection in one JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonStore {
    /// A store reading and writing `path`, indented with two spaces.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path, pretty: true }
    }

    /// The store described by `config` for the roster at `root`.
    #[must_use]
    pub fn from_config(root: &Path, config: &Config) -> Self {
        Self {
            path: config.data_path(root),
            pretty: config.pretty,
        }
    }

    /// Writes compact JSON instead of indented JSON.
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write<W: Write>(&self, writer: &mut W, heroes: &[Hero]) -> Result<(), StoreError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, heroes)?;
        } else {
            serde_json::to_writer(&mut *writer, heroes)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl Store for JsonStore {
    /// Reads the collection.
    ///
    /// A file that does not exist yet is an empty collection.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self, now: DateTime<Utc>) -> Result<Vec<Hero>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No collection found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<HeroRecord> = serde_json::from_reader(BufReader::new(file))?;
        let heroes = records
            .into_iter()
            .map(|record| record.into_hero(now))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Loaded {} heroes", heroes.len());
        Ok(heroes)
    }

    /// Rewrites the collection.
    ///
    /// Parent directories are created automatically if they don't exist.
    #[instrument(level = "debug", skip(self, heroes), fields(path = %self.path.display()))]
    fn save(&mut self, heroes: &[Hero]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, heroes)?;
        tracing::debug!("Saved {} heroes", heroes.len());
        Ok(())
    }
}
