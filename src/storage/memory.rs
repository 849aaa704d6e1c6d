//! An in-memory store of heroes
//!
//! The [`MemoryStore`] knows nothing about the filesystem. It is useful for
//! tests and for embedding a roster in another process.

use chrono::{DateTime, Utc};

use super::{Store, StoreError};
use crate::Hero;

/// A store that keeps the collection in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    heroes: Vec<Hero>,
    saves: usize,
}

impl MemoryStore {
    /// A store seeded with `heroes`.
    #[must_use]
    pub const fn with_heroes(heroes: Vec<Hero>) -> Self {
        Self { heroes, saves: 0 }
    }

    /// The collection as last saved.
    #[must_use]
    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    /// How many times the collection has been saved.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl Store for MemoryStore {
    fn load(&self, _now: DateTime<Utc>) -> Result<Vec<Hero>, StoreError> {
        Ok(self.heroes.clone())
    }

    fn save(&mut self, heroes: &[Hero]) -> Result<(), StoreError> {
        self.heroes = heroes.to_vec();
        self.saves += 1;
        Ok(())
    }
}
