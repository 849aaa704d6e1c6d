use std::io;

use chrono::{DateTime, Utc};

use crate::{Hero, domain::ValidationError};

pub mod json;
pub mod memory;
pub(crate) mod record;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// The persistence boundary of a roster.
///
/// A store hands out the whole collection and takes the whole collection back.
/// There are no partial updates, and a load followed by a save is assumed to be
/// atomic with respect to the roster.
pub trait Store {
    /// Reads every hero, in stored order, with pets fully rehydrated.
    ///
    /// Care timestamps missing from a stored pet resolve to `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or parsed, or holds a
    /// record that fails validation.
    fn load(&self, now: DateTime<Utc>) -> Result<Vec<Hero>, StoreError>;

    /// Replaces the stored collection with `heroes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    fn save(&mut self, heroes: &[Hero]) -> Result<(), StoreError>;
}

/// Errors that can occur when loading or saving the collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("failed to access the collection: {0}")]
    Io(#[from] io::Error),
    /// The collection could not be encoded or decoded as JSON.
    #[error("malformed collection: {0}")]
    Json(#[from] serde_json::Error),
    /// A stored record is not a valid hero or pet.
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
}
