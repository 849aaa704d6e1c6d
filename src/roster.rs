//! The roster service
//!
//! A [`Roster`] composes a [`Store`] with a [`Clock`] and exposes every hero
//! and pet operation. Each operation loads the full collection, performs at
//! most one mutation, and saves the full collection back. Nothing is saved
//! when an operation fails, so a failed call leaves the stored collection as it
//! was.

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{
    domain::{
        CareAction, CareError, Clock, Deceased, Hero, HeroId, HeroPatch, NewHero, PetSpec,
        PetStatus, SystemClock, ValidationError,
    },
    storage::{Store, StoreError},
};

/// A hero roster backed by a store.
#[derive(Debug)]
pub struct Roster<S, C = SystemClock> {
    store: S,
    clock: C,
}

/// Errors returned by roster operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input was missing or malformed.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    /// No hero has the given identifier.
    #[error("hero {0} not found")]
    NotFound(HeroId),
    /// The hero has not adopted a pet.
    #[error("hero {0} has no pet")]
    NoPet(HeroId),
    /// The hero's pet has died and can no longer be cared for.
    #[error(transparent)]
    DeceasedPet(#[from] Deceased),
    /// The collection could not be loaded or saved.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    fn from_care(id: HeroId, error: CareError) -> Self {
        match error {
            CareError::NoPet => Self::NoPet(id),
            CareError::Deceased(deceased) => Self::DeceasedPet(deceased),
        }
    }
}

impl<S: Store> Roster<S> {
    /// A roster over `store` that reads the system clock.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: Store, C: Clock> Roster<S, C> {
    /// A roster over `store` that reads `clock`.
    #[must_use]
    pub const fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the roster, returning the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// The current instant according to the roster's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Every hero, in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded.
    pub fn list(&self) -> Result<Vec<Hero>, Error> {
        Ok(self.store.load(self.clock.now())?)
    }

    /// The hero with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such hero.
    pub fn get(&self, id: HeroId) -> Result<Hero, Error> {
        self.store
            .load(self.clock.now())?
            .into_iter()
            .find(|hero| hero.id() == id)
            .ok_or(Error::NotFound(id))
    }

    /// Recruits a new hero, assigning the next free identifier.
    ///
    /// The identifier is one more than the largest in use, or 1 for an empty
    /// roster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name or alias is blank.
    #[instrument(skip(self))]
    pub fn add(&mut self, new: NewHero) -> Result<Hero, Error> {
        let mut heroes = self.store.load(self.clock.now())?;
        let hero = Hero::create(next_id(&heroes), new)?;

        heroes.push(hero.clone());
        self.store.save(&heroes)?;

        tracing::info!(id = hero.id(), alias = hero.alias(), "Recruited hero");
        Ok(hero)
    }

    /// Merges `patch` over a hero. The identifier never changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such hero, or
    /// [`Error::Validation`] if the patch blanks the name or alias.
    #[instrument(skip(self))]
    pub fn update(&mut self, id: HeroId, patch: HeroPatch) -> Result<Hero, Error> {
        let mut heroes = self.store.load(self.clock.now())?;
        let index = position(&heroes, id)?;

        heroes[index].apply(patch)?;
        self.store.save(&heroes)?;

        tracing::info!(id, "Updated hero");
        Ok(heroes.swap_remove(index))
    }

    /// Removes a hero (and its pet) from the roster.
    ///
    /// Returns the removed hero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such hero.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: HeroId) -> Result<Hero, Error> {
        let mut heroes = self.store.load(self.clock.now())?;
        let index = position(&heroes, id)?;

        let removed = heroes.remove(index);
        self.store.save(&heroes)?;

        tracing::info!(id, "Deleted hero");
        Ok(removed)
    }

    /// Heroes whose city matches `city`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded.
    pub fn find_by_city(&self, city: &str) -> Result<Vec<Hero>, Error> {
        Ok(self
            .store
            .load(self.clock.now())?
            .into_iter()
            .filter(|hero| hero.is_based_in(city))
            .collect())
    }

    /// Narrates a hero facing a villain. Nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such hero, or
    /// [`Error::Validation`] if the villain has no name.
    pub fn face_villain(&self, id: HeroId, villain: &str) -> Result<String, Error> {
        Ok(self.get(id)?.face(villain)?)
    }

    /// Gives a hero a freshly adopted pet.
    ///
    /// A pet the hero already has is replaced without confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such hero, or
    /// [`Error::Validation`] if the pet has no name or type.
    #[instrument(skip(self))]
    pub fn adopt_pet(&mut self, id: HeroId, spec: PetSpec) -> Result<Hero, Error> {
        let now = self.clock.now();
        let mut heroes = self.store.load(now)?;
        let index = position(&heroes, id)?;

        let replaced = heroes[index].adopt_pet(spec, now)?;
        if let Some(previous) = replaced {
            tracing::warn!(id, previous = previous.name(), "Replacing existing pet");
        }
        self.store.save(&heroes)?;

        tracing::info!(id, "Adopted pet");
        Ok(heroes.swap_remove(index))
    }

    /// Feeds a hero's pet.
    ///
    /// # Errors
    ///
    /// See [`Roster::care_for_pet`].
    pub fn feed_pet(&mut self, id: HeroId) -> Result<PetStatus, Error> {
        self.care_for_pet(id, CareAction::Feed)
    }

    /// Plays with a hero's pet.
    ///
    /// # Errors
    ///
    /// See [`Roster::care_for_pet`].
    pub fn play_with_pet(&mut self, id: HeroId) -> Result<PetStatus, Error> {
        self.care_for_pet(id, CareAction::Play)
    }

    /// Bathes a hero's pet.
    ///
    /// # Errors
    ///
    /// See [`Roster::care_for_pet`].
    pub fn bathe_pet(&mut self, id: HeroId) -> Result<PetStatus, Error> {
        self.care_for_pet(id, CareAction::Bathe)
    }

    /// Applies a care action to a hero's pet and saves the result.
    ///
    /// Returns the pet's status at the instant of the action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such hero, [`Error::NoPet`]
    /// if the hero has no pet, or [`Error::DeceasedPet`] if the pet has died.
    #[instrument(skip(self))]
    pub fn care_for_pet(&mut self, id: HeroId, action: CareAction) -> Result<PetStatus, Error> {
        let now = self.clock.now();
        let mut heroes = self.store.load(now)?;
        let index = position(&heroes, id)?;

        let status = heroes[index]
            .care_for_pet(action, now)
            .map(|pet| pet.status(now))
            .map_err(|e| Error::from_care(id, e))?;
        self.store.save(&heroes)?;

        tracing::info!(id, ?action, "Cared for pet");
        Ok(status)
    }

    /// The current status of a hero's pet. Nothing is saved.
    ///
    /// A dead pet can still be looked at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such hero, or
    /// [`Error::NoPet`] if the hero has no pet.
    pub fn pet_status(&self, id: HeroId) -> Result<PetStatus, Error> {
        let now = self.clock.now();
        self.get(id)?
            .pet_status(now)
            .map_err(|e| Error::from_care(id, e))
    }
}

fn position(heroes: &[Hero], id: HeroId) -> Result<usize, Error> {
    heroes
        .iter()
        .position(|hero| hero.id() == id)
        .ok_or(Error::NotFound(id))
}

fn next_id(heroes: &[Hero]) -> HeroId {
    heroes.iter().map(Hero::id).max().map_or(1, |max| max + 1)
}
