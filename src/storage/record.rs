//! Wire records for heroes and pets
//!
//! These are the shapes written to and read from the JSON collection. Domain
//! types serialize through them, and stored records are turned back into domain
//! types at a given load instant, so rehydration rules live here in one place.

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::domain::{CareLog, Hero, HeroId, Pet, ValidationError, Vitals};

/// A hero as stored: `{id, name, alias, city, team, pet?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroRecord {
    id: HeroId,
    name: String,
    alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pet: Option<PetRecord>,
}

/// A pet as stored.
///
/// Vitals that are absent take their fresh-adoption value, and absent
/// timestamps take the instant the record is loaded. Everything that is present
/// is restored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRecord {
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "tipo")]
    kind: String,
    #[serde(rename = "edad", default)]
    age: Option<u32>,
    #[serde(rename = "poderes", default)]
    abilities: Vec<String>,

    #[serde(rename = "vida", default = "fresh::life")]
    life: f64,
    #[serde(rename = "hambre", default = "fresh::hunger")]
    hunger: f64,
    #[serde(rename = "felicidad", default = "fresh::happiness")]
    happiness: f64,
    #[serde(rename = "higiene", default = "fresh::hygiene")]
    hygiene: f64,

    #[serde(rename = "ultimaAlimentacion", default)]
    last_fed: Option<DateTime<Utc>>,
    #[serde(rename = "ultimoJuego", default)]
    last_played: Option<DateTime<Utc>>,
    #[serde(rename = "ultimoBano", default)]
    last_bathed: Option<DateTime<Utc>>,

    /// When the stored vitals were current. Older records lack it.
    #[serde(rename = "ultimaActualizacion", default)]
    settled_at: Option<DateTime<Utc>>,
}

mod fresh {
    use crate::domain::Vitals;

    pub const fn life() -> f64 {
        Vitals::FRESH.life
    }

    pub const fn hunger() -> f64 {
        Vitals::FRESH.hunger
    }

    pub const fn happiness() -> f64 {
        Vitals::FRESH.happiness
    }

    pub const fn hygiene() -> f64 {
        Vitals::FRESH.hygiene
    }
}

fn stored(field: &str, value: String) -> Result<NonEmptyString, ValidationError> {
    NonEmptyString::new(value)
        .map_err(|_| ValidationError::new(format!("stored {field} is empty")))
}

impl From<Hero> for HeroRecord {
    fn from(hero: Hero) -> Self {
        Self {
            id: hero.id(),
            name: hero.name().to_string(),
            alias: hero.alias().to_string(),
            city: hero.city().map(str::to_string),
            team: hero.team().map(str::to_string),
            pet: hero.pet().cloned().map(PetRecord::from),
        }
    }
}

impl HeroRecord {
    /// Restores the hero, resolving anything missing against `loaded_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a stored name is empty.
    pub fn into_hero(self, loaded_at: DateTime<Utc>) -> Result<Hero, ValidationError> {
        let Self {
            id,
            name,
            alias,
            city,
            team,
            pet,
        } = self;

        Ok(Hero::rehydrate(
            id,
            stored("hero name", name)?,
            stored("hero alias", alias)?,
            city,
            team,
            pet.map(|pet| pet.into_pet(loaded_at)).transpose()?,
        ))
    }
}

impl From<Pet> for PetRecord {
    fn from(pet: Pet) -> Self {
        let Vitals {
            life,
            hunger,
            happiness,
            hygiene,
        } = pet.stored_vitals();
        let CareLog {
            last_fed,
            last_played,
            last_bathed,
        } = *pet.care_log();

        Self {
            name: pet.name().to_string(),
            kind: pet.kind().to_string(),
            age: pet.age(),
            abilities: pet.abilities().to_vec(),
            life,
            hunger,
            happiness,
            hygiene,
            last_fed: Some(last_fed),
            last_played: Some(last_played),
            last_bathed: Some(last_bathed),
            settled_at: Some(pet.settled_at()),
        }
    }
}

impl PetRecord {
    /// Restores the pet, resolving missing timestamps to `loaded_at`.
    ///
    /// A record without a settle instant was last written by a care action, so
    /// its vitals are taken as current at the latest care timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the stored name or type is empty.
    pub fn into_pet(self, loaded_at: DateTime<Utc>) -> Result<Pet, ValidationError> {
        let Self {
            name,
            kind,
            age,
            abilities,
            life,
            hunger,
            happiness,
            hygiene,
            last_fed,
            last_played,
            last_bathed,
            settled_at,
        } = self;

        let care = CareLog {
            last_fed: last_fed.unwrap_or(loaded_at),
            last_played: last_played.unwrap_or(loaded_at),
            last_bathed: last_bathed.unwrap_or(loaded_at),
        };

        Ok(Pet::rehydrate(
            stored("pet name", name)?,
            stored("pet type", kind)?,
            age,
            abilities,
            Vitals {
                life,
                hunger,
                happiness,
                hygiene,
            },
            care,
            settled_at.unwrap_or_else(|| care.last_care()),
        ))
    }
}
