use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use super::{
    pet::{CareAction, Deceased, Pet, PetSpec, PetStatus},
    validation::{ValidationError, required},
};

/// Identifier of a hero, unique within a roster.
pub type HeroId = u64;

/// A hero and, optionally, the pet it looks after.
///
/// The hero is the aggregate through which every pet operation flows: a pet has
/// no identity of its own and is only ever reached through its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "crate::storage::record::HeroRecord")]
pub struct Hero {
    id: HeroId,
    name: NonEmptyString,
    alias: NonEmptyString,
    city: Option<String>,
    team: Option<String>,
    pet: Option<Pet>,
}

/// The fields supplied when recruiting a hero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewHero {
    /// Civilian name. Required.
    #[serde(default)]
    pub name: String,
    /// Hero alias. Required.
    #[serde(default)]
    pub alias: String,
    /// Home city.
    #[serde(default)]
    pub city: Option<String>,
    /// Team affiliation.
    #[serde(default)]
    pub team: Option<String>,
}

/// A partial update to a hero.
///
/// Only the fields that are present are changed. The identifier is not part of
/// the patch; an `id` key in incoming data is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeroPatch {
    /// New civilian name.
    #[serde(default)]
    pub name: Option<String>,
    /// New alias.
    #[serde(default)]
    pub alias: Option<String>,
    /// New home city.
    #[serde(default)]
    pub city: Option<String>,
    /// New team affiliation.
    #[serde(default)]
    pub team: Option<String>,
}

impl HeroPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.alias.is_none() && self.city.is_none() && self.team.is_none()
    }
}

/// A pet-care request could not be carried out.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CareError {
    /// The hero has not adopted a pet.
    #[error("the hero has no pet")]
    NoPet,
    /// The hero's pet is dead.
    #[error(transparent)]
    Deceased(#[from] Deceased),
}

impl Hero {
    /// Recruits a new hero with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or alias is blank.
    pub fn create(id: HeroId, new: NewHero) -> Result<Self, ValidationError> {
        let NewHero {
            name,
            alias,
            city,
            team,
        } = new;

        Ok(Self {
            id,
            name: required("name", name)?,
            alias: required("alias", alias)?,
            city,
            team,
            pet: None,
        })
    }

    /// Restores a hero from stored state.
    #[must_use]
    pub const fn rehydrate(
        id: HeroId,
        name: NonEmptyString,
        alias: NonEmptyString,
        city: Option<String>,
        team: Option<String>,
        pet: Option<Pet>,
    ) -> Self {
        Self {
            id,
            name,
            alias,
            city,
            team,
            pet,
        }
    }

    /// The hero's identifier.
    #[must_use]
    pub const fn id(&self) -> HeroId {
        self.id
    }

    /// The hero's civilian name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The hero's alias.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    /// The hero's home city.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// The hero's team.
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// The hero's pet, if one has been adopted.
    #[must_use]
    pub const fn pet(&self) -> Option<&Pet> {
        self.pet.as_ref()
    }

    /// Whether the hero is based in `city`, ignoring case.
    #[must_use]
    pub fn is_based_in(&self, city: &str) -> bool {
        self.city
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == city.to_lowercase())
    }

    /// Merges `patch` over this hero.
    ///
    /// The patch is validated as a whole before anything changes.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the patch blanks the name or alias.
    pub fn apply(&mut self, patch: HeroPatch) -> Result<(), ValidationError> {
        let HeroPatch {
            name,
            alias,
            city,
            team,
        } = patch;

        let name = name.map(|name| required("name", name)).transpose()?;
        let alias = alias.map(|alias| required("alias", alias)).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(alias) = alias {
            self.alias = alias;
        }
        if city.is_some() {
            self.city = city;
        }
        if team.is_some() {
            self.team = team;
        }
        Ok(())
    }

    /// Adopts a new pet, replacing any pet the hero already has.
    ///
    /// Returns the pet that was replaced.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the pet has no name or type. The hero
    /// keeps its current pet in that case.
    pub fn adopt_pet(
        &mut self,
        spec: PetSpec,
        now: DateTime<Utc>,
    ) -> Result<Option<Pet>, ValidationError> {
        let pet = Pet::adopt(spec, now)?;
        Ok(self.pet.replace(pet))
    }

    /// Delegates a care action to the hero's pet.
    ///
    /// # Errors
    ///
    /// Fails if the hero has no pet or the pet is dead at `now`.
    pub fn care_for_pet(
        &mut self,
        action: CareAction,
        now: DateTime<Utc>,
    ) -> Result<&Pet, CareError> {
        let pet = self.pet.as_mut().ok_or(CareError::NoPet)?;
        pet.care_for(action, now)?;
        Ok(&*pet)
    }

    /// A rounded snapshot of the pet at `now`.
    ///
    /// Looking at a dead pet is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`CareError::NoPet`] if the hero has no pet.
    pub fn pet_status(&self, now: DateTime<Utc>) -> Result<PetStatus, CareError> {
        self.pet
            .as_ref()
            .map(|pet| pet.status(now))
            .ok_or(CareError::NoPet)
    }

    /// Narrates the hero confronting a villain. Nothing changes.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the villain has no name.
    pub fn face(&self, villain: &str) -> Result<String, ValidationError> {
        if villain.trim().is_empty() {
            return Err(ValidationError::new("villain is required"));
        }
        Ok(format!("{} faces {villain}", self.alias()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn bruce() -> Hero {
        Hero::create(
            7,
            NewHero {
                name: "Bruce Wayne".to_string(),
                alias: "Batman".to_string(),
                city: Some("Gotham".to_string()),
                team: Some("Justice League".to_string()),
            },
        )
        .unwrap()
    }

    fn ace() -> PetSpec {
        PetSpec {
            name: "Ace".to_string(),
            kind: "dog".to_string(),
            ..PetSpec::default()
        }
    }

    #[test_case("", "Batman"; "blank name")]
    #[test_case("Bruce Wayne", ""; "blank alias")]
    #[test_case(" ", " "; "both blank")]
    fn create_requires_name_and_alias(name: &str, alias: &str) {
        let new = NewHero {
            name: name.to_string(),
            alias: alias.to_string(),
            ..NewHero::default()
        };
        assert!(Hero::create(1, new).is_err());
    }

    #[test]
    fn create_keeps_optional_fields() {
        let hero = bruce();
        assert_eq!(hero.id(), 7);
        assert_eq!(hero.city(), Some("Gotham"));
        assert_eq!(hero.team(), Some("Justice League"));
        assert!(hero.pet().is_none());
    }

    #[test]
    fn patch_merges_present_fields() {
        let mut hero = bruce();
        hero.apply(HeroPatch {
            city: Some("Bludhaven".to_string()),
            ..HeroPatch::default()
        })
        .unwrap();

        assert_eq!(hero.city(), Some("Bludhaven"));
        assert_eq!(hero.alias(), "Batman");
        assert_eq!(hero.team(), Some("Justice League"));
    }

    #[test]
    fn invalid_patch_changes_nothing() {
        let mut hero = bruce();
        let before = hero.clone();

        let result = hero.apply(HeroPatch {
            name: Some("Dick Grayson".to_string()),
            alias: Some(String::new()),
            ..HeroPatch::default()
        });

        assert!(result.is_err());
        assert_eq!(hero, before);
    }

    #[test]
    fn patch_ignores_incoming_id() {
        let patch: HeroPatch = serde_json::from_str(r#"{"id": 99, "team": "Outsiders"}"#).unwrap();
        let mut hero = bruce();
        hero.apply(patch).unwrap();
        assert_eq!(hero.id(), 7);
        assert_eq!(hero.team(), Some("Outsiders"));
    }

    #[test_case("gotham"; "lower")]
    #[test_case("GOTHAM"; "upper")]
    #[test_case("Gotham"; "exact")]
    fn city_match_ignores_case(city: &str) {
        assert!(bruce().is_based_in(city));
    }

    #[test]
    fn city_match_is_exact() {
        assert!(!bruce().is_based_in("Goth"));
        let mut drifter = bruce();
        drifter.city = None;
        assert!(!drifter.is_based_in("Gotham"));
    }

    #[test]
    fn readoption_replaces_the_pet() {
        let mut hero = bruce();
        assert!(hero.adopt_pet(ace(), t0()).unwrap().is_none());

        let spec = PetSpec {
            name: "Krypto".to_string(),
            kind: "dog".to_string(),
            ..PetSpec::default()
        };
        let previous = hero.adopt_pet(spec, t0()).unwrap();

        assert_eq!(previous.map(|pet| pet.name().to_string()), Some("Ace".to_string()));
        assert_eq!(hero.pet().map(Pet::name), Some("Krypto"));
    }

    #[test]
    fn invalid_adoption_keeps_current_pet() {
        let mut hero = bruce();
        hero.adopt_pet(ace(), t0()).unwrap();

        assert!(hero.adopt_pet(PetSpec::default(), t0()).is_err());
        assert_eq!(hero.pet().map(Pet::name), Some("Ace"));
    }

    #[test]
    fn care_without_a_pet_fails() {
        let mut hero = bruce();
        assert_eq!(
            hero.care_for_pet(CareAction::Feed, t0()).unwrap_err(),
            CareError::NoPet
        );
        assert_eq!(hero.pet_status(t0()).unwrap_err(), CareError::NoPet);
    }

    #[test]
    fn care_is_delegated_to_the_pet() {
        let mut hero = bruce();
        hero.adopt_pet(ace(), t0()).unwrap();

        let now = t0() + Duration::hours(2);
        let pet = hero.care_for_pet(CareAction::Bathe, now).unwrap();
        assert_eq!(pet.care_log().last_bathed, now);
    }

    #[test]
    fn status_of_a_dead_pet_is_readable() {
        let mut hero = bruce();
        hero.adopt_pet(ace(), t0()).unwrap();
        let late = t0() + Duration::days(3);

        let status = hero.pet_status(late).unwrap();
        assert!(!status.alive);
        assert!(matches!(
            hero.care_for_pet(CareAction::Play, late),
            Err(CareError::Deceased(_))
        ));
    }

    #[test]
    fn facing_a_villain_uses_the_alias() {
        assert_eq!(bruce().face("Joker").unwrap(), "Batman faces Joker");
        assert!(bruce().face("  ").is_err());
    }
}
