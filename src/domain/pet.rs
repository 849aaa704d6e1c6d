//! The pet well-being state machine.
//!
//! A pet carries four vitals in `[0, 100]`: life, hunger, happiness and
//! hygiene. Needs decay continuously with wall-clock time. Rather than ticking,
//! the decayed values are derived on demand from the stored vitals, which are
//! valid as of the instant they were last *settled*. Decay runs from the later
//! of that instant and the *neglect clock*, the earliest of the three last-care
//! timestamps, so no stretch of time is ever applied twice.
//!
//! Observation never mutates the pet, so looking at it twice at the same instant
//! yields the same answer. Care actions decay first, refuse to act on a dead
//! pet, then store the adjusted vitals, stamp their own timestamp and settle the
//! pet at that instant.

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, required};

/// Upper bound of every vital.
pub const MAX_VITAL: f64 = 100.0;

const HUNGER_PER_HOUR: f64 = 5.0;
const HAPPINESS_PER_HOUR: f64 = 2.5;
const HYGIENE_PER_HOUR: f64 = 1.67;
const LIFE_PER_HOUR: f64 = 3.0;

const STARVING_ABOVE: f64 = 80.0;
const SAD_BELOW: f64 = 20.0;
const DIRTY_BELOW: f64 = 20.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// The four bounded well-being values of a pet.
///
/// Values are kept at full precision; rounding only happens when a
/// [`PetStatus`] is taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    /// Remaining life. The pet is dead at zero.
    pub life: f64,
    /// How hungry the pet is. Higher is worse.
    pub hunger: f64,
    /// How happy the pet is.
    pub happiness: f64,
    /// How clean the pet is.
    pub hygiene: f64,
}

impl Vitals {
    /// The vitals of a freshly adopted pet.
    pub const FRESH: Self = Self {
        life: MAX_VITAL,
        hunger: 0.0,
        happiness: MAX_VITAL,
        hygiene: MAX_VITAL,
    };

    /// Whether these vitals describe a living pet.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Forces every value into `[0, 100]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            life: self.life.clamp(0.0, MAX_VITAL),
            hunger: self.hunger.clamp(0.0, MAX_VITAL),
            happiness: self.happiness.clamp(0.0, MAX_VITAL),
            hygiene: self.hygiene.clamp(0.0, MAX_VITAL),
        }
    }

    /// Applies `hours` of neglect in one step.
    ///
    /// Life only drains if, after the needs have decayed, the pet is starving,
    /// sad or dirty. When it does, it drains for the whole period.
    #[must_use]
    fn decayed(self, hours: f64) -> Self {
        let hunger = (self.hunger + HUNGER_PER_HOUR * hours).min(MAX_VITAL);
        let happiness = (self.happiness - HAPPINESS_PER_HOUR * hours).max(0.0);
        let hygiene = (self.hygiene - HYGIENE_PER_HOUR * hours).max(0.0);

        let neglected = hunger > STARVING_ABOVE || happiness < SAD_BELOW || hygiene < DIRTY_BELOW;
        let life = if neglected {
            (self.life - LIFE_PER_HOUR * hours).max(0.0)
        } else {
            self.life
        };

        Self {
            life,
            hunger,
            happiness,
            hygiene,
        }
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::FRESH
    }
}

/// When the pet last received each kind of care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareLog {
    /// Last time the pet was fed.
    pub last_fed: DateTime<Utc>,
    /// Last time someone played with the pet.
    pub last_played: DateTime<Utc>,
    /// Last time the pet was bathed.
    pub last_bathed: DateTime<Utc>,
}

impl CareLog {
    /// A log in which every kind of care happened at `now`.
    #[must_use]
    pub const fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            last_fed: now,
            last_played: now,
            last_bathed: now,
        }
    }

    /// The earliest of the three timestamps, from which all decay is measured.
    #[must_use]
    pub fn neglect_clock(&self) -> DateTime<Utc> {
        self.last_fed.min(self.last_played).min(self.last_bathed)
    }

    /// The latest of the three timestamps.
    #[must_use]
    pub fn last_care(&self) -> DateTime<Utc> {
        self.last_fed.max(self.last_played).max(self.last_bathed)
    }
}

/// Hours from `from` to `to`. Never negative.
fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let elapsed = to - from;
    #[allow(clippy::cast_precision_loss)]
    let hours = elapsed.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_HOUR;
    hours.max(0.0)
}

/// A discrete care event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareAction {
    /// Lowers hunger by 30 and restores 10 life.
    Feed,
    /// Raises happiness by 25 and restores 15 life.
    Play,
    /// Restores hygiene completely and 5 life.
    Bathe,
}

impl CareAction {
    fn apply(self, vitals: Vitals) -> Vitals {
        match self {
            Self::Feed => Vitals {
                life: (vitals.life + 10.0).min(MAX_VITAL),
                hunger: (vitals.hunger - 30.0).max(0.0),
                ..vitals
            },
            Self::Play => Vitals {
                life: (vitals.life + 15.0).min(MAX_VITAL),
                happiness: (vitals.happiness + 25.0).min(MAX_VITAL),
                ..vitals
            },
            Self::Bathe => Vitals {
                life: (vitals.life + 5.0).min(MAX_VITAL),
                hygiene: MAX_VITAL,
                ..vitals
            },
        }
    }

    fn stamp(self, log: &mut CareLog, now: DateTime<Utc>) {
        match self {
            Self::Feed => log.last_fed = now,
            Self::Play => log.last_played = now,
            Self::Bathe => log.last_bathed = now,
        }
    }
}

/// A care action was attempted on a pet that has died.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{name} has passed away")]
pub struct Deceased {
    /// Name of the dead pet.
    pub name: String,
}

/// What a hero supplies to adopt a pet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PetSpec {
    /// The pet's name. Required.
    #[serde(rename = "nombre", default)]
    pub name: String,
    /// The species or type of the pet. Required.
    #[serde(rename = "tipo", default)]
    pub kind: String,
    /// Age, if known.
    #[serde(rename = "edad", default)]
    pub age: Option<u32>,
    /// Special abilities, in the order given.
    #[serde(rename = "poderes", default)]
    pub abilities: Vec<String>,
}

/// A virtual pet owned by a hero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "crate::storage::record::PetRecord")]
pub struct Pet {
    name: NonEmptyString,
    kind: NonEmptyString,
    age: Option<u32>,
    abilities: Vec<String>,
    vitals: Vitals,
    care: CareLog,
    settled_at: DateTime<Utc>,
}

impl Pet {
    /// Adopts a new pet at `now` with full vitals.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `spec` has no name or no type.
    pub fn adopt(spec: PetSpec, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let PetSpec {
            name,
            kind,
            age,
            abilities,
        } = spec;

        let name = required("pet name", name)
            .map_err(|_| ValidationError::new("a pet needs at least a name and a type"))?;
        let kind = required("pet type", kind)
            .map_err(|_| ValidationError::new("a pet needs at least a name and a type"))?;

        Ok(Self {
            name,
            kind,
            age,
            abilities,
            vitals: Vitals::FRESH,
            care: CareLog::starting_at(now),
            settled_at: now,
        })
    }

    /// Restores a pet from stored state.
    ///
    /// Every field is taken as stored; vitals outside `[0, 100]` are clamped.
    /// `settled_at` is the instant at which `vitals` were current.
    #[must_use]
    pub fn rehydrate(
        name: NonEmptyString,
        kind: NonEmptyString,
        age: Option<u32>,
        abilities: Vec<String>,
        vitals: Vitals,
        care: CareLog,
        settled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            kind,
            age,
            abilities,
            vitals: vitals.clamped(),
            care,
            settled_at,
        }
    }

    /// The pet's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The pet's species or type.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// The pet's age, if known.
    #[must_use]
    pub const fn age(&self) -> Option<u32> {
        self.age
    }

    /// The pet's special abilities.
    #[must_use]
    pub fn abilities(&self) -> &[String] {
        &self.abilities
    }

    /// The vitals as last stored, before any decay.
    #[must_use]
    pub const fn stored_vitals(&self) -> Vitals {
        self.vitals
    }

    /// The care timestamps.
    #[must_use]
    pub const fn care_log(&self) -> &CareLog {
        &self.care
    }

    /// The instant at which the stored vitals were current.
    #[must_use]
    pub const fn settled_at(&self) -> DateTime<Utc> {
        self.settled_at
    }

    /// The vitals as they stand at `now`.
    #[must_use]
    pub fn vitals_at(&self, now: DateTime<Utc>) -> Vitals {
        let origin = self.care.neglect_clock().max(self.settled_at);
        self.vitals.decayed(hours_between(origin, now))
    }

    /// Whether the pet is still alive at `now`.
    #[must_use]
    pub fn is_alive_at(&self, now: DateTime<Utc>) -> bool {
        self.vitals_at(now).is_alive()
    }

    /// A rounded snapshot of the pet at `now`.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> PetStatus {
        PetStatus::new(self.name(), self.vitals_at(now))
    }

    /// Feeds the pet.
    ///
    /// # Errors
    ///
    /// Returns [`Deceased`] if the pet is dead at `now`.
    pub fn feed(&mut self, now: DateTime<Utc>) -> Result<(), Deceased> {
        self.care_for(CareAction::Feed, now)
    }

    /// Plays with the pet.
    ///
    /// # Errors
    ///
    /// Returns [`Deceased`] if the pet is dead at `now`.
    pub fn play(&mut self, now: DateTime<Utc>) -> Result<(), Deceased> {
        self.care_for(CareAction::Play, now)
    }

    /// Bathes the pet.
    ///
    /// # Errors
    ///
    /// Returns [`Deceased`] if the pet is dead at `now`.
    pub fn bathe(&mut self, now: DateTime<Utc>) -> Result<(), Deceased> {
        self.care_for(CareAction::Bathe, now)
    }

    /// Applies `action` at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Deceased`] if the pet is dead at `now`. The pet is left
    /// untouched in that case.
    pub fn care_for(&mut self, action: CareAction, now: DateTime<Utc>) -> Result<(), Deceased> {
        let current = self.vitals_at(now);
        if !current.is_alive() {
            return Err(Deceased {
                name: self.name().to_string(),
            });
        }

        self.vitals = action.apply(current);
        action.stamp(&mut self.care, now);
        self.settled_at = self.settled_at.max(now);
        Ok(())
    }
}

/// A rounded, read-only view of a pet's well-being.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetStatus {
    /// The pet's name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Life, rounded.
    #[serde(rename = "vida")]
    pub life: u8,
    /// Hunger, rounded.
    #[serde(rename = "hambre")]
    pub hunger: u8,
    /// Happiness, rounded.
    #[serde(rename = "felicidad")]
    pub happiness: u8,
    /// Hygiene, rounded.
    #[serde(rename = "higiene")]
    pub hygiene: u8,
    /// Whether the pet is alive.
    #[serde(rename = "estaViva")]
    pub alive: bool,
}

impl PetStatus {
    fn new(name: &str, vitals: Vitals) -> Self {
        Self {
            name: name.to_string(),
            life: observe(vitals.life),
            hunger: observe(vitals.hunger),
            happiness: observe(vitals.happiness),
            hygiene: observe(vitals.hygiene),
            alive: vitals.is_alive(),
        }
    }
}

/// Rounds half up onto the `0..=100` scale.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn observe(value: f64) -> u8 {
    (value.clamp(0.0, MAX_VITAL) + 0.5).floor() as u8
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn rex() -> Pet {
        Pet::adopt(
            PetSpec {
                name: "Rex".to_string(),
                kind: "dog".to_string(),
                age: Some(3),
                abilities: vec!["flight".to_string()],
            },
            t0(),
        )
        .unwrap()
    }

    fn with_vitals(vitals: Vitals, care: CareLog) -> Pet {
        Pet::rehydrate(
            NonEmptyString::new("Rex".to_string()).unwrap(),
            NonEmptyString::new("dog".to_string()).unwrap(),
            None,
            Vec::new(),
            vitals,
            care,
            care.last_care(),
        )
    }

    fn hours(h: i64) -> DateTime<Utc> {
        t0() + Duration::hours(h)
    }

    #[test]
    fn adoption_starts_fresh() {
        let pet = rex();
        assert_eq!(pet.stored_vitals(), Vitals::FRESH);
        assert_eq!(pet.care_log(), &CareLog::starting_at(t0()));
        assert_eq!(pet.age(), Some(3));
        assert_eq!(pet.abilities(), ["flight".to_string()]);
    }

    #[test_case("", "dog"; "missing name")]
    #[test_case("Rex", ""; "missing type")]
    #[test_case("  ", "  "; "blank both")]
    fn adoption_requires_name_and_type(name: &str, kind: &str) {
        let spec = PetSpec {
            name: name.to_string(),
            kind: kind.to_string(),
            ..PetSpec::default()
        };
        assert!(Pet::adopt(spec, t0()).is_err());
    }

    #[test_case(10, 100, 50, 75, 83; "ten hours")]
    #[test_case(14, 100, 70, 65, 77; "fourteen hours")]
    #[test_case(20, 40, 100, 50, 67; "twenty hours drains life over the whole period")]
    fn neglect_scenarios(h: i64, life: u8, hunger: u8, happiness: u8, hygiene: u8) {
        let status = rex().status(hours(h));
        assert_eq!(
            (status.life, status.hunger, status.happiness, status.hygiene),
            (life, hunger, happiness, hygiene)
        );
        assert!(status.alive);
    }

    #[test]
    fn observation_is_idempotent() {
        let pet = rex();
        let now = hours(7);
        assert_eq!(pet.status(now), pet.status(now));
        assert_eq!(pet.vitals_at(now), pet.vitals_at(now));
        // observing never touches the stored state
        assert_eq!(pet.stored_vitals(), Vitals::FRESH);
    }

    #[test]
    fn needs_are_monotonic_without_care() {
        let pet = rex();
        let mut previous = pet.vitals_at(t0());
        for h in 1..=60 {
            let current = pet.vitals_at(hours(h));
            assert!(current.hunger >= previous.hunger);
            assert!(current.happiness <= previous.happiness);
            assert!(current.hygiene <= previous.hygiene);
            assert!(current.life <= previous.life);
            previous = current;
        }
    }

    #[test]
    fn vitals_stay_in_range() {
        let mut pet = rex();
        for h in 0..200 {
            let now = hours(h);
            let vitals = pet.vitals_at(now);
            for value in [vitals.life, vitals.hunger, vitals.happiness, vitals.hygiene] {
                assert!((0.0..=MAX_VITAL).contains(&value));
            }
            // keep poking it so care adjustments are exercised too
            let _ = pet.play(now);
        }
    }

    #[test]
    fn feeding_lowers_hunger_and_restores_life() {
        let vitals = Vitals {
            life: 60.0,
            hunger: 50.0,
            happiness: 90.0,
            hygiene: 90.0,
        };
        let mut pet = with_vitals(vitals, CareLog::starting_at(t0()));

        pet.feed(t0()).unwrap();

        let after = pet.stored_vitals();
        assert!((after.hunger - 20.0).abs() < f64::EPSILON);
        assert!((after.life - 70.0).abs() < f64::EPSILON);
        assert_eq!(pet.care_log().last_fed, t0());
    }

    #[test]
    fn feeding_floors_hunger_and_caps_life() {
        let mut pet = rex();
        pet.feed(t0()).unwrap();
        assert_eq!(pet.stored_vitals(), Vitals::FRESH);
    }

    #[test]
    fn playing_raises_happiness() {
        let vitals = Vitals {
            life: 50.0,
            hunger: 10.0,
            happiness: 40.0,
            hygiene: 90.0,
        };
        let mut pet = with_vitals(vitals, CareLog::starting_at(t0()));

        pet.play(t0()).unwrap();

        let status = pet.status(t0());
        assert_eq!((status.happiness, status.life), (65, 65));
    }

    #[test]
    fn bathing_restores_hygiene() {
        let vitals = Vitals {
            life: 97.0,
            hunger: 10.0,
            happiness: 90.0,
            hygiene: 12.0,
        };
        let mut pet = with_vitals(vitals, CareLog::starting_at(t0()));

        pet.bathe(t0()).unwrap();

        let status = pet.status(t0());
        assert_eq!((status.hygiene, status.life), (100, 100));
    }

    #[test]
    fn care_decays_first_then_adjusts() {
        let mut pet = rex();
        pet.feed(hours(10)).unwrap();

        // hunger was 50 after ten hours, feeding took 30 off
        let stored = pet.stored_vitals();
        assert!((stored.hunger - 20.0).abs() < 1e-9);
        assert!((stored.happiness - 75.0).abs() < 1e-9);
        assert_eq!(pet.care_log().last_fed, hours(10));
        assert_eq!(pet.care_log().last_played, t0());
    }

    #[test]
    fn neglect_clock_is_the_earliest_timestamp() {
        let mut pet = rex();
        pet.feed(hours(10)).unwrap();
        assert_eq!(pet.care_log().neglect_clock(), t0());
        assert_eq!(pet.care_log().last_care(), hours(10));
        assert_eq!(pet.settled_at(), hours(10));
    }

    #[test]
    fn care_is_visible_at_the_same_instant() {
        let mut pet = rex();
        pet.feed(hours(10)).unwrap();

        let status = pet.status(hours(10));
        assert_eq!(
            (status.life, status.hunger, status.happiness, status.hygiene),
            (100, 20, 75, 83)
        );
    }

    #[test]
    fn decay_after_care_only_counts_new_time() {
        let mut pet = rex();
        pet.feed(hours(10)).unwrap();

        // four more hours on top of the settled vitals at ten hours
        let status = pet.status(hours(14));
        assert_eq!(
            (status.life, status.hunger, status.happiness, status.hygiene),
            (100, 40, 65, 77)
        );
    }

    #[test]
    fn playing_after_neglect_helps() {
        let mut pet = rex();
        let before = pet.vitals_at(hours(10));

        pet.play(hours(10)).unwrap();

        let after = pet.vitals_at(hours(10));
        assert!((after.happiness - 100.0).abs() < 1e-9);
        assert!((after.life - before.life).abs() < 1e-9);
        assert!((after.hunger - before.hunger).abs() < 1e-9);
        assert_eq!(pet.vitals_at(hours(10)), after);
    }

    #[test_case(CareAction::Feed; "feed")]
    #[test_case(CareAction::Play; "play")]
    #[test_case(CareAction::Bathe; "bathe")]
    fn care_never_makes_a_pet_worse(action: CareAction) {
        for h in 0..=32 {
            let mut pet = rex();
            let now = hours(h);
            let before = pet.vitals_at(now);

            pet.care_for(action, now).unwrap();

            let after = pet.vitals_at(now);
            assert!(after.life >= before.life, "life fell after {action:?} at {h}h");
            assert!(after.hunger <= before.hunger, "hunger rose after {action:?} at {h}h");
            assert!(after.happiness >= before.happiness);
            assert!(after.hygiene >= before.hygiene);
        }
    }

    #[test]
    fn repeated_care_does_not_reapply_decay() {
        let mut pet = rex();
        for h in [3, 7, 12, 18] {
            pet.bathe(hours(h)).unwrap();
        }

        // bathing never touches hunger, so it has risen 5 per hour since adoption
        let status = pet.status(hours(18));
        assert_eq!(status.hunger, 90);
        assert_eq!(status.hygiene, 100);
    }

    #[test]
    fn clock_before_neglect_clock_does_not_decay() {
        let pet = rex();
        assert_eq!(pet.vitals_at(t0() - Duration::hours(5)), Vitals::FRESH);
    }

    #[test]
    fn dead_pets_cannot_be_cared_for() {
        let pet = rex();
        // 100 life at 3 per hour once hunger passes 80
        let late = hours(40);
        assert!(!pet.is_alive_at(late));

        for action in [CareAction::Feed, CareAction::Play, CareAction::Bathe] {
            let mut copy = pet.clone();
            let error = copy.care_for(action, late).unwrap_err();
            assert_eq!(error.name, "Rex");
            assert_eq!(copy, pet);
        }
    }

    #[test]
    fn life_never_comes_back() {
        let dead = Vitals {
            life: 0.0,
            ..Vitals::FRESH
        };
        let mut pet = with_vitals(dead, CareLog::starting_at(t0()));

        assert!(pet.feed(t0()).is_err());
        assert!(pet.play(hours(1)).is_err());
        assert!(pet.bathe(hours(2)).is_err());

        let status = pet.status(hours(3));
        assert_eq!(status.life, 0);
        assert!(!status.alive);
    }

    #[test]
    fn rehydration_clamps_out_of_range_vitals() {
        let wild = Vitals {
            life: 140.0,
            hunger: -3.0,
            happiness: 101.0,
            hygiene: 50.0,
        };
        let pet = with_vitals(wild, CareLog::starting_at(t0()));
        assert_eq!(
            pet.stored_vitals(),
            Vitals {
                life: 100.0,
                hunger: 0.0,
                happiness: 100.0,
                hygiene: 50.0,
            }
        );
    }

    #[test_case(49.5, 50; "half rounds up")]
    #[test_case(49.49, 49; "below half rounds down")]
    #[test_case(0.0, 0; "zero")]
    #[test_case(100.0, 100; "max")]
    fn rounding(value: f64, expected: u8) {
        assert_eq!(observe(value), expected);
    }

    #[test]
    fn status_serializes_with_wire_names() {
        let json = serde_json::to_value(rex().status(t0())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nombre": "Rex",
                "vida": 100,
                "hambre": 0,
                "felicidad": 100,
                "higiene": 100,
                "estaViva": true,
            })
        );
    }
}
