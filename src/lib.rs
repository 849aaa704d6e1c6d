//! A roster of superheroes and the virtual pets they look after.
//!
//! Heroes are stored as a single JSON collection. Each hero may adopt one pet,
//! whose well-being decays with wall-clock time and recovers with care.

pub mod domain;
pub use domain::{
    CareAction, Clock, Config, Hero, HeroId, HeroPatch, ManualClock, NewHero, Pet, PetSpec,
    PetStatus, SystemClock, ValidationError,
};

/// Persistence of the hero collection.
pub mod storage;
pub use storage::{JsonStore, MemoryStore, Store, StoreError};

pub mod roster;
pub use roster::{Error, Roster};
