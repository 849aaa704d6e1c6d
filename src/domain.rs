//! Domain models for the roster.
//!
//! This module contains the hero aggregate, the pet state machine it owns,
//! configuration, and the clock every time-dependent operation reads from.

/// Sources of the current instant.
pub mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod config;
pub use config::Config;

/// The hero aggregate.
pub mod hero;
pub use hero::{CareError, Hero, HeroId, HeroPatch, NewHero};

/// The pet well-being state machine.
pub mod pet;
pub use pet::{CareAction, CareLog, Deceased, Pet, PetSpec, PetStatus, Vitals};

mod validation;
pub use validation::ValidationError;
