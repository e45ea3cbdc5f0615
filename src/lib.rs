//! Playoff Core - end-of-season standings, seeding and playoff odds.
//!
//! This library resolves hypothetical final standings and playoff seeding
//! from results chosen for the remaining series of a season, and enumerates
//! every combination of those results to count how often each team lands in
//! each seed. Python bindings are available behind the `python` feature.

pub mod config;
pub mod constants;
pub mod enumerate;
pub mod error;
pub mod grouping;
pub mod outcome;
pub mod seeding;
pub mod standings;
pub mod team;
pub mod tiebreak;

#[cfg(feature = "python")]
mod python;

pub use config::{builtin, load_grouping, parse_grouping, ConfigError};
pub use constants::{DEFAULT_SERIES_LENGTH, DEFAULT_WILD_CARD_SLOTS, MAX_PERMUTATIONS};
pub use enumerate::{enumerate_outcomes, outcome_at, space_size, PermutationAggregate};
pub use error::SeasonError;
pub use grouping::{resolve_standings_and_seeding, Grouping, Resolution};
pub use outcome::{OutcomeVector, Series};
pub use seeding::{
    resolve_seeding, Category, DivisionContest, FixedSeed, RunnerUp, SeedingResult, SeedingRules,
    SlotOverrides,
};
pub use standings::{resolve_standings, FinalStandings};
pub use team::{FinalRecord, TeamRecord};
pub use tiebreak::{TiebreakEntry, TiebreakTable};
