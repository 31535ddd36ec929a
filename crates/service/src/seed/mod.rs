//! Sample-data seeding used by the `seed` binary.
pub mod data;
pub mod runner;

pub use runner::{run, SeedOptions, SeedOutcome, SeedReport};
