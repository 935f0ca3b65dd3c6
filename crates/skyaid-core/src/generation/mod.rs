//! Deterministic mock-data generation.

pub mod names;
pub mod roster;

pub use roster::{
    derive_patient_location, generate_roster, DEFAULT_ROSTER_SEED, DISTRICT_CENTER, ROSTER_SIZE,
};
