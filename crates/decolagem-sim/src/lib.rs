//! Mission simulation engine for Decolagem.
//!
//! Owns the whole mission state, runs systems at a fixed tick rate,
//! and produces MissionSnapshots and outbound writes for the frontend.

pub mod engine;
pub mod mission;
pub mod outbox;
pub mod profiles;
pub mod systems;
pub mod warp;

pub use decolagem_core as core;
pub use engine::{MissionEngine, SimConfig};

#[cfg(test)]
mod tests;
