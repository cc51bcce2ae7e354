//! Decolagem Marte runtime shell.
//!
//! Wires the mission engine to a game-loop thread, a persistence writer
//! and a local game store, and exposes them through `AppState`.

pub mod config;
pub mod game_loop;
pub mod runner;
pub mod state;
pub mod store;
pub mod writer;

pub use decolagem_core as core;
