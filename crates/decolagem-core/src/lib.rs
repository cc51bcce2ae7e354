//! Core types and definitions for the Decolagem mission simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! commands, telemetry, route steps, snapshots, events, outbound writes
//! and constants. It has no dependency on any runtime or frontend.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod persist;
pub mod route;
pub mod state;
pub mod types;
