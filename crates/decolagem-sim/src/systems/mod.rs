//! Systems that operate on the mission each tick.
//!
//! Systems are plain functions over `&mut Mission`. They do not own state;
//! all timers are cadences stored in the mission and driven by the tick.

pub mod arrival;
pub mod choices;
pub mod depletion;
pub mod integrator;
pub mod inventory;
pub mod persistence;
pub mod snapshot;
pub mod sos;
pub mod warp;
