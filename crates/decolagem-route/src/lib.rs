//! Route planning for Decolagem.
//!
//! Celestial catalog with a static orbital distance table, a pure reducer
//! over route actions, a planner that adds the confirm/edit freeze, and the
//! stellar map view used to pick destinations.

pub mod catalog;
pub mod map;
pub mod planner;

pub use catalog::Catalog;
pub use decolagem_core as core;
pub use planner::{reduce, try_reduce, RoutePlanner, RouteState};
