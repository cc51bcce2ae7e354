//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::persist::GameData;
use crate::route::RouteAction;
use crate::types::MetricDelta;

/// The option a crew picked for an arrival challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceEffect {
    pub challenge_id: String,
    pub option: String,
    /// Telemetry consequences of the choice.
    #[serde(default)]
    pub deltas: Vec<MetricDelta>,
    /// Coins gained (positive) or spent (negative).
    #[serde(default)]
    pub coins: i64,
}

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Setup ---
    /// Load the team's game data (fetched from `/{userId}/game-data`).
    LoadGame { data: Box<GameData> },
    /// Choose a ship on the selection screen.
    SelectShip { ship: ShipType },

    // --- Route planning ---
    /// Apply a route planner action.
    Route { action: RouteAction },
    /// Freeze the route.
    ConfirmRoute,
    /// Unfreeze the route for editing.
    EditRoute,

    // --- Flight ---
    /// Take off toward the first destination.
    Launch,
    /// Leave the current waypoint toward the next one.
    Depart,
    /// Engage Dobra Espacial.
    EngageWarp,
    /// Pay for the emergency full restore.
    ConfirmSos,
    /// Consume one inventory item.
    UseItem { item: ItemKind },
    /// Answer the challenge dispatched on arrival.
    ResolveChallenge { choice: ChoiceEffect },
    /// Send coins to another team.
    TransferFunds { to_team: String, amount: u64 },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 2.0 = double, 0.0 = frozen).
    SetTimeScale { scale: f64 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
