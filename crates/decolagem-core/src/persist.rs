//! Game data exchanged with the backend and the outbound write queue.
//!
//! The backend is the system of record. The engine never writes to it
//! directly: it enqueues `OutboundWrite`s that a writer drains, retries
//! and applies idempotently.

use serde::{Deserialize, Serialize};

use crate::commands::ChoiceEffect;
use crate::enums::{ItemKind, ShipType};
use crate::route::TransferType;
use crate::types::Telemetry;

/// Inventory entry: count plus the mission time its cooldown ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemKind,
    pub count: u32,
    #[serde(default)]
    pub cooldown_until_ms: Option<u64>,
}

impl ItemStack {
    pub fn new(item: ItemKind, count: u32) -> Self {
        Self {
            item,
            count,
            cooldown_until_ms: None,
        }
    }
}

/// A team's game record, as loaded from and saved to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub game_number: u32,
    pub team: String,
    #[serde(default)]
    pub ship: Option<ShipType>,
    #[serde(default)]
    pub telemetry: Telemetry,
    /// Waypoint names; the first is the origin.
    pub route: Vec<String>,
    /// Index of the last waypoint reached.
    #[serde(default)]
    pub route_index: usize,
    #[serde(default)]
    pub route_confirmed: bool,
    #[serde(default)]
    pub transfer: TransferType,
    #[serde(default)]
    pub inventory: Vec<ItemStack>,
    #[serde(default)]
    pub space_coins: u64,
    /// Group-wide pause flag set by the game admin.
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub launched: bool,
    /// Seconds spent travelling (excludes pauses).
    #[serde(default)]
    pub travel_secs: f64,
    /// Remaining distance on the current leg, if in flight.
    #[serde(default)]
    pub distance_remaining_km: Option<f64>,
    /// The challenge at `route_index` was dispatched and not yet answered.
    #[serde(default)]
    pub challenge_pending: bool,
    /// Mission clock (ms). Item cooldowns are timestamps on this clock.
    #[serde(default)]
    pub clock_ms: u64,
}

impl GameData {
    /// A fresh record for a team starting at `origin`.
    pub fn new(game_number: u32, team: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            game_number,
            team: team.into(),
            ship: None,
            telemetry: Telemetry::full(),
            route: vec![origin.into()],
            route_index: 0,
            route_confirmed: false,
            transfer: TransferType::default(),
            inventory: Vec::new(),
            space_coins: 0,
            paused: false,
            launched: false,
            travel_secs: 0.0,
            distance_remaining_km: None,
            challenge_pending: false,
            clock_ms: 0,
        }
    }
}

/// Uniquely identifies one outbound write. Stores ignore keys they have seen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WriteKey {
    pub game_number: u32,
    pub team: String,
    /// Monotonic per engine; later writes have larger sequence numbers.
    pub seq: u64,
}

impl std::fmt::Display for WriteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.game_number, self.team, self.seq)
    }
}

/// Backend endpoint a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    UpdateGameData,
    RecordChoice,
    TransferFunds,
}

impl Endpoint {
    pub fn path(self, user_id: &str) -> String {
        match self {
            Endpoint::UpdateGameData => format!("/{user_id}/update-gamedata"),
            Endpoint::RecordChoice => "/record-choice".to_string(),
            Endpoint::TransferFunds => "/transfer-funds".to_string(),
        }
    }
}

/// Body of an outbound write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WritePayload {
    /// Full replacement of the team's game data.
    GameData { data: Box<GameData> },
    /// A challenge answer at a waypoint.
    Choice {
        index: usize,
        waypoint: String,
        choice: ChoiceEffect,
    },
    /// Coins sent to another team.
    Transfer { to_team: String, amount: u64 },
}

impl WritePayload {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            WritePayload::GameData { .. } => Endpoint::UpdateGameData,
            WritePayload::Choice { .. } => Endpoint::RecordChoice,
            WritePayload::Transfer { .. } => Endpoint::TransferFunds,
        }
    }
}

/// A persistence request produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundWrite {
    pub key: WriteKey,
    pub payload: WritePayload,
}

impl OutboundWrite {
    pub fn endpoint(&self) -> Endpoint {
        self.payload.endpoint()
    }
}
