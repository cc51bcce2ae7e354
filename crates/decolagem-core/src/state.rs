//! Mission state snapshot: the complete visible state sent to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, AudioEvent, MissionEvent};
use crate::persist::ItemStack;
use crate::route::{RouteStep, RouteTotals, TransferType};
use crate::types::{SimTime, SosSignal, Telemetry, VelocityReading};

/// Complete mission state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub paused: bool,
    pub game_number: Option<u32>,
    pub team: Option<String>,
    pub ship: Option<ShipType>,
    pub telemetry: TelemetryView,
    pub flight: FlightView,
    pub warp: WarpView,
    pub sos: SosView,
    pub route: RouteView,
    /// Challenge awaiting an answer at the current waypoint.
    pub challenge: Option<ChallengeView>,
    pub space_coins: u64,
    pub inventory: Vec<ItemStack>,
    pub soundtrack: SoundTrack,
    pub alerts: Vec<Alert>,
    pub audio_events: Vec<AudioEvent>,
    pub events: Vec<MissionEvent>,
}

/// Telemetry panel contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryView {
    pub velocity: VelocityReading,
    pub metrics: Telemetry,
    pub critical: bool,
}

/// Current leg progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightView {
    pub mode: FlightMode,
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Kilometres left on this leg.
    pub distance_remaining_km: f64,
    /// Total length of this leg.
    pub leg_distance_km: f64,
    /// 0-100.
    pub progress_pct: f64,
    /// Seconds travelled this mission (excludes pauses).
    pub travel_secs: f64,
}

/// Dobra Espacial status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarpView {
    pub phase: WarpPhase,
    /// Why warp can't be engaged, if it can't.
    pub blocked_by: Option<WarpBlock>,
    pub active_remaining_secs: f64,
    pub cooldown_remaining_secs: f64,
    /// "Warp disabled" banner visibility.
    pub banner_visible: bool,
}

/// Emergency system status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SosView {
    pub critical: bool,
    pub alarm: bool,
    /// S.O.S. button enabled.
    pub available: bool,
    /// Price if confirmed now.
    pub cost: u64,
    pub restoring: bool,
    pub signals: Vec<SosSignal>,
}

/// Route planner status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteView {
    pub steps: Vec<RouteStep>,
    pub current_index: usize,
    pub confirmed: bool,
    pub transfer: TransferType,
    pub totals: RouteTotals,
}

/// Arrival challenge the crew must answer before departing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    /// Route index of the waypoint.
    pub index: usize,
    pub waypoint: String,
}
