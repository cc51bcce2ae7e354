//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Ship hull selected by the crew. Each type has its own resource profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipType {
    #[serde(rename = "NEOECLIPSE")]
    NeoEclipse,
    #[serde(rename = "STARDUST")]
    Stardust,
    #[serde(rename = "HORIZONTE")]
    Horizonte,
}

impl ShipType {
    pub const ALL: [ShipType; 3] = [ShipType::NeoEclipse, ShipType::Stardust, ShipType::Horizonte];

    /// Name used by the backend and the selection screen.
    pub fn name(self) -> &'static str {
        match self {
            ShipType::NeoEclipse => "NEOECLIPSE",
            ShipType::Stardust => "STARDUST",
            ShipType::Horizonte => "HORIZONTE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ship| ship.name().eq_ignore_ascii_case(name))
    }
}

/// A gameplay-relevant telemetry metric. All are percentages in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Propulsion,
    Oxygen,
    Direction,
    Stability,
    Productivity,
    Interdependence,
    Engagement,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Propulsion,
        Metric::Oxygen,
        Metric::Direction,
        Metric::Stability,
        Metric::Productivity,
        Metric::Interdependence,
        Metric::Engagement,
    ];
}

/// Which speed cap the integrator is steering toward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightMode {
    /// Docked or not launched. Cap is zero.
    #[default]
    Idle,
    /// Cruise toward the 60,000 km/h cap.
    Boost,
    /// Close to the destination, capped lower.
    FinalApproach,
    /// Dobra Espacial: uncapped acceleration.
    Warp,
}

/// Warp ("Dobra Espacial") state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarpPhase {
    /// Conditions not met (too slow, invalid destination, or cooling down).
    #[default]
    Disabled,
    /// Conditions met, waiting for the crew to engage.
    Enabled,
    /// Engaged.
    Active,
}

/// Why warp cannot be engaged right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarpBlock {
    NotTraveling,
    BelowThreshold,
    InvalidDestination,
    CoolingDown,
    AlreadyActive,
}

/// Why an active warp ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarpEndReason {
    /// Ran for the full warp duration.
    Duration,
    /// Remaining distance reached the floor.
    DistanceFloor,
    /// The destination changed to one that does not allow warp.
    RouteChanged,
}

/// Top-level mission phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game data loaded.
    #[default]
    Lobby,
    /// Game data loaded; ship and route selection.
    Briefing,
    /// Travelling between two waypoints.
    InFlight,
    /// Docked at a waypoint with a challenge pending.
    Arrived,
    /// Final waypoint reached.
    MissionComplete,
}

/// Background track requested from the audio layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundTrack {
    #[default]
    Silence,
    Cruise,
    Warp,
}

/// Consumable inventory items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    OxygenCanister,
    FuelCell,
    RepairKit,
    MoraleBoost,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::OxygenCanister,
        ItemKind::FuelCell,
        ItemKind::RepairKit,
        ItemKind::MoraleBoost,
    ];
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
