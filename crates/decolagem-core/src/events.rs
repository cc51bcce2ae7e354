//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::SosSignal;

/// Audio cues for the frontend sound system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// Switch the looping background track.
    TrackChanged { track: SoundTrack },
    /// Engines lit at takeoff.
    Takeoff,
    /// Docked at a waypoint.
    ArrivalChime,
    /// Critical alarm loop starts.
    AlarmStarted,
    /// Critical alarm loop stops.
    AlarmStopped,
    /// Distress signal picked up.
    SosPing,
    /// Emergency restore finished.
    RestoreComplete,
    /// Inventory item consumed.
    ItemUsed { item: ItemKind },
}

/// Gameplay milestones for the UI (modals, banners, logs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MissionEvent {
    Launched { destination: String },
    Departed { from: String, to: String },
    Arrived {
        index: usize,
        waypoint: String,
        oxygen_bonus: f64,
    },
    ChallengeDispatched { index: usize, waypoint: String },
    ChallengeResolved { challenge_id: String, option: String },
    MissionComplete { waypoint: String },
    WarpEnabled,
    WarpEngaged,
    WarpDisabled { reason: WarpEndReason },
    SosSignalReceived { signal: SosSignal },
    SosSignalExpired { id: u32 },
    CriticalEntered { metric: Metric, value: f64 },
    CriticalCleared,
    RestorationStarted { cost: u64 },
    RestorationComplete,
    ItemUsed { item: ItemKind },
    FundsTransferred { to_team: String, amount: u64 },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
