//! Mission data model: the single owned state the systems operate on.
//!
//! Everything a background timer used to read from a shadow copy lives
//! here, and snapshots are built from it after each tick.

use decolagem_core::constants::*;
use decolagem_core::enums::*;
use decolagem_core::error::RouteError;
use decolagem_core::events::{Alert, AudioEvent, MissionEvent};
use decolagem_core::persist::{GameData, ItemStack};
use decolagem_core::types::{Cadence, SosSignal, Telemetry};
use decolagem_route::{Catalog, RoutePlanner};

use crate::systems::depletion::DepletionSchedule;

/// Progress along the current leg. Arrival fires on the
/// `Traveling -> Arrived` edge only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegState {
    /// Not launched yet.
    #[default]
    Docked,
    /// Between two waypoints.
    Traveling,
    /// Reached the destination of the last leg.
    Arrived,
}

/// Velocity and distance for the current leg.
#[derive(Debug, Clone)]
pub struct FlightState {
    pub mode: FlightMode,
    pub leg: LegState,
    pub velocity_kmh: f64,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance_remaining_km: f64,
    pub leg_distance_km: f64,
    /// Drives the once-per-second distance step.
    pub distance_step: Cadence,
    /// Time spent travelling this mission (ms).
    pub travel_ms: u64,
}

impl Default for FlightState {
    fn default() -> Self {
        Self {
            mode: FlightMode::Idle,
            leg: LegState::Docked,
            velocity_kmh: 0.0,
            origin: None,
            destination: None,
            distance_remaining_km: 0.0,
            leg_distance_km: 0.0,
            distance_step: Cadence::new(DISTANCE_STEP_MS),
            travel_ms: 0,
        }
    }
}

impl FlightState {
    pub fn travel_secs(&self) -> f64 {
        self.travel_ms as f64 / 1000.0
    }

    /// 0-100 share of the leg already flown.
    pub fn progress_pct(&self) -> f64 {
        if self.leg_distance_km <= 0.0 {
            return if self.leg == LegState::Arrived { 100.0 } else { 0.0 };
        }
        ((1.0 - self.distance_remaining_km / self.leg_distance_km) * 100.0).clamp(0.0, 100.0)
    }
}

/// Dobra Espacial bookkeeping around the FSM phase.
#[derive(Debug, Clone)]
pub struct WarpState {
    pub phase: WarpPhase,
    pub active_since_ms: Option<u64>,
    pub cooldown_until_ms: u64,
    pub banner_until_ms: u64,
    pub drain: Cadence,
}

impl Default for WarpState {
    fn default() -> Self {
        Self {
            phase: WarpPhase::Disabled,
            active_since_ms: None,
            cooldown_until_ms: 0,
            banner_until_ms: 0,
            drain: Cadence::new(WARP_DRAIN_PERIOD_MS),
        }
    }
}

impl WarpState {
    pub fn is_active(&self) -> bool {
        self.phase == WarpPhase::Active
    }
}

/// Ambient signals, the criticality alarm and the restoration ramp.
#[derive(Debug, Clone)]
pub struct SosState {
    pub signals: Vec<SosSignal>,
    pub next_signal_id: u32,
    pub signal_roll: Cadence,
    pub critical: bool,
    pub alarm: bool,
    pub available: bool,
    pub restoring: bool,
    pub restore_step: Cadence,
}

impl Default for SosState {
    fn default() -> Self {
        Self {
            signals: Vec::new(),
            next_signal_id: 0,
            signal_roll: Cadence::new(SOS_SIGNAL_PERIOD_MS),
            critical: false,
            alarm: false,
            available: false,
            restoring: false,
            restore_step: Cadence::new(SOS_RESTORE_PERIOD_MS),
        }
    }
}

/// Challenge dispatched on arrival and not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChallenge {
    pub index: usize,
    pub waypoint: String,
}

/// Complete state of one team's mission.
#[derive(Debug, Clone)]
pub struct Mission {
    pub game_number: u32,
    pub team: String,
    pub ship: Option<ShipType>,
    pub telemetry: Telemetry,
    pub route: RoutePlanner,
    pub flight: FlightState,
    pub warp: WarpState,
    pub sos: SosState,
    pub depletion: DepletionSchedule,
    pub inventory: Vec<ItemStack>,
    pub space_coins: u64,
    pub launched: bool,
    pub pending_challenge: Option<PendingChallenge>,
    pub soundtrack: SoundTrack,
    /// Mission clock (ms); advances only while unpaused.
    pub clock_ms: u64,
    /// Drives the periodic telemetry save.
    pub save_timer: Cadence,
    /// A game-data write is wanted at the end of this tick.
    pub save_requested: bool,
}

impl Mission {
    /// Build a mission from a backend record.
    pub fn from_game_data(data: &GameData, catalog: &Catalog) -> Result<Self, RouteError> {
        let route = RoutePlanner::from_saved(
            catalog.clone(),
            data.route.clone(),
            data.route_index,
            data.transfer,
            data.route_confirmed,
        )?;
        Ok(Self {
            game_number: data.game_number,
            team: data.team.clone(),
            ship: data.ship,
            telemetry: data.telemetry.clamped(),
            route,
            flight: FlightState {
                travel_ms: (data.travel_secs.max(0.0) * 1000.0) as u64,
                ..FlightState::default()
            },
            warp: WarpState::default(),
            sos: SosState::default(),
            depletion: DepletionSchedule::new(data.ship),
            inventory: data.inventory.clone(),
            space_coins: data.space_coins,
            launched: data.launched,
            pending_challenge: None,
            soundtrack: SoundTrack::Silence,
            clock_ms: data.clock_ms,
            save_timer: Cadence::new(TELEMETRY_SAVE_PERIOD_MS),
            save_requested: false,
        })
    }

    /// Current state as a backend record.
    pub fn to_game_data(&self, paused: bool) -> GameData {
        let state = self.route.state();
        GameData {
            game_number: self.game_number,
            team: self.team.clone(),
            ship: self.ship,
            telemetry: self.telemetry,
            route: state.names(),
            route_index: state.current_index(),
            route_confirmed: self.route.is_confirmed(),
            transfer: state.transfer(),
            inventory: self.inventory.clone(),
            space_coins: self.space_coins,
            paused,
            launched: self.launched,
            travel_secs: self.flight.travel_secs(),
            distance_remaining_km: (self.flight.leg == LegState::Traveling)
                .then_some(self.flight.distance_remaining_km),
            challenge_pending: self.pending_challenge.is_some(),
            clock_ms: self.clock_ms,
        }
    }

    /// Name of the next destination on the route.
    pub fn next_destination(&self) -> Option<&str> {
        self.route.next().map(|s| s.name.as_str())
    }

    /// Switch the background track, emitting a cue only on change.
    pub fn set_soundtrack(&mut self, track: SoundTrack, feedback: &mut Feedback) {
        if self.soundtrack != track {
            self.soundtrack = track;
            feedback.audio(AudioEvent::TrackChanged { track });
        }
    }
}

/// Audio cues, mission events and alerts collected during one tick.
#[derive(Debug, Default)]
pub struct Feedback {
    pub audio_events: Vec<AudioEvent>,
    pub events: Vec<MissionEvent>,
    pub alerts: Vec<Alert>,
}

impl Feedback {
    pub fn audio(&mut self, event: AudioEvent) {
        self.audio_events.push(event);
    }

    pub fn event(&mut self, event: MissionEvent) {
        log::debug!("mission event: {:?}", event);
        self.events.push(event);
    }

    pub fn alert(&mut self, level: AlertLevel, message: impl Into<String>, tick: u64) {
        self.alerts.push(Alert {
            level,
            message: message.into(),
            tick,
        });
    }

    /// Append everything from `other`.
    pub fn extend(&mut self, other: Feedback) {
        self.audio_events.extend(other.audio_events);
        self.events.extend(other.events);
        self.alerts.extend(other.alerts);
    }
}
