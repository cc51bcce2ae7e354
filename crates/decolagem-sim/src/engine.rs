//! Mission engine: the core of the game.
//!
//! `MissionEngine` owns the mission, processes player commands, runs all
//! systems from a single fixed tick, and produces `MissionSnapshot`s plus
//! outbound writes. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use decolagem_core::commands::PlayerCommand;
use decolagem_core::constants::TICK_MS;
use decolagem_core::enums::*;
use decolagem_core::error::CommandError;
use decolagem_core::events::{AudioEvent, MissionEvent};
use decolagem_core::persist::{GameData, OutboundWrite};
use decolagem_core::route::RouteAction;
use decolagem_core::state::MissionSnapshot;
use decolagem_core::types::SimTime;
use decolagem_route::Catalog;

use crate::mission::{Feedback, LegState, Mission, PendingChallenge};
use crate::outbox::Outbox;
use crate::profiles::get_profile;
use crate::systems;
use crate::systems::arrival::ArrivalOutcome;
use crate::systems::depletion::DepletionSchedule;
use crate::systems::integrator::cruise_mode;

/// Configuration for starting a new engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
        }
    }
}

/// The mission engine. Owns the mission and all sim state.
pub struct MissionEngine {
    catalog: Catalog,
    time: SimTime,
    phase: GamePhase,
    paused: bool,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    /// Scaled frame time not yet consumed by whole ticks.
    frame_accumulator: f64,
    mission: Option<Mission>,
    outbox: Outbox,
    feedback: Feedback,
}

impl MissionEngine {
    /// Create an engine using the bundled celestial catalog.
    pub fn new(config: SimConfig) -> Self {
        Self::with_catalog(config, Catalog::standard())
    }

    pub fn with_catalog(config: SimConfig, catalog: Catalog) -> Self {
        Self {
            catalog,
            time: SimTime::default(),
            phase: GamePhase::default(),
            paused: false,
            time_scale: config.time_scale.clamp(0.0, 4.0),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            frame_accumulator: 0.0,
            mission: None,
            outbox: Outbox::new(),
            feedback: Feedback::default(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> MissionSnapshot {
        self.process_commands();
        if self.time_scale > 0.0 {
            self.step();
        }
        self.finish_frame()
    }

    /// Advance by wall-clock frame time, running as many whole ticks as
    /// the scaled time covers. Events from every tick are merged into the
    /// returned snapshot.
    pub fn advance(&mut self, elapsed_ms: u64) -> MissionSnapshot {
        self.process_commands();
        self.frame_accumulator += elapsed_ms as f64 * self.time_scale;
        while self.frame_accumulator >= TICK_MS as f64 {
            self.frame_accumulator -= TICK_MS as f64;
            self.step();
        }
        self.finish_frame()
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get a read-only reference to the mission, if a game is loaded.
    pub fn mission(&self) -> Option<&Mission> {
        self.mission.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Take every write queued since the last drain.
    pub fn drain_writes(&mut self) -> Vec<OutboundWrite> {
        self.outbox.drain()
    }

    /// Number write keys after `seq` so they never collide with keys
    /// already applied by the store.
    pub fn resume_writes_after(&mut self, seq: u64) {
        self.outbox.resume_after(seq);
    }

    /// Queue a game-data write now, e.g. before shutting down.
    pub fn save_now(&mut self) {
        if let Some(mission) = self.mission.as_mut() {
            mission.save_requested = true;
            systems::persistence::flush(mission, self.paused, &mut self.outbox);
        }
    }

    pub fn pending_writes(&self) -> usize {
        self.outbox.len()
    }

    /// Current state as a backend record.
    pub fn game_data(&self) -> Option<GameData> {
        self.mission.as_ref().map(|m| m.to_game_data(self.paused))
    }

    /// Get a mutable reference to the mission (for tests).
    #[cfg(test)]
    pub fn mission_mut(&mut self) -> Option<&mut Mission> {
        self.mission.as_mut()
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            let name = command_name(&command);
            if let Err(err) = self.handle_command(command) {
                log::warn!("{} rejected: {}", name, err);
                self.feedback.alert(
                    AlertLevel::Warning,
                    format!("{name}: {err}"),
                    self.time.tick,
                );
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        match command {
            PlayerCommand::LoadGame { data } => self.load_game(&data),
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
                Ok(())
            }
            PlayerCommand::Pause => {
                self.paused = true;
                if let Some(mission) = self.mission.as_mut() {
                    systems::sos::set_alarm(mission, false, &mut self.feedback);
                }
                log::info!("simulation paused");
                Ok(())
            }
            PlayerCommand::Resume => {
                self.paused = false;
                log::info!("simulation resumed");
                Ok(())
            }
            PlayerCommand::SelectShip { ship } => {
                self.require_phase(&[GamePhase::Briefing])?;
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                mission.ship = Some(ship);
                mission.depletion = DepletionSchedule::new(Some(ship));
                mission.save_requested = true;
                log::info!("ship selected: {}", ship.name());
                Ok(())
            }
            PlayerCommand::Route { action } => self.route_action(&action),
            PlayerCommand::ConfirmRoute => {
                self.require_phase(&[GamePhase::Briefing, GamePhase::InFlight, GamePhase::Arrived])?;
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                mission.route.confirm();
                mission.save_requested = true;
                Ok(())
            }
            PlayerCommand::EditRoute => {
                self.require_phase(&[GamePhase::Briefing, GamePhase::InFlight, GamePhase::Arrived])?;
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                mission.route.edit();
                Ok(())
            }
            PlayerCommand::Launch => self.launch(),
            PlayerCommand::Depart => self.depart(),
            PlayerCommand::EngageWarp => {
                self.require_running(&[GamePhase::InFlight])?;
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                systems::warp::engage(mission, &mut self.feedback)
            }
            PlayerCommand::ConfirmSos => {
                self.require_running(&[GamePhase::InFlight, GamePhase::Arrived])?;
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                systems::sos::confirm(mission, &mut self.feedback).map(|_| ())
            }
            PlayerCommand::UseItem { item } => {
                self.require_running(&[GamePhase::Briefing, GamePhase::InFlight, GamePhase::Arrived])?;
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                systems::inventory::use_item(mission, item, &mut self.feedback)
            }
            PlayerCommand::ResolveChallenge { choice } => {
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                systems::choices::resolve(mission, choice, &mut self.outbox, &mut self.feedback)
            }
            PlayerCommand::TransferFunds { to_team, amount } => {
                let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
                systems::choices::transfer_funds(
                    mission,
                    &to_team,
                    amount,
                    &mut self.outbox,
                    &mut self.feedback,
                )
            }
        }
    }

    fn require_phase(&self, allowed: &[GamePhase]) -> Result<(), CommandError> {
        if self.mission.is_none() {
            return Err(CommandError::NoGameLoaded);
        }
        if !allowed.contains(&self.phase) {
            return Err(CommandError::WrongPhase(self.phase));
        }
        Ok(())
    }

    /// Like `require_phase`, and the simulation must not be paused.
    fn require_running(&self, allowed: &[GamePhase]) -> Result<(), CommandError> {
        self.require_phase(allowed)?;
        if self.paused {
            return Err(CommandError::Paused);
        }
        Ok(())
    }

    /// Replace the mission with a backend record and resume where it left off.
    fn load_game(&mut self, data: &GameData) -> Result<(), CommandError> {
        let mut mission = Mission::from_game_data(data, &self.catalog)?;

        self.phase = if !mission.launched {
            GamePhase::Briefing
        } else if mission.route.is_finished() {
            mission.flight.leg = LegState::Arrived;
            GamePhase::MissionComplete
        } else if let Some(remaining) = data.distance_remaining_km.filter(|d| *d > 0.0) {
            start_leg(&mut mission)?;
            mission.flight.distance_remaining_km = remaining.min(mission.flight.leg_distance_km);
            mission.flight.mode = cruise_mode(mission.flight.distance_remaining_km);
            mission.set_soundtrack(SoundTrack::Cruise, &mut self.feedback);
            GamePhase::InFlight
        } else {
            let here = mission.route.current().name.clone();
            if data.challenge_pending {
                mission.pending_challenge = Some(PendingChallenge {
                    index: mission.route.current_index(),
                    waypoint: here.clone(),
                });
            }
            mission.flight.leg = LegState::Arrived;
            mission.flight.origin = Some(here);
            GamePhase::Arrived
        };

        self.paused = data.paused;
        log::info!(
            "game {} loaded for team {} ({:?}, step {})",
            mission.game_number,
            mission.team,
            self.phase,
            mission.route.current_index()
        );
        self.mission = Some(mission);
        Ok(())
    }

    /// Apply a route planner action, retargeting the current leg if the
    /// next destination changed in flight.
    fn route_action(&mut self, action: &RouteAction) -> Result<(), CommandError> {
        self.require_phase(&[GamePhase::Briefing, GamePhase::InFlight, GamePhase::Arrived])?;
        let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;

        if mission.flight.leg != LegState::Traveling {
            mission.route.dispatch(action)?;
            return Ok(());
        }

        let mut planner = mission.route.clone();
        planner.dispatch(action)?;
        // The leg's origin stays on the route even before the first arrival.
        if let RouteAction::SetSavedRoute { steps, .. } = action {
            mission.route.state().check_visited_prefix(steps)?;
        }
        let Some(next) = planner.next() else {
            return Err(CommandError::RouteTooShort);
        };
        if mission.flight.destination.as_deref() != Some(next.name.as_str()) {
            log::info!(
                "leg retargeted from {:?} to {} ({:.0} km)",
                mission.flight.destination,
                next.name,
                next.distance
            );
            mission.flight.destination = Some(next.name.clone());
            mission.flight.leg_distance_km = next.distance;
            mission.flight.distance_remaining_km = next.distance;
            mission.flight.distance_step.reset();
        }
        mission.route = planner;
        Ok(())
    }

    fn launch(&mut self) -> Result<(), CommandError> {
        self.require_running(&[GamePhase::Briefing])?;
        let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
        let ship = mission.ship.ok_or(CommandError::NoShipSelected)?;
        if !mission.route.is_confirmed() {
            return Err(CommandError::RouteNotConfirmed);
        }
        start_leg(mission)?;

        if !mission.launched {
            let loss = get_profile(ship).takeoff_propulsion_loss;
            mission.telemetry.adjust(Metric::Propulsion, -loss);
            mission.launched = true;
        }
        let destination = mission.flight.destination.clone().unwrap_or_default();
        mission.set_soundtrack(SoundTrack::Cruise, &mut self.feedback);
        mission.save_requested = true;
        self.feedback.audio(AudioEvent::Takeoff);
        self.feedback.event(MissionEvent::Launched {
            destination: destination.clone(),
        });
        log::info!("{} launched toward {}", ship.name(), destination);
        self.phase = GamePhase::InFlight;
        Ok(())
    }

    fn depart(&mut self) -> Result<(), CommandError> {
        self.require_running(&[GamePhase::Arrived])?;
        let mission = self.mission.as_mut().ok_or(CommandError::NoGameLoaded)?;
        if mission.pending_challenge.is_some() {
            return Err(CommandError::ChallengeUnresolved);
        }
        if !mission.route.is_confirmed() {
            return Err(CommandError::RouteNotConfirmed);
        }
        start_leg(mission)?;

        let from = mission.flight.origin.clone().unwrap_or_default();
        let to = mission.flight.destination.clone().unwrap_or_default();
        mission.set_soundtrack(SoundTrack::Cruise, &mut self.feedback);
        mission.save_requested = true;
        log::info!("departed {} toward {}", from, to);
        self.feedback.event(MissionEvent::Departed { from, to });
        self.phase = GamePhase::InFlight;
        Ok(())
    }

    /// One fixed tick of simulated time.
    fn step(&mut self) {
        if self.paused || !matches!(self.phase, GamePhase::InFlight | GamePhase::Arrived) {
            return;
        }
        self.run_systems(TICK_MS);
        self.time.advance();
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt_ms: u64) {
        let Some(mission) = self.mission.as_mut() else {
            return;
        };
        let feedback = &mut self.feedback;
        let in_flight = self.phase == GamePhase::InFlight;
        mission.clock_ms += dt_ms;

        // 1. Resource decay (suspended while warping)
        let decaying = !mission.warp.is_active();
        systems::depletion::run(&mut mission.depletion, &mut mission.telemetry, decaying, dt_ms);

        // 2. Warp drain
        systems::warp::drain(mission, dt_ms);

        // 3. Velocity and distance
        if let Some(ship) = mission.ship {
            systems::integrator::run(&mut mission.flight, &get_profile(ship), dt_ms);
        }

        // 4. Warp FSM
        systems::warp::run(mission, feedback);

        // 5. Arrival
        match systems::arrival::run(mission, feedback) {
            Some(ArrivalOutcome::Challenge) => self.phase = GamePhase::Arrived,
            Some(ArrivalOutcome::MissionComplete) => self.phase = GamePhase::MissionComplete,
            None => {}
        }

        // 6-8. S.O.S.
        systems::sos::run_signals(mission, &mut self.rng, feedback, dt_ms);
        systems::sos::run_criticality(mission, feedback);
        systems::sos::run_restoration(mission, feedback, dt_ms);

        // 9. Periodic save
        systems::persistence::run_periodic(mission, in_flight, dt_ms);
        if in_flight {
            mission.flight.travel_ms += dt_ms;
        }
    }

    /// Flush saves and build the snapshot for this frame.
    fn finish_frame(&mut self) -> MissionSnapshot {
        if let Some(mission) = self.mission.as_mut() {
            systems::persistence::flush(mission, self.paused, &mut self.outbox);
        }
        let feedback = std::mem::take(&mut self.feedback);
        systems::snapshot::build_snapshot(
            self.mission.as_ref(),
            &self.time,
            self.phase,
            self.paused,
            feedback,
        )
    }
}

/// Point the flight at the next route step and start travelling.
fn start_leg(mission: &mut Mission) -> Result<(), CommandError> {
    let next = mission.route.next().ok_or(CommandError::RouteTooShort)?;
    let destination = next.name.clone();
    let distance = next.distance;
    let origin = mission.route.current().name.clone();

    let flight = &mut mission.flight;
    flight.leg = LegState::Traveling;
    flight.origin = Some(origin);
    flight.destination = Some(destination);
    flight.leg_distance_km = distance;
    flight.distance_remaining_km = distance;
    flight.mode = cruise_mode(distance);
    flight.distance_step.reset();
    Ok(())
}

fn command_name(command: &PlayerCommand) -> &'static str {
    match command {
        PlayerCommand::LoadGame { .. } => "LoadGame",
        PlayerCommand::SelectShip { .. } => "SelectShip",
        PlayerCommand::Route { .. } => "Route",
        PlayerCommand::ConfirmRoute => "ConfirmRoute",
        PlayerCommand::EditRoute => "EditRoute",
        PlayerCommand::Launch => "Launch",
        PlayerCommand::Depart => "Depart",
        PlayerCommand::EngageWarp => "EngageWarp",
        PlayerCommand::ConfirmSos => "ConfirmSos",
        PlayerCommand::UseItem { .. } => "UseItem",
        PlayerCommand::ResolveChallenge { .. } => "ResolveChallenge",
        PlayerCommand::TransferFunds { .. } => "TransferFunds",
        PlayerCommand::SetTimeScale { .. } => "SetTimeScale",
        PlayerCommand::Pause => "Pause",
        PlayerCommand::Resume => "Resume",
    }
}
