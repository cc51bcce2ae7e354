//! Headless runner: plays one team's mission against the local store.

use std::time::{Duration, Instant};

use decolagem_core::commands::{ChoiceEffect, PlayerCommand};
use decolagem_core::enums::GamePhase;
use decolagem_core::persist::GameData;
use decolagem_core::route::RouteAction;
use decolagem_core::state::MissionSnapshot;

use crate::config::{AppConfig, Autopilot};
use crate::state::{AppError, AppState};
use crate::store::{GameStore, JsonFileStore};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Commands that take a fresh team from briefing to takeoff.
pub fn setup_commands(data: &GameData, pilot: &Autopilot) -> Vec<PlayerCommand> {
    if data.launched {
        return Vec::new();
    }
    let mut commands = vec![PlayerCommand::SelectShip { ship: pilot.ship }];
    if !data.route_confirmed {
        commands.extend(pilot.route.iter().map(|destination| PlayerCommand::Route {
            action: RouteAction::AddStep {
                destination: destination.clone(),
            },
        }));
        commands.push(PlayerCommand::ConfirmRoute);
    }
    commands.push(PlayerCommand::Launch);
    commands
}

/// Answer the pending challenge and depart. `handled` holds the route index
/// already dealt with so each waypoint is handled once.
pub fn autopilot_step(snapshot: &MissionSnapshot, handled: &mut Option<usize>) -> Vec<PlayerCommand> {
    if snapshot.phase != GamePhase::Arrived || snapshot.paused {
        return Vec::new();
    }
    let index = snapshot.route.current_index;
    if *handled == Some(index) {
        return Vec::new();
    }
    *handled = Some(index);

    let mut commands = Vec::new();
    if let Some(challenge) = &snapshot.challenge {
        commands.push(PlayerCommand::ResolveChallenge {
            choice: ChoiceEffect {
                challenge_id: format!("{}-{}", challenge.waypoint, challenge.index),
                option: "A".to_string(),
                deltas: Vec::new(),
                coins: 0,
            },
        });
    }
    commands.push(PlayerCommand::Depart);
    commands
}

fn log_progress(snapshot: &MissionSnapshot) {
    log::info!(
        "{:?}: {} -> {} | {:.0} km left | {:.0} km/h | O2 {:.0} | coins {}",
        snapshot.phase,
        snapshot.flight.origin.as_deref().unwrap_or("-"),
        snapshot.flight.destination.as_deref().unwrap_or("-"),
        snapshot.flight.distance_remaining_km,
        snapshot.telemetry.velocity.kmh,
        snapshot.telemetry.metrics.oxygen,
        snapshot.space_coins
    );
}

/// Load or create the team's game, play for `run_secs`, then save and stop.
/// Returns the last snapshot seen.
pub fn run(config: &AppConfig) -> Result<Option<MissionSnapshot>, AppError> {
    let store = JsonFileStore::new(&config.data_dir);
    let data = match store.load_game(config.game_number, &config.team)? {
        Some(data) => {
            log::info!("resuming game {} for {}", data.game_number, data.team);
            data
        }
        None => GameData::new(config.game_number, config.team.clone(), config.origin.clone()),
    };

    let app = AppState::new();
    app.start(config, Box::new(store))?;
    app.send_command(PlayerCommand::LoadGame {
        data: Box::new(data.clone()),
    })?;
    if let Some(pilot) = &config.autopilot {
        for command in setup_commands(&data, pilot) {
            app.send_command(command)?;
        }
    }

    let deadline = Instant::now() + Duration::from_secs(config.run_secs);
    let mut last_report = Instant::now();
    let mut handled = None;
    let mut last = None;
    while Instant::now() < deadline {
        std::thread::sleep(POLL_INTERVAL);
        let Some(snapshot) = app.snapshot()? else {
            continue;
        };
        for alert in &snapshot.alerts {
            log::warn!("{}", alert.message);
        }
        if config.autopilot.is_some() {
            for command in autopilot_step(&snapshot, &mut handled) {
                app.send_command(command)?;
            }
        }
        if last_report.elapsed() >= REPORT_INTERVAL {
            log_progress(&snapshot);
            last_report = Instant::now();
        }
        let complete = snapshot.phase == GamePhase::MissionComplete;
        last = Some(snapshot);
        if complete {
            log::info!("mission complete");
            break;
        }
    }

    app.shutdown()?;
    if let Some(snapshot) = &last {
        log_progress(snapshot);
    }
    Ok(last)
}
