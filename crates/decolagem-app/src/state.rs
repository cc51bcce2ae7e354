//! Application state shared between the runner and the worker threads.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

use decolagem_core::commands::PlayerCommand;
use decolagem_core::state::MissionSnapshot;
use decolagem_sim::engine::SimConfig;

use crate::config::AppConfig;
use crate::game_loop;
use crate::store::GameStore;
use crate::writer::{self, WriterCommand};

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the mission engine.
    PlayerCommand(PlayerCommand),
    /// Save and shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop has stopped")]
    Disconnected,
    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}

/// Running worker threads.
struct Workers {
    command_tx: mpsc::Sender<GameLoopCommand>,
    game_loop: JoinHandle<()>,
    writer_tx: mpsc::Sender<WriterCommand>,
    writer: JoinHandle<()>,
}

/// Shared application state.
///
/// - `Mutex<Option<...>>` for the workers, which don't exist before `start`
/// - `Arc<Mutex<...>>` for the latest snapshot (shared with the game loop thread)
pub struct AppState {
    workers: Mutex<Option<Workers>>,
    /// Latest snapshot for polling. Updated by the game loop after each tick.
    pub latest_snapshot: Arc<Mutex<Option<MissionSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            workers: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.workers.lock().map(|w| w.is_some()).unwrap_or(false)
    }

    /// Spawn the writer and game loop threads.
    pub fn start(&self, config: &AppConfig, store: Box<dyn GameStore>) -> Result<(), AppError> {
        let mut workers = self.workers.lock().map_err(|_| AppError::Poisoned)?;
        if workers.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let first_seq = store.last_seq(config.game_number, &config.team)?;
        let (writer_tx, writer) =
            writer::spawn_writer(store, config.retry.clone(), config.user_id.clone())?;
        let sim = SimConfig {
            seed: config.seed,
            time_scale: config.time_scale,
        };
        let (command_tx, game_loop) = game_loop::spawn_game_loop(
            sim,
            first_seq,
            self.latest_snapshot.clone(),
            writer_tx.clone(),
        )?;

        *workers = Some(Workers {
            command_tx,
            game_loop,
            writer_tx,
            writer,
        });
        log::info!("simulation started for team {}", config.team);
        Ok(())
    }

    /// Send a player command to the simulation.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), AppError> {
        let workers = self.workers.lock().map_err(|_| AppError::Poisoned)?;
        match workers.as_ref() {
            Some(w) => w
                .command_tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|_| AppError::Disconnected),
            None => Err(AppError::NotStarted),
        }
    }

    /// Latest snapshot, if the loop has ticked.
    pub fn snapshot(&self) -> Result<Option<MissionSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    /// Stop the game loop (which saves), then let the writer drain and exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let workers = self
            .workers
            .lock()
            .map_err(|_| AppError::Poisoned)?
            .take()
            .ok_or(AppError::NotStarted)?;

        let _ = workers.command_tx.send(GameLoopCommand::Shutdown);
        if workers.game_loop.join().is_err() {
            log::error!("game loop thread panicked");
        }
        let _ = workers.writer_tx.send(WriterCommand::Shutdown);
        if workers.writer.join().is_err() {
            log::error!("writer thread panicked");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(!state.is_running());
        assert!(state.snapshot().unwrap().is_none());
        assert!(matches!(
            state.send_command(PlayerCommand::Pause),
            Err(AppError::NotStarted)
        ));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let state = AppState::new();
        let config = AppConfig::default();
        state.start(&config, Box::new(MemoryStore::new())).unwrap();
        assert!(state.is_running());
        assert!(matches!(
            state.start(&config, Box::new(MemoryStore::new())),
            Err(AppError::AlreadyRunning)
        ));
        state.shutdown().unwrap();
        assert!(!state.is_running());
        assert!(matches!(state.shutdown(), Err(AppError::NotStarted)));
    }
}
