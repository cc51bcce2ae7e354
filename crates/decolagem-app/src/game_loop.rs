//! Game loop thread: runs the mission engine at 10Hz.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state
//! for polling, and outbound writes are forwarded to the writer thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use decolagem_core::constants::TICK_RATE;
use decolagem_core::state::MissionSnapshot;
use decolagem_sim::engine::{MissionEngine, SimConfig};

use crate::state::GameLoopCommand;
use crate::writer::WriterCommand;

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// `first_seq` is the last write key the store has applied for this team.
pub fn spawn_game_loop(
    config: SimConfig,
    first_seq: u64,
    latest_snapshot: Arc<Mutex<Option<MissionSnapshot>>>,
    writer_tx: mpsc::Sender<WriterCommand>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("decolagem-game-loop".into())
        .spawn(move || {
            let mut engine = MissionEngine::new(config);
            engine.resume_writes_after(first_seq);
            run_game_loop(&mut engine, cmd_rx, &latest_snapshot, &writer_tx);
        })?;

    Ok((cmd_tx, handle))
}

/// Hand every queued write to the writer.
fn forward_writes(engine: &mut MissionEngine, writer_tx: &mpsc::Sender<WriterCommand>) {
    for write in engine.drain_writes() {
        if writer_tx.send(WriterCommand::Write(write)).is_err() {
            log::error!("writer thread is gone; write lost");
        }
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    engine: &mut MissionEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<MissionSnapshot>>,
    writer_tx: &mpsc::Sender<WriterCommand>,
) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    engine.save_now();
                    forward_writes(engine, writer_tx);
                    log::info!("game loop stopped at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Persist what the tick produced
        forward_writes(engine, writer_tx);

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
