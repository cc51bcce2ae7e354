//! Persistence system: turns save requests into outbound game-data writes.

use decolagem_core::persist::WritePayload;

use crate::mission::Mission;
use crate::outbox::Outbox;

/// Request a telemetry save every period of flight time.
pub fn run_periodic(mission: &mut Mission, in_flight: bool, dt_ms: u64) {
    if !in_flight {
        mission.save_timer.reset();
        return;
    }
    if mission.save_timer.advance(dt_ms) > 0 {
        mission.save_requested = true;
    }
}

/// Queue at most one game-data write for everything requested this tick.
pub fn flush(mission: &mut Mission, paused: bool, outbox: &mut Outbox) {
    if !mission.save_requested {
        return;
    }
    mission.save_requested = false;
    let data = mission.to_game_data(paused);
    outbox.push(
        mission.game_number,
        &mission.team,
        WritePayload::GameData {
            data: Box::new(data),
        },
    );
}
