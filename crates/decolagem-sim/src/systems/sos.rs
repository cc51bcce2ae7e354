//! S.O.S. system: ambient distress signals, the criticality alarm,
//! and the paid full-restore ramp.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use decolagem_core::constants::*;
use decolagem_core::enums::Metric;
use decolagem_core::error::CommandError;
use decolagem_core::events::{AudioEvent, MissionEvent};
use decolagem_core::types::SosSignal;

use crate::mission::{Feedback, LegState, Mission};

/// Price of an emergency restore: grows with travel time, capped at the balance.
pub fn restore_cost(travel_secs: f64, balance: u64) -> u64 {
    let variable = (travel_secs.max(0.0) as u64) / SOS_SECS_PER_COIN;
    (variable + SOS_BASE_COST).min(balance)
}

/// Expire old signals and roll a new one every period while cruising.
pub fn run_signals(mission: &mut Mission, rng: &mut ChaCha8Rng, feedback: &mut Feedback, dt_ms: u64) {
    let now = mission.clock_ms;
    mission.sos.signals.retain(|signal| {
        let expired = signal.is_expired(now);
        if expired {
            feedback.event(MissionEvent::SosSignalExpired { id: signal.id });
        }
        !expired
    });

    let cruising = mission.flight.leg == LegState::Traveling && !mission.warp.is_active();
    if !cruising {
        mission.sos.signal_roll.reset();
        return;
    }

    for _ in 0..mission.sos.signal_roll.advance(dt_ms) {
        let bodies = mission.route.catalog().bodies();
        let host = bodies[rng.gen_range(0..bodies.len())].name;
        let lifetime = if rng.gen_bool(0.5) {
            SOS_SHORT_LIFETIME_MS
        } else {
            SOS_LONG_LIFETIME_MS
        };
        let signal = SosSignal {
            id: mission.sos.next_signal_id,
            host_body: host.to_string(),
            received_at_ms: now,
            expires_at_ms: now + lifetime,
        };
        mission.sos.next_signal_id += 1;
        log::debug!("S.O.S. signal {} from {}", signal.id, signal.host_body);
        mission.sos.signals.push(signal.clone());
        feedback.audio(AudioEvent::SosPing);
        feedback.event(MissionEvent::SosSignalReceived { signal });
    }
}

/// Update criticality, the alarm loop and S.O.S. availability.
pub fn run_criticality(mission: &mut Mission, feedback: &mut Feedback) {
    let critical = mission.telemetry.is_critical();
    let quiet = mission.warp.is_active() || mission.sos.restoring;

    if critical && !mission.sos.critical {
        let (metric, value) = mission.telemetry.weakest();
        feedback.event(MissionEvent::CriticalEntered { metric, value });
        log::warn!("{:?} critical at {:.0}", metric, value);
    } else if !critical && mission.sos.critical {
        feedback.event(MissionEvent::CriticalCleared);
    }
    mission.sos.critical = critical;

    set_alarm(mission, critical && !quiet, feedback);
    mission.sos.available = critical && !quiet;
}

/// Start or stop the alarm loop, emitting cues on change only.
pub fn set_alarm(mission: &mut Mission, on: bool, feedback: &mut Feedback) {
    if on == mission.sos.alarm {
        return;
    }
    mission.sos.alarm = on;
    feedback.audio(if on {
        AudioEvent::AlarmStarted
    } else {
        AudioEvent::AlarmStopped
    });
}

/// Pay for the emergency restore and start the ramp. Returns the cost.
pub fn confirm(mission: &mut Mission, feedback: &mut Feedback) -> Result<u64, CommandError> {
    if !mission.sos.available {
        return Err(CommandError::SosUnavailable);
    }
    let cost = restore_cost(mission.flight.travel_secs(), mission.space_coins);
    mission.space_coins -= cost;
    mission.sos.restoring = true;
    mission.sos.available = false;
    mission.sos.restore_step.reset();
    set_alarm(mission, false, feedback);
    feedback.event(MissionEvent::RestorationStarted { cost });
    log::info!("S.O.S. confirmed for {} coins", cost);
    Ok(cost)
}

/// Raise every depleted metric until all are full, then save.
pub fn run_restoration(mission: &mut Mission, feedback: &mut Feedback, dt_ms: u64) {
    if !mission.sos.restoring {
        return;
    }
    for _ in 0..mission.sos.restore_step.advance(dt_ms) {
        for metric in Metric::ALL {
            if mission.telemetry.get(metric) < METRIC_MAX {
                mission.telemetry.adjust(metric, SOS_RESTORE_STEP);
            }
        }
    }
    if mission.telemetry.is_full() {
        mission.sos.restoring = false;
        mission.sos.restore_step.reset();
        mission.save_requested = true;
        feedback.audio(AudioEvent::RestoreComplete);
        feedback.event(MissionEvent::RestorationComplete);
    }
}
