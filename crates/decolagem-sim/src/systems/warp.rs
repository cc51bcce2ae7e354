//! Warp system: applies the warp FSM and its side effects to the mission.

use decolagem_core::constants::*;
use decolagem_core::enums::*;
use decolagem_core::error::CommandError;
use decolagem_core::events::MissionEvent;

use crate::mission::{Feedback, LegState, Mission};
use crate::systems::integrator::cruise_mode;
use crate::warp::{self as fsm, WarpContext};

fn context(mission: &Mission, traveling: bool) -> WarpContext<'_> {
    WarpContext {
        phase: mission.warp.phase,
        traveling,
        velocity_kmh: mission.flight.velocity_kmh,
        destination: mission.flight.destination.as_deref(),
        distance_remaining_km: mission.flight.distance_remaining_km,
        now_ms: mission.clock_ms,
        cooldown_until_ms: mission.warp.cooldown_until_ms,
        active_since_ms: mission.warp.active_since_ms,
    }
}

fn is_traveling(mission: &Mission) -> bool {
    mission.flight.leg == LegState::Traveling
}

/// Why warp can't be engaged right now, for display.
pub fn blocked_by(mission: &Mission) -> Option<WarpBlock> {
    fsm::blocked_by(&context(mission, is_traveling(mission)))
}

/// Evaluate the FSM for this tick and apply any transition.
pub fn run(mission: &mut Mission, feedback: &mut Feedback) {
    let update = fsm::evaluate(&context(mission, is_traveling(mission)));
    if let Some(reason) = update.ended {
        end_warp(mission, reason, feedback);
        return;
    }
    if update.phase_changed {
        mission.warp.phase = update.new_phase;
        if update.new_phase == WarpPhase::Enabled {
            feedback.event(MissionEvent::WarpEnabled);
        }
    }
}

/// Engage warp on crew command.
pub fn engage(mission: &mut Mission, feedback: &mut Feedback) -> Result<(), CommandError> {
    let phase = fsm::engage(&context(mission, is_traveling(mission)))
        .map_err(CommandError::WarpUnavailable)?;
    mission.warp.phase = phase;
    mission.warp.active_since_ms = Some(mission.clock_ms);
    mission.warp.drain.reset();
    mission.flight.mode = FlightMode::Warp;
    mission.set_soundtrack(SoundTrack::Warp, feedback);
    feedback.event(MissionEvent::WarpEngaged);
    log::info!(
        "warp engaged toward {:?} at {:.0} km/h",
        mission.flight.destination,
        mission.flight.velocity_kmh
    );
    Ok(())
}

/// Leave warp: start the cooldown, show the banner, resume cruising.
pub fn end_warp(mission: &mut Mission, reason: WarpEndReason, feedback: &mut Feedback) {
    let now = mission.clock_ms;
    mission.warp.phase = WarpPhase::Disabled;
    mission.warp.active_since_ms = None;
    mission.warp.cooldown_until_ms = now + WARP_COOLDOWN_MS;
    mission.warp.banner_until_ms = now + WARP_BANNER_MS;
    mission.warp.drain.reset();

    mission.flight.velocity_kmh = mission.flight.velocity_kmh.min(WARP_THRESHOLD_KMH);
    mission.flight.mode = cruise_mode(mission.flight.distance_remaining_km);
    let track = if is_traveling(mission) {
        SoundTrack::Cruise
    } else {
        SoundTrack::Silence
    };
    mission.set_soundtrack(track, feedback);
    mission.save_requested = true;
    feedback.event(MissionEvent::WarpDisabled { reason });
    log::info!(
        "warp ended ({:?}) with {:.0} km remaining",
        reason,
        mission.flight.distance_remaining_km
    );
}

/// Accelerated resource drain while warp is active.
pub fn drain(mission: &mut Mission, dt_ms: u64) {
    if !mission.warp.is_active() {
        return;
    }
    let units = mission.warp.drain.advance(dt_ms);
    if units > 0 {
        let units = f64::from(units);
        mission.telemetry.adjust(Metric::Propulsion, -units);
        mission.telemetry.adjust(Metric::Stability, -units);
    }
}
