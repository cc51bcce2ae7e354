//! Arrival detection: fires once on the Traveling -> Arrived edge.

use decolagem_core::constants::WATER_OXYGEN_BONUS;
use decolagem_core::enums::{FlightMode, Metric, SoundTrack};
use decolagem_core::events::{AudioEvent, MissionEvent};

use crate::mission::{Feedback, LegState, Mission, PendingChallenge};

/// What an arrival led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// A challenge was dispatched; the crew must answer before departing.
    Challenge,
    /// The final waypoint was reached.
    MissionComplete,
}

/// Detect arrival. Returns `Some` exactly once per leg.
pub fn run(mission: &mut Mission, feedback: &mut Feedback) -> Option<ArrivalOutcome> {
    if mission.flight.leg != LegState::Traveling || mission.flight.distance_remaining_km > 0.0 {
        return None;
    }

    mission.flight.leg = LegState::Arrived;
    mission.flight.mode = FlightMode::Idle;
    mission.flight.velocity_kmh = 0.0;
    mission.flight.distance_remaining_km = 0.0;
    mission.flight.distance_step.reset();

    let index = mission.route.advance()?;
    let waypoint = mission.route.current().name.clone();
    let oxygen_bonus = if mission.route.catalog().has_water(&waypoint) {
        let before = mission.telemetry.oxygen;
        mission.telemetry.adjust(Metric::Oxygen, WATER_OXYGEN_BONUS) - before
    } else {
        0.0
    };

    mission.set_soundtrack(SoundTrack::Silence, feedback);
    feedback.audio(AudioEvent::ArrivalChime);
    feedback.event(MissionEvent::Arrived {
        index,
        waypoint: waypoint.clone(),
        oxygen_bonus,
    });
    mission.save_requested = true;
    log::info!("arrived at {} (step {})", waypoint, index);

    if mission.route.is_finished() {
        feedback.event(MissionEvent::MissionComplete { waypoint });
        return Some(ArrivalOutcome::MissionComplete);
    }

    feedback.event(MissionEvent::ChallengeDispatched {
        index,
        waypoint: waypoint.clone(),
    });
    mission.pending_challenge = Some(PendingChallenge { index, waypoint });
    Some(ArrivalOutcome::Challenge)
}
