//! Snapshot system: builds a complete MissionSnapshot from the mission.
//!
//! This system is read-only; it never modifies the mission.

use decolagem_core::constants::WARP_DURATION_MS;
use decolagem_core::enums::GamePhase;
use decolagem_core::state::*;
use decolagem_core::types::{SimTime, VelocityReading};

use crate::mission::{Feedback, Mission};
use crate::systems::{sos, warp};

/// Build a MissionSnapshot. `mission` is `None` in the lobby.
pub fn build_snapshot(
    mission: Option<&Mission>,
    time: &SimTime,
    phase: GamePhase,
    paused: bool,
    feedback: Feedback,
) -> MissionSnapshot {
    let Some(mission) = mission else {
        return MissionSnapshot {
            time: *time,
            phase,
            paused,
            alerts: feedback.alerts,
            audio_events: feedback.audio_events,
            events: feedback.events,
            ..MissionSnapshot::default()
        };
    };

    MissionSnapshot {
        time: *time,
        phase,
        paused,
        game_number: Some(mission.game_number),
        team: Some(mission.team.clone()),
        ship: mission.ship,
        telemetry: TelemetryView {
            velocity: VelocityReading::from_kmh(mission.flight.velocity_kmh),
            metrics: mission.telemetry,
            critical: mission.sos.critical,
        },
        flight: build_flight(mission),
        warp: build_warp(mission),
        sos: build_sos(mission),
        route: build_route(mission),
        challenge: mission
            .pending_challenge
            .as_ref()
            .map(|pending| ChallengeView {
                index: pending.index,
                waypoint: pending.waypoint.clone(),
            }),
        space_coins: mission.space_coins,
        inventory: mission.inventory.clone(),
        soundtrack: mission.soundtrack,
        alerts: feedback.alerts,
        audio_events: feedback.audio_events,
        events: feedback.events,
    }
}

fn build_flight(mission: &Mission) -> FlightView {
    let flight = &mission.flight;
    FlightView {
        mode: flight.mode,
        origin: flight.origin.clone(),
        destination: flight.destination.clone(),
        distance_remaining_km: flight.distance_remaining_km,
        leg_distance_km: flight.leg_distance_km,
        progress_pct: flight.progress_pct(),
        travel_secs: flight.travel_secs(),
    }
}

fn build_warp(mission: &Mission) -> WarpView {
    let now = mission.clock_ms;
    let state = &mission.warp;
    let active_remaining_ms = state
        .active_since_ms
        .map(|since| (since + WARP_DURATION_MS).saturating_sub(now))
        .unwrap_or(0);
    WarpView {
        phase: state.phase,
        blocked_by: warp::blocked_by(mission),
        active_remaining_secs: active_remaining_ms as f64 / 1000.0,
        cooldown_remaining_secs: state.cooldown_until_ms.saturating_sub(now) as f64 / 1000.0,
        banner_visible: now < state.banner_until_ms,
    }
}

fn build_sos(mission: &Mission) -> SosView {
    SosView {
        critical: mission.sos.critical,
        alarm: mission.sos.alarm,
        available: mission.sos.available,
        cost: sos::restore_cost(mission.flight.travel_secs(), mission.space_coins),
        restoring: mission.sos.restoring,
        signals: mission.sos.signals.clone(),
    }
}

fn build_route(mission: &Mission) -> RouteView {
    let state = mission.route.state();
    RouteView {
        steps: state.steps().to_vec(),
        current_index: state.current_index(),
        confirmed: mission.route.is_confirmed(),
        transfer: state.transfer(),
        totals: state.totals(),
    }
}
