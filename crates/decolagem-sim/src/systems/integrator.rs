//! Velocity/distance integrator.
//!
//! Velocity moves toward the cap of the current flight mode every tick;
//! distance drops once per second by a two-tier, non-physical rule.

use decolagem_core::constants::*;
use decolagem_core::enums::FlightMode;

use crate::mission::{FlightState, LegState};
use crate::profiles::ShipProfile;

/// Mode to cruise in when not warping, from remaining distance.
pub fn cruise_mode(distance_remaining_km: f64) -> FlightMode {
    if distance_remaining_km <= FINAL_APPROACH_DISTANCE_KM {
        FlightMode::FinalApproach
    } else {
        FlightMode::Boost
    }
}

/// Speed cap for a mode. `None` means uncapped.
pub fn speed_cap(mode: FlightMode) -> Option<f64> {
    match mode {
        FlightMode::Idle => Some(0.0),
        FlightMode::Boost => Some(WARP_THRESHOLD_KMH),
        FlightMode::FinalApproach => Some(FINAL_APPROACH_CAP_KMH),
        FlightMode::Warp => None,
    }
}

/// Next velocity for one tick: decelerate hard above the cap, accelerate
/// by the ship's step below it, climb without bound under warp.
pub fn step_velocity(velocity_kmh: f64, mode: FlightMode, acceleration_kmh: f64) -> f64 {
    match speed_cap(mode) {
        None => velocity_kmh + WARP_ACCELERATION_KMH,
        Some(cap) if velocity_kmh > cap => (velocity_kmh - DECELERATION_STEP_KMH).max(cap),
        Some(cap) if velocity_kmh < cap => (velocity_kmh + acceleration_kmh).min(cap),
        Some(cap) => cap,
    }
}

/// Kilometres covered in one second at `velocity_kmh`.
pub fn distance_per_second(velocity_kmh: f64) -> f64 {
    if velocity_kmh >= WARP_THRESHOLD_KMH {
        velocity_kmh * HIGH_SPEED_MULTIPLIER
    } else if velocity_kmh > 0.0 {
        BASE_DISTANCE_RATE_KM
    } else {
        0.0
    }
}

/// Advance velocity and distance for one tick of `dt_ms`.
pub fn run(flight: &mut FlightState, profile: &ShipProfile, dt_ms: u64) {
    if flight.leg != LegState::Traveling {
        flight.distance_step.reset();
        return;
    }

    if flight.mode != FlightMode::Warp {
        flight.mode = cruise_mode(flight.distance_remaining_km);
    }
    flight.velocity_kmh = step_velocity(flight.velocity_kmh, flight.mode, profile.acceleration_kmh);

    let seconds = flight.distance_step.advance(dt_ms);
    for _ in 0..seconds {
        let step = distance_per_second(flight.velocity_kmh);
        let next = flight.distance_remaining_km - step;
        flight.distance_remaining_km = if flight.mode == FlightMode::Warp {
            // Warp never carries the ship past the floor.
            next.max(WARP_DISTANCE_FLOOR_KM.min(flight.distance_remaining_km))
        } else {
            next.max(0.0)
        };
    }
}
