//! Dobra Espacial (warp) finite state machine.
//!
//! Pure functions that compute warp phase transitions from a plain
//! description of the ship's situation. Side effects (audio, banner,
//! cooldown bookkeeping) are applied by `systems::warp`.

use decolagem_core::constants::*;
use decolagem_core::enums::{WarpBlock, WarpEndReason, WarpPhase};

/// Input to the warp FSM.
#[derive(Debug, Clone, Copy)]
pub struct WarpContext<'a> {
    pub phase: WarpPhase,
    /// Ship is travelling a leg (not docked, not paused).
    pub traveling: bool,
    pub velocity_kmh: f64,
    pub destination: Option<&'a str>,
    pub distance_remaining_km: f64,
    pub now_ms: u64,
    pub cooldown_until_ms: u64,
    pub active_since_ms: Option<u64>,
}

/// Output from the warp FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpUpdate {
    pub new_phase: WarpPhase,
    pub phase_changed: bool,
    /// Set when an active warp ends on this evaluation.
    pub ended: Option<WarpEndReason>,
}

/// Why warp could not be engaged now, or `None` if it could.
pub fn blocked_by(ctx: &WarpContext) -> Option<WarpBlock> {
    if ctx.phase == WarpPhase::Active {
        return Some(WarpBlock::AlreadyActive);
    }
    if !ctx.traveling {
        return Some(WarpBlock::NotTraveling);
    }
    match ctx.destination {
        None => return Some(WarpBlock::InvalidDestination),
        Some(dest) if dest == WARP_FORBIDDEN_DESTINATION => {
            return Some(WarpBlock::InvalidDestination)
        }
        Some(_) => {}
    }
    if ctx.velocity_kmh < WARP_THRESHOLD_KMH {
        return Some(WarpBlock::BelowThreshold);
    }
    if ctx.now_ms < ctx.cooldown_until_ms {
        return Some(WarpBlock::CoolingDown);
    }
    None
}

/// Evaluate the FSM once. Engaging is a separate, command-driven step.
pub fn evaluate(ctx: &WarpContext) -> WarpUpdate {
    match ctx.phase {
        WarpPhase::Active => evaluate_active(ctx),
        WarpPhase::Disabled | WarpPhase::Enabled => {
            let new_phase = if blocked_by(ctx).is_none() {
                WarpPhase::Enabled
            } else {
                WarpPhase::Disabled
            };
            WarpUpdate {
                new_phase,
                phase_changed: new_phase != ctx.phase,
                ended: None,
            }
        }
    }
}

fn evaluate_active(ctx: &WarpContext) -> WarpUpdate {
    let reason = if ctx.destination == Some(WARP_FORBIDDEN_DESTINATION) || ctx.destination.is_none()
    {
        Some(WarpEndReason::RouteChanged)
    } else if ctx.distance_remaining_km <= WARP_DISTANCE_FLOOR_KM {
        Some(WarpEndReason::DistanceFloor)
    } else if ctx
        .active_since_ms
        .is_some_and(|since| ctx.now_ms.saturating_sub(since) >= WARP_DURATION_MS)
    {
        Some(WarpEndReason::Duration)
    } else {
        None
    };

    match reason {
        Some(reason) => WarpUpdate {
            new_phase: WarpPhase::Disabled,
            phase_changed: true,
            ended: Some(reason),
        },
        None => WarpUpdate {
            new_phase: WarpPhase::Active,
            phase_changed: false,
            ended: None,
        },
    }
}

/// Try to engage warp. Succeeds whenever every condition holds.
pub fn engage(ctx: &WarpContext) -> Result<WarpPhase, WarpBlock> {
    match blocked_by(ctx) {
        Some(block) => Err(block),
        None => Ok(WarpPhase::Active),
    }
}
