//! Challenge answers and coin transfers between teams.

use decolagem_core::commands::ChoiceEffect;
use decolagem_core::error::CommandError;
use decolagem_core::events::MissionEvent;
use decolagem_core::persist::WritePayload;

use crate::mission::{Feedback, Mission};
use crate::outbox::Outbox;

/// Apply the crew's answer to the pending challenge and record it.
pub fn resolve(
    mission: &mut Mission,
    choice: ChoiceEffect,
    outbox: &mut Outbox,
    feedback: &mut Feedback,
) -> Result<(), CommandError> {
    let pending = mission
        .pending_challenge
        .take()
        .ok_or(CommandError::NoChallengePending)?;

    for delta in &choice.deltas {
        mission.telemetry.adjust(delta.metric, delta.delta);
    }
    mission.space_coins = if choice.coins >= 0 {
        mission.space_coins.saturating_add(choice.coins.unsigned_abs())
    } else {
        mission.space_coins.saturating_sub(choice.coins.unsigned_abs())
    };

    feedback.event(MissionEvent::ChallengeResolved {
        challenge_id: choice.challenge_id.clone(),
        option: choice.option.clone(),
    });
    log::info!(
        "challenge {} at {} answered with {}",
        choice.challenge_id,
        pending.waypoint,
        choice.option
    );
    outbox.push(
        mission.game_number,
        &mission.team,
        WritePayload::Choice {
            index: pending.index,
            waypoint: pending.waypoint,
            choice,
        },
    );
    mission.save_requested = true;
    Ok(())
}

/// Send `amount` coins to another team.
pub fn transfer_funds(
    mission: &mut Mission,
    to_team: &str,
    amount: u64,
    outbox: &mut Outbox,
    feedback: &mut Feedback,
) -> Result<(), CommandError> {
    let to_team = to_team.trim();
    if amount == 0 || to_team.is_empty() {
        return Err(CommandError::InvalidAmount);
    }
    if to_team.eq_ignore_ascii_case(mission.team.trim()) {
        return Err(CommandError::SameTeam);
    }
    if amount > mission.space_coins {
        return Err(CommandError::InsufficientFunds {
            needed: amount,
            available: mission.space_coins,
        });
    }

    mission.space_coins -= amount;
    outbox.push(
        mission.game_number,
        &mission.team,
        WritePayload::Transfer {
            to_team: to_team.to_string(),
            amount,
        },
    );
    feedback.event(MissionEvent::FundsTransferred {
        to_team: to_team.to_string(),
        amount,
    });
    log::info!("{} coins sent to {}", amount, to_team);
    Ok(())
}
