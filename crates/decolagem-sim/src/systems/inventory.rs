//! Inventory items: fixed telemetry boosts with a per-item cooldown.

use decolagem_core::constants::ITEM_COOLDOWN_MS;
use decolagem_core::enums::{ItemKind, Metric};
use decolagem_core::error::CommandError;
use decolagem_core::events::{AudioEvent, MissionEvent};
use decolagem_core::types::MetricDelta;

use crate::mission::{Feedback, Mission};

const OXYGEN_CANISTER: &[MetricDelta] = &[MetricDelta::new(Metric::Oxygen, 20.0)];
const FUEL_CELL: &[MetricDelta] = &[MetricDelta::new(Metric::Propulsion, 20.0)];
const REPAIR_KIT: &[MetricDelta] = &[
    MetricDelta::new(Metric::Stability, 15.0),
    MetricDelta::new(Metric::Direction, 10.0),
];
const MORALE_BOOST: &[MetricDelta] = &[
    MetricDelta::new(Metric::Productivity, 10.0),
    MetricDelta::new(Metric::Interdependence, 10.0),
    MetricDelta::new(Metric::Engagement, 10.0),
];

/// Telemetry changes applied when `item` is used.
pub fn effects(item: ItemKind) -> &'static [MetricDelta] {
    match item {
        ItemKind::OxygenCanister => OXYGEN_CANISTER,
        ItemKind::FuelCell => FUEL_CELL,
        ItemKind::RepairKit => REPAIR_KIT,
        ItemKind::MoraleBoost => MORALE_BOOST,
    }
}

/// Seconds until `item` can be used again (0 when ready).
pub fn cooldown_remaining_secs(mission: &Mission, item: ItemKind) -> f64 {
    mission
        .inventory
        .iter()
        .find(|stack| stack.item == item)
        .and_then(|stack| stack.cooldown_until_ms)
        .map(|until| until.saturating_sub(mission.clock_ms) as f64 / 1000.0)
        .unwrap_or(0.0)
}

/// Consume one unit of `item` and apply its effects.
pub fn use_item(
    mission: &mut Mission,
    item: ItemKind,
    feedback: &mut Feedback,
) -> Result<(), CommandError> {
    let now = mission.clock_ms;
    let stack = mission
        .inventory
        .iter_mut()
        .find(|stack| stack.item == item && stack.count > 0)
        .ok_or(CommandError::ItemDepleted(item))?;

    if let Some(until) = stack.cooldown_until_ms.filter(|until| *until > now) {
        return Err(CommandError::ItemCoolingDown {
            item,
            remaining_secs: (until - now) as f64 / 1000.0,
        });
    }

    stack.count -= 1;
    stack.cooldown_until_ms = Some(now + ITEM_COOLDOWN_MS);

    for delta in effects(item) {
        mission.telemetry.adjust(delta.metric, delta.delta);
    }
    mission.save_requested = true;
    feedback.audio(AudioEvent::ItemUsed { item });
    feedback.event(MissionEvent::ItemUsed { item });
    log::info!("{:?} used", item);
    Ok(())
}
