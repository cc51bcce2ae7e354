//! Depletion scheduler: one driver for every per-metric decay process.
//!
//! Each metric loses one unit per period from the ship's profile. Decay
//! only runs while active (unpaused, not warping, ship selected); stopping
//! drops any partial period so nothing carries over.

use decolagem_core::enums::{Metric, ShipType};
use decolagem_core::types::{Cadence, Telemetry};

use crate::profiles::{get_profile, metric_index};

/// Per-metric decay cadences for the selected ship.
#[derive(Debug, Clone)]
pub struct DepletionSchedule {
    ship: Option<ShipType>,
    cadences: Option<[Cadence; 7]>,
}

impl DepletionSchedule {
    pub fn new(ship: Option<ShipType>) -> Self {
        let cadences = ship.map(|ship| {
            let profile = get_profile(ship);
            Metric::ALL.map(|metric| Cadence::new(profile.depletion_period_ms(metric)))
        });
        Self { ship, cadences }
    }

    pub fn ship(&self) -> Option<ShipType> {
        self.ship
    }

    /// Cancel every in-flight period.
    pub fn reset(&mut self) {
        if let Some(cadences) = self.cadences.as_mut() {
            for cadence in cadences.iter_mut() {
                cadence.reset();
            }
        }
    }

    /// Milliseconds until `metric` next loses a unit.
    pub fn remaining_ms(&self, metric: Metric) -> Option<u64> {
        self.cadences
            .as_ref()
            .map(|c| c[metric_index(metric)].remaining_ms())
    }
}

/// Advance decay by `dt_ms`. Returns the metrics that lost at least one unit.
pub fn run(
    schedule: &mut DepletionSchedule,
    telemetry: &mut Telemetry,
    active: bool,
    dt_ms: u64,
) -> Vec<Metric> {
    if !active || schedule.cadences.is_none() {
        schedule.reset();
        return Vec::new();
    }
    let mut depleted = Vec::new();
    if let Some(cadences) = schedule.cadences.as_mut() {
        for (metric, cadence) in Metric::ALL.into_iter().zip(cadences.iter_mut()) {
            let units = cadence.advance(dt_ms);
            if units > 0 {
                telemetry.adjust(metric, -f64::from(units));
                depleted.push(metric);
            }
        }
    }
    depleted
}
