//! Per-ship resource profiles.
//!
//! Static tuning data: how fast each metric decays, how hard the ship
//! accelerates, and how much propulsion takeoff costs.

use decolagem_core::enums::{Metric, ShipType};

/// Static performance and decay table for one ship type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipProfile {
    /// Minutes to lose one unit, indexed like `Metric::ALL`.
    pub minutes_per_unit: [u32; 7],
    /// Velocity gained per tick below the cap (km/h).
    pub acceleration_kmh: f64,
    /// Propulsion lost at takeoff.
    pub takeoff_propulsion_loss: f64,
}

impl ShipProfile {
    pub fn minutes_per_unit(&self, metric: Metric) -> u32 {
        self.minutes_per_unit[metric_index(metric)]
    }

    /// Depletion period of one unit, in milliseconds.
    pub fn depletion_period_ms(&self, metric: Metric) -> u64 {
        u64::from(self.minutes_per_unit(metric)) * 60_000
    }
}

/// Position of `metric` in `Metric::ALL`.
pub fn metric_index(metric: Metric) -> usize {
    match metric {
        Metric::Propulsion => 0,
        Metric::Oxygen => 1,
        Metric::Direction => 2,
        Metric::Stability => 3,
        Metric::Productivity => 4,
        Metric::Interdependence => 5,
        Metric::Engagement => 6,
    }
}

/// Get the profile for a ship type.
pub fn get_profile(ship: ShipType) -> ShipProfile {
    match ship {
        // propulsion, oxygen, direction, stability, productivity, interdependence, engagement
        ShipType::NeoEclipse => ShipProfile {
            minutes_per_unit: [4, 5, 6, 7, 8, 9, 10],
            acceleration_kmh: 500.0,
            takeoff_propulsion_loss: 10.0,
        },
        ShipType::Stardust => ShipProfile {
            minutes_per_unit: [3, 4, 5, 5, 6, 6, 7],
            acceleration_kmh: 800.0,
            takeoff_propulsion_loss: 15.0,
        },
        ShipType::Horizonte => ShipProfile {
            minutes_per_unit: [6, 7, 8, 9, 10, 11, 12],
            acceleration_kmh: 350.0,
            takeoff_propulsion_loss: 6.0,
        },
    }
}
