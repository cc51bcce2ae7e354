//! Fundamental simulation types: time, cadences, telemetry.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Metric;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += TICK_MS;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}

/// A periodic process driven by the simulation tick.
///
/// Time is accumulated with `advance`, which reports how many whole periods
/// have elapsed. Resetting drops any partial period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    period_ms: u64,
    accumulated_ms: u64,
}

impl Cadence {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulated_ms: 0,
        }
    }

    /// Add `dt_ms` and return the number of periods that completed.
    pub fn advance(&mut self, dt_ms: u64) -> u32 {
        self.accumulated_ms += dt_ms;
        let fired = self.accumulated_ms / self.period_ms;
        self.accumulated_ms %= self.period_ms;
        fired as u32
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    /// Milliseconds until the next period completes.
    pub fn remaining_ms(&self) -> u64 {
        self.period_ms - self.accumulated_ms
    }
}

/// Readings that are displayed but never drive gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CosmeticReadings {
    pub battery: f64,
    pub temperature_c: f64,
    pub pressure_kpa: f64,
    pub sensors_online: bool,
}

impl Default for CosmeticReadings {
    fn default() -> Self {
        Self {
            battery: 100.0,
            temperature_c: 21.0,
            pressure_kpa: 101.3,
            sensors_online: true,
        }
    }
}

/// Ship and crew health. Every gameplay field is a percentage in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub propulsion: f64,
    pub oxygen: f64,
    pub direction: f64,
    pub stability: f64,
    pub productivity: f64,
    pub interdependence: f64,
    pub engagement: f64,
    #[serde(default)]
    pub cosmetic: CosmeticReadings,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::full()
    }
}

impl Telemetry {
    /// All metrics at 100.
    pub fn full() -> Self {
        Self {
            propulsion: METRIC_MAX,
            oxygen: METRIC_MAX,
            direction: METRIC_MAX,
            stability: METRIC_MAX,
            productivity: METRIC_MAX,
            interdependence: METRIC_MAX,
            engagement: METRIC_MAX,
            cosmetic: CosmeticReadings::default(),
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Propulsion => self.propulsion,
            Metric::Oxygen => self.oxygen,
            Metric::Direction => self.direction,
            Metric::Stability => self.stability,
            Metric::Productivity => self.productivity,
            Metric::Interdependence => self.interdependence,
            Metric::Engagement => self.engagement,
        }
    }

    fn slot(&mut self, metric: Metric) -> &mut f64 {
        match metric {
            Metric::Propulsion => &mut self.propulsion,
            Metric::Oxygen => &mut self.oxygen,
            Metric::Direction => &mut self.direction,
            Metric::Stability => &mut self.stability,
            Metric::Productivity => &mut self.productivity,
            Metric::Interdependence => &mut self.interdependence,
            Metric::Engagement => &mut self.engagement,
        }
    }

    /// Set a metric, clamped to [0, 100].
    pub fn set(&mut self, metric: Metric, value: f64) {
        *self.slot(metric) = value.clamp(METRIC_MIN, METRIC_MAX);
    }

    /// Add `delta` to a metric (clamped). Returns the new value.
    pub fn adjust(&mut self, metric: Metric, delta: f64) -> f64 {
        let slot = self.slot(metric);
        *slot = (*slot + delta).clamp(METRIC_MIN, METRIC_MAX);
        *slot
    }

    /// Clamp every metric into range. Used on data coming from outside.
    pub fn clamped(mut self) -> Self {
        for metric in Metric::ALL {
            let value = self.get(metric);
            self.set(metric, if value.is_nan() { METRIC_MIN } else { value });
        }
        self
    }

    /// The lowest metric and its value.
    pub fn weakest(&self) -> (Metric, f64) {
        Metric::ALL
            .into_iter()
            .map(|m| (m, self.get(m)))
            .fold((Metric::Propulsion, f64::INFINITY), |acc, cur| {
                if cur.1 < acc.1 {
                    cur
                } else {
                    acc
                }
            })
    }

    /// Any tracked metric at or below the critical threshold.
    pub fn is_critical(&self) -> bool {
        self.weakest().1 <= CRITICAL_THRESHOLD
    }

    pub fn is_full(&self) -> bool {
        Metric::ALL.into_iter().all(|m| self.get(m) >= METRIC_MAX)
    }
}

/// Velocity in the three units the telemetry panel shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityReading {
    pub kmh: f64,
    pub ms: f64,
    /// Fraction of the speed of light.
    pub fraction_c: f64,
}

impl VelocityReading {
    pub fn from_kmh(kmh: f64) -> Self {
        let ms = kmh / 3.6;
        Self {
            kmh,
            ms,
            fraction_c: ms / SPEED_OF_LIGHT_MS,
        }
    }
}

/// A signed change to one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: Metric,
    pub delta: f64,
}

impl MetricDelta {
    pub const fn new(metric: Metric, delta: f64) -> Self {
        Self { metric, delta }
    }
}

/// Ambient distress signal from a celestial body. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosSignal {
    pub id: u32,
    pub host_body: String,
    pub received_at_ms: u64,
    pub expires_at_ms: u64,
}

impl SosSignal {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}
