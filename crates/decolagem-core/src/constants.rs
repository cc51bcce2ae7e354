//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 10;

/// Milliseconds per tick. Velocity is integrated once per tick.
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

/// Distance is integrated once per second.
pub const DISTANCE_STEP_MS: u64 = 1000;

// --- Telemetry ---

/// Upper bound of every percentage metric.
pub const METRIC_MAX: f64 = 100.0;

/// Lower bound of every percentage metric.
pub const METRIC_MIN: f64 = 0.0;

/// A metric at or below this value makes the ship critical.
pub const CRITICAL_THRESHOLD: f64 = 20.0;

/// Oxygen bonus when arriving at a body that has water.
pub const WATER_OXYGEN_BONUS: f64 = 10.0;

// --- Velocity ---

/// Boost cap, and the minimum velocity for warp (km/h).
pub const WARP_THRESHOLD_KMH: f64 = 60_000.0;

/// Speed cap during final approach (km/h).
pub const FINAL_APPROACH_CAP_KMH: f64 = 20_000.0;

/// Remaining distance at or below which the ship flies final approach (km).
pub const FINAL_APPROACH_DISTANCE_KM: f64 = 1_000_000.0;

/// Velocity lost per tick when above the current cap (km/h).
pub const DECELERATION_STEP_KMH: f64 = 2_000.0;

/// Speed of light (m/s), for the relativistic readout.
pub const SPEED_OF_LIGHT_MS: f64 = 299_792_458.0;

// --- Distance model ---

/// At or above the warp threshold, distance drops by `velocity * HIGH_SPEED_MULTIPLIER` each second.
pub const HIGH_SPEED_MULTIPLIER: f64 = 2.0;

/// Below the warp threshold, distance drops by this fixed amount each second while moving (km).
pub const BASE_DISTANCE_RATE_KM: f64 = 5_000.0;

// --- Warp (Dobra Espacial) ---

/// Velocity gained per tick while warp is active (km/h).
pub const WARP_ACCELERATION_KMH: f64 = 5_000.0;

/// Maximum warp duration (ms).
pub const WARP_DURATION_MS: u64 = 100_000;

/// Warp ends once remaining distance reaches this floor (km).
pub const WARP_DISTANCE_FLOOR_KM: f64 = 5_000.0;

/// Cooldown after warp ends before it can be enabled again (ms).
pub const WARP_COOLDOWN_MS: u64 = 120_000;

/// How long the "warp disabled" banner stays visible (ms).
pub const WARP_BANNER_MS: u64 = 10_000;

/// Warp drains propulsion and stability by one unit on this period (ms).
pub const WARP_DRAIN_PERIOD_MS: u64 = 5_000;

/// Destination for which warp is never allowed.
pub const WARP_FORBIDDEN_DESTINATION: &str = "Lua";

// --- SOS ---

/// Period of the ambient SOS roll (ms).
pub const SOS_SIGNAL_PERIOD_MS: u64 = 180_000;

/// Lifetime of a short SOS signal (ms).
pub const SOS_SHORT_LIFETIME_MS: u64 = 5_000;

/// Lifetime of a long SOS signal (ms).
pub const SOS_LONG_LIFETIME_MS: u64 = 300_000;

/// Fixed part of the emergency restoration cost.
pub const SOS_BASE_COST: u64 = 5_000_000;

/// Travel seconds per coin of variable restoration cost.
pub const SOS_SECS_PER_COIN: u64 = 10;

/// Restoration ramp period (ms).
pub const SOS_RESTORE_PERIOD_MS: u64 = 50;

/// Units restored per metric per ramp step.
pub const SOS_RESTORE_STEP: f64 = 2.0;

// --- Persistence ---

/// Telemetry is saved at least this often while in flight (ms).
pub const TELEMETRY_SAVE_PERIOD_MS: u64 = 30_000;

// --- Inventory ---

/// Cooldown after using any inventory item (ms).
pub const ITEM_COOLDOWN_MS: u64 = 60_000;

// --- Route planner ---

/// Kilometres per unit of estimated fuel.
pub const FUEL_KM_PER_UNIT: f64 = 5_000.0;

/// Kilometres per unit of estimated food.
pub const FOOD_KM_PER_UNIT: f64 = 20_000.0;

/// Kilometres per unit of estimated oxygen.
pub const OXYGEN_KM_PER_UNIT: f64 = 25_000.0;

/// Fuel capacity used for the percentage readout.
pub const MAX_FUEL_UNITS: f64 = 200_000.0;

/// Food capacity used for the percentage readout.
pub const MAX_FOOD_UNITS: f64 = 50_000.0;

/// Oxygen capacity used for the percentage readout.
pub const MAX_OXYGEN_UNITS: f64 = 40_000.0;

/// Stellar map zoom bounds.
pub const MAP_MIN_ZOOM: f64 = 0.25;
pub const MAP_MAX_ZOOM: f64 = 8.0;

/// Screen radius (pixels at zoom 1) within which a click selects a body.
pub const MAP_HIT_RADIUS_PX: f64 = 12.0;
