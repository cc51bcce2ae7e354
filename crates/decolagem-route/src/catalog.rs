//! Celestial bodies and the orbital distance table.
//!
//! Distances come from a bundled JSON table keyed `From_To`. Pairs missing
//! from the table fall back to interpolating between mean orbital radii.

use std::collections::HashMap;

use serde::Serialize;

const DISTANCE_TABLE: &str = include_str!("../data/distances.json");

/// A body that can appear on a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub name: &'static str,
    /// Body this one orbits (`None` for the Sun).
    pub parent: Option<&'static str>,
    /// Mean orbital radius around the parent (km).
    pub orbit_km: f64,
    pub has_water: bool,
}

const fn planet(name: &'static str, orbit_km: f64, has_water: bool) -> Body {
    Body {
        name,
        parent: None,
        orbit_km,
        has_water,
    }
}

const fn moon(name: &'static str, parent: &'static str, orbit_km: f64, has_water: bool) -> Body {
    Body {
        name,
        parent: Some(parent),
        orbit_km,
        has_water,
    }
}

/// Every body the planner knows about, planets first in solar order.
pub const BODIES: &[Body] = &[
    planet("Mercurio", 57_909_000.0, false),
    planet("Venus", 108_209_000.0, false),
    planet("Terra", 149_598_000.0, true),
    planet("Marte", 227_939_000.0, true),
    planet("Ceres", 413_690_000.0, true),
    planet("Jupiter", 778_479_000.0, false),
    planet("Saturno", 1_433_530_000.0, false),
    planet("Urano", 2_870_972_000.0, false),
    planet("Netuno", 4_495_060_000.0, false),
    planet("Plutao", 5_906_380_000.0, false),
    moon("Lua", "Terra", 384_400.0, true),
    moon("Fobos", "Marte", 9_376.0, false),
    moon("Deimos", "Marte", 23_463.0, false),
    moon("Io", "Jupiter", 421_700.0, false),
    moon("Europa", "Jupiter", 671_034.0, true),
    moon("Ganimedes", "Jupiter", 1_070_412.0, true),
    moon("Calisto", "Jupiter", 1_882_709.0, true),
    moon("Encelado", "Saturno", 237_948.0, true),
    moon("Titan", "Saturno", 1_221_870.0, true),
];

/// Body lookup plus the distance table.
#[derive(Debug, Clone)]
pub struct Catalog {
    distances: HashMap<String, f64>,
}

impl Catalog {
    /// Build a catalog from a JSON object of `"From_To": km` entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let distances: HashMap<String, f64> = serde_json::from_str(json)?;
        Ok(Self { distances })
    }

    /// The catalog with the bundled distance table.
    pub fn standard() -> Self {
        Self::from_json(DISTANCE_TABLE).expect("bundled distance table is valid JSON")
    }

    pub fn bodies(&self) -> &'static [Body] {
        BODIES
    }

    pub fn body(&self, name: &str) -> Option<&'static Body> {
        BODIES.iter().find(|b| b.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.body(name).is_some()
    }

    pub fn has_water(&self, name: &str) -> bool {
        self.body(name).is_some_and(|b| b.has_water)
    }

    /// Distance from the table, in either direction.
    pub fn table_distance(&self, from: &str, to: &str) -> Option<f64> {
        self.distances
            .get(&format!("{from}_{to}"))
            .or_else(|| self.distances.get(&format!("{to}_{from}")))
            .copied()
    }

    /// Kilometres between two bodies. Zero for the same body or unknown names
    /// with no table entry.
    pub fn distance(&self, from: &str, to: &str) -> f64 {
        if from == to {
            return 0.0;
        }
        if let Some(km) = self.table_distance(from, to) {
            return km;
        }
        match (self.body(from), self.body(to)) {
            (Some(a), Some(b)) => self.estimate(a, b),
            _ => {
                log::warn!("no distance for {from} -> {to}");
                0.0
            }
        }
    }

    /// Linear estimate from orbital radii, used when the table has no entry.
    fn estimate(&self, a: &Body, b: &Body) -> f64 {
        // Same planetary system: moon/moon or planet/moon.
        if a.parent.is_some() && a.parent == b.parent {
            return (a.orbit_km - b.orbit_km).abs();
        }
        if a.parent == Some(b.name) {
            return a.orbit_km;
        }
        if b.parent == Some(a.name) {
            return b.orbit_km;
        }
        (self.heliocentric_km(a) - self.heliocentric_km(b)).abs()
    }

    /// Mean distance from the Sun (a moon uses its planet's).
    pub fn heliocentric_km(&self, body: &Body) -> f64 {
        match body.parent.and_then(|p| self.body(p)) {
            Some(parent) => parent.orbit_km,
            None => body.orbit_km,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
