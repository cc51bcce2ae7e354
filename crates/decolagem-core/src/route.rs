//! Route vocabulary: steps, reducer actions, derived totals.

use serde::{Deserialize, Serialize};

/// One waypoint of the travel plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Celestial body name.
    pub name: String,
    /// Kilometres from the previous step (0 for the origin).
    pub distance: f64,
    /// Estimated fuel units for this leg.
    pub fuel: f64,
    /// Previous waypoint name (`None` for the origin).
    pub from: Option<String>,
}

impl RouteStep {
    pub fn origin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distance: 0.0,
            fuel: 0.0,
            from: None,
        }
    }
}

/// Orbital transfer style, scales the fuel estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferType {
    /// Straight burn, most fuel.
    Direct,
    /// Minimum-energy ellipse.
    #[default]
    Hohmann,
    /// Slingshot around an intermediate body.
    GravityAssist,
}

impl TransferType {
    pub fn fuel_multiplier(self) -> f64 {
        match self {
            TransferType::Direct => 1.5,
            TransferType::Hohmann => 1.0,
            TransferType::GravityAssist => 0.7,
        }
    }
}

/// Route planner actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouteAction {
    /// Replace the route with one loaded from the backend.
    SetSavedRoute {
        steps: Vec<String>,
        current_index: usize,
    },
    /// Append a destination. Duplicates are ignored.
    AddStep { destination: String },
    /// Remove the step at `index`. Visited steps cannot be removed.
    RemoveStep { index: usize },
    /// Move a step. Neither end may touch a visited step.
    ReorderStep { from: usize, to: usize },
    /// Drop every unvisited step.
    ClearRoute,
    /// Change the transfer style used for fuel estimates.
    SetTransferType { transfer: TransferType },
}

/// Totals derived from the step list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTotals {
    pub distance_km: f64,
    pub fuel: f64,
    pub food: f64,
    pub oxygen: f64,
    pub fuel_pct: f64,
    pub food_pct: f64,
    pub oxygen_pct: f64,
}
