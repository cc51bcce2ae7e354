//! Route reducer and planner.
//!
//! `try_reduce` is a pure function from (state, action) to a new state.
//! Every accepted action rebuilds the step list from waypoint names, so
//! per-step distance, fuel and the totals are always consistent. Steps at
//! or before `current_index` have been visited and are locked.

use decolagem_core::constants::*;
use decolagem_core::error::RouteError;
use decolagem_core::route::{RouteAction, RouteStep, RouteTotals, TransferType};

use crate::catalog::Catalog;

/// Planned route: ordered steps, progress, and derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteState {
    steps: Vec<RouteStep>,
    current_index: usize,
    transfer: TransferType,
    totals: RouteTotals,
}

impl RouteState {
    /// A route holding only the origin.
    pub fn new(origin: &str, catalog: &Catalog) -> Result<Self, RouteError> {
        build(vec![origin.to_string()], 0, TransferType::default(), catalog)
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    pub fn names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name.clone()).collect()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn transfer(&self) -> TransferType {
        self.transfer
    }

    pub fn totals(&self) -> RouteTotals {
        self.totals
    }

    pub fn contains(&self, name: &str) -> bool {
        self.steps.iter().any(|s| s.name == name)
    }

    fn check_unlocked(&self, index: usize) -> Result<(), RouteError> {
        if index >= self.steps.len() {
            return Err(RouteError::OutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        if index <= self.current_index {
            return Err(RouteError::LockedStep { index });
        }
        Ok(())
    }

    /// Refuse `names` unless it starts with the visited steps, origin
    /// included. Waypoints after the progress index are free.
    pub fn check_visited_prefix(&self, names: &[String]) -> Result<(), RouteError> {
        let visited = &self.steps[..=self.current_index];
        let kept = names.len() > self.current_index
            && visited.iter().zip(names).all(|(step, name)| step.name == *name);
        if kept {
            Ok(())
        } else {
            Err(RouteError::VisitedStepsChanged {
                index: self.current_index,
            })
        }
    }
}

/// Apply `action`, or explain why it was refused.
pub fn try_reduce(
    state: &RouteState,
    action: &RouteAction,
    catalog: &Catalog,
) -> Result<RouteState, RouteError> {
    match action {
        RouteAction::SetSavedRoute {
            steps,
            current_index,
        } => {
            if state.current_index > 0 {
                state.check_visited_prefix(steps)?;
            }
            let index = (*current_index)
                .max(state.current_index)
                .min(steps.len().saturating_sub(1));
            build(steps.clone(), index, state.transfer, catalog)
        }
        RouteAction::AddStep { destination } => {
            if !catalog.contains(destination) {
                return Err(RouteError::UnknownBody(destination.clone()));
            }
            if state.contains(destination) {
                return Err(RouteError::Duplicate(destination.clone()));
            }
            let mut names = state.names();
            names.push(destination.clone());
            build(names, state.current_index, state.transfer, catalog)
        }
        RouteAction::RemoveStep { index } => {
            state.check_unlocked(*index)?;
            let mut names = state.names();
            names.remove(*index);
            build(names, state.current_index, state.transfer, catalog)
        }
        RouteAction::ReorderStep { from, to } => {
            state.check_unlocked(*from)?;
            state.check_unlocked(*to)?;
            let mut names = state.names();
            let moved = names.remove(*from);
            names.insert(*to, moved);
            build(names, state.current_index, state.transfer, catalog)
        }
        RouteAction::ClearRoute => {
            let mut names = state.names();
            names.truncate(state.current_index + 1);
            build(names, state.current_index, state.transfer, catalog)
        }
        RouteAction::SetTransferType { transfer } => {
            build(state.names(), state.current_index, *transfer, catalog)
        }
    }
}

/// Apply `action`; refused actions leave the state unchanged.
pub fn reduce(state: &RouteState, action: &RouteAction, catalog: &Catalog) -> RouteState {
    match try_reduce(state, action, catalog) {
        Ok(next) => next,
        Err(err) => {
            log::debug!("route action {:?} ignored: {}", action, err);
            state.clone()
        }
    }
}

/// Rebuild steps and totals from waypoint names.
fn build(
    names: Vec<String>,
    current_index: usize,
    transfer: TransferType,
    catalog: &Catalog,
) -> Result<RouteState, RouteError> {
    if names.is_empty() {
        return Err(RouteError::Empty);
    }
    let mut steps: Vec<RouteStep> = Vec::with_capacity(names.len());
    for name in names {
        if !catalog.contains(&name) {
            return Err(RouteError::UnknownBody(name));
        }
        if steps.iter().any(|s| s.name == name) {
            return Err(RouteError::Duplicate(name));
        }
        let step = match steps.last() {
            None => RouteStep::origin(name),
            Some(prev) => {
                let distance = catalog.distance(&prev.name, &name);
                RouteStep {
                    fuel: distance / FUEL_KM_PER_UNIT * transfer.fuel_multiplier(),
                    distance,
                    from: Some(prev.name.clone()),
                    name,
                }
            }
        };
        steps.push(step);
    }
    let totals = compute_totals(&steps);
    Ok(RouteState {
        current_index: current_index.min(steps.len() - 1),
        steps,
        transfer,
        totals,
    })
}

fn compute_totals(steps: &[RouteStep]) -> RouteTotals {
    let distance_km: f64 = steps.iter().map(|s| s.distance).sum();
    let fuel: f64 = steps.iter().map(|s| s.fuel).sum();
    let food = distance_km / FOOD_KM_PER_UNIT;
    let oxygen = distance_km / OXYGEN_KM_PER_UNIT;
    RouteTotals {
        distance_km,
        fuel,
        food,
        oxygen,
        fuel_pct: fuel / MAX_FUEL_UNITS * 100.0,
        food_pct: food / MAX_FOOD_UNITS * 100.0,
        oxygen_pct: oxygen / MAX_OXYGEN_UNITS * 100.0,
    }
}

/// Route state plus the confirm/edit freeze.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    catalog: Catalog,
    state: RouteState,
    confirmed: bool,
}

impl RoutePlanner {
    /// A fresh, editable route starting at `origin`.
    pub fn new(catalog: Catalog, origin: &str) -> Result<Self, RouteError> {
        let state = RouteState::new(origin, &catalog)?;
        Ok(Self {
            catalog,
            state,
            confirmed: false,
        })
    }

    /// Restore a route saved by the backend.
    pub fn from_saved(
        catalog: Catalog,
        names: Vec<String>,
        current_index: usize,
        transfer: TransferType,
        confirmed: bool,
    ) -> Result<Self, RouteError> {
        let index = current_index.min(names.len().saturating_sub(1));
        let state = build(names, index, transfer, &catalog)?;
        Ok(Self {
            catalog,
            state,
            confirmed,
        })
    }

    /// Apply an action. Refused while the route is confirmed.
    pub fn dispatch(&mut self, action: &RouteAction) -> Result<(), RouteError> {
        if self.confirmed {
            return Err(RouteError::Frozen);
        }
        self.state = try_reduce(&self.state, action, &self.catalog)?;
        Ok(())
    }

    pub fn confirm(&mut self) {
        self.confirmed = true;
    }

    pub fn edit(&mut self) {
        self.confirmed = false;
    }

    /// Mark the next step as reached. Returns the new current index.
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.state.current_index + 1;
        if next >= self.state.steps.len() {
            return None;
        }
        self.state.current_index = next;
        Some(next)
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Step the ship is at (or left from).
    pub fn current(&self) -> &RouteStep {
        &self.state.steps[self.state.current_index]
    }

    /// Step the ship is heading to, if any remain.
    pub fn next(&self) -> Option<&RouteStep> {
        self.state.steps.get(self.state.current_index + 1)
    }

    pub fn is_finished(&self) -> bool {
        self.next().is_none()
    }
}
