//! Error types for rejected commands and route edits.

use thiserror::Error;

use crate::enums::{GamePhase, ItemKind, WarpBlock};

/// A route planner action that was refused. The route is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route is confirmed; edit it first")]
    Frozen,
    #[error("step {index} has already been visited")]
    LockedStep { index: usize },
    #[error("saved route does not keep the visited steps 0..={index}")]
    VisitedStepsChanged { index: usize },
    #[error("step {index} is out of range (route has {len} steps)")]
    OutOfRange { index: usize, len: usize },
    #[error("{0} is already on the route")]
    Duplicate(String),
    #[error("unknown celestial body: {0}")]
    UnknownBody(String),
    #[error("route has no origin")]
    Empty,
}

/// A player command the engine refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("no game loaded")]
    NoGameLoaded,
    #[error("command not allowed during {0:?}")]
    WrongPhase(GamePhase),
    #[error("simulation is paused")]
    Paused,
    #[error("no ship selected")]
    NoShipSelected,
    #[error("route must be confirmed before launch")]
    RouteNotConfirmed,
    #[error("route needs at least one destination")]
    RouteTooShort,
    #[error("warp unavailable: {0:?}")]
    WarpUnavailable(WarpBlock),
    #[error("S.O.S. is only available while critical")]
    SosUnavailable,
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("amount must be positive")]
    InvalidAmount,
    #[error("cannot transfer funds to your own team")]
    SameTeam,
    #[error("no {0:?} left in inventory")]
    ItemDepleted(ItemKind),
    #[error("{item:?} cooling down for {remaining_secs:.0}s")]
    ItemCoolingDown { item: ItemKind, remaining_secs: f64 },
    #[error("no challenge pending")]
    NoChallengePending,
    #[error("resolve the pending challenge first")]
    ChallengeUnresolved,
    #[error(transparent)]
    Route(#[from] RouteError),
}
