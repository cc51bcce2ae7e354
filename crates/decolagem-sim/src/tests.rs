//! Tests for the mission engine: decay, flight, warp, arrival, S.O.S.,
//! inventory, choices, persistence and determinism.

use decolagem_core::commands::{ChoiceEffect, PlayerCommand};
use decolagem_core::enums::*;
use decolagem_core::events::MissionEvent;
use decolagem_core::persist::{GameData, ItemStack, WritePayload};
use decolagem_core::route::RouteAction;
use decolagem_core::state::MissionSnapshot;
use decolagem_core::types::{MetricDelta, Telemetry};

use crate::engine::{MissionEngine, SimConfig};
use crate::systems::depletion::{self, DepletionSchedule};
use crate::warp::{self, WarpContext};

const TEAM: &str = "Alpha";

fn add(destination: &str) -> PlayerCommand {
    PlayerCommand::Route {
        action: RouteAction::AddStep {
            destination: destination.to_string(),
        },
    }
}

/// Engine in Briefing with `route` planned and confirmed.
fn briefed(route: &[&str], ship: ShipType, seed: u64) -> MissionEngine {
    let data = GameData::new(7, TEAM, route[0]);
    let mut engine = MissionEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::LoadGame {
        data: Box::new(data),
    });
    engine.queue_command(PlayerCommand::SelectShip { ship });
    engine.queue_commands(route[1..].iter().map(|name| add(name)));
    engine.queue_command(PlayerCommand::ConfirmRoute);
    engine.tick();
    engine
}

/// Engine one tick after takeoff.
fn launched(route: &[&str]) -> MissionEngine {
    let mut engine = briefed(route, ShipType::NeoEclipse, 42);
    engine.queue_command(PlayerCommand::Launch);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::InFlight);
    engine
}

/// Run up to `max` ticks, collecting every mission event.
fn run_collecting(engine: &mut MissionEngine, max: usize) -> Vec<MissionEvent> {
    let mut events = Vec::new();
    for _ in 0..max {
        events.extend(engine.tick().events);
    }
    events
}

/// Tick until `pred` holds for a snapshot. Returns the snapshot and tick count.
fn tick_until(
    engine: &mut MissionEngine,
    max: usize,
    pred: impl Fn(&MissionSnapshot) -> bool,
) -> Option<(MissionSnapshot, usize)> {
    for n in 1..=max {
        let snap = engine.tick();
        if pred(&snap) {
            return Some((snap, n));
        }
    }
    None
}

fn warp_context(phase: WarpPhase) -> WarpContext<'static> {
    WarpContext {
        phase,
        traveling: true,
        velocity_kmh: 60_000.0,
        destination: Some("Marte"),
        distance_remaining_km: 50_000_000.0,
        now_ms: 500_000,
        cooldown_until_ms: 0,
        active_since_ms: None,
    }
}

// ---- Lifecycle ----

#[test]
fn test_lobby_rejects_flight_commands() {
    let mut engine = MissionEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::Launch);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Lobby);
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.alerts[0].level, AlertLevel::Warning);
}

#[test]
fn test_load_game_enters_briefing() {
    let engine = briefed(&["Terra", "Marte"], ShipType::Stardust, 42);
    assert_eq!(engine.phase(), GamePhase::Briefing);
    let mission = engine.mission().unwrap();
    assert_eq!(mission.ship, Some(ShipType::Stardust));
    assert!(mission.route.is_confirmed());
    assert_eq!(mission.route.state().names(), vec!["Terra", "Marte"]);
}

#[test]
fn test_launch_requires_confirmed_route() {
    let mut engine = briefed(&["Terra", "Marte"], ShipType::NeoEclipse, 42);
    engine.queue_command(PlayerCommand::EditRoute);
    engine.queue_command(PlayerCommand::Launch);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Briefing);
    assert!(!snap.alerts.is_empty());
}

#[test]
fn test_launch_requires_destination() {
    let mut engine = briefed(&["Terra"], ShipType::NeoEclipse, 42);
    engine.queue_command(PlayerCommand::Launch);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Briefing);
    assert!(!snap.alerts.is_empty());
}

#[test]
fn test_launch_applies_takeoff_loss_once() {
    let engine = launched(&["Terra", "Marte"]);
    let mission = engine.mission().unwrap();
    assert_eq!(mission.telemetry.propulsion, 90.0);
    assert!(mission.launched);
    assert_eq!(mission.flight.destination.as_deref(), Some("Marte"));
    assert_eq!(mission.flight.leg_distance_km, 78_340_000.0);
}

#[test]
fn test_ship_locked_after_launch() {
    let mut engine = launched(&["Terra", "Marte"]);
    engine.queue_command(PlayerCommand::SelectShip {
        ship: ShipType::Horizonte,
    });
    let snap = engine.tick();
    assert_eq!(snap.ship, Some(ShipType::NeoEclipse));
    assert!(!snap.alerts.is_empty());
}

// ---- Depletion ----

#[test]
fn test_depletion_never_leaves_bounds() {
    for ship in ShipType::ALL {
        let mut schedule = DepletionSchedule::new(Some(ship));
        let mut telemetry = Telemetry::full();
        for _ in 0..200 {
            depletion::run(&mut schedule, &mut telemetry, true, 600_000);
            for metric in Metric::ALL {
                let value = telemetry.get(metric);
                assert!((0.0..=100.0).contains(&value), "{ship:?} {metric:?} = {value}");
            }
        }
        for metric in Metric::ALL {
            assert_eq!(telemetry.get(metric), 0.0);
        }
    }
}

#[test]
fn test_depletion_inactive_resets_partial_periods() {
    let mut schedule = DepletionSchedule::new(Some(ShipType::NeoEclipse));
    let mut telemetry = Telemetry::full();
    depletion::run(&mut schedule, &mut telemetry, true, 200_000);
    depletion::run(&mut schedule, &mut telemetry, false, 100);
    assert_eq!(schedule.remaining_ms(Metric::Oxygen), Some(300_000));
    depletion::run(&mut schedule, &mut telemetry, true, 200_000);
    assert_eq!(telemetry.oxygen, 100.0);
}

#[test]
fn test_depletion_without_ship_is_idle() {
    let mut schedule = DepletionSchedule::new(None);
    let mut telemetry = Telemetry::full();
    let depleted = depletion::run(&mut schedule, &mut telemetry, true, 3_600_000);
    assert!(depleted.is_empty());
    assert!(telemetry.is_full());
}

#[test]
fn test_neoeclipse_oxygen_loses_one_unit_after_five_minutes() {
    let mut engine = launched(&["Terra", "Marte"]);
    for _ in 0..2998 {
        engine.tick();
    }
    assert_eq!(engine.mission().unwrap().telemetry.oxygen, 100.0);
    engine.tick();
    let mission = engine.mission().unwrap();
    assert_eq!(mission.telemetry.oxygen, 99.0);
    assert_eq!(mission.clock_ms, 300_000);
}

#[test]
fn test_pause_freezes_time_and_decay() {
    let mut engine = launched(&["Terra", "Marte"]);
    engine.queue_command(PlayerCommand::Pause);
    engine.tick();
    let before = engine.mission().unwrap().clock_ms;
    for _ in 0..5000 {
        engine.tick();
    }
    let mission = engine.mission().unwrap();
    assert_eq!(mission.clock_ms, before);
    assert_eq!(mission.telemetry.oxygen, 100.0);

    engine.queue_command(PlayerCommand::EngageWarp);
    let snap = engine.tick();
    assert!(snap.paused);
    assert!(!snap.alerts.is_empty());

    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.mission().unwrap().clock_ms, before + 100);
}

#[test]
fn test_time_scale_multiplies_ticks() {
    let mut engine = launched(&["Terra", "Marte"]);
    let start = engine.time().tick;
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 2.0 });
    engine.advance(1000);
    assert_eq!(engine.time().tick, start + 20);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 9.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 4.0);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 0.0 });
    let frozen = engine.time().tick;
    engine.tick();
    engine.advance(10_000);
    assert_eq!(engine.time().tick, frozen);
}

// ---- Flight ----

#[test]
fn test_boost_reaches_warp_threshold() {
    let mut engine = launched(&["Terra", "Marte"]);
    let (snap, _) = tick_until(&mut engine, 200, |s| {
        s.telemetry.velocity.kmh >= 60_000.0
    })
    .unwrap();
    assert_eq!(snap.flight.mode, FlightMode::Boost);
    for _ in 0..50 {
        engine.tick();
    }
    assert_eq!(engine.mission().unwrap().flight.velocity_kmh, 60_000.0);
}

#[test]
fn test_short_leg_uses_final_approach() {
    let engine = launched(&["Marte", "Fobos"]);
    let mission = engine.mission().unwrap();
    assert_eq!(mission.flight.mode, FlightMode::FinalApproach);
    assert_eq!(mission.flight.velocity_kmh, 500.0);
}

// ---- Arrival ----

#[test]
fn test_arrival_fires_once_per_leg() {
    let mut engine = launched(&["Marte", "Fobos", "Deimos"]);
    let events = run_collecting(&mut engine, 200);
    let arrivals: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, MissionEvent::Arrived { .. }))
        .collect();
    assert_eq!(arrivals.len(), 1);
    assert_eq!(
        arrivals[0],
        &MissionEvent::Arrived {
            index: 1,
            waypoint: "Fobos".to_string(),
            oxygen_bonus: 0.0,
        }
    );
    assert!(events.contains(&MissionEvent::ChallengeDispatched {
        index: 1,
        waypoint: "Fobos".to_string(),
    }));
    assert_eq!(engine.phase(), GamePhase::Arrived);
    let mission = engine.mission().unwrap();
    assert_eq!(mission.route.current_index(), 1);
    assert_eq!(mission.flight.velocity_kmh, 0.0);
}

#[test]
fn test_water_world_adds_oxygen_and_completes_mission() {
    let mut engine = launched(&["Terra", "Lua"]);
    engine.mission_mut().unwrap().telemetry.oxygen = 50.0;
    let events = run_collecting(&mut engine, 2000);
    assert!(events.contains(&MissionEvent::Arrived {
        index: 1,
        waypoint: "Lua".to_string(),
        oxygen_bonus: 10.0,
    }));
    assert!(events.contains(&MissionEvent::MissionComplete {
        waypoint: "Lua".to_string(),
    }));
    assert_eq!(engine.phase(), GamePhase::MissionComplete);
    assert_eq!(engine.mission().unwrap().telemetry.oxygen, 60.0);
}

#[test]
fn test_depart_requires_resolved_challenge() {
    let mut engine = launched(&["Marte", "Fobos", "Deimos"]);
    tick_until(&mut engine, 200, |s| s.phase == GamePhase::Arrived).unwrap();

    engine.queue_command(PlayerCommand::Depart);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Arrived);
    assert!(!snap.alerts.is_empty());

    engine.queue_command(PlayerCommand::ResolveChallenge {
        choice: ChoiceEffect {
            challenge_id: "fobos-1".to_string(),
            option: "B".to_string(),
            deltas: vec![MetricDelta::new(Metric::Engagement, -5.0)],
            coins: 25,
        },
    });
    engine.queue_command(PlayerCommand::Depart);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::InFlight);
    assert_eq!(snap.flight.origin.as_deref(), Some("Fobos"));
    assert_eq!(snap.flight.destination.as_deref(), Some("Deimos"));
    assert_eq!(snap.space_coins, 25);
    assert_eq!(snap.telemetry.metrics.engagement, 95.0);
    assert!(snap.events.contains(&MissionEvent::Departed {
        from: "Fobos".to_string(),
        to: "Deimos".to_string(),
    }));
}

// ---- Warp ----

#[test]
fn test_warp_engages_when_every_condition_holds() {
    let ctx = warp_context(WarpPhase::Enabled);
    assert_eq!(warp::engage(&ctx), Ok(WarpPhase::Active));
    assert_eq!(warp::evaluate(&warp_context(WarpPhase::Disabled)).new_phase, WarpPhase::Enabled);
}

#[test]
fn test_warp_stays_disabled_when_any_condition_fails() {
    let cases: Vec<(WarpContext<'static>, WarpBlock)> = vec![
        (
            WarpContext {
                velocity_kmh: 59_999.0,
                ..warp_context(WarpPhase::Disabled)
            },
            WarpBlock::BelowThreshold,
        ),
        (
            WarpContext {
                destination: Some("Lua"),
                ..warp_context(WarpPhase::Disabled)
            },
            WarpBlock::InvalidDestination,
        ),
        (
            WarpContext {
                cooldown_until_ms: 500_001,
                ..warp_context(WarpPhase::Disabled)
            },
            WarpBlock::CoolingDown,
        ),
        (
            WarpContext {
                traveling: false,
                ..warp_context(WarpPhase::Disabled)
            },
            WarpBlock::NotTraveling,
        ),
    ];
    for (ctx, block) in cases {
        assert_eq!(warp::engage(&ctx), Err(block));
        let update = warp::evaluate(&ctx);
        assert_eq!(update.new_phase, WarpPhase::Disabled);
        assert!(!update.phase_changed);
    }
}

#[test]
fn test_active_warp_ends_on_route_change() {
    let ctx = WarpContext {
        destination: Some("Lua"),
        active_since_ms: Some(490_000),
        ..warp_context(WarpPhase::Active)
    };
    let update = warp::evaluate(&ctx);
    assert_eq!(update.new_phase, WarpPhase::Disabled);
    assert_eq!(update.ended, Some(WarpEndReason::RouteChanged));
}

#[test]
fn test_warp_lasts_its_full_duration() {
    let mut engine = launched(&["Terra", "Saturno"]);
    tick_until(&mut engine, 200, |s| s.warp.phase == WarpPhase::Enabled).unwrap();

    engine.queue_command(PlayerCommand::EngageWarp);
    let snap = engine.tick();
    assert_eq!(snap.warp.phase, WarpPhase::Active);
    assert_eq!(snap.flight.mode, FlightMode::Warp);
    assert_eq!(snap.soundtrack, SoundTrack::Warp);
    let propulsion = snap.telemetry.metrics.propulsion;

    let (snap, ticks) = tick_until(&mut engine, 1100, |s| {
        s.events
            .iter()
            .any(|e| matches!(e, MissionEvent::WarpDisabled { .. }))
    })
    .unwrap();
    assert!((995..=1001).contains(&ticks), "warp ended after {ticks} ticks");
    assert!(snap.events.contains(&MissionEvent::WarpDisabled {
        reason: WarpEndReason::Duration,
    }));
    assert_eq!(snap.telemetry.velocity.kmh, 60_000.0);
    assert_eq!(snap.flight.mode, FlightMode::Boost);
    assert!(snap.warp.banner_visible);
    assert!(snap.warp.cooldown_remaining_secs > 119.0);
    // Drain of one unit per 5 s while active.
    assert_eq!(snap.telemetry.metrics.propulsion, propulsion - 20.0);

    engine.queue_command(PlayerCommand::EngageWarp);
    let snap = engine.tick();
    assert_eq!(snap.warp.phase, WarpPhase::Disabled);
    assert_eq!(snap.warp.blocked_by, Some(WarpBlock::CoolingDown));
    assert!(!snap.alerts.is_empty());
}

#[test]
fn test_warp_stops_at_distance_floor() {
    let mut engine = launched(&["Terra", "Marte"]);
    tick_until(&mut engine, 200, |s| s.warp.phase == WarpPhase::Enabled).unwrap();
    engine.queue_command(PlayerCommand::EngageWarp);
    engine.tick();

    let (snap, _) = tick_until(&mut engine, 1100, |s| {
        s.events
            .iter()
            .any(|e| matches!(e, MissionEvent::WarpDisabled { .. }))
    })
    .unwrap();
    assert!(snap.events.contains(&MissionEvent::WarpDisabled {
        reason: WarpEndReason::DistanceFloor,
    }));
    assert_eq!(snap.flight.distance_remaining_km, 5_000.0);
    assert_eq!(snap.flight.mode, FlightMode::FinalApproach);
    assert_eq!(snap.phase, GamePhase::InFlight);

    let events = run_collecting(&mut engine, 100);
    assert!(events.contains(&MissionEvent::MissionComplete {
        waypoint: "Marte".to_string(),
    }));
}

#[test]
fn test_decay_suspended_during_warp() {
    let mut engine = launched(&["Terra", "Saturno"]);
    tick_until(&mut engine, 200, |s| s.warp.phase == WarpPhase::Enabled).unwrap();
    engine.queue_command(PlayerCommand::EngageWarp);
    engine.tick();
    for _ in 0..900 {
        engine.tick();
    }
    // 100 s of flight; oxygen would otherwise not decay yet, but every
    // cadence must still be reset while warping.
    let mission = engine.mission().unwrap();
    assert!(mission.warp.is_active());
    assert_eq!(mission.depletion.remaining_ms(Metric::Oxygen), Some(300_000));
}

// ---- Route changes in flight ----

#[test]
fn test_confirmed_route_is_frozen_in_flight() {
    let mut engine = launched(&["Terra", "Marte", "Ceres"]);
    engine.queue_command(PlayerCommand::Route {
        action: RouteAction::RemoveStep { index: 2 },
    });
    let snap = engine.tick();
    assert_eq!(snap.route.steps.len(), 3);
    assert!(!snap.alerts.is_empty());
}

#[test]
fn test_edit_in_flight_retargets_leg() {
    let mut engine = launched(&["Terra", "Marte", "Ceres"]);
    engine.queue_command(PlayerCommand::EditRoute);
    engine.queue_command(PlayerCommand::Route {
        action: RouteAction::RemoveStep { index: 1 },
    });
    let snap = engine.tick();
    assert_eq!(snap.flight.destination.as_deref(), Some("Ceres"));
    assert_eq!(snap.flight.leg_distance_km, 263_950_000.0);

    engine.queue_command(PlayerCommand::Route {
        action: RouteAction::RemoveStep { index: 1 },
    });
    let snap = engine.tick();
    assert_eq!(snap.route.steps.len(), 2);
    assert_eq!(snap.flight.destination.as_deref(), Some("Ceres"));
    assert!(!snap.alerts.is_empty());
}

#[test]
fn test_saved_route_in_flight_keeps_visited_steps() {
    let mut engine = launched(&["Marte", "Fobos", "Deimos"]);
    tick_until(&mut engine, 200, |s| s.phase == GamePhase::Arrived).unwrap();
    engine.queue_command(PlayerCommand::ResolveChallenge {
        choice: ChoiceEffect {
            challenge_id: "fobos-1".to_string(),
            option: "A".to_string(),
            deltas: Vec::new(),
            coins: 0,
        },
    });
    engine.queue_command(PlayerCommand::Depart);
    assert_eq!(engine.tick().phase, GamePhase::InFlight);

    engine.queue_command(PlayerCommand::EditRoute);
    engine.queue_command(PlayerCommand::Route {
        action: RouteAction::SetSavedRoute {
            steps: vec!["Ceres".into(), "Deimos".into(), "Jupiter".into()],
            current_index: 0,
        },
    });
    let snap = engine.tick();
    assert!(!snap.alerts.is_empty());
    assert_eq!(snap.flight.origin.as_deref(), Some("Fobos"));
    assert_eq!(snap.flight.destination.as_deref(), Some("Deimos"));
    let mission = engine.mission().unwrap();
    assert_eq!(mission.route.current_index(), 1);
    assert_eq!(mission.route.state().names(), vec!["Marte", "Fobos", "Deimos"]);
}

#[test]
fn test_saved_route_in_flight_keeps_leg_origin() {
    let mut engine = launched(&["Terra", "Marte", "Ceres"]);
    engine.queue_command(PlayerCommand::EditRoute);
    engine.queue_command(PlayerCommand::Route {
        action: RouteAction::SetSavedRoute {
            steps: vec!["Lua".into(), "Marte".into()],
            current_index: 0,
        },
    });
    let snap = engine.tick();
    assert!(!snap.alerts.is_empty());
    assert_eq!(snap.route.steps.len(), 3);

    engine.queue_command(PlayerCommand::Route {
        action: RouteAction::SetSavedRoute {
            steps: vec!["Terra".into(), "Ceres".into()],
            current_index: 0,
        },
    });
    let snap = engine.tick();
    assert_eq!(snap.flight.origin.as_deref(), Some("Terra"));
    assert_eq!(snap.flight.destination.as_deref(), Some("Ceres"));
}

// ---- S.O.S. ----

fn critical_game(coins: u64, travel_secs: f64) -> GameData {
    let mut data = GameData::new(7, TEAM, "Terra");
    data.route.push("Marte".to_string());
    data.route_confirmed = true;
    data.launched = true;
    data.ship = Some(ShipType::NeoEclipse);
    data.space_coins = coins;
    data.travel_secs = travel_secs;
    data.distance_remaining_km = Some(50_000_000.0);
    data.telemetry.oxygen = 15.0;
    data
}

#[test]
fn test_resume_mid_leg() {
    let mut engine = MissionEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::LoadGame {
        data: Box::new(critical_game(0, 10.0)),
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::InFlight);
    assert_eq!(snap.flight.destination.as_deref(), Some("Marte"));
    assert!(snap.flight.distance_remaining_km <= 50_000_000.0);
    assert_eq!(snap.flight.leg_distance_km, 78_340_000.0);
}

#[test]
fn test_resume_after_arrival_and_completion() {
    let mut data = critical_game(0, 10.0);
    data.distance_remaining_km = None;
    data.route.push("Ceres".to_string());
    data.route_index = 1;
    let mut engine = MissionEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::LoadGame {
        data: Box::new(data.clone()),
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Arrived);
    assert!(snap.challenge.is_none());

    // Saved between arrival and the challenge answer.
    data.challenge_pending = true;
    engine.queue_command(PlayerCommand::LoadGame {
        data: Box::new(data.clone()),
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Arrived);
    let challenge = snap.challenge.unwrap();
    assert_eq!(challenge.index, 1);
    assert_eq!(challenge.waypoint, "Marte");
    engine.queue_command(PlayerCommand::Depart);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Arrived);
    assert!(snap.challenge.is_some());
    assert!(engine.game_data().unwrap().challenge_pending);

    data.challenge_pending = false;
    data.route_index = 2;
    engine.queue_command(PlayerCommand::LoadGame {
        data: Box::new(data),
    });
    assert_eq!(engine.tick().phase, GamePhase::MissionComplete);
}

#[test]
fn test_critical_starts_alarm() {
    let mut engine = MissionEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::LoadGame {
        data: Box::new(critical_game(1000, 600.0)),
    });
    let snap = engine.tick();
    assert!(snap.sos.critical);
    assert!(snap.sos.alarm);
    assert!(snap.sos.available);
    assert!(snap.events.contains(&MissionEvent::CriticalEntered {
        metric: Metric::Oxygen,
        value: 15.0,
    }));
}

#[test]
fn test_sos_cost_is_capped_at_balance() {
    let mut engine = MissionEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::LoadGame {
        data: Box::new(critical_game(1000, 600.0)),
    });
    engine.tick();

    engine.queue_command(PlayerCommand::ConfirmSos);
    let snap = engine.tick();
    assert_eq!(snap.space_coins, 0);
    assert!(snap.sos.restoring);
    assert!(!snap.sos.alarm);
    assert!(snap.events.contains(&MissionEvent::RestorationStarted { cost: 1000 }));

    let events = run_collecting(&mut engine, 40);
    assert!(events.contains(&MissionEvent::RestorationComplete));
    let mission = engine.mission().unwrap();
    assert!(mission.telemetry.is_full());
    assert!(!mission.sos.restoring);
    assert!(!mission.sos.critical);
}

#[test]
fn test_sos_cost_formula() {
    use crate::systems::sos::restore_cost;
    assert_eq!(restore_cost(600.0, 1000), 1000);
    assert_eq!(restore_cost(600.0, 10_000_000), 5_000_060);
    assert_eq!(restore_cost(0.0, 6_000_000), 5_000_000);
}

#[test]
fn test_sos_rejected_when_not_critical() {
    let mut engine = launched(&["Terra", "Marte"]);
    engine.queue_command(PlayerCommand::ConfirmSos);
    let snap = engine.tick();
    assert!(!snap.sos.restoring);
    assert!(!snap.alerts.is_empty());
}

#[test]
fn test_sos_signals_arrive_while_cruising() {
    let mut engine = launched(&["Terra", "Jupiter"]);
    let events = run_collecting(&mut engine, 1800);
    let received = events
        .iter()
        .filter(|e| matches!(e, MissionEvent::SosSignalReceived { .. }))
        .count();
    assert_eq!(received, 1);
}

// ---- Inventory ----

#[test]
fn test_item_applies_effect_and_cools_down() {
    let mut engine = launched(&["Terra", "Marte"]);
    {
        let mission = engine.mission_mut().unwrap();
        mission.inventory = vec![ItemStack::new(ItemKind::OxygenCanister, 2)];
        mission.telemetry.oxygen = 50.0;
    }
    engine.queue_command(PlayerCommand::UseItem {
        item: ItemKind::OxygenCanister,
    });
    let snap = engine.tick();
    assert_eq!(snap.telemetry.metrics.oxygen, 70.0);
    assert_eq!(snap.inventory[0].count, 1);

    engine.queue_command(PlayerCommand::UseItem {
        item: ItemKind::OxygenCanister,
    });
    let snap = engine.tick();
    assert_eq!(snap.telemetry.metrics.oxygen, 70.0);
    assert!(!snap.alerts.is_empty());

    for _ in 0..600 {
        engine.tick();
    }
    engine.queue_command(PlayerCommand::UseItem {
        item: ItemKind::OxygenCanister,
    });
    let snap = engine.tick();
    assert_eq!(snap.inventory[0].count, 0);
    assert_eq!(snap.telemetry.metrics.oxygen, 90.0);

    engine.queue_command(PlayerCommand::UseItem {
        item: ItemKind::RepairKit,
    });
    assert!(!engine.tick().alerts.is_empty());
}

// ---- Choices and transfers ----

#[test]
fn test_choice_is_recorded_and_coins_never_negative() {
    let mut engine = launched(&["Marte", "Fobos", "Deimos"]);
    engine.mission_mut().unwrap().space_coins = 20;
    tick_until(&mut engine, 200, |s| s.phase == GamePhase::Arrived).unwrap();
    engine.drain_writes();

    engine.queue_command(PlayerCommand::ResolveChallenge {
        choice: ChoiceEffect {
            challenge_id: "fobos-1".to_string(),
            option: "A".to_string(),
            deltas: vec![MetricDelta::new(Metric::Stability, 30.0)],
            coins: -50,
        },
    });
    let snap = engine.tick();
    assert_eq!(snap.space_coins, 0);
    assert_eq!(snap.telemetry.metrics.stability, 100.0);

    let writes = engine.drain_writes();
    let choice = writes
        .iter()
        .find_map(|w| match &w.payload {
            WritePayload::Choice { index, waypoint, .. } => Some((*index, waypoint.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!(choice, (1, "Fobos".to_string()));

    engine.queue_command(PlayerCommand::ResolveChallenge {
        choice: ChoiceEffect {
            challenge_id: "fobos-1".to_string(),
            option: "A".to_string(),
            deltas: Vec::new(),
            coins: 0,
        },
    });
    assert!(!engine.tick().alerts.is_empty());
}

#[test]
fn test_transfer_validation() {
    let mut engine = briefed(&["Terra", "Marte"], ShipType::NeoEclipse, 42);
    engine.mission_mut().unwrap().space_coins = 100;
    engine.drain_writes();

    for (to_team, amount) in [("Beta", 0), (" alpha ", 10), ("Beta", 500)] {
        engine.queue_command(PlayerCommand::TransferFunds {
            to_team: to_team.to_string(),
            amount,
        });
        let snap = engine.tick();
        assert_eq!(snap.alerts.len(), 1, "{to_team} {amount}");
        assert_eq!(snap.space_coins, 100);
    }

    engine.queue_command(PlayerCommand::TransferFunds {
        to_team: "Beta".to_string(),
        amount: 40,
    });
    let snap = engine.tick();
    assert!(snap.alerts.is_empty());
    assert_eq!(snap.space_coins, 60);
    let writes = engine.drain_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0].payload,
        WritePayload::Transfer {
            to_team: "Beta".to_string(),
            amount: 40,
        }
    );
}

// ---- Persistence ----

#[test]
fn test_launch_and_periodic_saves() {
    let mut engine = launched(&["Terra", "Marte"]);
    let writes = engine.drain_writes();
    assert!(writes
        .iter()
        .any(|w| matches!(&w.payload, WritePayload::GameData { data } if data.launched)));

    for _ in 0..310 {
        engine.tick();
    }
    let writes = engine.drain_writes();
    assert_eq!(writes.len(), 1);
    match &writes[0].payload {
        WritePayload::GameData { data } => {
            assert_eq!(data.team, TEAM);
            assert!(data.distance_remaining_km.is_some());
            assert!(data.travel_secs >= 30.0);
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_write_keys_increase() {
    let mut engine = launched(&["Marte", "Fobos", "Deimos"]);
    let mut writes = engine.drain_writes();
    for _ in 0..400 {
        engine.tick();
    }
    writes.extend(engine.drain_writes());
    assert!(writes.len() >= 2);
    for pair in writes.windows(2) {
        assert!(pair[0].key.seq < pair[1].key.seq);
        assert_eq!(pair[0].key.game_number, 7);
        assert_eq!(pair[0].key.team, TEAM);
    }
}

#[test]
fn test_game_data_round_trips_through_engine() {
    let engine = launched(&["Terra", "Marte"]);
    let data = engine.game_data().unwrap();
    let mut restored = MissionEngine::new(SimConfig::default());
    restored.queue_command(PlayerCommand::LoadGame {
        data: Box::new(data.clone()),
    });
    restored.tick();
    let again = restored.mission().unwrap();
    assert_eq!(again.route.state().names(), data.route);
    assert_eq!(again.telemetry.propulsion, data.telemetry.propulsion);
    assert_eq!(restored.phase(), GamePhase::InFlight);
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = briefed(&["Terra", "Jupiter"], ShipType::Horizonte, 12345);
    let mut engine_b = briefed(&["Terra", "Jupiter"], ShipType::Horizonte, 12345);
    engine_a.queue_command(PlayerCommand::Launch);
    engine_b.queue_command(PlayerCommand::Launch);

    for _ in 0..2000 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let signals = |seed: u64| {
        let mut engine = briefed(&["Terra", "Jupiter"], ShipType::NeoEclipse, seed);
        engine.queue_command(PlayerCommand::Launch);
        run_collecting(&mut engine, 9001)
            .into_iter()
            .filter_map(|e| match e {
                MissionEvent::SosSignalReceived { signal } => {
                    Some((signal.host_body, signal.expires_at_ms - signal.received_at_ms))
                }
                _ => None,
            })
            .collect::<Vec<_>>()
    };
    let a = signals(111);
    let b = signals(222);
    assert_eq!(a.len(), 5);
    assert_eq!(b.len(), 5);
    assert_ne!(a, b, "Different seeds should produce different signals");
}
