//! Restore fidelity: after a rewind the live world's simulation-relevant
//! state is exactly what the assembler captured. Nothing extra survives,
//! nothing is missing, and failure paths mutate nothing.

use ouro_core::{
    config::EngineConfig,
    daylight_subsystem::DaylightSubsystem,
    engine::{restore_snapshot, RewindEngine, RollbackOutcome, SimContext},
    entity::EntityKind,
    error::EngineError,
    evolution_subsystem::EvolutionSubsystem,
    hazard::Hazard,
    pickup::Pickup,
    player::Player,
    record::EntityRecord,
    rng::WorldRng,
    roamer::Roamer,
    season_subsystem::SeasonSubsystem,
    snapshot::assemble,
    subsystem::{Subsystem, SubsystemRecord},
    world::World,
};

const DT: f64 = 0.0625;

/// A mixed-kind world: player at (120, 80) with 42 energy, plus a
/// roamer, a pickup, and a hazard.
fn build_ctx(seed: u64) -> SimContext {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = WorldRng::new(seed);
    let mut player = Player::spawn(rng.entity_id(), 120.0, 80.0);
    player.speed = 0.0;
    player.energy = 42.0;

    let mut world = World::new(player);
    let mut roamer = Roamer::spawn(rng.entity_id(), 10.0, 20.0, 0.0, false);
    roamer.speed = 0.0;
    world.spawn(Box::new(roamer));
    world.spawn(Box::new(Pickup::spawn(rng.entity_id(), 30.0, 40.0, 8.0, 60.0)));
    world.spawn(Box::new(Hazard::spawn(rng.entity_id(), 50.0, 60.0, 10.0, 25.0)));

    let mut ctx = SimContext::new(world);
    ctx.subsystems.register(Box::new(DaylightSubsystem::default()));
    ctx.subsystems.register(Box::new(SeasonSubsystem::default()));
    ctx.subsystems.register(Box::new(EvolutionSubsystem::default()));
    ctx.clock.resume();
    ctx
}

fn config() -> EngineConfig {
    EngineConfig {
        state_interval: 0.25,
        max_states: 8,
        lookback: None,
        max_charges: 5,
        cooldown_duration: 0.0,
        time_scale: 1.0,
    }
}

#[test]
fn rewind_reinstates_the_captured_world_exactly() {
    let mut ctx = build_ctx(100);
    let mut engine = RewindEngine::new(config());

    // Capture once, then diverge hard: score, growth, a new spawn.
    for _ in 0..4 {
        engine.tick(&mut ctx, DT);
    }
    let target = engine.history().oldest().expect("one capture").clone();

    ctx.world.score = 999;
    ctx.world.player.eat(50.0);
    ctx.world.player.acquire_organ("twin_heart");
    let mut rng = WorldRng::new(7);
    ctx.world
        .spawn(Box::new(Roamer::spawn(rng.entity_id(), 0.0, 0.0, 1.0, true)));
    // 20 more ticks: 6 captures total, within the 8-entry ring, so the
    // lookback still reaches the very first capture.
    for _ in 0..20 {
        engine.tick(&mut ctx, DT);
    }
    assert_ne!(ctx.world.entity_count(), 3);

    match engine.request_rollback(&mut ctx).expect("no error") {
        RollbackOutcome::Performed { rewound_to, .. } => {
            assert_eq!(rewound_to, target.captured_at)
        }
        other => panic!("expected Performed, got {other:?}"),
    }

    // The world the capture saw, down to the literal values.
    assert_eq!(ctx.world.player.x, 120.0);
    assert_eq!(ctx.world.player.y, 80.0);
    assert_eq!(ctx.world.player.energy, 42.0);
    assert_eq!(ctx.world.score, target.score);
    assert_eq!(ctx.clock.sim_time, target.captured_at);

    // Exactly the captured entities, by kind and field values.
    assert_eq!(ctx.world.entity_count(), 3);
    let now = assemble(&ctx);
    assert_eq!(now.player, target.player);
    assert_eq!(now.entities, target.entities);
    assert_eq!(now.score, target.score);
    assert_eq!(now.subsystems, target.subsystems);
    assert_eq!(now.captured_at, target.captured_at);
}

#[test]
fn restored_entities_keep_their_stable_ids() {
    let mut ctx = build_ctx(101);
    let mut engine = RewindEngine::new(config());

    for _ in 0..4 {
        engine.tick(&mut ctx, DT);
    }
    let ids: Vec<_> = ctx.world.entities.iter().map(|e| e.id()).collect();
    let player_id = ctx.world.player.id;

    for _ in 0..40 {
        engine.tick(&mut ctx, DT);
    }
    engine.request_rollback(&mut ctx).expect("no error");

    assert_eq!(ctx.world.player.id, player_id);
    for id in ids {
        assert!(
            ctx.world.find(id).is_some(),
            "entity {id} lost its id across the rewind"
        );
    }
}

#[test]
fn restore_dispatches_on_kind_not_position_in_the_list() {
    let mut ctx = build_ctx(102);
    let mut engine = RewindEngine::new(config());

    for _ in 0..4 {
        engine.tick(&mut ctx, DT);
    }
    for _ in 0..20 {
        engine.tick(&mut ctx, DT);
    }
    engine.request_rollback(&mut ctx).expect("no error");

    let kinds: Vec<EntityKind> = ctx.world.entities.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![EntityKind::Roamer, EntityKind::Pickup, EntityKind::Hazard]
    );
    // Each rebuilt object is the concrete type its tag names.
    assert!(ctx.world.entities[0]
        .as_any()
        .downcast_ref::<Roamer>()
        .is_some());
    assert!(ctx.world.entities[1]
        .as_any()
        .downcast_ref::<Pickup>()
        .is_some());
    assert!(ctx.world.entities[2]
        .as_any()
        .downcast_ref::<Hazard>()
        .is_some());
}

#[test]
fn unknown_subsystem_names_are_skipped_not_fatal() {
    let mut ctx = build_ctx(103);
    let mut snapshot = assemble(&ctx);
    snapshot.subsystems.insert(
        "weather".to_string(),
        SubsystemRecord(serde_json::json!({ "wind": 12.0 })),
    );

    restore_snapshot(&mut ctx, &snapshot).expect("unknown subsystem must not fail the restore");
    assert_eq!(ctx.world.entity_count(), 3);
}

#[test]
fn corrupt_primary_record_aborts_before_any_mutation() {
    let mut ctx = build_ctx(104);
    let mut snapshot = assemble(&ctx);

    // A snapshot whose primary record is not a player is corrupt.
    snapshot.player = ctx.world.entities[0].capture();

    let entity_count = ctx.world.entity_count();
    let player_energy = ctx.world.player.energy;
    let score = ctx.world.score;

    let err = restore_snapshot(&mut ctx, &snapshot).expect_err("corrupt snapshot must fail");
    assert!(matches!(err, EngineError::CorruptSnapshot { .. }));

    // Fail before mutating, never half-apply.
    assert_eq!(ctx.world.entity_count(), entity_count);
    assert_eq!(ctx.world.player.energy, player_energy);
    assert_eq!(ctx.world.score, score);
}

#[test]
fn non_finite_position_is_corrupt() {
    let mut ctx = build_ctx(105);
    let mut snapshot = assemble(&ctx);
    if let EntityRecord::Player { x, .. } = &mut snapshot.player {
        *x = f64::NAN;
    }

    let err = restore_snapshot(&mut ctx, &snapshot).expect_err("NaN position must fail");
    assert!(matches!(err, EngineError::CorruptSnapshot { .. }));
    assert_eq!(ctx.world.player.x, 120.0);
}

#[test]
fn unlocked_organs_travel_through_capture_and_restore() {
    let mut evolution = EvolutionSubsystem::default();
    evolution.advance(30.0); // 15 essence banked
    assert!(evolution.try_unlock("night_eyes"));
    assert!(!evolution.try_unlock("night_eyes"), "double unlock");
    assert!(!evolution.try_unlock("twin_heart"), "unaffordable");
    let record = evolution.capture();

    let mut later = EvolutionSubsystem::default();
    later.advance(100.0);
    later.restore(&record);
    assert_eq!(later.unlocked(), &["night_eyes".to_string()]);
    assert_eq!(later.essence(), 5.0);
}

#[test]
fn subsystem_phase_state_rewinds_with_the_world() {
    let mut ctx = build_ctx(106);
    let mut engine = RewindEngine::new(config());

    for _ in 0..4 {
        engine.tick(&mut ctx, DT);
    }
    let essence_at_capture = ctx
        .subsystems
        .get("evolution")
        .and_then(|s| s.as_any().downcast_ref::<EvolutionSubsystem>())
        .expect("evolution registered")
        .essence();

    for _ in 0..20 {
        engine.tick(&mut ctx, DT);
    }
    engine.request_rollback(&mut ctx).expect("no error");

    let essence_now = ctx
        .subsystems
        .get("evolution")
        .and_then(|s| s.as_any().downcast_ref::<EvolutionSubsystem>())
        .expect("evolution registered")
        .essence();
    assert_eq!(essence_now, essence_at_capture);
}
