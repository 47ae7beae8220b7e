//! Capture cadence runs on simulated time, measured on the scaled clock:
//! a time-scale multiplier changes how often captures land in real time,
//! never how far apart they are in simulated time.

use ouro_core::{
    config::EngineConfig,
    engine::{RewindEngine, SimContext},
    event::EngineEvent,
    player::Player,
    rng::WorldRng,
    world::World,
};

const DT: f64 = 0.0625;

fn build_ctx(time_scale: f64) -> SimContext {
    let mut rng = WorldRng::new(42);
    let mut player = Player::spawn(rng.entity_id(), 0.0, 0.0);
    player.speed = 0.0;
    let mut ctx = SimContext::new(World::new(player));
    ctx.clock.set_time_scale(time_scale);
    ctx.clock.resume();
    ctx
}

fn config() -> EngineConfig {
    EngineConfig {
        state_interval: 0.25,
        max_states: 64,
        lookback: None,
        max_charges: 3,
        cooldown_duration: 5.0,
        time_scale: 1.0,
    }
}

fn run_and_count_captures(time_scale: f64, ticks: u32) -> (usize, Vec<f64>) {
    let mut ctx = build_ctx(time_scale);
    let mut engine = RewindEngine::new(config());

    let mut captures = 0;
    for _ in 0..ticks {
        for event in engine.tick(&mut ctx, DT) {
            if matches!(event, EngineEvent::SnapshotCaptured { .. }) {
                captures += 1;
            }
        }
    }
    let times = engine.history().iter().map(|s| s.captured_at).collect();
    (captures, times)
}

#[test]
fn doubling_time_scale_doubles_captures_per_real_second() {
    let (normal, _) = run_and_count_captures(1.0, 64);
    let (doubled, _) = run_and_count_captures(2.0, 64);
    assert_eq!(normal, 16);
    assert_eq!(doubled, 32);
}

#[test]
fn simulated_spacing_between_captures_is_the_interval_at_any_scale() {
    for scale in [0.5, 1.0, 2.0, 4.0] {
        let (_, times) = run_and_count_captures(scale, 64);
        assert!(times.len() >= 2, "scale {scale} produced too few captures");
        for pair in times.windows(2) {
            assert_eq!(
                pair[1] - pair[0],
                0.25,
                "capture spacing drifted at scale {scale}"
            );
        }
    }
}

#[test]
fn cooldown_also_runs_on_simulated_time() {
    // At double speed a 5s cooldown serves out in half the real time.
    let mut ctx = build_ctx(2.0);
    let mut engine = RewindEngine::new(config());

    for _ in 0..4 {
        engine.tick(&mut ctx, DT);
    }
    engine.request_rollback(&mut ctx).expect("no error");
    assert!(engine.cooldown_fraction() > 0.99);

    // 40 real ticks at scale 2 = 5.0 simulated seconds.
    for _ in 0..40 {
        engine.tick(&mut ctx, DT);
    }
    assert_eq!(engine.cooldown_remaining(), 0.0);
}

#[test]
fn capture_cadence_reanchors_after_a_rewind() {
    let mut ctx = build_ctx(1.0);
    let mut engine = RewindEngine::new(config());

    for _ in 0..32 {
        engine.tick(&mut ctx, DT);
    }
    engine.request_rollback(&mut ctx).expect("no error");
    let rewound_to = ctx.clock.sim_time;

    // The next capture lands exactly one interval after the reinstated
    // moment, not on the pre-rewind schedule.
    let mut first_capture_at = None;
    for _ in 0..8 {
        for event in engine.tick(&mut ctx, DT) {
            if let EngineEvent::SnapshotCaptured { sim_time, .. } = event {
                first_capture_at.get_or_insert(sim_time);
            }
        }
    }
    assert_eq!(first_capture_at, Some(rewound_to + 0.25));
}
