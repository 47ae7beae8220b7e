//! sim-runner: headless runner for the Ouro rewind engine.
//!
//! Usage:
//!   sim-runner --seed 12345 --ticks 3600
//!   sim-runner --seed 12345 --ticks 3600 --rewind-at 600,1800
//!   sim-runner --seed 12345 --config engine.json --ipc-mode

use anyhow::Result;
use ouro_core::{
    boss::Boss,
    command::PlayerCommand,
    config::EngineConfig,
    daylight_subsystem::{DayPhase, DaylightSubsystem},
    engine::{RewindEngine, SimContext},
    event::EngineEvent,
    evolution_subsystem::EvolutionSubsystem,
    gate::GateState,
    hazard::Hazard,
    pickup::Pickup,
    player::Player,
    portal::Portal,
    rng::WorldRng,
    roamer::Roamer,
    season_subsystem::{Season, SeasonSubsystem},
    world::World,
};
use std::env;
use std::io::{self, BufRead, Write};

/// One engine step of real time. 60 frames per second.
const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Player { command: PlayerCommand },
    Reset,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    tick: u64,
    sim_time: f64,
    paused: bool,
    score: i64,
    entity_count: usize,
    charges: u32,
    cooldown_fraction: f64,
    gate_state: GateState,
    day_phase: Option<DayPhase>,
    season: Option<Season>,
}

#[derive(serde::Serialize)]
struct IpcResponse {
    state: UiState,
    events: Vec<EngineEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 3600u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let rewind_at: Vec<u64> = args
        .windows(2)
        .find(|w| w[0] == "--rewind-at")
        .map(|w| {
            w[1].split(',')
                .filter_map(|t| t.parse().ok())
                .collect()
        })
        .unwrap_or_default();

    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => EngineConfig::load(&w[1])?,
        None => EngineConfig::default(),
    };

    if !ipc_mode {
        println!("Ouro sim-runner");
        println!("  started:   {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  interval:  {:.4}s x {} states", config.state_interval, config.max_states);
        println!();
    }

    let mut ctx = seed_world(seed);
    ctx.clock.set_time_scale(config.time_scale);
    ctx.clock.resume();
    let mut engine = RewindEngine::new(config);

    if ipc_mode {
        run_ipc_loop(&mut engine, &mut ctx, seed)?;
    } else {
        run_scripted(&mut engine, &mut ctx, ticks, &rewind_at)?;
    }

    Ok(())
}

/// Scatter a deterministic demo world from the master seed.
fn seed_world(seed: u64) -> SimContext {
    let mut rng = WorldRng::new(seed);
    let player = Player::spawn(rng.entity_id(), 0.0, 0.0);
    let mut world = World::new(player);

    for _ in 0..12 {
        let (x, y) = (rng.range_f64(-200.0, 200.0), rng.range_f64(-200.0, 200.0));
        let nutrition = rng.range_f64(4.0, 12.0);
        world.spawn(Box::new(Pickup::spawn(rng.entity_id(), x, y, nutrition, 120.0)));
    }
    for _ in 0..6 {
        let (x, y) = (rng.range_f64(-250.0, 250.0), rng.range_f64(-250.0, 250.0));
        let heading = rng.range_f64(0.0, std::f64::consts::TAU);
        let aggressive = rng.chance(0.3);
        world.spawn(Box::new(Roamer::spawn(rng.entity_id(), x, y, heading, aggressive)));
    }
    for _ in 0..3 {
        let (x, y) = (rng.range_f64(-150.0, 150.0), rng.range_f64(-150.0, 150.0));
        world.spawn(Box::new(Hazard::spawn(rng.entity_id(), x, y, 12.0, 30.0)));
    }
    for _ in 0..2 {
        let entry = (rng.range_f64(-200.0, 200.0), rng.range_f64(-200.0, 200.0));
        let exit = (rng.range_f64(-200.0, 200.0), rng.range_f64(-200.0, 200.0));
        world.spawn(Box::new(Portal::spawn(rng.entity_id(), entry, exit)));
    }
    if rng.chance(0.5) {
        let (x, y) = (rng.range_f64(-100.0, 100.0), rng.range_f64(-100.0, 100.0));
        world.spawn(Box::new(Boss::spawn(rng.entity_id(), x, y, 500.0)));
    }

    let mut ctx = SimContext::new(world);
    ctx.subsystems.register(Box::new(DaylightSubsystem::default()));
    ctx.subsystems.register(Box::new(SeasonSubsystem::default()));
    ctx.subsystems.register(Box::new(EvolutionSubsystem::default()));
    ctx
}

fn run_scripted(
    engine: &mut RewindEngine,
    ctx: &mut SimContext,
    ticks: u64,
    rewind_at: &[u64],
) -> Result<()> {
    let mut captures = 0u64;
    let mut rewinds_done = 0u64;
    let mut rewinds_rejected = 0u64;

    for tick in 1..=ticks {
        // Stand-in for the gameplay layer: steady progress that a rewind
        // then visibly takes back. Seasons scale how well foraging goes.
        if tick % 300 == 0 {
            let forage = subsystem_ref::<SeasonSubsystem>(ctx, "season")
                .map(|s| s.season().forage_modifier())
                .unwrap_or(1.0);
            ctx.world.score += (10.0 * forage).round() as i64;
            ctx.world.player.eat(5.0 * forage);
        }

        for event in engine.tick(ctx, FRAME_DT) {
            if matches!(event, EngineEvent::SnapshotCaptured { .. }) {
                captures += 1;
            }
        }

        if rewind_at.contains(&tick) {
            for event in engine.apply_command(ctx, &PlayerCommand::Rewind)? {
                match event {
                    EngineEvent::RewindPerformed { from, to, charges_left } => {
                        rewinds_done += 1;
                        println!(
                            "tick {tick}: rewound t={from:.2} -> t={to:.2} ({charges_left} charges left)"
                        );
                    }
                    EngineEvent::RewindRejected { reason } => {
                        rewinds_rejected += 1;
                        println!("tick {tick}: rewind rejected ({reason:?})");
                    }
                    _ => {}
                }
            }
        }
    }

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  ticks run:        {ticks}");
    println!("  sim time:         {:.2}s", ctx.clock.sim_time);
    println!("  captures:         {captures} ({} retained)", engine.history().len());
    println!("  rewinds:          {rewinds_done} performed, {rewinds_rejected} rejected");
    println!("  charges left:     {}", engine.charges_remaining());
    println!("  score:            {}", ctx.world.score);
    println!("  player energy:    {:.1}", ctx.world.player.energy);
    println!("  body segments:    {}", ctx.world.player.segments.len());
    println!("  live entities:    {}", ctx.world.entity_count());
    if let Some(daylight) = subsystem_ref::<DaylightSubsystem>(ctx, "daylight") {
        println!("  day phase:        {:?} (day {})", daylight.phase(), daylight.elapsed_days());
    }
    if let Some(season) = subsystem_ref::<SeasonSubsystem>(ctx, "season") {
        println!("  season:           {:?} (year {})", season.season(), season.year());
    }
    if let Some(evolution) = subsystem_ref::<EvolutionSubsystem>(ctx, "evolution") {
        println!("  essence banked:   {:.1}", evolution.essence());
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut RewindEngine, ctx: &mut SimContext, seed: u64) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buffer = String::new();
    let mut handle = stdin.lock();

    loop {
        buffer.clear();
        if handle.read_line(&mut buffer)? == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let mut events = Vec::new();
        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Tick { count } => {
                if ctx.clock.paused {
                    log::warn!("tick requested while paused, ignoring");
                } else {
                    for _ in 0..count {
                        events.extend(engine.tick(ctx, FRAME_DT));
                    }
                }
            }
            IpcCommand::Player { command } => {
                events.extend(engine.apply_command(ctx, &command)?);
            }
            IpcCommand::Reset => {
                // Session boundary: fresh world, fresh clock, refilled gate.
                let time_scale = ctx.clock.time_scale;
                *ctx = seed_world(seed);
                ctx.clock.set_time_scale(time_scale);
                ctx.clock.resume();
                events.push(engine.reset());
            }
        }

        let response = IpcResponse {
            state: build_ui_state(engine, ctx),
            events,
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &RewindEngine, ctx: &SimContext) -> UiState {
    UiState {
        tick: ctx.clock.tick,
        sim_time: ctx.clock.sim_time,
        paused: ctx.clock.paused,
        score: ctx.world.score,
        entity_count: ctx.world.entity_count(),
        charges: engine.charges_remaining(),
        cooldown_fraction: engine.cooldown_fraction(),
        gate_state: engine.gate_state(),
        day_phase: subsystem_ref::<DaylightSubsystem>(ctx, "daylight").map(|d| d.phase()),
        season: subsystem_ref::<SeasonSubsystem>(ctx, "season").map(|s| s.season()),
    }
}

fn subsystem_ref<'a, T: 'static>(ctx: &'a SimContext, name: &str) -> Option<&'a T> {
    ctx.subsystems
        .get(name)
        .and_then(|s| s.as_any().downcast_ref::<T>())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
