//! The rewind engine: snapshot cadence, the resource gate, and the
//! restore orchestrator, driven one cooperative tick at a time.
//!
//! RULES:
//!   - One tick advances clock, subsystems, world, gate, then captures.
//!     Capture happens at the tick boundary, never mid-update.
//!   - The engine exclusively owns the history ring and the gate. Other
//!     components request a rewind or read charge state; nothing more.
//!   - An authorized rewind runs to completion inside the requesting tick.
//!   - A rejected or failed request leaves the simulation untouched, the
//!     charge unspent.

use crate::clock::SimClock;
use crate::command::PlayerCommand;
use crate::config::EngineConfig;
use crate::entity::{rebuild, Entity};
use crate::error::SimResult;
use crate::event::EngineEvent;
use crate::gate::{GateState, RejectReason, RewindGate};
use crate::player::Player;
use crate::snapshot::{assemble, SnapshotHistory, WorldSnapshot};
use crate::subsystem::SubsystemSet;
use crate::types::SimTime;
use crate::world::World;

/// Everything the engine operates on, passed explicitly by reference.
/// There is no ambient session singleton.
pub struct SimContext {
    pub clock: SimClock,
    pub world: World,
    pub subsystems: SubsystemSet,
}

impl SimContext {
    pub fn new(world: World) -> Self {
        Self {
            clock: SimClock::new(),
            world,
            subsystems: SubsystemSet::default(),
        }
    }
}

/// Outcome of a rewind request, surfaced to the caller as data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RollbackOutcome {
    Performed {
        rewound_to: SimTime,
        charges_left: u32,
    },
    Rejected(RejectReason),
}

pub struct RewindEngine {
    config: EngineConfig,
    history: SnapshotHistory,
    gate: RewindGate,
    next_capture_at: SimTime,
}

impl RewindEngine {
    pub fn new(config: EngineConfig) -> Self {
        let history = SnapshotHistory::new(config.max_states);
        let gate = RewindGate::new(config.max_charges, config.cooldown_duration);
        let next_capture_at = config.state_interval;
        Self {
            config,
            history,
            gate,
            next_capture_at,
        }
    }

    /// Advance one tick of `real_dt` real seconds. The clock scales it;
    /// everything downstream, the capture cadence and the cooldown
    /// included, runs on simulated time.
    pub fn tick(&mut self, ctx: &mut SimContext, real_dt: f64) -> Vec<EngineEvent> {
        let dt = ctx.clock.advance(real_dt);
        ctx.subsystems.advance_all(dt);
        ctx.world.advance(dt);
        self.gate.tick(dt);

        let mut events = Vec::new();
        if ctx.clock.sim_time >= self.next_capture_at {
            let snapshot = assemble(ctx);
            log::debug!(
                "tick={} captured snapshot at t={:.3} ({} records)",
                snapshot.tick,
                snapshot.captured_at,
                snapshot.entities.len() + 1
            );
            events.push(EngineEvent::SnapshotCaptured {
                tick: snapshot.tick,
                sim_time: snapshot.captured_at,
                record_count: snapshot.entities.len() + 1,
            });
            self.next_capture_at = snapshot.captured_at + self.config.state_interval;
            self.history.push(snapshot);
        }
        events
    }

    /// The rewind trigger. Checks the gate, picks the lookback target,
    /// restores, and only then burns the charge. A rejection is a typed
    /// outcome, not an error; the simulation keeps running either way.
    pub fn request_rollback(&mut self, ctx: &mut SimContext) -> SimResult<RollbackOutcome> {
        if let Err(reason) = self.gate.check(self.history.is_empty()) {
            log::debug!("rewind rejected: {reason:?}");
            return Ok(RollbackOutcome::Rejected(reason));
        }

        let (from, rewound_to) = {
            let snapshot = match self.history.latest_within_lookback(self.config.lookback()) {
                Some(s) => s,
                None => return Ok(RollbackOutcome::Rejected(RejectReason::NoHistory)),
            };
            let from = ctx.clock.sim_time;
            restore_snapshot(ctx, snapshot)?;
            (from, snapshot.captured_at)
        };

        // The restore is confirmed; only now does the charge burn.
        self.gate.commit();
        self.next_capture_at = rewound_to + self.config.state_interval;
        log::debug!(
            "rewound t={from:.3} -> t={rewound_to:.3}, {} charges left",
            self.gate.charges_remaining()
        );
        Ok(RollbackOutcome::Performed {
            rewound_to,
            charges_left: self.gate.charges_remaining(),
        })
    }

    /// Decode one player command into clock or rewind operations.
    pub fn apply_command(
        &mut self,
        ctx: &mut SimContext,
        command: &PlayerCommand,
    ) -> SimResult<Vec<EngineEvent>> {
        match command {
            PlayerCommand::Pause => {
                ctx.clock.pause();
                Ok(Vec::new())
            }
            PlayerCommand::Resume => {
                ctx.clock.resume();
                Ok(Vec::new())
            }
            PlayerCommand::SetTimeScale { scale } => {
                ctx.clock.set_time_scale(*scale);
                Ok(Vec::new())
            }
            PlayerCommand::Rewind => {
                let from = ctx.clock.sim_time;
                match self.request_rollback(ctx)? {
                    RollbackOutcome::Performed {
                        rewound_to,
                        charges_left,
                    } => Ok(vec![EngineEvent::RewindPerformed {
                        from,
                        to: rewound_to,
                        charges_left,
                    }]),
                    RollbackOutcome::Rejected(reason) => {
                        Ok(vec![EngineEvent::RewindRejected { reason }])
                    }
                }
            }
        }
    }

    /// Start a new session: history cleared, gate refilled. Never called
    /// mid-session.
    pub fn reset(&mut self) -> EngineEvent {
        self.history.clear();
        self.gate.reset();
        self.next_capture_at = self.config.state_interval;
        log::debug!("session reset: history cleared, gate refilled");
        EngineEvent::SessionReset
    }

    // ── Read-only query surface for the HUD ───────────────────────────

    pub fn charges_remaining(&self) -> u32 {
        self.gate.charges_remaining()
    }

    pub fn cooldown_fraction(&self) -> f64 {
        self.gate.cooldown_fraction()
    }

    pub fn cooldown_remaining(&self) -> SimTime {
        self.gate.cooldown_remaining()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// The restore orchestrator. Rebuilds the entire live world from one
/// snapshot's records; no pre-restore object, reference or identity
/// survives. Fails before mutating: every record must reconstruct before
/// the live collection is discarded.
pub fn restore_snapshot(ctx: &mut SimContext, snapshot: &WorldSnapshot) -> SimResult<()> {
    snapshot.validate()?;

    let mut player = Player::default();
    player.restore(&snapshot.player)?;

    let mut entities = Vec::with_capacity(snapshot.entities.len());
    for record in &snapshot.entities {
        entities.push(rebuild(record)?);
    }

    // Point of no return: discard the whole live collection and install
    // the reconstructed one.
    ctx.world.player = player;
    ctx.world.entities = entities;
    ctx.world.score = snapshot.score;
    ctx.subsystems.restore_all(&snapshot.subsystems);
    ctx.clock.rewind_to(snapshot.captured_at);
    Ok(())
}
