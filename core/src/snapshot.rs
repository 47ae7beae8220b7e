//! Snapshot assembly and the bounded history ring.
//!
//! A snapshot is immutable once assembled; it dies by ring eviction or
//! session reset, never by mutation. The ring holds the most recent
//! `max_states` captures; a rewind jumps `lookback` captures back, or to
//! the oldest capture when history is shorter than that.

use crate::engine::SimContext;
use crate::entity::{Entity, EntityKind};
use crate::error::{EngineError, SimResult};
use crate::record::EntityRecord;
use crate::subsystem::SubsystemRecord;
use crate::types::{Score, SimTime, Tick};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub captured_at: SimTime,
    pub tick: Tick,
    pub score: Score,
    pub player: EntityRecord,
    pub entities: Vec<EntityRecord>,
    pub subsystems: BTreeMap<String, SubsystemRecord>,
}

impl WorldSnapshot {
    /// Structural check, run before a restore discards anything.
    /// Fail here and the live world has not been touched.
    pub fn validate(&self) -> SimResult<()> {
        if self.player.kind() != EntityKind::Player {
            return Err(EngineError::CorruptSnapshot {
                reason: format!(
                    "primary record is {:?}, not a player",
                    self.player.kind()
                ),
            });
        }
        if !self.captured_at.is_finite() || self.captured_at < 0.0 {
            return Err(EngineError::CorruptSnapshot {
                reason: format!("capture time {} is not a valid instant", self.captured_at),
            });
        }
        for record in std::iter::once(&self.player).chain(self.entities.iter()) {
            if !record.is_structurally_sound() {
                return Err(EngineError::CorruptSnapshot {
                    reason: format!(
                        "{:?} record {} has a non-finite position",
                        record.kind(),
                        record.id()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Capture the whole simulation-relevant world: the primary actor, every
/// other live object in iteration order, then every subsystem. Pure read;
/// the live world is not touched.
pub fn assemble(ctx: &SimContext) -> WorldSnapshot {
    WorldSnapshot {
        captured_at: ctx.clock.sim_time,
        tick: ctx.clock.tick,
        score: ctx.world.score,
        player: ctx.world.player.capture(),
        entities: ctx.world.entities.iter().map(|e| e.capture()).collect(),
        subsystems: ctx.subsystems.capture_all(),
    }
}

/// Bounded FIFO of snapshots in capture order.
pub struct SnapshotHistory {
    entries: VecDeque<WorldSnapshot>,
    capacity: usize,
}

impl SnapshotHistory {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be at least 1");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest entry first when at capacity.
    pub fn push(&mut self, snapshot: WorldSnapshot) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// The capture `n` intervals ago, or the oldest available when history
    /// is shorter. None only when history is empty.
    pub fn latest_within_lookback(&self, n: usize) -> Option<&WorldSnapshot> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(self.entries.len().saturating_sub(n))
    }

    pub fn latest(&self) -> Option<&WorldSnapshot> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&WorldSnapshot> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldSnapshot> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
