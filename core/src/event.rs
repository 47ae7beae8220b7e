//! Engine outcomes surfaced to the caller as data.
//!
//! RULE: The engine performs no I/O. Sounds, notifications and HUD flashes
//! belong to the input/render layer, which consumes these events.

use crate::gate::RejectReason;
use crate::types::{SimTime, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    SnapshotCaptured {
        tick: Tick,
        sim_time: SimTime,
        /// Captured records, the primary actor included.
        record_count: usize,
    },
    RewindPerformed {
        from: SimTime,
        to: SimTime,
        charges_left: u32,
    },
    RewindRejected {
        reason: RejectReason,
    },
    SessionReset,
}
