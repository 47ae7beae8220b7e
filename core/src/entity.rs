//! The serialization contract every simulated object implements.
//!
//! RULE: capture() is a pure read. restore() is applied to a freshly
//! constructed blank instance and must leave it behaviorally
//! indistinguishable from the instance that produced the record.
//! Pure visual debris has no history and is never captured.

use crate::error::SimResult;
use crate::record::EntityRecord;
use crate::types::{EntityId, SimTime};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// The closed set of simulated-object kinds.
/// NEVER remove or reorder entries. Records serialized under one build
/// must reconstruct under the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Roamer,
    Pickup,
    Portal,
    Hazard,
    Boss,
}

impl EntityKind {
    /// Constructor registry: a blank instance of the matching kind, ready
    /// for restore(). Adding a kind without extending this match is a
    /// build error, not a runtime fault.
    pub fn construct(self) -> Box<dyn Entity> {
        match self {
            Self::Player => Box::new(crate::player::Player::default()),
            Self::Roamer => Box::new(crate::roamer::Roamer::default()),
            Self::Pickup => Box::new(crate::pickup::Pickup::default()),
            Self::Portal => Box::new(crate::portal::Portal::default()),
            Self::Hazard => Box::new(crate::hazard::Hazard::default()),
            Self::Boss => Box::new(crate::boss::Boss::default()),
        }
    }
}

/// The contract every simulated object must fulfill.
pub trait Entity {
    fn id(&self) -> EntityId;
    fn kind(&self) -> EntityKind;

    /// Pure read of current state into a plain record. Must include every
    /// field that affects future simulation, and nothing rendering-only.
    fn capture(&self) -> EntityRecord;

    /// Mutate a blank instance to match `record`. A record of the wrong
    /// kind is a contract violation and returns RecordMismatch.
    fn restore(&mut self, record: &EntityRecord) -> SimResult<()>;

    /// One cooperative simulation step of `dt` simulated seconds.
    fn advance(&mut self, dt: SimTime);

    /// Whether the object should leave the world at the end of the step.
    fn expired(&self) -> bool {
        false
    }

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}

/// Construct-then-restore in one step: how the orchestrator turns a
/// captured record back into a live object.
pub fn rebuild(record: &EntityRecord) -> SimResult<Box<dyn Entity>> {
    let mut entity = record.kind().construct();
    entity.restore(record)?;
    Ok(entity)
}
