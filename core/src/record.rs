//! Plain-data records: the serialization contract's wire format.
//!
//! RULE: A record is self-sufficient. Reconstructing an instance from one
//! requires no other live state. Kinds are a closed set; reconstruction
//! dispatches on the tag enum, never on a free-form type string.

use crate::entity::EntityKind;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// One captured entity, tagged by kind. Flat primitive fields only:
/// position, orientation, scalar resources, and the variable-length
/// sub-lists (body segments, acquired organ ids).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityRecord {
    Player {
        id: EntityId,
        x: f64,
        y: f64,
        heading: f64,
        speed: f64,
        energy: f64,
        segments: Vec<(f64, f64)>,
        organs: Vec<String>,
    },
    Roamer {
        id: EntityId,
        x: f64,
        y: f64,
        heading: f64,
        speed: f64,
        hp: f64,
        aggressive: bool,
    },
    Pickup {
        id: EntityId,
        x: f64,
        y: f64,
        nutrition: f64,
        shelf_left: f64,
    },
    Portal {
        id: EntityId,
        x: f64,
        y: f64,
        exit_x: f64,
        exit_y: f64,
        open: bool,
        cycle_left: f64,
    },
    Hazard {
        id: EntityId,
        x: f64,
        y: f64,
        radius: f64,
        damage: f64,
        armed: bool,
        rearm_left: f64,
    },
    Boss {
        id: EntityId,
        x: f64,
        y: f64,
        hp: f64,
        stage: u8,
        enrage_left: f64,
        segments: Vec<(f64, f64)>,
    },
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Player { .. } => EntityKind::Player,
            Self::Roamer { .. } => EntityKind::Roamer,
            Self::Pickup { .. } => EntityKind::Pickup,
            Self::Portal { .. } => EntityKind::Portal,
            Self::Hazard { .. } => EntityKind::Hazard,
            Self::Boss { .. } => EntityKind::Boss,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Self::Player { id, .. }
            | Self::Roamer { id, .. }
            | Self::Pickup { id, .. }
            | Self::Portal { id, .. }
            | Self::Hazard { id, .. }
            | Self::Boss { id, .. } => *id,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match self {
            Self::Player { x, y, .. }
            | Self::Roamer { x, y, .. }
            | Self::Pickup { x, y, .. }
            | Self::Portal { x, y, .. }
            | Self::Hazard { x, y, .. }
            | Self::Boss { x, y, .. } => (*x, *y),
        }
    }

    /// Structural sanity of the scalar fields every kind carries.
    /// Restore refuses the whole snapshot before mutating if this fails.
    pub fn is_structurally_sound(&self) -> bool {
        let (x, y) = self.position();
        x.is_finite() && y.is_finite()
    }
}
