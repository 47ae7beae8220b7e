//! A boss. Holds position and escalates through stages on an enrage timer;
//! when and where one spawns is the wave layer's decision.

use crate::entity::{Entity, EntityKind};
use crate::error::{EngineError, SimResult};
use crate::record::EntityRecord;
use crate::types::{EntityId, SimTime};
use std::any::Any;

/// Simulated seconds between stage escalations.
const ENRAGE_PERIOD: f64 = 45.0;

const MAX_STAGE: u8 = 3;

#[derive(Debug, Clone, Default)]
pub struct Boss {
    pub id:          EntityId,
    pub x:           f64,
    pub y:           f64,
    pub hp:          f64,
    pub stage:       u8,
    pub enrage_left: f64,
    pub segments:    Vec<(f64, f64)>,
}

impl Boss {
    pub fn spawn(id: EntityId, x: f64, y: f64, hp: f64) -> Self {
        // Body parts fan out behind the head.
        let segments = (1..=4).map(|i| (x - 8.0 * i as f64, y)).collect();
        Self {
            id,
            x,
            y,
            hp,
            stage: 0,
            enrage_left: ENRAGE_PERIOD,
            segments,
        }
    }
}

impl Entity for Boss {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Boss
    }

    fn capture(&self) -> EntityRecord {
        EntityRecord::Boss {
            id: self.id,
            x: self.x,
            y: self.y,
            hp: self.hp,
            stage: self.stage,
            enrage_left: self.enrage_left,
            segments: self.segments.clone(),
        }
    }

    fn restore(&mut self, record: &EntityRecord) -> SimResult<()> {
        match record {
            EntityRecord::Boss {
                id,
                x,
                y,
                hp,
                stage,
                enrage_left,
                segments,
            } => {
                self.id = *id;
                self.x = *x;
                self.y = *y;
                self.hp = *hp;
                self.stage = *stage;
                self.enrage_left = *enrage_left;
                self.segments = segments.clone();
                Ok(())
            }
            other => Err(EngineError::RecordMismatch {
                expected: EntityKind::Boss,
                found: other.kind(),
            }),
        }
    }

    fn advance(&mut self, dt: SimTime) {
        if self.stage >= MAX_STAGE {
            return;
        }
        self.enrage_left -= dt;
        if self.enrage_left <= 0.0 {
            self.stage += 1;
            self.enrage_left = ENRAGE_PERIOD;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
