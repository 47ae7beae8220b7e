//! The live world: the primary actor plus every other simulated object.

use crate::entity::Entity;
use crate::player::Player;
use crate::types::{EntityId, Score, SimTime};

pub struct World {
    pub player: Player,
    pub entities: Vec<Box<dyn Entity>>,
    pub score: Score,
}

impl World {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            entities: Vec::new(),
            score: 0,
        }
    }

    pub fn spawn(&mut self, entity: Box<dyn Entity>) {
        self.entities.push(entity);
    }

    /// One cooperative step: the player first, then every other object in
    /// iteration order. Expired objects leave at the end of the step.
    pub fn advance(&mut self, dt: SimTime) {
        self.player.advance(dt);
        for entity in self.entities.iter_mut() {
            entity.advance(dt);
        }
        self.entities.retain(|e| !e.expired());
    }

    /// Re-resolve an object by its stable id. The only supported way to
    /// track an object across a rewind; references never survive one.
    pub fn find(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities
            .iter()
            .find(|e| e.id() == id)
            .map(|e| e.as_ref())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
