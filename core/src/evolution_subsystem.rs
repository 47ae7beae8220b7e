use crate::subsystem::{Subsystem, SubsystemRecord};
use crate::types::SimTime;
use serde::{Deserialize, Serialize};

/// The organ catalog: (id, essence cost). Which organ the player picks,
/// and what each one does in play, is decided outside the engine.
pub const ORGAN_CATALOG: &[(&str, f64)] = &[
    ("night_eyes", 10.0),
    ("acid_gland", 15.0),
    ("armored_hide", 20.0),
    ("twin_heart", 35.0),
];

/// Essence accrued per simulated second.
const ESSENCE_RATE: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct EvolutionState {
    essence:  f64,
    unlocked: Vec<String>,
}

/// Evolution catalog progress: which organs are unlocked and how much
/// essence is banked toward the next one.
#[derive(Default)]
pub struct EvolutionSubsystem {
    state: EvolutionState,
}

impl EvolutionSubsystem {
    pub fn essence(&self) -> f64 {
        self.state.essence
    }

    pub fn unlocked(&self) -> &[String] {
        &self.state.unlocked
    }

    /// Spend essence on a catalog organ. Returns false when the organ is
    /// unknown, already unlocked, or unaffordable.
    pub fn try_unlock(&mut self, organ_id: &str) -> bool {
        let Some(&(_, cost)) = ORGAN_CATALOG.iter().find(|(id, _)| *id == organ_id) else {
            return false;
        };
        if self.state.unlocked.iter().any(|o| o == organ_id) || self.state.essence < cost {
            return false;
        }
        self.state.essence -= cost;
        self.state.unlocked.push(organ_id.to_string());
        true
    }
}

impl Subsystem for EvolutionSubsystem {
    fn name(&self) -> &'static str {
        "evolution"
    }

    fn capture(&self) -> SubsystemRecord {
        SubsystemRecord(serde_json::json!(self.state))
    }

    fn restore(&mut self, record: &SubsystemRecord) {
        match serde_json::from_value(record.0.clone()) {
            Ok(state) => self.state = state,
            Err(e) => log::warn!("evolution: unreadable record, keeping current state: {e}"),
        }
    }

    fn advance(&mut self, dt: SimTime) {
        self.state.essence += ESSENCE_RATE * dt;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
