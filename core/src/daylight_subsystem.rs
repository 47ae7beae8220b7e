use crate::subsystem::{Subsystem, SubsystemRecord};
use crate::types::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl DayPhase {
    /// Simulated seconds this phase lasts.
    fn duration(self) -> f64 {
        match self {
            Self::Dawn => 15.0,
            Self::Day => 90.0,
            Self::Dusk => 15.0,
            Self::Night => 60.0,
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Dawn => Self::Day,
            Self::Day => Self::Dusk,
            Self::Dusk => Self::Night,
            Self::Night => Self::Dawn,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DaylightState {
    phase:        DayPhase,
    phase_left:   f64,
    elapsed_days: u32,
}

impl Default for DaylightState {
    fn default() -> Self {
        Self {
            phase: DayPhase::Dawn,
            phase_left: DayPhase::Dawn.duration(),
            elapsed_days: 0,
        }
    }
}

/// Day/night cycle. The render layer reads the phase for lighting;
/// the engine only ever snapshots and restores it.
#[derive(Default)]
pub struct DaylightSubsystem {
    state: DaylightState,
}

impl DaylightSubsystem {
    pub fn phase(&self) -> DayPhase {
        self.state.phase
    }

    pub fn elapsed_days(&self) -> u32 {
        self.state.elapsed_days
    }
}

impl Subsystem for DaylightSubsystem {
    fn name(&self) -> &'static str {
        "daylight"
    }

    fn capture(&self) -> SubsystemRecord {
        SubsystemRecord(serde_json::json!(self.state))
    }

    fn restore(&mut self, record: &SubsystemRecord) {
        match serde_json::from_value(record.0.clone()) {
            Ok(state) => self.state = state,
            Err(e) => log::warn!("daylight: unreadable record, keeping current state: {e}"),
        }
    }

    fn advance(&mut self, dt: SimTime) {
        self.state.phase_left -= dt;
        while self.state.phase_left <= 0.0 {
            if self.state.phase == DayPhase::Night {
                self.state.elapsed_days += 1;
            }
            self.state.phase = self.state.phase.next();
            self.state.phase_left += self.state.phase.duration();
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
