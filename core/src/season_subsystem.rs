use crate::subsystem::{Subsystem, SubsystemRecord};
use crate::types::SimTime;
use serde::{Deserialize, Serialize};

/// Simulated seconds per season.
pub const SEASON_LENGTH: f64 = 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    fn next(self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Autumn,
            Self::Autumn => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }

    /// How plentiful morsels spawn this season. Read by the (external)
    /// spawning layer.
    pub fn forage_modifier(self) -> f64 {
        match self {
            Self::Spring => 1.2,
            Self::Summer => 1.0,
            Self::Autumn => 1.1,
            Self::Winter => 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeasonState {
    season:      Season,
    season_left: f64,
    year:        u32,
}

impl Default for SeasonState {
    fn default() -> Self {
        Self {
            season: Season::Spring,
            season_left: SEASON_LENGTH,
            year: 0,
        }
    }
}

/// The slow season cycle layered under the day/night cycle.
#[derive(Default)]
pub struct SeasonSubsystem {
    state: SeasonState,
}

impl SeasonSubsystem {
    pub fn season(&self) -> Season {
        self.state.season
    }

    pub fn year(&self) -> u32 {
        self.state.year
    }
}

impl Subsystem for SeasonSubsystem {
    fn name(&self) -> &'static str {
        "season"
    }

    fn capture(&self) -> SubsystemRecord {
        SubsystemRecord(serde_json::json!(self.state))
    }

    fn restore(&mut self, record: &SubsystemRecord) {
        match serde_json::from_value(record.0.clone()) {
            Ok(state) => self.state = state,
            Err(e) => log::warn!("season: unreadable record, keeping current state: {e}"),
        }
    }

    fn advance(&mut self, dt: SimTime) {
        self.state.season_left -= dt;
        while self.state.season_left <= 0.0 {
            if self.state.season == Season::Winter {
                self.state.year += 1;
            }
            self.state.season = self.state.season.next();
            self.state.season_left += SEASON_LENGTH;
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
