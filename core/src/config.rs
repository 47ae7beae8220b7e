//! Engine tuning knobs. Loaded from a JSON file or built with test defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Simulated seconds between snapshot captures.
    #[serde(default = "default_state_interval")]
    pub state_interval: f64,

    /// Ring buffer capacity: how many captures are kept.
    #[serde(default = "default_max_states")]
    pub max_states: usize,

    /// How many captures back a rewind jumps. Absent means the full
    /// window, i.e. `max_states`.
    #[serde(default)]
    pub lookback: Option<usize>,

    /// Rewind charges per session. They never regenerate.
    #[serde(default = "default_max_charges")]
    pub max_charges: u32,

    /// Simulated seconds the gate stays locked after a rewind.
    #[serde(default = "default_cooldown_duration")]
    pub cooldown_duration: f64,

    /// Global time-scale multiplier applied to every real-time delta.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Config with hardcoded values for use in tests.
    pub fn default_test() -> Self {
        Self {
            state_interval: 1.0 / 6.0,
            max_states: 30,
            lookback: None,
            max_charges: 5,
            cooldown_duration: 5.0,
            time_scale: 1.0,
        }
    }

    /// Effective lookback distance.
    pub fn lookback(&self) -> usize {
        self.lookback.unwrap_or(self.max_states)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_interval: default_state_interval(),
            max_states: default_max_states(),
            lookback: None,
            max_charges: default_max_charges(),
            cooldown_duration: default_cooldown_duration(),
            time_scale: default_time_scale(),
        }
    }
}

fn default_state_interval() -> f64 { 1.0 / 6.0 }
fn default_max_states() -> usize { 30 }
fn default_max_charges() -> u32 { 3 }
fn default_cooldown_duration() -> f64 { 5.0 }
fn default_time_scale() -> f64 { 1.0 }
