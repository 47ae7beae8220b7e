use serde::{Deserialize, Serialize};

/// All player-issued commands the engine layer understands.
/// The input layer that produces them is out of scope; it only sees the
/// typed outcome of each command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Clock control ─────────────────────────────
    Pause,
    Resume,
    SetTimeScale { scale: f64 },

    // ── The rewind trigger ────────────────────────
    Rewind,
}
