//! The rewind resource gate: finite charges, a cooldown, typed rejections.
//!
//! RULE: Charges never regenerate. Zero charges is terminal for the
//! session; only reset() (a new session) refills them. A rejected request
//! mutates nothing and may be retried for free.

use crate::types::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Ready,
    CoolingDown,
    Exhausted,
}

/// Why a rewind request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No charges left. Terminal until session reset.
    Exhausted,
    /// Charges remain but the cooldown is still counting down.
    CoolingDown,
    /// Nothing captured yet to rewind to.
    NoHistory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewindGate {
    charges:            u32,
    max_charges:        u32,
    cooldown_remaining: SimTime,
    cooldown_duration:  SimTime,
}

impl RewindGate {
    pub fn new(max_charges: u32, cooldown_duration: SimTime) -> Self {
        Self {
            charges: max_charges,
            max_charges,
            cooldown_remaining: 0.0,
            cooldown_duration,
        }
    }

    /// Count the cooldown down by one step of scaled simulated time.
    pub fn tick(&mut self, dt: SimTime) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Authorize or reject, committing nothing. The charge is spent by
    /// commit(), only after the restore has actually happened.
    pub fn check(&self, history_empty: bool) -> Result<(), RejectReason> {
        if self.charges == 0 {
            return Err(RejectReason::Exhausted);
        }
        if self.cooldown_remaining > 0.0 {
            return Err(RejectReason::CoolingDown);
        }
        if history_empty {
            return Err(RejectReason::NoHistory);
        }
        Ok(())
    }

    /// Spend one charge and arm the cooldown. Call only after check()
    /// passed and the restore completed.
    pub fn commit(&mut self) {
        debug_assert!(self.charges > 0, "commit() without a charge");
        self.charges = self.charges.saturating_sub(1);
        self.cooldown_remaining = self.cooldown_duration;
    }

    pub fn state(&self) -> GateState {
        if self.charges == 0 {
            GateState::Exhausted
        } else if self.cooldown_remaining > 0.0 {
            GateState::CoolingDown
        } else {
            GateState::Ready
        }
    }

    pub fn charges_remaining(&self) -> u32 {
        self.charges
    }

    pub fn cooldown_remaining(&self) -> SimTime {
        self.cooldown_remaining
    }

    /// Fraction of the cooldown still to serve, in [0, 1]. HUD display.
    pub fn cooldown_fraction(&self) -> f64 {
        if self.cooldown_duration <= 0.0 {
            0.0
        } else {
            (self.cooldown_remaining / self.cooldown_duration).clamp(0.0, 1.0)
        }
    }

    /// Back to a fresh session: full charges, no cooldown.
    pub fn reset(&mut self) {
        self.charges = self.max_charges;
        self.cooldown_remaining = 0.0;
    }
}
