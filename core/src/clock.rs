//! Simulation clock: owns simulated time, the time-scale multiplier, and pause.

use crate::types::{SimTime, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub sim_time:   SimTime,
    pub tick:       Tick,
    pub time_scale: f64,
    pub paused:     bool,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            sim_time: 0.0,
            tick: 0,
            time_scale: 1.0,
            paused: true,
        }
    }

    /// Advance by one frame of real time. Returns the scaled simulated delta.
    /// Panics if called while paused. Callers must check.
    pub fn advance(&mut self, real_dt: f64) -> SimTime {
        assert!(!self.paused, "advance() called on paused clock");
        let dt = real_dt * self.time_scale;
        self.sim_time += dt;
        self.tick += 1;
        dt
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    /// Jump simulated time back to a captured instant. The tick counter
    /// keeps counting forward: ticks number engine steps, not seconds.
    pub fn rewind_to(&mut self, at: SimTime) {
        self.sim_time = at;
    }
}

impl Default for SimClock {
    fn default() -> Self { Self::new() }
}
