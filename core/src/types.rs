//! Shared primitive types used across the entire simulation.

/// A simulation tick counter. One tick = one engine step.
/// Ticks only ever count forward; a rewind moves simulated time, not ticks.
pub type Tick = u64;

/// Simulated time in seconds, as accumulated by the scaled clock.
pub type SimTime = f64;

/// The running score. Rewinds verbatim with a snapshot.
pub type Score = i64;

/// A stable, unique identifier for any entity in the simulation.
/// Ids survive a rewind: a restored entity keeps the id it was captured
/// with, so external components re-resolve by id, never by reference.
pub type EntityId = uuid::Uuid;
