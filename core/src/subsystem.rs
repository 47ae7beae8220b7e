//! Ancillary subsystem contract and registry.
//!
//! RULE: The engine never interprets a subsystem's record. It stores the
//! value at capture and hands the same value back verbatim at restore.
//! A snapshot naming a subsystem that is no longer registered is skipped
//! with a warning, never a failed restore.

use crate::types::SimTime;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;

/// Opaque-to-the-engine state produced by one subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubsystemRecord(pub serde_json::Value);

/// The contract every ancillary subsystem must fulfill.
pub trait Subsystem {
    /// Unique stable name. The snapshot map key.
    fn name(&self) -> &'static str;

    /// Serialize current state into an engine-opaque record.
    fn capture(&self) -> SubsystemRecord;

    /// Overwrite state from a record this subsystem produced earlier.
    /// An unreadable record is a data-integrity warning, not a fault:
    /// the subsystem keeps its current state.
    fn restore(&mut self, record: &SubsystemRecord);

    /// One cooperative simulation step of `dt` simulated seconds.
    fn advance(&mut self, dt: SimTime);

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}

/// Ordered subsystem registry. Registration order is advance order.
#[derive(Default)]
pub struct SubsystemSet {
    items: Vec<Box<dyn Subsystem>>,
}

impl SubsystemSet {
    /// Register a subsystem. Duplicate names are a configuration error
    /// at startup, not something restore can be left to discover.
    pub fn register(&mut self, subsystem: Box<dyn Subsystem>) {
        assert!(
            self.items.iter().all(|s| s.name() != subsystem.name()),
            "duplicate subsystem name: {}",
            subsystem.name()
        );
        self.items.push(subsystem);
    }

    pub fn advance_all(&mut self, dt: SimTime) {
        for subsystem in self.items.iter_mut() {
            subsystem.advance(dt);
        }
    }

    pub fn capture_all(&self) -> BTreeMap<String, SubsystemRecord> {
        self.items
            .iter()
            .map(|s| (s.name().to_string(), s.capture()))
            .collect()
    }

    /// Dispatch each record to the subsystem registered under its name.
    pub fn restore_all(&mut self, records: &BTreeMap<String, SubsystemRecord>) {
        for (name, record) in records {
            match self.items.iter_mut().find(|s| s.name() == name) {
                Some(subsystem) => subsystem.restore(record),
                None => {
                    log::warn!("snapshot names unregistered subsystem '{name}', skipping");
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Subsystem> {
        self.items
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
