use std::collections::VecDeque;

use super::model::SafeZoneEvent;

/// Maximum number of events the ledger retains.
pub const HISTORY_CAPACITY: usize = 100;

/// Append-only, capacity-bounded record of processed events.
///
/// Oldest entries are evicted first; iteration order is chronological
/// (oldest first). The ledger is the single source of truth for statistics.
#[derive(Debug, Clone, Default)]
pub struct EventLedger {
    events: VecDeque<SafeZoneEvent>,
}

impl EventLedger {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Rebuild from a persisted snapshot. The capacity bound is re-applied
    /// to whatever was stored, keeping the most recent entries.
    pub fn from_events(events: Vec<SafeZoneEvent>) -> Self {
        let mut ledger = Self::new();
        for event in events {
            ledger.push(event);
        }
        ledger
    }

    pub fn push(&mut self, event: SafeZoneEvent) {
        if self.events.len() == HISTORY_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Chronological snapshot (oldest first).
    pub fn to_vec(&self) -> Vec<SafeZoneEvent> {
        self.events.iter().cloned().collect()
    }
}
