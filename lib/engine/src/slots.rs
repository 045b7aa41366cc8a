//! Last-writer-wins result slots
//!
//! A cell (one pairwise comparison shown to the user) may be requested many
//! times while earlier requests are still running. Each request takes a
//! ticket; only the holder of the newest ticket may fill the cell, so a slow
//! result from a superseded batch can never overwrite a newer one.

use ahash::AHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use simx_core::MeasureResult;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        CellId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        CellId::new(id)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permission to fill one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Default)]
struct Slot {
    latest: u64,
    result: Option<MeasureResult>,
}

#[derive(Default)]
pub struct ResultSlots {
    slots: Mutex<AHashMap<CellId, Slot>>,
}

impl ResultSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// New ticket for `cell`; any earlier ticket becomes stale
    pub fn issue(&self, cell: &CellId) -> Ticket {
        let mut slots = self.slots.lock();
        let slot = slots.entry(cell.clone()).or_default();
        slot.latest += 1;
        Ticket(slot.latest)
    }

    pub fn is_current(&self, cell: &CellId, ticket: Ticket) -> bool {
        self.slots
            .lock()
            .get(cell)
            .is_some_and(|slot| slot.latest == ticket.0)
    }

    /// Fill `cell` if `ticket` is still the newest; returns whether it was stored
    pub fn store(&self, cell: &CellId, ticket: Ticket, result: MeasureResult) -> bool {
        let mut slots = self.slots.lock();
        match slots.get_mut(cell) {
            Some(slot) if slot.latest == ticket.0 => {
                slot.result = Some(result);
                true
            }
            _ => {
                warn!("Dropping stale result for cell {}", cell);
                false
            }
        }
    }

    pub fn get(&self, cell: &CellId) -> Option<MeasureResult> {
        self.slots.lock().get(cell).and_then(|slot| slot.result.clone())
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}
