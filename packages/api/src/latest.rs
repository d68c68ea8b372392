//! Stale-response guard for refreshable panel data.
//!
//! A fetch triggered by one filter change is not guaranteed to resolve
//! before the fetch from the next change. [`PanelState`] tags every
//! outgoing request with a monotonically increasing sequence number and
//! discards any completion whose tag is no longer the latest issued, so
//! an out-of-order response can never overwrite fresher data.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// A refreshable slot holding the latest successfully fetched value.
pub struct PanelState<T> {
    issued: AtomicU64,
    slot: Mutex<Applied<T>>,
}

struct Applied<T> {
    tag: u64,
    value: Option<T>,
}

impl<T: Clone> PanelState<T> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: Mutex::new(Applied { tag: 0, value: None }),
        }
    }

    /// Registers a new outgoing request and returns its tag.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Stores a completed response if `tag` is still the latest issued
    /// request. Returns whether the value was applied.
    ///
    /// # Panics
    ///
    /// Panics if the slot mutex is poisoned.
    pub fn complete(&self, tag: u64, value: T) -> bool {
        let mut slot = self.slot.lock().expect("panel slot mutex poisoned");
        if tag != self.issued.load(Ordering::SeqCst) || tag < slot.tag {
            return false;
        }
        slot.tag = tag;
        slot.value = Some(value);
        true
    }

    /// Returns a clone of the latest applied value, if any.
    ///
    /// # Panics
    ///
    /// Panics if the slot mutex is poisoned.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.slot.lock().expect("panel slot mutex poisoned").value.clone()
    }
}

impl<T: Clone> Default for PanelState<T> {
    fn default() -> Self {
        Self::new()
    }
}
