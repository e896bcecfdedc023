//! Pending single-key changes
//!
//! At most one pending value per key. Re-editing a key before the flush
//! replaces its value in place, so only the latest value goes out and the
//! key keeps its original position. Distinct keys flush as separate
//! messages in the order they were first edited.

use crate::params::{ParamKey, ParamValue};

#[derive(Debug, Default)]
pub struct Outbox {
    pending: Vec<(ParamKey, ParamValue)>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as changed to `value`
    pub fn mark(&mut self, key: ParamKey, value: ParamValue) {
        match self.pending.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pending.push((key, value)),
        }
    }

    /// Take every pending change, leaving the outbox empty
    ///
    /// The caller either sends them or drops them; nothing is kept for a
    /// later retry.
    pub fn drain(&mut self) -> Vec<(ParamKey, ParamValue)> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
