//! Parameter store
//!
//! Client-side view of the device's parameters. Two writers converge here:
//! optimistic local writes (user intent) and inbound snapshots (device
//! truth). Whichever arrives last wins; local writes are never rolled back,
//! they are simply overwritten by the next inbound snapshot.

use crate::params::{ParamKey, ParamPatch, ParamValue, ParameterSet};

/// Parameter store with the four documented operations
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: ParameterSet,
}

impl ParameterStore {
    /// Store holding the default snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Overlay a device snapshot; unspecified keys keep their value
    pub fn merge_inbound(&mut self, patch: &ParamPatch) {
        self.params.merge(patch);
    }

    /// Optimistic single-key write, applied before any network round-trip
    pub fn apply_local(&mut self, key: ParamKey, value: ParamValue) {
        self.params.set(key, value);
    }

    /// Optimistic multi-key write
    pub fn apply_local_batch(&mut self, patch: &ParamPatch) {
        self.params.merge(patch);
    }

    pub fn blend_time_ms(&self) -> u64 {
        self.params.blend_time_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inbound_overwrites_optimistic_write() {
        let mut store = ParameterStore::new();
        store.apply_local(ParamKey::Brightness, ParamValue::Int(200));
        assert_eq!(store.params().get(ParamKey::Brightness), &ParamValue::Int(200));

        store.merge_inbound(&ParamPatch::new().with(ParamKey::Brightness, 180));
        assert_eq!(store.params().get(ParamKey::Brightness), &ParamValue::Int(180));
    }

    #[test]
    fn test_local_after_inbound_wins() {
        let mut store = ParameterStore::new();
        store.merge_inbound(&ParamPatch::new().with(ParamKey::Bpm, 90));
        store.apply_local(ParamKey::Bpm, ParamValue::Int(100));
        assert_eq!(store.params().get(ParamKey::Bpm), &ParamValue::Int(100));
    }

    #[test]
    fn test_batch_applies_all_keys() {
        let mut store = ParameterStore::new();
        store.apply_local_batch(
            &ParamPatch::new()
                .with(ParamKey::Bpm, 60)
                .with(ParamKey::Brightness, 100),
        );
        assert_eq!(store.params().get(ParamKey::Bpm), &ParamValue::Int(60));
        assert_eq!(store.params().get(ParamKey::Brightness), &ParamValue::Int(100));
    }

    fn arb_key() -> impl Strategy<Value = ParamKey> {
        (0..ParamKey::COUNT).prop_map(|i| ParamKey::ALL[i])
    }

    fn arb_value() -> impl Strategy<Value = ParamValue> {
        prop_oneof![
            any::<i64>().prop_map(ParamValue::Int),
            (-1.0e6f64..1.0e6).prop_map(ParamValue::Float),
            "[A-Z]{1,8}".prop_map(ParamValue::Text),
        ]
    }

    fn arb_patch() -> impl Strategy<Value = ParamPatch> {
        proptest::collection::vec((arb_key(), arb_value()), 0..8)
            .prop_map(|entries| entries.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_merge_sets_present_and_keeps_absent(seed in arb_patch(), patch in arb_patch()) {
            let mut store = ParameterStore::new();
            store.merge_inbound(&seed);
            let before = store.params().clone();

            store.merge_inbound(&patch);

            for key in ParamKey::ALL {
                match patch.get(key) {
                    Some(v) => prop_assert_eq!(store.params().get(key), v),
                    None => prop_assert_eq!(store.params().get(key), before.get(key)),
                }
            }
        }
    }
}
