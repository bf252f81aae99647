use std::collections::{BTreeMap, HashSet};

use mosaic_client::Fragment;

#[derive(Debug, Default)]
/// Public struct `FragmentStore` used across Mosaic components.
///
/// In-memory mapping from sequence index to fragment, plus the set of
/// identifiers that have already produced a fragment. Created empty per
/// solve attempt and mutated only between probe batches, from the solver's
/// own control flow.
pub struct FragmentStore {
    fragments: BTreeMap<u64, Fragment>,
    seen_ids: HashSet<u64>,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `fragment` under its sequence index and marks its identifier
    /// seen. A later fragment for an index already held replaces the earlier
    /// one.
    pub fn insert(&mut self, fragment: Fragment) {
        self.seen_ids.insert(fragment.id);
        self.fragments.insert(fragment.index, fragment);
    }

    /// True once a fragment fetched under `id` has been ingested. Failed
    /// probes are never recorded here, so they stay eligible for re-probing
    /// by a later phase.
    pub fn is_seen(&self, id: u64) -> bool {
        self.seen_ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn max_index(&self) -> Option<u64> {
        self.fragments.keys().next_back().copied()
    }

    /// True iff the store holds a gapless run of indices `0..=max`. Every
    /// key lies in `[0, max]`, so a gapless run means more entries than max.
    pub fn is_complete(&self) -> bool {
        match self.max_index() {
            Some(max) => self.fragments.len() as u64 > max,
            None => false,
        }
    }

    /// Indices missing from `[0, max]`; empty when the store is empty or
    /// complete.
    pub fn missing_indices(&self) -> Vec<u64> {
        let Some(max) = self.max_index() else {
            return Vec::new();
        };
        (0..=max)
            .filter(|index| !self.fragments.contains_key(index))
            .collect()
    }

    /// The payloads joined with single spaces in ascending index order,
    /// available only once the store is complete.
    pub fn assembled_message(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }

        Some(
            self.fragments
                .values()
                .map(|fragment| fragment.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

#[cfg(test)]
mod tests {
    use mosaic_client::Fragment;

    use super::FragmentStore;

    fn fragment(id: u64, index: u64, text: &str) -> Fragment {
        Fragment {
            id,
            index,
            text: text.to_string(),
        }
    }

    #[test]
    fn complete_for_gapless_run_in_any_insertion_order() {
        let orders: [[u64; 3]; 3] = [[0, 1, 2], [2, 0, 1], [1, 2, 0]];
        for order in orders {
            let mut store = FragmentStore::new();
            for index in order {
                store.insert(fragment(index + 10, index, "x"));
            }
            assert!(store.is_complete(), "insertion order {order:?}");
        }
    }

    #[test]
    fn incomplete_when_a_middle_index_is_missing() {
        let mut store = FragmentStore::new();
        store.insert(fragment(10, 0, "a"));
        store.insert(fragment(12, 2, "c"));
        assert!(!store.is_complete());
        assert_eq!(store.missing_indices(), vec![1]);
        assert_eq!(store.assembled_message(), None);
    }

    #[test]
    fn empty_store_is_not_complete() {
        let store = FragmentStore::new();
        assert!(!store.is_complete());
        assert!(store.missing_indices().is_empty());
    }

    #[test]
    fn unit_single_fragment_at_index_zero_is_complete() {
        let mut store = FragmentStore::new();
        store.insert(fragment(7, 0, "alone"));
        assert!(store.is_complete());
        assert_eq!(store.assembled_message().as_deref(), Some("alone"));
    }

    #[test]
    fn assembly_is_deterministic_regardless_of_insertion_order() {
        let mut store = FragmentStore::new();
        store.insert(fragment(30, 2, "C"));
        store.insert(fragment(10, 0, "A"));
        store.insert(fragment(20, 1, "B"));
        assert_eq!(store.assembled_message().as_deref(), Some("A B C"));
    }

    #[test]
    fn regression_reingested_index_keeps_exactly_one_entry() {
        let mut store = FragmentStore::new();
        store.insert(fragment(5, 0, "first"));
        store.insert(fragment(5, 0, "second"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.assembled_message().as_deref(), Some("second"));
    }

    #[test]
    fn only_successful_identifiers_are_seen() {
        let mut store = FragmentStore::new();
        assert!(!store.is_seen(5));
        store.insert(fragment(5, 0, "Hello"));
        assert!(store.is_seen(5));
        assert!(!store.is_seen(6));
    }
}
