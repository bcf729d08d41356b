//! Snapshot-based undo/redo
//!
//! History is two bounded stacks of deep graph copies. Snapshots are
//! structural clones, not serialize/deserialize round trips, and they are
//! taken *before* each semantically significant mutation (including before a
//! drag begins, so undo restores pre-drag positions). Transient visual state
//! such as selection toggling never snapshots; the selection flags that
//! happen to be set at snapshot time are restored as-is.

use std::collections::VecDeque;

use crate::store::GraphStore;
use crate::types::GraphSnapshot;

/// Maximum history depth in either direction
pub const HISTORY_LIMIT: usize = 50;

/// Undo/redo stacks wrapping the graph store
pub struct TemporalStore {
    past: VecDeque<GraphSnapshot>,
    future: VecDeque<GraphSnapshot>,
    limit: usize,
}

impl Default for TemporalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalStore {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// History with a custom depth (tests)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record the current state before a mutation.
    ///
    /// Any redo history is discarded: a new action invalidates it.
    pub fn take_snapshot(&mut self, store: &GraphStore) {
        self.past.push_back(store.snapshot());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back one snapshot; no-op when there is no history
    pub fn undo(&mut self, store: &mut GraphStore) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        self.future.push_front(store.snapshot());
        while self.future.len() > self.limit {
            self.future.pop_back();
        }
        store.restore(previous);
        true
    }

    /// Step forward one snapshot; no-op when there is nothing to redo
    pub fn redo(&mut self, store: &mut GraphStore) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        self.past.push_back(store.snapshot());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        store.restore(next);
        true
    }

    /// Drop all history (new document, successful file load)
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of recorded past states
    pub fn depth(&self) -> usize {
        self.past.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_node;
    use crate::types::NodeDataPatch;

    fn store_with_node(id: &str) -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node(test_node(id));
        store
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut store = store_with_node("a");
        let mut history = TemporalStore::new();

        history.take_snapshot(&store);
        store.add_node(test_node("b"));
        assert_eq!(store.nodes().len(), 2);

        assert!(history.undo(&mut store));
        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.nodes()[0].id, "a");
    }

    #[test]
    fn test_undo_empty_history_is_noop() {
        let mut store = store_with_node("a");
        let mut history = TemporalStore::new();
        assert!(!history.undo(&mut store));
        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn test_undo_redo_inverse_law() {
        let mut store = GraphStore::new();
        let mut history = TemporalStore::new();

        // A sequence of snapshot-guarded mutations
        for i in 0..5 {
            history.take_snapshot(&store);
            store.add_node(test_node(&format!("node_{i}")));
        }
        let final_state = store.snapshot();

        for _ in 0..5 {
            assert!(history.undo(&mut store));
        }
        assert!(store.nodes().is_empty());

        for _ in 0..5 {
            assert!(history.redo(&mut store));
        }
        // Bit-identical to the pre-undo state, selection flags included
        assert_eq!(store.snapshot(), final_state);
    }

    #[test]
    fn test_history_bound_evicts_oldest_first() {
        let mut store = GraphStore::new();
        let mut history = TemporalStore::new();

        for i in 0..60 {
            history.take_snapshot(&store);
            store.add_node(test_node(&format!("node_{i}")));
        }
        assert_eq!(history.depth(), HISTORY_LIMIT);

        // Walk all the way back: the oldest reachable state is the one
        // captured at mutation 10, i.e. 10 nodes.
        while history.undo(&mut store) {}
        assert_eq!(store.nodes().len(), 10);
    }

    #[test]
    fn test_new_action_discards_redo() {
        let mut store = GraphStore::new();
        let mut history = TemporalStore::new();

        history.take_snapshot(&store);
        store.add_node(test_node("a"));
        history.undo(&mut store);
        assert!(history.can_redo());

        // Any new snapshot-guarded mutation empties the redo stack
        history.take_snapshot(&store);
        store.add_node(test_node("b"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_restores_parameter_edit() {
        let mut store = store_with_node("a");
        let mut history = TemporalStore::new();

        history.take_snapshot(&store);
        store.update_node("a", NodeDataPatch::rotation(90));
        assert_eq!(store.node("a").unwrap().data.rotation, 90);

        history.undo(&mut store);
        assert_eq!(store.node("a").unwrap().data.rotation, 0);

        history.redo(&mut store);
        assert_eq!(store.node("a").unwrap().data.rotation, 90);
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut store = GraphStore::new();
        let mut history = TemporalStore::new();

        history.take_snapshot(&store);
        store.add_node(test_node("a"));
        history.undo(&mut store);
        assert!(history.can_redo());

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
