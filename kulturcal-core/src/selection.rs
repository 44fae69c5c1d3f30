//! Selected-event tracking.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The set of currently selected event ids.
///
/// Ids that stop existing are pruned at the next [`reconcile`]; toggling
/// an id with no live event is allowed and harmless for the same reason.
///
/// [`reconcile`]: SelectionState::reconcile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    ids: HashSet<String>,
}

impl SelectionState {
    /// Flip membership of `id`. Returns whether the id is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop every selected id that is not in `live_ids`.
    pub fn reconcile(&mut self, live_ids: &HashSet<String>) {
        self.ids.retain(|id| live_ids.contains(id));
    }
}
