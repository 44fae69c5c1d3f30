//! Canonical calendar state: events, citations, selection, refresh fencing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, FetchOutcome, GroundingSource};
use crate::selection::SelectionState;

/// The full state a fetch cycle operates on.
///
/// Every successful refresh replaces the event set wholesale; there is no
/// merge or diff between cycles. The selection is reconciled in the same
/// step, so events and selection are never observed inconsistent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarState {
    pub events: Vec<CalendarEvent>,
    pub grounding_sources: Vec<GroundingSource>,
    pub selection: SelectionState,
    /// Monotonic refresh counter. An outcome tagged with a superseded
    /// generation is discarded instead of applied last-write-wins.
    generation: u64,
}

impl CalendarState {
    /// Start a refresh and return its generation token. Any refresh
    /// started later invalidates this token.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Replace the canonical event set with a refresh outcome.
    ///
    /// Returns `false` when `generation` is stale, in which case nothing
    /// changes.
    pub fn apply_refresh(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if generation != self.generation {
            return false;
        }

        let live: HashSet<String> = outcome.events.iter().map(|e| e.id.clone()).collect();
        self.events = outcome.events;
        self.grounding_sources = outcome.sources;
        self.selection.reconcile(&live);
        true
    }

    /// Empty the calendar. Used when no sources are active.
    pub fn clear(&mut self) {
        self.events.clear();
        self.grounding_sources.clear();
        self.selection.clear();
    }

    pub fn event(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Selected events, in canonical event order.
    pub fn selected_events(&self) -> Vec<CalendarEvent> {
        self.events
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("Event {id}"),
            date: "2026-09-01".to_string(),
            time: "19:30".to_string(),
            location: "Hall".to_string(),
            organizer: "Venue".to_string(),
            url: None,
            description: None,
        }
    }

    fn outcome(ids: &[&str]) -> FetchOutcome {
        FetchOutcome {
            events: ids.iter().map(|id| event(id)).collect(),
            sources: vec![],
        }
    }

    #[test]
    fn test_refresh_replaces_events_and_reconciles_selection() {
        let mut state = CalendarState::default();
        let generation = state.begin_refresh();
        assert!(state.apply_refresh(generation, outcome(&["a", "b", "c"])));

        state.selection.toggle("a");
        state.selection.toggle("b");
        state.selection.toggle("c");

        let generation = state.begin_refresh();
        assert!(state.apply_refresh(generation, outcome(&["b", "c", "d"])));

        assert_eq!(state.events.len(), 3);
        assert_eq!(state.selection.len(), 2);
        assert!(state.selection.contains("b"));
        assert!(state.selection.contains("c"));
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut state = CalendarState::default();
        let first = state.begin_refresh();
        let second = state.begin_refresh();

        // The slower first fetch lands after the second one started
        assert!(!state.apply_refresh(first, outcome(&["stale"])));
        assert!(state.events.is_empty());

        assert!(state.apply_refresh(second, outcome(&["fresh"])));
        assert_eq!(state.events[0].id, "fresh");
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut state = CalendarState::default();
        let generation = state.begin_refresh();
        state.apply_refresh(generation, outcome(&["a"]));
        state.selection.toggle("a");

        state.clear();
        assert!(state.events.is_empty());
        assert!(state.grounding_sources.is_empty());
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_selected_events_follow_canonical_order() {
        let mut state = CalendarState::default();
        let generation = state.begin_refresh();
        state.apply_refresh(generation, outcome(&["a", "b", "c"]));
        state.selection.toggle("c");
        state.selection.toggle("a");

        let selected = state.selected_events();
        let ids: Vec<_> = selected.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
