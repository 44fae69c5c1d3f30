//! Canonical event types.
//!
//! These types represent events in a source-agnostic way. The ingestion
//! adapter converts the search collaborator's loosely-typed records into
//! them, and the rest of the system works exclusively with these.

use serde::{Deserialize, Serialize};

/// A cultural event in the canonical model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// Calendar date, ISO 8601 (YYYY-MM-DD)
    pub date: String,
    /// Start time, 24h HH:mm; empty when the venue listing had none
    #[serde(default)]
    pub time: String,
    pub location: String,
    /// Venue or presenting entity; free text from the search collaborator
    pub organizer: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Citation metadata returned alongside AI-extracted events.
///
/// Displayed to the user as-is, never processed further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingSource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Result of one fetch/ingest cycle: the full replacement event set and
/// the citations that came with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub events: Vec<CalendarEvent>,
    pub sources: Vec<GroundingSource>,
}
