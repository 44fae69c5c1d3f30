//! Normalization of raw AI-extracted records into canonical events.

use std::collections::HashMap;

use serde::Deserialize;

use crate::event::CalendarEvent;
use crate::style::text_hash;

/// A loosely-typed event record as returned by the search collaborator.
///
/// The collaborator is asked to always fill every field, but responses
/// are not trusted: anything may be missing or empty, and ingestion must
/// not fail on that.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Convert one batch of raw records into canonical events.
///
/// Records without a title or date are unusable and dropped. Empty
/// optional strings are normalized to `None`.
pub fn ingest(raw: Vec<RawEvent>) -> Vec<CalendarEvent> {
    let mut events = Vec::with_capacity(raw.len());
    let mut seen: HashMap<String, u32> = HashMap::new();

    for record in raw {
        if record.title.is_empty() || record.date.is_empty() {
            continue;
        }

        let base = event_id(&record);
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let id = if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        };

        events.push(CalendarEvent {
            id,
            title: record.title,
            date: record.date,
            time: record.time,
            location: record.location,
            organizer: record.organizer,
            url: record.url.filter(|u| !u.is_empty()),
            description: record.description.filter(|d| !d.is_empty()),
        });
    }

    events
}

/// Content-derived event id: a slug of the organizer plus a hash of the
/// fields that identify the listing. The same listing keeps the same id
/// across refreshes, so selections survive a re-sync that returns the
/// same data.
fn event_id(record: &RawEvent) -> String {
    let organizer = slug::slugify(&record.organizer);
    let organizer = if organizer.is_empty() {
        "event".to_string()
    } else {
        organizer
    };

    let key = format!(
        "{}\u{1f}{}\u{1f}{}\u{1f}{}",
        record.organizer, record.title, record.date, record.time
    );
    format!("{organizer}-{:08x}", text_hash(&key).unsigned_abs())
}
