//! iCalendar text generation for selected events.
//!
//! This is the one bit-exact external contract in the system: consuming
//! calendar applications parse the output per RFC 5545 text conventions.
//! Field values are emitted verbatim except for the literal `\n` escape
//! inside DESCRIPTION, so the encoder writes lines directly instead of
//! going through a full iCalendar serializer that would re-escape them.

use chrono::{DateTime, Utc};

use crate::event::CalendarEvent;

/// Assumed start time when a listing has none. Curtain time at most of
/// the configured venues.
pub const DEFAULT_START_TIME: &str = "19:30";

/// MIME type for the exported file.
pub const EXPORT_MIME: &str = "text/calendar;charset=utf-8";

/// Fixed duration heuristic; venue listings rarely carry an end time.
const EVENT_DURATION_HOURS: u32 = 2;

const PRODID: &str = "-//kulturcal//Cultural Event Calendar//EN";

/// Serialize events to iCalendar text, CRLF line endings throughout.
///
/// Returns `None` for an empty selection; the caller suppresses the
/// export action entirely in that case.
///
/// `now` is stamped into every DTSTAMP and passed in for determinism.
pub fn generate_ics(events: &[CalendarEvent], now: DateTime<Utc>) -> Option<String> {
    if events.is_empty() {
        return None;
    }

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    let dtstamp = now.format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        let date_part = event.date.replace('-', "");
        let time = if event.time.is_empty() {
            DEFAULT_START_TIME
        } else {
            event.time.as_str()
        };
        let time_part = format!("{}00", time.replace(':', ""));

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@cultural-calendar", event.id));
        lines.push(format!("DTSTAMP:{dtstamp}"));
        lines.push(format!("DTSTART:{date_part}T{time_part}"));
        lines.push(format!(
            "DTEND:{date_part}T{}{}",
            end_hour(time),
            &time_part[2..]
        ));
        lines.push(format!("SUMMARY:{}", event.title));
        lines.push(format!("LOCATION:{}", event.location));
        lines.push(format!(
            "DESCRIPTION:Organizer: {}\\nURL: {}",
            event.organizer,
            event.url.as_deref().unwrap_or("N/A")
        ));
        if let Some(url) = event.url.as_deref() {
            lines.push(format!("URL:{url}"));
        }
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());

    Some(lines.join("\r\n"))
}

/// Download filename for an export performed at `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("selected-events-{}.ics", now.format("%Y-%m-%d"))
}

// End times wrap within the same date: a 23:00 start ends at 01:00 on the
// same DTEND date, with no day increment. Known quirk of the exported
// contract, kept as documented behavior.
fn end_hour(time: &str) -> String {
    let start_hour: u32 = time
        .split(':')
        .next()
        .and_then(|h| h.parse().ok())
        .unwrap_or(19);
    format!("{:02}", (start_hour + EVENT_DURATION_HOURS) % 24)
}
