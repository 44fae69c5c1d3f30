//! iCalendar export.

mod generate;

pub use generate::{export_filename, generate_ics, DEFAULT_START_TIME, EXPORT_MIME};
