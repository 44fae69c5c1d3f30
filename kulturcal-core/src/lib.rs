//! Core types and logic for the kulturcal ecosystem.
//!
//! This crate provides everything the CLI needs short of IO:
//! - `source`: the user-configured source registry with a pluggable persistence port
//! - `style`: deterministic organizer-to-style resolution
//! - `ingest`: normalization of AI-extracted event records
//! - `selection` and `state`: selection tracking and the canonical event set
//! - `ics`: iCalendar export

pub mod error;
pub mod event;
pub mod ics;
pub mod ingest;
pub mod selection;
pub mod source;
pub mod state;
pub mod style;

// Re-export the common types at crate root for convenience
pub use error::{KulturError, KulturResult};
pub use event::{CalendarEvent, FetchOutcome, GroundingSource};
