//! Core types for inspire-seminars.
//!
//! This crate holds everything that does not touch the network:
//! - `seminar` for the INSPIRE search API response types
//! - `query` for turning a series name into search parameters
//! - `event` for mapping a seminar record to a calendar event
//! - `ics` for writing those events as an .ics document

pub mod error;
pub mod event;
pub mod ics;
pub mod query;
pub mod seminar;

pub use error::{SeminarError, SeminarResult};
pub use event::CalendarEvent;
pub use query::{Scope, SeminarQuery};
pub use seminar::{SearchResponse, SeminarRecord};
