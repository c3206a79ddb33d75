//! ICS document generation.
//!
//! Two renderings are supported: the plain line format INSPIRE exports have
//! always used, and a strict RFC 5545 rendering built with `icalendar`.

mod generate;
mod write;

pub use generate::{generate_calendar, OutputStyle, PRODID};
pub use write::{write_calendar, write_calendar_file};
