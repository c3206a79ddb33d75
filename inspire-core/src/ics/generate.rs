//! Calendar document rendering.

use chrono::Utc;
use icalendar::{Calendar, Component, Property};

use crate::event::{format_timestamp, CalendarEvent};

/// Product identifier written into every document
pub const PRODID: &str = "inspirehep/seminars";

/// How the document is laid out on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// One `NAME:value` per line, LF endings, no folding and no escaping
    #[default]
    Plain,
    /// CRLF endings, folded and escaped, with DTSTAMP on every event
    Rfc5545,
}

/// Render all events into one VCALENDAR, keeping their order.
pub fn generate_calendar(events: &[CalendarEvent], style: OutputStyle) -> String {
    match style {
        OutputStyle::Plain => generate_plain(events),
        OutputStyle::Rfc5545 => generate_rfc5545(events),
    }
}

fn generate_plain(events: &[CalendarEvent]) -> String {
    let mut out = String::new();

    push_line(&mut out, "BEGIN", "VCALENDAR");
    push_line(&mut out, "VERSION", "2.0");
    push_line(&mut out, "CALSCALE", "GREGORIAN");
    push_line(&mut out, "PRODID", PRODID);

    for event in events {
        push_line(&mut out, "BEGIN", "VEVENT");
        push_line(&mut out, "DTSTART", &event.dtstart());
        push_line(&mut out, "DTEND", &event.dtend());
        push_line(&mut out, "UID", &event.uid);
        push_line(&mut out, "SUMMARY", &event.summary);
        push_line(&mut out, "URL", &event.url);
        push_line(&mut out, "CATEGORIES", &event.categories.join(","));
        push_line(&mut out, "END", "VEVENT");
    }

    push_line(&mut out, "END", "VCALENDAR");
    out
}

fn push_line(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push(':');
    out.push_str(value);
    out.push('\n');
}

fn generate_rfc5545(events: &[CalendarEvent]) -> String {
    let mut cal = Calendar::new();
    let dtstamp = format_timestamp(&Utc::now());

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid);
        ics_event.summary(&event.summary);
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.add_property("DTSTART", event.dtstart());
        ics_event.add_property("DTEND", event.dtend());
        ics_event.add_property("URL", &event.url);
        // One property per term: a joined value would have its commas escaped
        for term in &event.categories {
            ics_event.append_multi_property(Property::new("CATEGORIES", term));
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();
    rewrite_prodid(&cal.to_string())
}

/// icalendar always writes its own PRODID
fn rewrite_prodid(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }

    result
}
