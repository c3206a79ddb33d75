//! Mapping seminar records to calendar events.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

use crate::error::{SeminarError, SeminarResult};
use crate::seminar::SeminarRecord;

/// Prefix for every UID we emit
pub const UID_PREFIX: &str = "inspirehep-seminar-";

/// Public page of a seminar, the record id is appended
pub const SEMINAR_PAGE_URL: &str = "https://inspirehep.net/seminars/";

/// ICS UTC date-time layout
const ICS_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// One VEVENT, derived from a single seminar record
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub url: String,
    pub categories: Vec<String>,
}

impl CalendarEvent {
    pub fn from_record(record: &SeminarRecord) -> SeminarResult<Self> {
        let metadata = &record.metadata;

        Ok(CalendarEvent {
            uid: format!("{}{}", UID_PREFIX, record.id),
            start: parse_timestamp(&metadata.start_datetime)?,
            end: parse_timestamp(&metadata.end_datetime)?,
            summary: generate_summary(record.speaker_names(), &metadata.title.title),
            url: format!("{}{}", SEMINAR_PAGE_URL, record.id),
            categories: record.category_terms().map(String::from).collect(),
        })
    }

    pub fn dtstart(&self) -> String {
        format_timestamp(&self.start)
    }

    pub fn dtend(&self) -> String {
        format_timestamp(&self.end)
    }
}

impl TryFrom<&SeminarRecord> for CalendarEvent {
    type Error = SeminarError;

    fn try_from(record: &SeminarRecord) -> SeminarResult<Self> {
        CalendarEvent::from_record(record)
    }
}

/// Parse an API timestamp, truncated to whole seconds.
///
/// INSPIRE sends naive date-times that are already UTC, usually with a
/// fractional part (`2024-03-05T14:00:00.000000`). They are stamped UTC as-is;
/// no timezone arithmetic is done, so strings carrying an offset are rejected.
pub fn parse_timestamp(s: &str) -> SeminarResult<DateTime<Utc>> {
    // %.f also matches when there is no fractional part
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().trunc_subsecs(0))
        .map_err(|_| SeminarError::InvalidTimestamp(s.to_string()))
}

/// Format as `YYYYMMDDTHHMMSSZ`
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(ICS_DATETIME_FORMAT).to_string()
}

/// "First Last, First Last — Title"
pub fn generate_summary<'a>(speakers: impl IntoIterator<Item = &'a str>, title: &str) -> String {
    let names = speakers
        .into_iter()
        .map(display_name)
        .collect::<Vec<_>>()
        .join(", ");

    format!("{} \u{2014} {}", names, title)
}

/// "Last, First" -> "First Last". Names without ", " pass through.
fn display_name(name: &str) -> String {
    name.rsplit(", ").collect::<Vec<_>>().join(" ")
}
