//! Search parameters for the INSPIRE seminar API.

use url::Url;

use crate::error::{SeminarError, SeminarResult};

/// Seminar search endpoint
pub const DEFAULT_API_URL: &str = "https://inspirehep.net/api/seminars";

/// Maximum number of hits requested per series. Anything past this is dropped.
pub const PAGE_SIZE: u32 = 500;

/// Which seminars of a series to fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Only seminars that have not happened yet
    #[default]
    Upcoming,
    /// The full history, capped at PAGE_SIZE
    All,
}

impl Scope {
    pub fn from_all_flag(all: bool) -> Self {
        if all {
            Scope::All
        } else {
            Scope::Upcoming
        }
    }

    /// Value of the `start_date` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Upcoming => "upcoming",
            Scope::All => "all",
        }
    }
}

/// A validated search for one seminar series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeminarQuery {
    series: String,
    scope: Scope,
}

impl SeminarQuery {
    /// Build a query for `series`.
    ///
    /// The name is embedded verbatim inside a quoted phrase, so names that
    /// would break out of the quotes are rejected instead of forwarded.
    pub fn new(series: impl Into<String>, scope: Scope) -> SeminarResult<Self> {
        let series = series.into();

        if series.is_empty() {
            return Err(SeminarError::InvalidSeriesName {
                name: series,
                reason: "name is empty",
            });
        }
        if series.contains('"') {
            return Err(SeminarError::InvalidSeriesName {
                name: series,
                reason: "double quotes cannot be embedded in the search phrase",
            });
        }

        Ok(SeminarQuery { series, scope })
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The `q` parameter: `series.name:"<name>"`
    pub fn search_phrase(&self) -> String {
        format!("series.name:\"{}\"", self.series)
    }

    /// Query parameters in the order they are sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_date", self.scope.as_str().to_string()),
            ("size", PAGE_SIZE.to_string()),
            ("q", self.search_phrase()),
        ]
    }

    /// Full request URL against `base` (normally DEFAULT_API_URL).
    pub fn url(&self, base: &str) -> SeminarResult<Url> {
        Ok(Url::parse_with_params(base, self.params())?)
    }
}
