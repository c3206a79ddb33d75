//! Response types for the INSPIRE seminar search API.
//!
//! Only the fields needed to build a calendar event are decoded; everything
//! else in the response is ignored.

use serde::{Deserialize, Deserializer};

/// Top-level body of `GET /api/seminars`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits {
    pub hits: Vec<SeminarRecord>,
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeminarRecord {
    /// INSPIRE record id. The API sends it as a string, older dumps as a number.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub metadata: SeminarMetadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeminarMetadata {
    pub start_datetime: String,
    pub end_datetime: String,
    pub title: SeminarTitle,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub inspire_categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeminarTitle {
    pub title: String,
}

/// A speaker, named "Last, First"
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Speaker {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub term: String,
}

impl SeminarRecord {
    pub fn speaker_names(&self) -> impl Iterator<Item = &str> {
        self.metadata.speakers.iter().map(|s| s.name.as_str())
    }

    pub fn category_terms(&self) -> impl Iterator<Item = &str> {
        self.metadata.inspire_categories.iter().map(|c| c.term.as_str())
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
