//! INSPIRE seminar search client.

use anyhow::{Context, Result};
use inspire_core::{SearchResponse, SeminarQuery, SeminarRecord};
use url::Url;

const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Anything that can answer a seminar query.
pub trait SeminarSource {
    /// Fetch the hits for `query`. `on_url` sees the request URL as soon as
    /// the server has answered, before the answer is checked.
    fn fetch(&self, query: &SeminarQuery, on_url: &dyn Fn(&Url)) -> Result<Vec<SeminarRecord>>;
}

/// Blocking client for the public INSPIRE API (no authentication).
pub struct InspireClient {
    http: reqwest::blocking::Client,
    api_url: String,
}

impl InspireClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("inspire-seminars/{}", CURRENT_VERSION))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(InspireClient {
            http,
            api_url: api_url.into(),
        })
    }
}

impl SeminarSource for InspireClient {
    fn fetch(&self, query: &SeminarQuery, on_url: &dyn Fn(&Url)) -> Result<Vec<SeminarRecord>> {
        let url = query.url(&self.api_url)?;
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch seminars for '{}'", query.series()))?;

        let status = response.status();
        let final_url = response.url().clone();
        on_url(&final_url);

        if !status.is_success() {
            anyhow::bail!("INSPIRE returned HTTP {} for {}", status, final_url);
        }

        let body = response.bytes().context("Failed to read response body")?;
        let results: SearchResponse = serde_json::from_slice(&body)
            .with_context(|| format!("Unexpected response from {}", final_url))?;

        log::info!(
            "{} seminars for '{}'",
            results.hits.hits.len(),
            query.series()
        );

        Ok(results.hits.hits)
    }
}
