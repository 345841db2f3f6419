use anyhow::{Context, Result};

use crate::filter::FilterSpec;
use crate::github::parse::parse_issues;
use crate::query::{Endpoint, to_query_pairs};
use crate::types::Issue;

/// Client for a server exposing the `/api/search` and `/api/issues`
/// endpoints. Each returns a JSON array of raw issues.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("replay-board/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// `GET {base}{endpoint}?labels=…&org=…&repo=…&state=…`.
    ///
    /// Non-2xx statuses and bodies that are not a JSON array are errors.
    /// Individual malformed records are dropped by the parse step.
    pub async fn fetch(&self, endpoint: Endpoint, filters: &FilterSpec) -> Result<Vec<Issue>> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        tracing::debug!("proxy: GET {url}");
        let response = self
            .http
            .get(&url)
            .query(&to_query_pairs(filters))
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        let records: Vec<serde_json::Value> = response
            .json()
            .await
            .with_context(|| format!("decoding issues from {url}"))?;
        Ok(parse_issues(records))
    }
}
