use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use moka::future::Cache;
use octocrab::Octocrab;

use crate::config::types::SourceConfig;
use crate::filter::FilterSpec;
use crate::github::{auth, graphql, proxy::ProxyClient};
use crate::query::{Endpoint, to_query_string};
use crate::types::{Issue, RateLimitInfo};

/// Where issues come from. Cheap to clone so a fetch can move into its own
/// task.
#[derive(Clone)]
pub enum Backend {
    /// A server exposing `/api/search` and `/api/issues`.
    Proxy(ProxyClient),
    /// GitHub's GraphQL API.
    GitHub { octocrab: Arc<Octocrab>, limit: u32 },
}

impl Backend {
    pub async fn fetch(
        &self,
        endpoint: Endpoint,
        filters: &FilterSpec,
    ) -> Result<(Vec<Issue>, Option<RateLimitInfo>)> {
        match self {
            Self::Proxy(proxy) => Ok((proxy.fetch(endpoint, filters).await?, None)),
            Self::GitHub { octocrab, limit } => match endpoint {
                Endpoint::Search => graphql::search_issues(octocrab, filters, *limit).await,
                Endpoint::RepoIssues => graphql::repository_issues(octocrab, filters, *limit).await,
            },
        }
    }
}

/// Builds the configured [`Backend`] on first use and owns the response
/// cache shared by all fetches.
pub struct GitHubClient {
    source: SourceConfig,
    backend: Option<Backend>,
    cache: Cache<String, String>,
}

impl GitHubClient {
    pub fn new(source: SourceConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(200)
            .time_to_live(Duration::from_secs(
                u64::from(source.cache_ttl_minutes).max(1) * 60,
            ))
            .build();
        Self {
            source,
            backend: None,
            cache,
        }
    }

    /// The backend for this run. Token resolution happens here for the
    /// GitHub backend, so a missing token surfaces as a fetch error.
    pub fn backend(&mut self) -> Result<Backend> {
        if let Some(backend) = &self.backend {
            return Ok(backend.clone());
        }

        let backend = match self.source.api_base.as_deref().filter(|b| !b.is_empty()) {
            Some(base) => Backend::Proxy(ProxyClient::new(base)?),
            None => {
                let host = self.source.host.as_str();
                let token = auth::resolve_token(host)?;
                let builder = if host == "github.com" {
                    Octocrab::builder().personal_token(token)
                } else {
                    Octocrab::builder()
                        .personal_token(token)
                        .base_uri(format!("https://{host}/api/v3"))
                        .context("setting GHE base URI")?
                };
                Backend::GitHub {
                    octocrab: Arc::new(builder.build().context("building octocrab instance")?),
                    limit: self.source.limit,
                }
            }
        };

        self.backend = Some(backend.clone());
        Ok(backend)
    }

    /// Return a clone of the internal cache (Arc-backed, cheap to clone).
    pub fn cache(&self) -> Cache<String, String> {
        self.cache.clone()
    }
}

/// Fetch through `backend`, serving a fresh cache entry unless `force` is set.
///
/// Returns `(issues, rate_limit)`. On cache hit, `rate_limit` is `None`.
pub async fn fetch_issues(
    backend: &Backend,
    cache: &Cache<String, String>,
    endpoint: Endpoint,
    filters: &FilterSpec,
    force: bool,
) -> Result<(Vec<Issue>, Option<RateLimitInfo>)> {
    let cache_key = format!("{}?{}", endpoint.path(), to_query_string(filters));

    if !force
        && let Some(cached) = cache.get(&cache_key).await
        && let Ok(issues) = serde_json::from_str::<Vec<Issue>>(&cached)
    {
        tracing::debug!("cache hit for {cache_key}");
        return Ok((issues, None));
    }

    let (issues, rate_limit) = backend.fetch(endpoint, filters).await?;

    if let Ok(json) = serde_json::to_string(&issues) {
        cache.insert(cache_key, json).await;
    }
    Ok((issues, rate_limit))
}
