use thiserror::Error;
use url::Url;
use url::form_urlencoded;

use crate::filter::FilterSpec;
use crate::types::{IssueState, RepoRef};

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// The two backing search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// GitHub-issue search across organizations (`/api/search`).
    Search,
    /// Issues of a single repository (`/api/issues`).
    RepoIssues,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Search => "/api/search",
            Self::RepoIssues => "/api/issues",
        }
    }

    /// Repository-scoped listing needs both owner and name; anything else
    /// goes through search.
    pub fn for_filters(spec: &FilterSpec) -> Self {
        if spec.org.is_empty() || spec.repo.is_empty() {
            Self::Search
        } else {
            Self::RepoIssues
        }
    }
}

// ---------------------------------------------------------------------------
// Incoming query string
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid repository {0:?}: expected \"name\" or \"owner/name\"")]
    Repo(String),
}

/// The `org` / `repo` parameters consumed when the board loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub org: Option<String>,
    pub repo: Option<String>,
}

/// Parse `org` and `repo` out of a query string.
///
/// Accepts a bare query (`org=a&repo=b`), one with a leading `?`, or a full
/// URL whose query part carries the parameters. Values are percent-decoded,
/// unknown keys are ignored and the last occurrence of a key wins. A `repo`
/// of the form `owner/name` also sets `org`.
pub fn parse_query(input: &str) -> Result<QueryParams, ParseError> {
    let input = input.trim();
    let raw = if input.contains("://") {
        Url::parse(input)?.query().unwrap_or_default().to_owned()
    } else {
        let without_fragment = input.split_once('#').map_or(input, |(q, _)| q);
        without_fragment
            .strip_prefix('?')
            .unwrap_or(without_fragment)
            .to_owned()
    };

    let mut params = QueryParams::default();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "org" => params.org = Some(value.into_owned()),
            "repo" => params.repo = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(repo) = params.repo.clone()
        && repo.contains('/')
    {
        let parsed = RepoRef::from_full_name(&repo).ok_or(ParseError::Repo(repo))?;
        params.org = Some(parsed.owner);
        params.repo = Some(parsed.name);
    }

    Ok(params)
}

// ---------------------------------------------------------------------------
// Outgoing endpoint query
// ---------------------------------------------------------------------------

/// Key/value pairs sent to either endpoint, in `labels, org, repo, state`
/// order. Labels are comma-joined; encoding is left to the HTTP client.
pub fn to_query_pairs(spec: &FilterSpec) -> Vec<(&'static str, String)> {
    let labels = spec
        .labels
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");
    vec![
        ("labels", labels),
        ("org", spec.org.clone()),
        ("repo", spec.repo.clone()),
        ("state", spec.state.as_str().to_owned()),
    ]
}

/// Encoded form of [`to_query_pairs`], used as a request key.
pub fn to_query_string(spec: &FilterSpec) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(to_query_pairs(spec))
        .finish()
}

/// GitHub search syntax for `spec`, newest activity first.
pub fn to_search_query(spec: &FilterSpec) -> String {
    let mut parts = vec!["is:issue".to_owned()];
    for label in &spec.labels {
        parts.push(format!("label:\"{label}\""));
    }
    match (spec.org.is_empty(), spec.repo.is_empty()) {
        (false, false) => parts.push(format!("repo:{}/{}", spec.org, spec.repo)),
        (false, true) => parts.push(format!("org:{}", spec.org)),
        // A bare repository name cannot be qualified without its owner; the
        // client-side filter narrows it down.
        (true, _) => {}
    }
    parts.push(
        match spec.state {
            IssueState::Open => "is:open",
            IssueState::Closed => "is:closed",
        }
        .to_owned(),
    );
    parts.push("sort:updated-desc".to_owned());
    parts.join(" ")
}
