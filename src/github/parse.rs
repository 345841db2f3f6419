//! Conversion of the raw GitHub-issue-search shape into validated [`Issue`]s.
//!
//! Both backends return issues in the GraphQL connection shape:
//!
//! ```json
//! { "number": 1, "state": "OPEN",
//!   "labels": { "edges": [ { "node": { "name": "has-replay", "color": "ededed" } } ] },
//!   "repository": { "nameWithOwner": "owner/name" } }
//! ```
//!
//! Nested optional data is resolved here once. `number` and `state` are
//! required; everything else defaults.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::types::{Issue, IssueState, Label, RepoRef};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssueParseError {
    #[error("issue record has no number")]
    MissingNumber,
    #[error("issue #{0} has no state")]
    MissingState(u64),
    #[error("issue #{number} has unknown state {state:?}")]
    UnknownState { number: u64, state: String },
}

/// Deserialize a field that may be absent, null, or of an unexpected shape.
/// Anything that does not fit `T` becomes `None` instead of failing the whole
/// record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub labels: Option<RawLabelConnection>,
    #[serde(default, deserialize_with = "lenient")]
    pub repository: Option<RawRepository>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub comments: Option<RawTotalCount>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<RawActor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLabelConnection {
    #[serde(default)]
    pub edges: Option<Vec<Option<RawLabelEdge>>>,
}

#[derive(Debug, Deserialize)]
pub struct RawLabelEdge {
    pub node: Option<RawLabel>,
}

#[derive(Debug, Deserialize)]
pub struct RawLabel {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawRepository {
    #[serde(rename = "nameWithOwner")]
    pub name_with_owner: String,
}

#[derive(Debug, Deserialize)]
pub struct RawTotalCount {
    #[serde(rename = "totalCount", default)]
    pub total_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct RawActor {
    pub login: String,
}

impl RawIssue {
    pub fn into_domain(self) -> Result<Issue, IssueParseError> {
        let number = self.number.ok_or(IssueParseError::MissingNumber)?;
        let raw_state = self.state.ok_or(IssueParseError::MissingState(number))?;
        let state = IssueState::parse(&raw_state).ok_or(IssueParseError::UnknownState {
            number,
            state: raw_state,
        })?;

        let labels = self
            .labels
            .and_then(|c| c.edges)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|edge| edge.node)
            .map(|l| Label {
                name: l.name,
                color: l.color.unwrap_or_default(),
            })
            .collect();

        Ok(Issue {
            number,
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            labels,
            state,
            repo: self
                .repository
                .and_then(|r| RepoRef::from_full_name(&r.name_with_owner)),
            updated_at: self.updated_at,
            comment_count: self.comments.map_or(0, |c| c.total_count),
            author: self.author.map(|a| a.login),
        })
    }
}

/// Parse a batch of raw JSON issue records.
///
/// Records that are not objects, or that fail validation, are dropped with a
/// warning; the rest of the batch is kept in order. Empty objects (non-issue
/// search nodes) are skipped silently.
pub fn parse_issues(values: Vec<serde_json::Value>) -> Vec<Issue> {
    values
        .into_iter()
        .filter_map(|value| {
            if value.as_object().is_some_and(serde_json::Map::is_empty) {
                return None;
            }
            let raw: RawIssue = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("dropping malformed issue record: {e}");
                    return None;
                }
            };
            match raw.into_domain() {
                Ok(issue) => Some(issue),
                Err(e) => {
                    tracing::warn!("dropping issue record: {e}");
                    None
                }
            }
        })
        .collect()
}
