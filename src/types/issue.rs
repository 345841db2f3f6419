use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Label, RepoRef};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueState {
    #[default]
    #[serde(rename = "OPEN", alias = "open")]
    Open,
    #[serde(rename = "CLOSED", alias = "closed")]
    Closed,
}

impl IssueState {
    /// Wire form used by the search endpoints and GraphQL.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    /// Parse a state as reported by either GraphQL (`OPEN`) or REST (`open`).
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("open") {
            Some(Self::Open)
        } else if s.eq_ignore_ascii_case("closed") {
            Some(Self::Closed)
        } else {
            None
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// A validated issue record. Produced by the parse step in
/// `github::parse`; never mutated after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub state: IssueState,
    pub repo: Option<RepoRef>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub author: Option<String>,
}

impl Issue {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_parse_accepts_both_casings() {
        assert_eq!(IssueState::parse("OPEN"), Some(IssueState::Open));
        assert_eq!(IssueState::parse("closed"), Some(IssueState::Closed));
        assert_eq!(IssueState::parse("merged"), None);
    }

    #[test]
    fn state_deserializes_config_and_wire_forms() {
        let wire: IssueState = serde_json::from_str("\"CLOSED\"").unwrap();
        let config: IssueState = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(wire, IssueState::Closed);
        assert_eq!(config, IssueState::Closed);
    }
}
