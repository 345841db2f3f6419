use std::collections::HashMap;

use crate::filter::FilterSpec;
use crate::types::{Issue, IssueState, RepoRef};

/// Counts shown above the issue list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub total: usize,
    /// `(owner/name, count)`, most issues first, then by name.
    pub repos: Vec<(String, usize)>,
    pub state: IssueState,
    pub labels: Vec<String>,
    /// `org/repo`, `org`, `repo`, or `all`.
    pub scope: String,
}

impl IssueSummary {
    pub fn build(issues: &[&Issue], spec: &FilterSpec) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for repo in issues.iter().filter_map(|i| i.repo.as_ref()) {
            *counts.entry(RepoRef::full_name(repo)).or_default() += 1;
        }
        let mut repos: Vec<(String, usize)> = counts.into_iter().collect();
        repos.sort_by(|(a_name, a), (b_name, b)| b.cmp(a).then_with(|| a_name.cmp(b_name)));

        let scope = match (spec.org.as_str(), spec.repo.as_str()) {
            ("", "") => "all".to_owned(),
            (org, "") => org.to_owned(),
            ("", repo) => repo.to_owned(),
            (org, repo) => format!("{org}/{repo}"),
        };

        Self {
            total: issues.len(),
            repos,
            state: spec.state,
            labels: spec.labels.iter().cloned().collect(),
            scope,
        }
    }

    /// One-line description, e.g. `3 open issues in all with [has-replay]`.
    pub fn headline(&self) -> String {
        let noun = if self.total == 1 { "issue" } else { "issues" };
        let labels = if self.labels.is_empty() {
            String::new()
        } else {
            format!(" with [{}]", self.labels.join(", "))
        };
        format!(
            "{} {} {noun} in {}{labels}",
            self.total, self.state, self.scope
        )
    }
}
