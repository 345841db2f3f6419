use indexmap::IndexSet;

use crate::query::QueryParams;
use crate::types::{Issue, IssueState};

/// Label every board starts with unless configured otherwise.
pub const DEFAULT_LABEL: &str = "has-replay";

// ---------------------------------------------------------------------------
// Filter evaluator
// ---------------------------------------------------------------------------

/// Keep the issues that carry every label in `required`.
///
/// An issue matches when the number of required labels found on it equals
/// `required.len()`; labels the issue has beyond those are ignored. An empty
/// requirement matches everything. Input order is preserved.
pub fn filter_issues<'a>(issues: &'a [Issue], required: &IndexSet<String>) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| has_all_labels(issue, required))
        .collect()
}

fn has_all_labels(issue: &Issue, required: &IndexSet<String>) -> bool {
    let present = required.iter().filter(|l| issue.has_label(l)).count();
    present == required.len()
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Client-side constraints applied to the issue list.
///
/// Values are immutable: every transition returns a new `FilterSpec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Required labels, in the order they were selected.
    pub labels: IndexSet<String>,
    pub org: String,
    pub repo: String,
    pub state: IssueState,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            labels: IndexSet::from([DEFAULT_LABEL.to_owned()]),
            org: String::new(),
            repo: String::new(),
            state: IssueState::Open,
        }
    }
}

impl FilterSpec {
    /// Build a spec from explicit parts. Duplicate labels collapse.
    pub fn new<I, S>(labels: I, org: &str, repo: &str, state: IssueState) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            org: org.to_owned(),
            repo: repo.to_owned(),
            state,
        }
    }

    /// Add `label` if absent (appended last), remove it if present.
    pub fn toggle_label(&self, label: &str) -> Self {
        let mut labels = self.labels.clone();
        if !labels.shift_remove(label) {
            labels.insert(label.to_owned());
        }
        Self {
            labels,
            ..self.clone()
        }
    }

    /// Scope to `org/repo`, replacing both fields at once.
    pub fn toggle_repo(&self, repo: &str, org: &str) -> Self {
        Self {
            repo: repo.to_owned(),
            org: org.to_owned(),
            ..self.clone()
        }
    }

    /// Drop the repository scope.
    pub fn clear_repo(&self) -> Self {
        self.toggle_repo("", "")
    }

    /// Show issues in `view` state. Selecting the current state is a no-op.
    pub fn toggle_issue_state(&self, view: IssueState) -> Self {
        Self {
            state: view,
            ..self.clone()
        }
    }

    /// Overlay `org` / `repo` query parameters. Absent or empty parameters
    /// keep the current value.
    pub fn with_query(&self, params: &QueryParams) -> Self {
        let pick = |param: Option<&String>, current: &str| {
            param
                .filter(|v| !v.is_empty())
                .map_or_else(|| current.to_owned(), Clone::clone)
        };
        Self {
            org: pick(params.org.as_ref(), &self.org),
            repo: pick(params.repo.as_ref(), &self.repo),
            ..self.clone()
        }
    }

    pub fn has_repo_scope(&self) -> bool {
        !self.org.is_empty() || !self.repo.is_empty()
    }

    /// Whether `issue` satisfies every constraint: all required labels, the
    /// repository scope (owner and name compared case-insensitively), and the
    /// state.
    pub fn matches(&self, issue: &Issue) -> bool {
        if !has_all_labels(issue, &self.labels) {
            return false;
        }
        if self.has_repo_scope() {
            let Some(repo) = &issue.repo else {
                return false;
            };
            if !self.org.is_empty() && !repo.owner.eq_ignore_ascii_case(&self.org) {
                return false;
            }
            if !self.repo.is_empty() && !repo.name.eq_ignore_ascii_case(&self.repo) {
                return false;
            }
        }
        issue.state == self.state
    }

    /// Stable filter of `issues` by [`FilterSpec::matches`].
    pub fn apply<'a>(&self, issues: &'a [Issue]) -> Vec<&'a Issue> {
        issues.iter().filter(|i| self.matches(i)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
