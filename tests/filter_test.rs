use replay_board::filter::{FilterSpec, filter_issues};
use replay_board::github::parse::parse_issues;
use replay_board::summary::IssueSummary;
use replay_board::types::{Issue, IssueState};

fn load_fixture_issues() -> Vec<Issue> {
    let json = include_str!("fixtures/search_issues.json");
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).expect("valid search_issues.json fixture");
    parse_issues(values)
}

fn numbers(issues: &[&Issue]) -> Vec<u64> {
    issues.iter().map(|i| i.number).collect()
}

#[test]
fn default_filters_show_open_issues_with_replay() {
    let issues = load_fixture_issues();
    let spec = FilterSpec::default();
    assert_eq!(numbers(&spec.apply(&issues)), vec![101]);
}

#[test]
fn issue_without_label_data_is_excluded_without_panicking() {
    let issues = load_fixture_issues();
    let unlabeled: Vec<Issue> = issues.into_iter().filter(|i| i.number == 55).collect();
    assert!(filter_issues(&unlabeled, &FilterSpec::default().labels).is_empty());
}

#[test]
fn closed_view_and_label_toggle() {
    let issues = load_fixture_issues();
    let closed = FilterSpec::default().toggle_issue_state(IssueState::Closed);
    assert_eq!(numbers(&closed.apply(&issues)), vec![7]);

    let bug_only = FilterSpec::default().toggle_label("has-replay").toggle_label("bug");
    assert_eq!(numbers(&bug_only.apply(&issues)), vec![101, 102]);
}

#[test]
fn repo_scope_narrows_results() {
    let issues = load_fixture_issues();
    let spec = FilterSpec::new(Vec::<String>::new(), "vercel", "next.js", IssueState::Open);
    assert_eq!(numbers(&spec.apply(&issues)), vec![55]);
}

#[test]
fn summary_counts_filtered_issues() {
    let issues = load_fixture_issues();
    let spec = FilterSpec::new(Vec::<String>::new(), "", "", IssueState::Open);
    let visible = spec.apply(&issues);
    let summary = IssueSummary::build(&visible, &spec);
    assert_eq!(summary.total, 3);
    assert_eq!(
        summary.repos,
        vec![
            ("replayio/devtools".to_owned(), 2),
            ("vercel/next.js".to_owned(), 1)
        ]
    );
    assert_eq!(summary.headline(), "3 open issues in all");
}
