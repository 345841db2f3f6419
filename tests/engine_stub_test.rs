use std::time::Duration;

use replay_board::engine::{Engine, Event, Request, StubEngine};
use replay_board::filter::FilterSpec;
use replay_board::github::parse::parse_issues;
use replay_board::query::Endpoint;
use replay_board::types::Issue;

fn load_fixture_issues() -> Vec<Issue> {
    let json = include_str!("fixtures/search_issues.json");
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).expect("valid search_issues.json fixture");
    parse_issues(values)
}

fn fetch(stub: StubEngine, filters: FilterSpec) -> Event {
    let handle = stub.start();
    let (tx, rx) = std::sync::mpsc::channel::<Event>();
    handle.send(Request::FetchIssues {
        endpoint: Endpoint::for_filters(&filters),
        filters,
        force: false,
        reply_tx: tx,
    });
    rx.recv_timeout(Duration::from_secs(2))
        .expect("engine should reply within 2 seconds")
}

#[test]
fn fixture_parses_valid_records_only() {
    let issues = load_fixture_issues();
    let numbers: Vec<u64> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![101, 102, 7, 55]);
    assert!(issues[3].labels.is_empty());
}

#[test]
fn stub_engine_fetch_issues_returns_fixture_data() {
    let issues = load_fixture_issues();
    let stub = StubEngine {
        issues: issues.clone(),
        fail_with: None,
    };

    match fetch(stub, FilterSpec::default()) {
        Event::IssuesFetched {
            endpoint,
            issues: fetched,
            rate_limit,
        } => {
            assert_eq!(endpoint, Endpoint::Search);
            assert_eq!(fetched, issues);
            assert!(rate_limit.is_none());
        }
        other => panic!("expected IssuesFetched, got {other:?}"),
    }
}

#[test]
fn stub_engine_echoes_repo_endpoint() {
    let filters = FilterSpec::default().toggle_repo("devtools", "replayio");
    match fetch(StubEngine::default(), filters) {
        Event::IssuesFetched { endpoint, .. } => assert_eq!(endpoint, Endpoint::RepoIssues),
        other => panic!("expected IssuesFetched, got {other:?}"),
    }
}

#[test]
fn stub_engine_reports_failure() {
    let stub = StubEngine {
        issues: vec![],
        fail_with: Some("boom".to_owned()),
    };
    match fetch(stub, FilterSpec::default()) {
        Event::FetchError { message, .. } => assert_eq!(message, "boom"),
        other => panic!("expected FetchError, got {other:?}"),
    }
}

#[test]
fn stub_engine_stops_on_shutdown() {
    let handle = StubEngine::default().start();
    handle.send(Request::Shutdown);
    let (tx, rx) = std::sync::mpsc::channel::<Event>();
    handle.send(Request::FetchIssues {
        endpoint: Endpoint::Search,
        filters: FilterSpec::default(),
        force: false,
        reply_tx: tx,
    });
    assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
}
