use replay_board::filter::FilterSpec;
use replay_board::github::proxy::ProxyClient;
use replay_board::query::Endpoint;
use replay_board::types::IssueState;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn raw_issue(number: u64, labels: &[&str]) -> serde_json::Value {
    let edges: Vec<_> = labels
        .iter()
        .map(|name| json!({ "node": { "name": name, "color": "ededed" } }))
        .collect();
    json!({
        "number": number,
        "title": format!("Issue {number}"),
        "url": format!("https://github.com/replayio/devtools/issues/{number}"),
        "state": "OPEN",
        "labels": { "edges": edges },
        "repository": { "nameWithOwner": "replayio/devtools" }
    })
}

#[tokio::test]
async fn search_endpoint_sends_filters_and_parses_issues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("labels", "has-replay,bug"))
        .and(query_param("org", "replayio"))
        .and(query_param("repo", ""))
        .and(query_param("state", "OPEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            raw_issue(1, &["has-replay", "bug"]),
            raw_issue(2, &["has-replay"]),
            { "title": "no number" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProxyClient::new(&server.uri()).unwrap();
    let filters = FilterSpec::default()
        .toggle_label("bug")
        .toggle_repo("", "replayio");
    let issues = client.fetch(Endpoint::Search, &filters).await.unwrap();

    let numbers: Vec<u64> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(issues[0].labels.len(), 2);
    assert_eq!(issues[0].state, IssueState::Open);
}

#[tokio::test]
async fn repo_endpoint_uses_issues_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/issues"))
        .and(query_param("org", "replayio"))
        .and(query_param("repo", "devtools"))
        .and(query_param("state", "CLOSED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProxyClient::new(&server.uri()).unwrap();
    let filters = FilterSpec::default()
        .toggle_repo("devtools", "replayio")
        .toggle_issue_state(IssueState::Closed);
    let issues = client
        .fetch(Endpoint::for_filters(&filters), &filters)
        .await
        .unwrap();
    assert!(issues.is_empty());
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ProxyClient::new(&server.uri()).unwrap();
    let err = client
        .fetch(Endpoint::Search, &FilterSpec::default())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("500"));
}

#[tokio::test]
async fn non_array_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "nope" })))
        .mount(&server)
        .await;

    let client = ProxyClient::new(&server.uri()).unwrap();
    assert!(
        client
            .fetch(Endpoint::Search, &FilterSpec::default())
            .await
            .is_err()
    );
}
