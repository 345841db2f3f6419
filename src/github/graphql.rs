use std::sync::Arc;

use anyhow::{Context, Result, bail};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::github::parse::parse_issues;
use crate::query::to_search_query;
use crate::types::{Issue, RateLimitInfo};

// ---------------------------------------------------------------------------
// GraphQL query strings
// ---------------------------------------------------------------------------

/// Issue selection shared by both queries. Labels use the `edges { node }`
/// form so the result has the same shape the proxy endpoints return.
macro_rules! issue_fields {
    () => {
        r"
        number
        title
        url
        state
        updatedAt
        author { login }
        comments { totalCount }
        labels(first: 100) { edges { node { name color } } }
        repository { nameWithOwner }
        "
    };
}

const SEARCH_ISSUES_QUERY: &str = concat!(
    r"
query SearchIssues($query: String!, $first: Int!) {
  rateLimit { limit remaining cost }
  search(query: $query, type: ISSUE, first: $first) {
    nodes {
      ... on Issue {",
    issue_fields!(),
    r"}
    }
  }
}
"
);

const REPOSITORY_ISSUES_QUERY: &str = concat!(
    r"
query RepositoryIssues($owner: String!, $name: String!, $labels: [String!], $states: [IssueState!], $first: Int!) {
  rateLimit { limit remaining cost }
  repository(owner: $owner, name: $name) {
    issues(first: $first, labels: $labels, states: $states, orderBy: { field: UPDATED_AT, direction: DESC }) {
      nodes {",
    issue_fields!(),
    r"}
    }
  }
}
"
);

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GraphQLPayload<V: Serialize> {
    query: &'static str,
    variables: V,
}

#[derive(Serialize)]
struct SearchVariables {
    query: String,
    first: u32,
}

#[derive(Serialize)]
struct RepositoryIssuesVariables {
    owner: String,
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
    states: Vec<&'static str>,
    first: u32,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphQLResponse<D> {
    data: Option<D>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawRateLimit {
    limit: u32,
    remaining: u32,
    cost: u32,
}

impl From<RawRateLimit> for RateLimitInfo {
    fn from(rl: RawRateLimit) -> Self {
        Self {
            limit: rl.limit,
            remaining: rl.remaining,
            cost: rl.cost,
        }
    }
}

/// Issue nodes are kept as raw JSON and validated by `parse_issues`.
#[derive(Debug, Deserialize)]
struct NodeList {
    #[serde(default)]
    nodes: Vec<Option<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(rename = "rateLimit", default)]
    rate_limit: Option<RawRateLimit>,
    search: NodeList,
}

#[derive(Debug, Deserialize)]
struct RepositoryIssuesData {
    #[serde(rename = "rateLimit", default)]
    rate_limit: Option<RawRateLimit>,
    repository: Option<RepositoryIssues>,
}

#[derive(Debug, Deserialize)]
struct RepositoryIssues {
    issues: NodeList,
}

fn into_data<D>(response: GraphQLResponse<D>) -> Result<D> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        bail!("GraphQL errors: {}", messages.join("; "));
    }
    response.data.context("GraphQL response missing data field")
}

fn collect_nodes(list: NodeList) -> Vec<Issue> {
    parse_issues(list.nodes.into_iter().flatten().collect())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the GitHub issue search for `filters`, returning at most `limit`
/// issues (GitHub caps a page at 100).
pub async fn search_issues(
    octocrab: &Arc<Octocrab>,
    filters: &FilterSpec,
    limit: u32,
) -> Result<(Vec<Issue>, Option<RateLimitInfo>)> {
    let query = to_search_query(filters);
    let payload = GraphQLPayload {
        query: SEARCH_ISSUES_QUERY,
        variables: SearchVariables {
            query: query.clone(),
            first: limit.clamp(1, 100),
        },
    };

    let response: GraphQLResponse<SearchData> = octocrab
        .graphql(&payload)
        .await
        .with_context(|| format!("GraphQL issue search failed for query: {query}"))?;
    let data = into_data(response)?;

    Ok((
        collect_nodes(data.search),
        data.rate_limit.map(RateLimitInfo::from),
    ))
}

/// List issues of `filters.org/filters.repo` in `filters.state`.
///
/// GitHub's `labels` argument matches issues carrying *any* of the labels;
/// callers narrow the result with the client-side filter.
pub async fn repository_issues(
    octocrab: &Arc<Octocrab>,
    filters: &FilterSpec,
    limit: u32,
) -> Result<(Vec<Issue>, Option<RateLimitInfo>)> {
    if filters.org.is_empty() || filters.repo.is_empty() {
        bail!("repository issues need both an organization and a repository");
    }
    let payload = GraphQLPayload {
        query: REPOSITORY_ISSUES_QUERY,
        variables: RepositoryIssuesVariables {
            owner: filters.org.clone(),
            name: filters.repo.clone(),
            labels: filters.labels.iter().cloned().collect(),
            states: vec![filters.state.as_str()],
            first: limit.clamp(1, 100),
        },
    };

    let response: GraphQLResponse<RepositoryIssuesData> = octocrab
        .graphql(&payload)
        .await
        .with_context(|| {
            format!(
                "GraphQL repository issues failed for {}/{}",
                filters.org, filters.repo
            )
        })?;
    let data = into_data(response)?;
    let repository = data
        .repository
        .with_context(|| format!("repository {}/{} not found", filters.org, filters.repo))?;

    Ok((
        collect_nodes(repository.issues),
        data.rate_limit.map(RateLimitInfo::from),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn queries_request_label_edges() {
        assert!(SEARCH_ISSUES_QUERY.contains("labels(first: 100) { edges { node { name color } } }"));
        assert!(REPOSITORY_ISSUES_QUERY.contains("edges { node { name color } }"));
        assert!(REPOSITORY_ISSUES_QUERY.contains("states: $states"));
    }

    #[test]
    fn search_response_is_parsed() {
        let body = json!({
            "data": {
                "rateLimit": { "limit": 5000, "remaining": 4990, "cost": 1 },
                "search": { "nodes": [
                    { "number": 2, "state": "OPEN",
                      "labels": { "edges": [ { "node": { "name": "has-replay", "color": "fff" } } ] },
                      "repository": { "nameWithOwner": "replayio/devtools" } },
                    {},
                    null
                ] }
            }
        });
        let response: GraphQLResponse<SearchData> = serde_json::from_value(body).unwrap();
        let data = into_data(response).unwrap();
        assert_eq!(data.rate_limit.map(|r| r.remaining), Some(4990));
        let issues = collect_nodes(data.search);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 2);
        assert!(issues[0].has_label("has-replay"));
    }

    #[test]
    fn graphql_errors_are_surfaced() {
        let body = json!({
            "data": null,
            "errors": [ { "message": "Could not resolve to a Repository" } ]
        });
        let response: GraphQLResponse<RepositoryIssuesData> = serde_json::from_value(body).unwrap();
        let err = into_data(response).unwrap_err();
        assert!(err.to_string().contains("Could not resolve"));
    }

    #[test]
    fn empty_labels_are_not_sent() {
        let vars = RepositoryIssuesVariables {
            owner: "replayio".to_owned(),
            name: "devtools".to_owned(),
            labels: Vec::new(),
            states: vec!["OPEN"],
            first: 10,
        };
        let value = serde_json::to_value(vars).unwrap();
        assert!(value.get("labels").is_none());
        assert_eq!(value["states"], json!(["OPEN"]));
    }
}
