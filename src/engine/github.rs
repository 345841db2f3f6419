use std::sync::mpsc::Sender;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::types::AppConfig;
use crate::filter::FilterSpec;
use crate::github::client::{self, GitHubClient};
use crate::github::rate_limit::describe_fetch_error;
use crate::query::Endpoint;

use super::interface::{Engine, EngineHandle, Event, Request};

/// The live engine: fetches from the proxy endpoints or from GitHub,
/// depending on `[source]`.
pub struct GitHubEngine {
    config: AppConfig,
}

impl GitHubEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl Engine for GitHubEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        let handle = EngineHandle::new(tx);
        let spawned = std::thread::Builder::new()
            .name("replay-engine".to_owned())
            .spawn(move || {
                let rt = tokio::runtime::Runtime::new().expect("tokio runtime init");
                rt.block_on(self.run_loop(rx));
            });
        if let Err(e) = spawned {
            tracing::error!("engine: failed to spawn thread: {e}");
        }
        handle
    }
}

impl GitHubEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        let mut client = GitHubClient::new(self.config.source.clone());

        while let Some(req) = rx.recv().await {
            match req {
                Request::Shutdown => break,
                Request::FetchIssues {
                    endpoint,
                    filters,
                    force,
                    reply_tx,
                } => handle_fetch(&mut client, endpoint, filters, force, reply_tx),
            }
        }
        tracing::debug!("engine: shutting down");
    }
}

/// Start a fetch on its own task so the search and repository endpoints can
/// be in flight at the same time. Replies arrive in completion order.
fn handle_fetch(
    client: &mut GitHubClient,
    endpoint: Endpoint,
    filters: FilterSpec,
    force: bool,
    reply_tx: Sender<Event>,
) {
    let context = format!("FetchIssues[{}]", endpoint.path());
    tracing::debug!("engine: {context} force={force}");

    let backend = match client.backend() {
        Ok(backend) => backend,
        Err(e) => {
            tracing::debug!("engine: {context} backend error: {e:#}");
            let _ = reply_tx.send(Event::FetchError {
                context,
                message: describe_fetch_error(&e),
            });
            return;
        }
    };
    let cache = client.cache();

    tokio::spawn(async move {
        match client::fetch_issues(&backend, &cache, endpoint, &filters, force).await {
            Ok((issues, rate_limit)) => {
                tracing::debug!("engine: sending IssuesFetched count={}", issues.len());
                let _ = reply_tx.send(Event::IssuesFetched {
                    endpoint,
                    issues,
                    rate_limit,
                });
            }
            Err(e) => {
                tracing::debug!("engine: {context} error: {e:#}");
                let _ = reply_tx.send(Event::FetchError {
                    context,
                    message: describe_fetch_error(&e),
                });
            }
        }
    });
}
