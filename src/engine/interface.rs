use std::sync::mpsc::Sender;

use crate::filter::FilterSpec;
use crate::query::Endpoint;
use crate::types::{Issue, RateLimitInfo};

/// Handle to the backend engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Request>,
}

impl EngineHandle {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }

    /// Send a request to the engine. Non-blocking.
    pub fn send(&self, req: Request) {
        // If the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }
}

/// Implemented by both `GitHubEngine` and `StubEngine`.
pub trait Engine: Send + 'static {
    fn start(self) -> EngineHandle;
}

/// Operations the UI can send to the engine.
pub enum Request {
    /// Fetch issues for `filters` from `endpoint`. The reply is either
    /// `IssuesFetched` or `FetchError`.
    FetchIssues {
        endpoint: Endpoint,
        filters: FilterSpec,
        /// Skip the response cache.
        force: bool,
        reply_tx: Sender<Event>,
    },
    Shutdown,
}

/// Events the engine pushes back to the UI.
#[derive(Debug)]
pub enum Event {
    IssuesFetched {
        endpoint: Endpoint,
        /// Issues as returned by the endpoint, before client-side filtering.
        issues: Vec<Issue>,
        rate_limit: Option<RateLimitInfo>,
    },
    FetchError {
        context: String,
        message: String,
    },
}
