use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::Issue;

use super::interface::{Engine, EngineHandle, Event, Request};

/// A stub engine that serves pre-loaded issues without any network calls.
///
/// Useful for integration tests and offline demos (`--fixture`).
#[derive(Default)]
pub struct StubEngine {
    pub issues: Vec<Issue>,
    /// When set, every fetch fails with this message.
    pub fail_with: Option<String>,
}

impl Engine for StubEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("stub tokio runtime");
            rt.block_on(self.run_loop(rx));
        });
        EngineHandle::new(tx)
    }
}

impl StubEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        while let Some(req) = rx.recv().await {
            match req {
                Request::FetchIssues {
                    endpoint, reply_tx, ..
                } => {
                    let event = match &self.fail_with {
                        Some(message) => Event::FetchError {
                            context: "stub".into(),
                            message: message.clone(),
                        },
                        None => Event::IssuesFetched {
                            endpoint,
                            issues: self.issues.clone(),
                            rate_limit: None,
                        },
                    };
                    let _ = reply_tx.send(event);
                }
                Request::Shutdown => break,
            }
        }
    }
}
