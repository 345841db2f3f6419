// engine module: issue fetching off the UI thread

pub mod github;
mod interface;
pub mod stub;

pub use github::GitHubEngine;
pub use interface::{Engine, EngineHandle, Event, Request};
pub use stub::StubEngine;
