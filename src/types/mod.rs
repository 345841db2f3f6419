// Shared domain types, used by both the engine layer and the UI layer.

pub mod common;
pub mod issue;

pub use common::*;
pub use issue::*;
