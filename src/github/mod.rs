pub mod auth;
pub mod client;
pub mod graphql;
pub mod parse;
pub mod proxy;
pub(crate) mod rate_limit;
