//! Natural language queries against the knowledge API.
//!
//! This module provides the `QueryClient` struct which sends a question to
//! Wolfram|Alpha, follows continuation pages, and formats the answer into a
//! single string suitable for handing to an agent.

mod query_client;
mod types;

pub use query_client::QueryClient;
pub use types::{NO_RESULTS_MESSAGE, QUERY_FAILED_MESSAGE, QueryOutcome};
