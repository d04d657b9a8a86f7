//! Types for knowledge query outcomes.

use crate::formatter;
use crate::models::{ApiResult, QueryOptions};

/// Returned when the API could not interpret the query.
pub const QUERY_FAILED_MESSAGE: &str = "Query failed. Please check your query syntax.";

/// Returned when the API understood the query but produced no results.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Non-error outcome of a knowledge query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The API reported `success == false`
    Failed,
    /// The API succeeded with zero results
    NoResults,
    /// Results collected across every page followed
    Answer {
        /// Input query as echoed by the API (or as sent)
        input_query: String,
        /// Results in page order
        results: Vec<ApiResult>,
    },
}

impl QueryOutcome {
    /// Renders the outcome as the text handed back to callers.
    pub fn render(&self, options: &QueryOptions) -> String {
        match self {
            Self::Failed => QUERY_FAILED_MESSAGE.to_string(),
            Self::NoResults => NO_RESULTS_MESSAGE.to_string(),
            Self::Answer {
                input_query,
                results,
            } => format!(
                "Input Query: {}\n\nResult: {}",
                input_query,
                formatter::format_results(results, options.format, &options.filter)
            ),
        }
    }
}
