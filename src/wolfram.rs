/// Wolfram|Alpha HTTP client module.
///
/// This module provides a blocking HTTP client for the Wolfram|Alpha v2 query API,
/// the error type shared by the query pipeline, and the JSON payload parsers.
mod client;

pub use client::{
    WolframClient, WolframClientBuilder, WolframClientTrait, WolframError,
    parse_continuation_page, parse_query_response,
};
