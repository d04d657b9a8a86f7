/// Wolfram|Alpha HTTP client implementation.
///
/// This module provides `WolframClient` for making synchronous HTTP requests to the
/// Wolfram|Alpha v2 query API, along with the error type and builder used to configure it.
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::config::{self, Config, DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::models::{ApiResult, ResultPage};

/// Errors that can occur when querying the knowledge API.
#[derive(Debug, Error)]
pub enum WolframError {
    /// No API credential was configured
    #[error("API key not found in environment variables")]
    MissingCredential,

    /// The query text was empty
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Wolfram|Alpha API-specific errors
    #[error("Wolfram|Alpha API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl WolframError {
    /// Short category name recorded with every logged failure.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::Http { .. } => "transport",
            Self::Api { .. } | Self::Serialization(_) | Self::EmptyQuery => "api",
            Self::MissingCredential | Self::InvalidUrl(_) => "config",
        }
    }

    /// Wraps a transport failure, dropping the request URL since it carries
    /// the `appid` credential.
    fn from_transport(error: reqwest::Error) -> Self {
        let error = error.without_url();
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Builder for constructing `WolframClient` instances.
///
/// # Examples
///
/// ```
/// use wolfram_tool::WolframClientBuilder;
///
/// let client = WolframClientBuilder::new()
///     .app_id("DEMO")
///     .api_url("https://api.wolframalpha.com/v2/query")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct WolframClientBuilder {
    app_id: Option<String>,
    api_url: Option<String>,
    timeout: Option<Duration>,
}

impl WolframClientBuilder {
    /// Creates a new `WolframClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .app_id(config.app_id.clone())
            .api_url(config.api_url.clone())
            .timeout(config.timeout)
    }

    /// Sets the Wolfram|Alpha app id used to authenticate requests.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Sets the query endpoint URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Sets the total per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `WolframClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `app_id()` was not called, this method reads `APP_ID` (or
    /// `WOLFRAM_APP_ID`). If `api_url()` was not called, it reads
    /// `WOLFRAM_API_URL` and otherwise uses the public v2 endpoint.
    ///
    /// # Errors
    ///
    /// Returns `WolframError::MissingCredential` when no app id is available
    /// and `WolframError::InvalidUrl` when the endpoint does not parse.
    pub fn build(self) -> Result<WolframClient, WolframError> {
        let app_id = match self.app_id {
            Some(id) if !id.trim().is_empty() => id,
            Some(_) => return Err(WolframError::MissingCredential),
            None => config::read_app_id().ok_or(WolframError::MissingCredential)?,
        };

        let api_url = if let Some(url) = self.api_url {
            url
        } else {
            std::env::var(config::API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
        };

        reqwest::Url::parse(&api_url)
            .map_err(|e| WolframError::InvalidUrl(format!("{}: {}", api_url, e)))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .build()
            .map_err(WolframError::Network)?;

        Ok(WolframClient {
            client,
            app_id,
            api_url,
            timeout,
        })
    }
}

/// Synchronous HTTP client for the Wolfram|Alpha v2 query API.
///
/// It should be constructed using `WolframClientBuilder`.
pub struct WolframClient {
    client: reqwest::blocking::Client,
    app_id: String,
    api_url: String,
    timeout: Duration,
}

/// Trait for knowledge API operations.
///
/// This trait enables substituting a stub transport in tests.
pub trait WolframClientTrait: Send + Sync {
    /// Sends `input` to the query endpoint along with any pass-through params.
    fn query(&self, input: &str, params: &[(String, String)]) -> Result<ResultPage, WolframError>;

    /// Fetches the continuation page referenced by `more_from`.
    fn fetch_page(&self, more_from: &str) -> Result<ResultPage, WolframError>;
}

impl WolframClient {
    /// Returns the query endpoint configured for this client.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn get_json(&self, request: reqwest::blocking::RequestBuilder) -> Result<Value, WolframError> {
        let response = request.send().map_err(WolframError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WolframError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(WolframError::from_transport)?;
        serde_json::from_str(&body).map_err(WolframError::Serialization)
    }

    /// Appends the app id to a continuation URL unless it already carries one.
    fn authenticated_url(&self, more_from: &str) -> Result<reqwest::Url, WolframError> {
        let mut url = reqwest::Url::parse(more_from)
            .map_err(|e| WolframError::Api {
                message: format!("invalid continuation URL '{}': {}", more_from, e),
            })?;

        if !url.query_pairs().any(|(key, _)| key == "appid") {
            url.query_pairs_mut().append_pair("appid", &self.app_id);
        }

        Ok(url)
    }
}

impl WolframClientTrait for WolframClient {
    fn query(&self, input: &str, params: &[(String, String)]) -> Result<ResultPage, WolframError> {
        tracing::debug!(input, params = params.len(), "sending knowledge query");

        let request = self
            .client
            .get(&self.api_url)
            .query(&[
                ("appid", self.app_id.as_str()),
                ("input", input),
                ("output", "json"),
                ("format", "plaintext,html"),
            ])
            .query(params);

        let json = self.get_json(request)?;
        parse_query_response(&json)
    }

    fn fetch_page(&self, more_from: &str) -> Result<ResultPage, WolframError> {
        let url = self.authenticated_url(more_from)?;
        tracing::debug!(more_from, "fetching continuation page");

        let json = self.get_json(self.client.get(url))?;
        parse_continuation_page(&json)
    }
}

/// Parses a v2 query response body into a [`ResultPage`].
///
/// Result pods are those flagged `primary` or titled `Result`. Each pod's
/// first subpod plaintext becomes the result text.
///
/// # Errors
///
/// Returns `WolframError::Api` if the body lacks `queryresult` or the API
/// flagged the request itself as an error (bad app id, malformed input).
pub fn parse_query_response(json: &Value) -> Result<ResultPage, WolframError> {
    let query_result = json
        .get("queryresult")
        .and_then(|v| v.as_object())
        .ok_or_else(|| WolframError::Api {
            message: "Missing 'queryresult' field in API response".to_string(),
        })?;

    match query_result.get("error") {
        Some(Value::Object(error)) => {
            let code = error.get("code").map(value_to_string).unwrap_or_default();
            let msg = error
                .get("msg")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return Err(WolframError::Api {
                message: if code.is_empty() {
                    msg.to_string()
                } else {
                    format!("{}: {}", code, msg)
                },
            });
        }
        Some(Value::Bool(true)) => {
            return Err(WolframError::Api {
                message: "API reported an error".to_string(),
            });
        }
        _ => {}
    }

    let success = query_result.get("success").is_some_and(is_truthy);

    let results = query_result
        .get("pods")
        .and_then(|v| v.as_array())
        .map(|pods| {
            pods.iter()
                .filter(|pod| is_result_pod(pod))
                .map(pod_to_result)
                .collect()
        })
        .unwrap_or_default();

    Ok(ResultPage {
        success,
        input_query: query_result
            .get("inputstring")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        results,
        more_from: more_from(query_result.get("more_from")),
    })
}

/// Parses a continuation page body into a [`ResultPage`].
///
/// A page is `{"results": [...], "more_from": "..."}`; each result is a flat
/// object whose string members become named fields.
///
/// # Errors
///
/// Returns `WolframError::Api` if the body has no `results` array.
pub fn parse_continuation_page(json: &Value) -> Result<ResultPage, WolframError> {
    let results = json
        .get("results")
        .and_then(|v| v.as_array())
        .ok_or_else(|| WolframError::Api {
            message: "Missing 'results' field in continuation page".to_string(),
        })?;

    Ok(ResultPage {
        success: true,
        input_query: None,
        results: results.iter().filter_map(item_to_result).collect(),
        more_from: more_from(json.get("more_from")),
    })
}

fn is_result_pod(pod: &Value) -> bool {
    pod.get("primary").is_some_and(is_truthy)
        || pod.get("title").and_then(|v| v.as_str()) == Some("Result")
}

fn pod_to_result(pod: &Value) -> ApiResult {
    let plaintexts: Vec<&str> = pod
        .get("subpods")
        .and_then(|v| v.as_array())
        .map(|subpods| {
            subpods
                .iter()
                .filter_map(|s| s.get("plaintext").and_then(|v| v.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let text = plaintexts.first().copied().unwrap_or("");
    let plaintext = plaintexts
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let html = pod.get("markup").and_then(|v| v.as_str()).unwrap_or("");

    ["title", "id", "scanner", "position"]
        .iter()
        .filter_map(|name| pod.get(*name).map(|v| (*name, value_to_string(v))))
        .fold(
            ApiResult::with_renderings(text, html, plaintext),
            |result, (name, value)| result.with_field(name, value),
        )
}

fn item_to_result(item: &Value) -> Option<ApiResult> {
    match item {
        Value::Object(members) => Some(
            members
                .iter()
                .filter(|(_, v)| v.is_string() || v.is_number() || v.is_boolean())
                .fold(ApiResult::default(), |result, (name, value)| {
                    result.with_field(name.as_str(), value_to_string(value))
                }),
        ),
        Value::String(text) => Some(ApiResult::new(text.as_str())),
        _ => None,
    }
}

fn more_from(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The v2 API reports booleans either natively or as `"true"`/`"false"` strings.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
