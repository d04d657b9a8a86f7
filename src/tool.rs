//! Agent-facing tool surface.
//!
//! Orchestration frameworks see a tool as a name, a description, a JSON
//! parameter schema and a call that always yields text.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::{FieldFilter, QueryOptions, ResponseFormat};
use crate::query::QueryClient;

/// A callable unit an agent can invoke to produce text.
pub trait Tool: Send + Sync {
    /// Tool name shown to the agent.
    fn name(&self) -> &str;

    /// One-line description shown to the agent.
    fn description(&self) -> &str;

    /// JSON schema of the accepted arguments.
    fn parameters_schema(&self) -> Value;

    /// Runs the tool. Failures are reported in the returned text.
    fn run(&self, args: &Value) -> String;
}

/// Optional arguments accepted next to `query`.
///
/// Every field may be omitted or `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToolOptions {
    format: Option<String>,
    include_fields: Option<Vec<String>>,
    exclude_fields: Option<Vec<String>>,
    params: Option<BTreeMap<String, String>>,
}

impl From<ToolOptions> for QueryOptions {
    fn from(options: ToolOptions) -> Self {
        Self {
            format: options
                .format
                .as_deref()
                .map(ResponseFormat::parse_or_default)
                .unwrap_or_default(),
            filter: FieldFilter::from_lists(
                &options.include_fields.unwrap_or_default(),
                &options.exclude_fields.unwrap_or_default(),
            ),
            params: options.params.unwrap_or_default().into_iter().collect(),
        }
    }
}

/// Wolfram|Alpha exposed as an agent tool.
pub struct WolframAlphaTool {
    client: QueryClient,
}

impl WolframAlphaTool {
    pub const NAME: &'static str = "Wolfram Alpha Tool";
    pub const DESCRIPTION: &'static str = "Queries Wolfram Alpha for information.";

    /// Creates the tool around a configured query client.
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }
}

impl Tool for WolframAlphaTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search in Wolfram Alpha"
                },
                "format": {
                    "type": "string",
                    "enum": ["default", "html", "plaintext"],
                    "description": "Which rendering of each result to return (default: default)"
                },
                "include_fields": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Only return these result fields"
                },
                "exclude_fields": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Remove these fields' text from each result"
                },
                "params": {
                    "type": "object",
                    "additionalProperties": {"type": "string"},
                    "description": "Extra Wolfram Alpha API parameters"
                }
            },
            "required": ["query"]
        })
    }

    fn run(&self, args: &Value) -> String {
        let Some(query) = args.get("query").and_then(|v| v.as_str()) else {
            return "Error: Missing 'query' argument".to_string();
        };

        match serde_json::from_value::<ToolOptions>(args.clone()) {
            Ok(options) => self.client.query(query, &QueryOptions::from(options)),
            Err(e) => format!("Error: Invalid arguments: {}", e),
        }
    }
}
