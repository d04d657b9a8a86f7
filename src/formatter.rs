//! Result rendering and field filtering.
//!
//! Turns `ApiResult` items into the text handed back to callers: pick a
//! rendering, apply the include/exclude filter, then join.

use crate::models::{ApiResult, FieldFilter, ResponseFormat};

/// Separator between formatted results.
const RESULT_SEPARATOR: &str = "\n\n";

/// Returns the rendering of `result` selected by `format`.
pub fn render(result: &ApiResult, format: ResponseFormat) -> &str {
    match format {
        ResponseFormat::Default => result.text(),
        ResponseFormat::Html => result.html(),
        ResponseFormat::Plaintext => result.plaintext(),
    }
}

/// Formats a single result.
///
/// Field names that resolve to nothing are skipped silently.
pub fn format_result(result: &ApiResult, format: ResponseFormat, filter: &FieldFilter) -> String {
    match filter {
        FieldFilter::Include(names) => names
            .iter()
            .filter_map(|name| result.field(name))
            .collect::<Vec<_>>()
            .join("\n"),
        FieldFilter::Exclude(names) => names
            .iter()
            .filter_map(|name| result.field(name))
            .filter(|value| !value.is_empty())
            .fold(render(result, format).to_string(), |acc, value| {
                acc.replace(value, "")
            }),
        FieldFilter::None => render(result, format).to_string(),
    }
}

/// Formats every result and joins them with a blank line.
pub fn format_results(results: &[ApiResult], format: ResponseFormat, filter: &FieldFilter) -> String {
    results
        .iter()
        .map(|result| format_result(result, format, filter))
        .collect::<Vec<_>>()
        .join(RESULT_SEPARATOR)
}
