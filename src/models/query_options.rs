use std::fmt;

use serde::{Deserialize, Serialize};

/// Which rendering of each result to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// The `text` rendering.
    #[default]
    Default,
    /// The `html` rendering.
    Html,
    /// The `plaintext` rendering.
    Plaintext,
}

impl ResponseFormat {
    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "html" => Some(Self::Html),
            "plaintext" => Some(Self::Plaintext),
            _ => None,
        }
    }

    /// Parse, falling back to [`ResponseFormat::Default`] on unrecognised input.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Html => write!(f, "html"),
            Self::Plaintext => write!(f, "plaintext"),
        }
    }
}

/// Include/exclude filter over result field names.
///
/// Include and exclude never apply together: [`FieldFilter::from_lists`]
/// lets the include list win when both are given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldFilter {
    /// Emit the selected rendering unchanged.
    #[default]
    None,
    /// Emit only the named fields, newline-joined.
    Include(Vec<String>),
    /// Emit the selected rendering with the named fields' text removed.
    Exclude(Vec<String>),
}

impl FieldFilter {
    /// Builds a filter from optional include and exclude lists.
    ///
    /// # Examples
    ///
    /// ```
    /// use wolfram_tool::FieldFilter;
    ///
    /// let include = vec!["title".to_string()];
    /// let exclude = vec!["text".to_string()];
    /// let filter = FieldFilter::from_lists(&include, &exclude);
    /// assert_eq!(filter, FieldFilter::Include(include));
    /// ```
    pub fn from_lists(include: &[String], exclude: &[String]) -> Self {
        if !include.is_empty() {
            Self::Include(include.to_vec())
        } else if !exclude.is_empty() {
            Self::Exclude(exclude.to_vec())
        } else {
            Self::None
        }
    }
}

/// Per-call options for a knowledge query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Rendering to use for each result
    pub format: ResponseFormat,
    /// Field include/exclude filter
    pub filter: FieldFilter,
    /// Extra query parameters passed through to the initial API request
    pub params: Vec<(String, String)>,
}

impl QueryOptions {
    /// Creates options with the default rendering, no filter and no extra params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response format.
    #[must_use]
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the field filter.
    #[must_use]
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Appends a pass-through API parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}
