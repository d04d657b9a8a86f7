use std::collections::BTreeMap;

/// One answer item returned by the knowledge API.
///
/// `text`, `html` and `plaintext` are parallel renderings of the same content.
/// Any other named attribute the API attaches (pod title, scanner, ...) lives in
/// `fields` and is reachable through [`ApiResult::field`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResult {
    text: String,
    html: String,
    plaintext: String,
    fields: BTreeMap<String, String>,
}

impl ApiResult {
    /// Creates a result whose three renderings all carry `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wolfram_tool::ApiResult;
    ///
    /// let result = ApiResult::new("x = 1");
    /// assert_eq!(result.text(), "x = 1");
    /// assert_eq!(result.plaintext(), "x = 1");
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            html: text.clone(),
            plaintext: text.clone(),
            text,
            fields: BTreeMap::new(),
        }
    }

    /// Creates a result with distinct renderings.
    pub fn with_renderings(
        text: impl Into<String>,
        html: impl Into<String>,
        plaintext: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            html: html.into(),
            plaintext: plaintext.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a named field.
    ///
    /// The reserved names `text`, `html` and `plaintext` update the matching
    /// rendering instead of the open field map.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "text" => self.text = value,
            "html" => self.html = value,
            "plaintext" => self.plaintext = value,
            _ => {
                self.fields.insert(name, value);
            }
        }
        self
    }

    /// Returns the default rendering.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the HTML rendering.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Returns the plaintext rendering.
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    /// Returns the open set of extra fields.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Looks up a field by name.
    ///
    /// Returns `None` when the result carries no attribute with that name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "text" => Some(&self.text),
            "html" => Some(&self.html),
            "plaintext" => Some(&self.plaintext),
            other => self.fields.get(other).map(String::as_str),
        }
    }
}
