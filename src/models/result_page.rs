use super::ApiResult;

/// One page of results from the knowledge API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    /// Whether the API understood the query
    pub success: bool,
    /// The input string echoed back by the API, if any
    pub input_query: Option<String>,
    /// Answer items in API order
    pub results: Vec<ApiResult>,
    /// Continuation reference for further results of the same answer
    pub more_from: Option<String>,
}

impl ResultPage {
    /// Creates a successful page holding `results`.
    pub fn success(results: Vec<ApiResult>) -> Self {
        Self {
            success: true,
            results,
            ..Self::default()
        }
    }

    /// Creates a page for a query the API could not interpret.
    pub fn failure() -> Self {
        Self::default()
    }

    /// Sets the echoed input query.
    #[must_use]
    pub fn with_input_query(mut self, input_query: impl Into<String>) -> Self {
        self.input_query = Some(input_query.into());
        self
    }

    /// Sets the continuation reference.
    #[must_use]
    pub fn with_more_from(mut self, more_from: impl Into<String>) -> Self {
        self.more_from = Some(more_from.into());
        self
    }
}
