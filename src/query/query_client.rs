//! Query pipeline: request, pagination, formatting.

use std::sync::Arc;

use crate::config::DEFAULT_MAX_PAGES;
use crate::formatter;
use crate::models::QueryOptions;
use crate::wolfram::{WolframClientTrait, WolframError};

use super::types::QueryOutcome;

/// Answers natural language queries through the knowledge API.
///
/// `query` never fails: every error is logged and turned into an
/// `"Error: ..."` string so an agent always gets text back.
pub struct QueryClient {
    client: Arc<dyn WolframClientTrait>,
    max_pages: usize,
}

impl QueryClient {
    /// Creates a new `QueryClient` with the specified transport.
    #[must_use]
    pub fn new(client: Arc<dyn WolframClientTrait>) -> Self {
        Self {
            client,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Sets how many continuation pages a single query may follow.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Returns the continuation page cap.
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Runs a query and returns the formatted answer text.
    ///
    /// # Returns
    ///
    /// One of:
    /// - `"Input Query: <query>\n\nResult: <results>"` on success
    /// - `"Query failed. Please check your query syntax."`
    /// - `"No results found."`
    /// - `"Error: <message>"` for any transport or API failure
    pub fn query(&self, text: &str, options: &QueryOptions) -> String {
        match self.execute(text, options) {
            Ok(outcome) => outcome.render(options),
            Err(e) => {
                tracing::error!(category = e.category(), error = %e, "knowledge query failed");
                format!("Error: {}", e)
            }
        }
    }

    /// Runs a query and returns the typed outcome.
    ///
    /// Continuation pages are followed one after another until the chain ends
    /// or `max_pages` pages have been fetched; hitting the cap keeps what was
    /// collected so far.
    ///
    /// # Errors
    ///
    /// Returns `WolframError::EmptyQuery` for blank input without touching the
    /// network, or the transport's error if any request fails.
    pub fn execute(&self, text: &str, options: &QueryOptions) -> Result<QueryOutcome, WolframError> {
        if text.trim().is_empty() {
            return Err(WolframError::EmptyQuery);
        }

        let page = self.client.query(text, &options.params)?;

        if !page.success {
            return Ok(QueryOutcome::Failed);
        }

        let Some(first) = page.results.first() else {
            return Ok(QueryOutcome::NoResults);
        };
        tracing::debug!(
            answer = formatter::render(first, options.format),
            "received primary result"
        );

        let input_query = page.input_query.unwrap_or_else(|| text.to_string());
        let mut results = page.results;
        let mut next = page.more_from;
        let mut fetched = 0;

        while let Some(token) = next {
            if fetched >= self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    more_from = %token,
                    "continuation page cap reached, ignoring remaining pages"
                );
                break;
            }

            let page = self.client.fetch_page(&token)?;
            fetched += 1;
            results.extend(page.results);
            next = page.more_from;
        }

        Ok(QueryOutcome::Answer {
            input_query,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiResult, FieldFilter, ResponseFormat, ResultPage};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Stub transport serving a fixed first page and a token-keyed page map.
    #[derive(Default)]
    struct MockWolframClient {
        first: Option<ResultPage>,
        pages: HashMap<String, ResultPage>,
        queries: Mutex<Vec<(String, Vec<(String, String)>)>>,
        fetches: Mutex<Vec<String>>,
    }

    impl MockWolframClient {
        fn answering(first: ResultPage) -> Self {
            Self {
                first: Some(first),
                ..Self::default()
            }
        }

        fn page(mut self, token: &str, page: ResultPage) -> Self {
            self.pages.insert(token.to_string(), page);
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }
    }

    impl WolframClientTrait for MockWolframClient {
        fn query(
            &self,
            input: &str,
            params: &[(String, String)],
        ) -> Result<ResultPage, WolframError> {
            self.queries
                .lock()
                .unwrap()
                .push((input.to_string(), params.to_vec()));
            self.first.clone().ok_or_else(|| WolframError::Api {
                message: "no stubbed response".to_string(),
            })
        }

        fn fetch_page(&self, more_from: &str) -> Result<ResultPage, WolframError> {
            self.fetches.lock().unwrap().push(more_from.to_string());
            self.pages
                .get(more_from)
                .cloned()
                .ok_or(WolframError::Http { status: 404 })
        }
    }

    fn client_with(mock: MockWolframClient) -> (Arc<MockWolframClient>, QueryClient) {
        let mock = Arc::new(mock);
        let client = QueryClient::new(mock.clone());
        (mock, client)
    }

    #[test]
    fn query_formats_single_result() {
        let page = ResultPage::success(vec![ApiResult::new("1.52 au")])
            .with_input_query("distance earth mars");
        let (_, client) = client_with(MockWolframClient::answering(page));

        let output = client.query("distance from earth to mars", &QueryOptions::default());
        assert_eq!(output, "Input Query: distance earth mars\n\nResult: 1.52 au");
    }

    #[test]
    fn query_echoes_sent_text_when_api_does_not() {
        let page = ResultPage::success(vec![ApiResult::new("4")]);
        let (_, client) = client_with(MockWolframClient::answering(page));

        let output = client.query("2+2", &QueryOptions::default());
        assert_eq!(output, "Input Query: 2+2\n\nResult: 4");
    }

    #[test]
    fn query_failure_returns_syntax_message() {
        let (mock, client) = client_with(MockWolframClient::answering(ResultPage::failure()));

        let output = client.query("asdf qwer", &QueryOptions::default());
        assert_eq!(output, "Query failed. Please check your query syntax.");
        assert_eq!(mock.fetch_count(), 0);
    }

    #[test]
    fn query_without_results_returns_no_results_message() {
        let page = ResultPage::success(Vec::new()).with_more_from("p1");
        let (mock, client) = client_with(MockWolframClient::answering(page));

        let output = client.query("something obscure", &QueryOptions::default());
        assert_eq!(output, "No results found.");
        assert_eq!(mock.fetch_count(), 0);
    }

    #[test]
    fn empty_query_issues_no_request() {
        let (mock, client) = client_with(MockWolframClient::default());

        let output = client.query("   ", &QueryOptions::default());
        assert_eq!(output, "Error: Query cannot be empty");
        assert!(mock.queries.lock().unwrap().is_empty());
    }

    #[test]
    fn query_passes_params_through() {
        let page = ResultPage::success(vec![ApiResult::new("20 °C")]);
        let (mock, client) = client_with(MockWolframClient::answering(page));

        let options = QueryOptions::new().param("units", "metric");
        client.query("weather in Boston", &options);

        let queries = mock.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].0, "weather in Boston");
        assert_eq!(
            queries[0].1,
            vec![("units".to_string(), "metric".to_string())]
        );
    }

    #[test]
    fn pagination_follows_chain_until_exhausted() {
        let first = ResultPage::success(vec![ApiResult::new("r0")]).with_more_from("p1");
        let mock = MockWolframClient::answering(first)
            .page(
                "p1",
                ResultPage::success(vec![ApiResult::new("r1")]).with_more_from("p2"),
            )
            .page(
                "p2",
                ResultPage::success(vec![ApiResult::new("r2a"), ApiResult::new("r2b")])
                    .with_more_from("p3"),
            )
            .page("p3", ResultPage::success(vec![ApiResult::new("r3")]));
        let (mock, client) = client_with(mock);

        let outcome = client.execute("q", &QueryOptions::default()).unwrap();
        let QueryOutcome::Answer { results, .. } = outcome else {
            panic!("expected an answer");
        };

        let texts: Vec<&str> = results.iter().map(ApiResult::text).collect();
        assert_eq!(texts, vec!["r0", "r1", "r2a", "r2b", "r3"]);
        assert_eq!(*mock.fetches.lock().unwrap(), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn pagination_stops_at_cap_on_cycle() {
        let first = ResultPage::success(vec![ApiResult::new("r0")]).with_more_from("a");
        let mock = MockWolframClient::answering(first)
            .page(
                "a",
                ResultPage::success(vec![ApiResult::new("ra")]).with_more_from("b"),
            )
            .page(
                "b",
                ResultPage::success(vec![ApiResult::new("rb")]).with_more_from("a"),
            );
        let mock = Arc::new(mock);
        let client = QueryClient::new(mock.clone()).with_max_pages(5);

        let outcome = client.execute("q", &QueryOptions::default()).unwrap();
        let QueryOutcome::Answer { results, .. } = outcome else {
            panic!("expected an answer");
        };

        assert_eq!(mock.fetch_count(), 5);
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn zero_page_cap_skips_continuations() {
        let first = ResultPage::success(vec![ApiResult::new("r0")]).with_more_from("p1");
        let mock = Arc::new(MockWolframClient::answering(first));
        let client = QueryClient::new(mock.clone()).with_max_pages(0);

        let output = client.query("q", &QueryOptions::default());
        assert_eq!(output, "Input Query: q\n\nResult: r0");
        assert_eq!(mock.fetch_count(), 0);
    }

    #[test]
    fn pagination_failure_becomes_error_string() {
        let first = ResultPage::success(vec![ApiResult::new("r0")]).with_more_from("missing");
        let (_, client) = client_with(MockWolframClient::answering(first));

        let output = client.query("q", &QueryOptions::default());
        assert_eq!(output, "Error: HTTP error: status 404");
    }

    #[test]
    fn api_error_becomes_error_string() {
        let (_, client) = client_with(MockWolframClient::default());

        let output = client.query("q", &QueryOptions::default());
        assert_eq!(output, "Error: Wolfram|Alpha API error: no stubbed response");
    }

    #[test]
    fn filters_apply_to_every_page() {
        let first = ResultPage::success(vec![ApiResult::new("A B").with_field("note", "B")])
            .with_more_from("p1");
        let mock = MockWolframClient::answering(first).page(
            "p1",
            ResultPage::success(vec![ApiResult::new("C D").with_field("note", "D")]),
        );
        let (_, client) = client_with(mock);

        let exclude = QueryOptions::new().filter(FieldFilter::Exclude(vec!["note".to_string()]));
        assert_eq!(client.query("q", &exclude), "Input Query: q\n\nResult: A \n\nC ");

        let include = QueryOptions::new().filter(FieldFilter::Include(vec!["note".to_string()]));
        assert_eq!(client.query("q", &include), "Input Query: q\n\nResult: B\n\nD");
    }

    #[test]
    fn plaintext_format_selects_plaintext_rendering() {
        let page = ResultPage::success(vec![ApiResult::with_renderings("t", "<b>t</b>", "plain")]);
        let (_, client) = client_with(MockWolframClient::answering(page));

        let options = QueryOptions::new().format(ResponseFormat::Plaintext);
        assert_eq!(client.query("q", &options), "Input Query: q\n\nResult: plain");
    }

    #[test]
    fn default_max_pages() {
        let (_, client) = client_with(MockWolframClient::default());
        assert_eq!(client.max_pages(), 50);
    }
}
