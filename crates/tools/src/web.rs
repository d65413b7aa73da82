//! Built-in web capabilities: URL fetch and search.

use std::time::Duration;

use {async_trait::async_trait, serde_json::json};

use crate::capability::{Capability, CapabilityResult, ExecutionContext, Params, require_params};

const DEFAULT_SEARCH_ENDPOINT: &str = "https://lite.duckduckgo.com/lite/";

/// Strip HTML tags and collapse whitespace, keeping readable text only.
fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len() / 2);
    let mut in_tag = false;
    let mut last_space = true;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag => {},
            c if c.is_whitespace() => {
                if !last_space {
                    out.push(' ');
                    last_space = true;
                }
            },
            c => {
                out.push(c);
                last_space = false;
            },
        }
    }
    out.trim().to_string()
}

/// Truncate to at most `limit` bytes, backing off so a multi-byte
/// character is never split.
fn truncate_to_boundary(text: &mut String, limit: usize) {
    if text.len() <= limit {
        return;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent.to_string())
        .build()
}

// ── web.fetch ───────────────────────────────────────────────────────────────

/// Fetch the content of a URL, converting HTML responses to plain text.
pub struct WebFetchCapability {
    timeout: Duration,
    user_agent: String,
    max_output: usize,
}

impl WebFetchCapability {
    pub fn new(timeout_secs: u64, user_agent: impl Into<String>) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: user_agent.into(),
            max_output: 8_000,
        }
    }
}

#[async_trait]
impl Capability for WebFetchCapability {
    fn name(&self) -> &str {
        "web.fetch"
    }

    fn description(&self) -> &str {
        "Fetch content from a URL"
    }

    async fn execute(&self, params: &Params, _context: &ExecutionContext) -> CapabilityResult {
        if let Err(fail) = require_params(params, &["url"]) {
            return fail;
        }
        let url = &params["url"];

        let client = match build_client(self.timeout, &self.user_agent) {
            Ok(c) => c,
            Err(e) => return CapabilityResult::fail(format!("Failed to build client: {e}")),
        };

        let response = match client.get(url).send().await {
            Ok(r) => r,
            Err(e) => return CapabilityResult::fail(format!("Failed to fetch {url}: {e}")),
        };

        let status = response.status();
        if !status.is_success() {
            return CapabilityResult::fail(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown")
            ));
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("html"));

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return CapabilityResult::fail(format!("Failed to read body: {e}")),
        };

        let mut text = if is_html { html_to_text(&body) } else { body };
        let total = text.len();
        truncate_to_boundary(&mut text, self.max_output);

        CapabilityResult::ok(text)
            .with_metadata("url", json!(url))
            .with_metadata("content_length", json!(total))
    }
}

// ── web.search ──────────────────────────────────────────────────────────────

/// Search the web via an HTML search endpoint and return the result
/// page as plain text.
pub struct WebSearchCapability {
    timeout: Duration,
    user_agent: String,
    endpoint: String,
}

impl WebSearchCapability {
    pub fn new(timeout_secs: u64, user_agent: impl Into<String>) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: user_agent.into(),
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
        }
    }

    /// Point at a different search endpoint (used by tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Capability for WebSearchCapability {
    fn name(&self) -> &str {
        "web.search"
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    async fn execute(&self, params: &Params, _context: &ExecutionContext) -> CapabilityResult {
        if let Err(fail) = require_params(params, &["query"]) {
            return fail;
        }
        let query = &params["query"];

        let client = match build_client(self.timeout, &self.user_agent) {
            Ok(c) => c,
            Err(e) => return CapabilityResult::fail(format!("Failed to build client: {e}")),
        };

        let response = match client
            .get(&self.endpoint)
            .query(&[("q", query.as_str())])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return CapabilityResult::fail(format!("Search failed: {e}")),
        };

        if !response.status().is_success() {
            return CapabilityResult::fail(format!(
                "Search returned HTTP {}",
                response.status().as_u16()
            ));
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return CapabilityResult::fail(format!("Failed to read results: {e}")),
        };

        let mut text = html_to_text(&body);
        truncate_to_boundary(&mut text, 4_000);
        if text.is_empty() {
            return CapabilityResult::ok("No results found").with_metadata("query", json!(query));
        }

        CapabilityResult::ok(text).with_metadata("query", json!(query))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("u1", "msg")
    }

    #[test]
    fn html_to_text_strips_tags() {
        assert_eq!(
            html_to_text("<html><body><p>Hello <b>world</b></p></body></html>"),
            "Hello world"
        );
    }

    #[tokio::test]
    async fn fetch_plain_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("plain content")
            .create_async()
            .await;

        let cap = WebFetchCapability::new(5, "courier-test");
        let url = format!("{}/page", server.url());
        let result = cap.execute(&params(&[("url", &url)]), &ctx()).await;

        mock.assert_async().await;
        assert!(result.success);
        assert_eq!(result.output, "plain content");
    }

    #[tokio::test]
    async fn fetch_html_is_converted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/doc")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<h1>Title</h1><p>Body text</p>")
            .create_async()
            .await;

        let cap = WebFetchCapability::new(5, "courier-test");
        let url = format!("{}/doc", server.url());
        let result = cap.execute(&params(&[("url", &url)]), &ctx()).await;

        assert!(result.success);
        assert_eq!(result.output, "Title Body text");
    }

    #[tokio::test]
    async fn fetch_truncates_multibyte_body_on_char_boundary() {
        let mut server = mockito::Server::new_async().await;
        // 8001 bytes; the 8000-byte limit falls inside the final 'é'.
        let body = format!("a{}", "é".repeat(4000));
        server
            .mock("GET", "/big")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body(&body)
            .create_async()
            .await;

        let cap = WebFetchCapability::new(5, "courier-test");
        let url = format!("{}/big", server.url());
        let result = cap.execute(&params(&[("url", &url)]), &ctx()).await;

        assert!(result.success);
        assert!(result.output.len() <= 8_000);
        assert!(result.output.ends_with('é'));
        assert_eq!(result.metadata["content_length"], 8_001);
    }

    #[tokio::test]
    async fn search_truncates_multibyte_results_on_char_boundary() {
        let mut server = mockito::Server::new_async().await;
        let body = format!("<div>{}</div>", "ü".repeat(3000));
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let cap = WebSearchCapability::new(5, "courier-test").with_endpoint(server.url());
        let result = cap.execute(&params(&[("query", "umlauts")]), &ctx()).await;

        assert!(result.success);
        assert!(result.output.len() <= 4_000);
        assert!(result.output.ends_with('ü'));
    }

    #[test]
    fn truncate_backs_off_to_char_boundary() {
        let mut text = "aé".to_string();
        truncate_to_boundary(&mut text, 2);
        assert_eq!(text, "a");

        let mut short = "abc".to_string();
        truncate_to_boundary(&mut short, 10);
        assert_eq!(short, "abc");
    }

    #[tokio::test]
    async fn fetch_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let cap = WebFetchCapability::new(5, "courier-test");
        let url = format!("{}/missing", server.url());
        let result = cap.execute(&params(&[("url", &url)]), &ctx()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn search_returns_text_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<div>rust tutorials result one</div>")
            .create_async()
            .await;

        let cap = WebSearchCapability::new(5, "courier-test").with_endpoint(server.url());
        let result = cap
            .execute(&params(&[("query", "rust tutorials")]), &ctx())
            .await;

        assert!(result.success);
        assert!(result.output.contains("rust tutorials result one"));
        assert_eq!(result.metadata["query"], "rust tutorials");
    }

    #[tokio::test]
    async fn fetch_missing_url_param() {
        let cap = WebFetchCapability::new(5, "courier-test");
        let result = cap.execute(&Params::new(), &ctx()).await;
        assert!(!result.success);
    }
}
