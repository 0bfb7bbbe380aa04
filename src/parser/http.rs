// src/parser/http.rs
// =============================================================================
// The real PageParser: fetches a page and hands the HTML to parse_html.
//
// Supported URLs:
// - http:// and https:// are fetched with reqwest
// - file:// is read from disk (handy for local test sites and demos)
//
// Failure modes (all become a ParseError):
// - Network errors, timeouts (reqwest::Error)
// - Non-2xx status codes (404, 500, ...)
// - Missing local files
// - Any other URL scheme
// =============================================================================

use super::{parse_html, PageContent, PageParser, ParseError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub struct HttpPageParser {
    client: Client,
}

impl HttpPageParser {
    /// Builds a parser whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ParseError> {
        // We'll reuse this client for all requests (connection pooling)
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ParseError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ParseError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageParser for HttpPageParser {
    async fn parse(&self, url: &str) -> Result<PageContent, ParseError> {
        let parsed = Url::parse(url)?;

        let html = match parsed.scheme() {
            "http" | "https" => self.fetch_page(url).await?,
            "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|_| ParseError::UnsupportedScheme(url.to_string()))?;
                tokio::fs::read_to_string(path).await?
            }
            other => return Err(ParseError::UnsupportedScheme(other.to_string())),
        };

        tracing::debug!(url, bytes = html.len(), "fetched page");
        Ok(parse_html(&html, url))
    }
}
