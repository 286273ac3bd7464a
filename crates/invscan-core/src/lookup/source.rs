//! Link sources: how one retailer link is found for a query.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::LookupError;
use crate::models::config::LookupConfig;

use super::html::first_matching_link;

/// Resolves one retailer-scoped link for a product number.
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// First plausible result URL on `domain` for `query`, if any.
    async fn resolve_link(&self, domain: &str, query: &str) -> Result<Option<String>, LookupError>;
}

/// Retrieves a search result page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// HTML of the result page for a search query.
    async fn fetch(&self, query: &str) -> Result<String, LookupError>;
}

/// Fetches result pages from a general web-search endpoint.
pub struct HttpFetcher {
    client: reqwest::Client,
    search_url: String,
}

impl HttpFetcher {
    /// Build a client with the configured User-Agent and timeout.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        if config.timeout_secs == 0 {
            return Err(LookupError::Config(
                "lookup.timeout_secs must be at least 1".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, query: &str) -> Result<String, LookupError> {
        let html = self
            .client
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(html)
    }
}

/// Scrapes a web-search result page for the first link on the retailer domain.
pub struct WebSearchSource<F: PageFetcher> {
    fetcher: F,
}

impl<F: PageFetcher> WebSearchSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl WebSearchSource<HttpFetcher> {
    /// Web search over HTTP using the lookup configuration.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        Ok(Self::new(HttpFetcher::from_config(config)?))
    }
}

/// `site:`-scoped search query.
pub fn scoped_query(domain: &str, query: &str) -> String {
    format!("site:{} {}", domain, query)
}

#[async_trait]
impl<F: PageFetcher> LinkSource for WebSearchSource<F> {
    async fn resolve_link(&self, domain: &str, query: &str) -> Result<Option<String>, LookupError> {
        let scoped = scoped_query(domain, query);
        debug!("Searching: {}", scoped);

        let html = self.fetcher.fetch(&scoped).await?;
        debug!("Result page for {}: {} bytes", domain, html.len());

        first_matching_link(&html, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{Retailer, RetailerLinkResolver};
    use crate::test_support::{serve, Reply};
    use pretty_assertions::assert_eq;

    fn config(search_url: String) -> LookupConfig {
        LookupConfig {
            search_url,
            timeout_secs: 1,
            ..LookupConfig::default()
        }
    }

    #[tokio::test]
    async fn test_request_carries_query_and_user_agent() {
        let page = r#"<a href="https://www.lowes.com/x&utm=1">L</a>"#.to_string();
        let (base, log) = serve(vec![Reply::Status(200, page)]).await;
        let source = WebSearchSource::from_config(&config(format!("{}/search", base))).unwrap();

        let link = source.resolve_link("lowes.com", "K-1").await.unwrap();
        assert_eq!(link.as_deref(), Some("https://www.lowes.com/x"));

        let request = log.lock().unwrap()[0].clone();
        assert!(request.starts_with("GET /search?q=site%3Alowes.com+K-1 HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("user-agent: mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let (base, _log) = serve(vec![Reply::Status(503, "busy".to_string())]).await;
        let fetcher = HttpFetcher::from_config(&config(base)).unwrap();

        assert!(matches!(fetcher.fetch("site:lowes.com K-1").await, Err(LookupError::Http(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let (base, _log) = serve(vec![Reply::Hang]).await;
        let fetcher = HttpFetcher::from_config(&config(base)).unwrap();

        match fetcher.fetch("site:lowes.com K-1").await {
            Err(LookupError::Http(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other.map(|html| html.len())),
        }
    }

    #[tokio::test]
    async fn test_http_failures_only_clear_their_retailer() {
        let (base, log) = serve(vec![
            Reply::Status(
                200,
                r#"<a href="/url?q=https://www.ferguson.com/p/K-1&sa=U">F</a>"#.to_string(),
            ),
            Reply::Status(503, "busy".to_string()),
            Reply::Hang,
        ])
        .await;
        let resolver = RetailerLinkResolver::new(WebSearchSource::from_config(&config(base)).unwrap())
            .with_concurrency(false);

        let links = resolver.resolve("K-1").await;

        assert_eq!(links.get(Retailer::Ferguson), Some("https://www.ferguson.com/p/K-1"));
        assert_eq!(links.get(Retailer::HomeDepot), None);
        assert_eq!(links.get(Retailer::Lowes), None);
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = LookupConfig {
            timeout_secs: 0,
            ..LookupConfig::default()
        };
        assert!(matches!(HttpFetcher::from_config(&config), Err(LookupError::Config(_))));
    }
}
