//! Retailer link lookup.

mod html;
mod source;

pub use html::{clean_link, first_matching_link};
pub use source::{scoped_query, HttpFetcher, LinkSource, PageFetcher, WebSearchSource};

use std::fmt;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

/// The three retailers searched for every product number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Retailer {
    Ferguson,
    HomeDepot,
    Lowes,
}

impl Retailer {
    /// Fixed lookup order.
    pub const ALL: [Retailer; 3] = [Retailer::Ferguson, Retailer::HomeDepot, Retailer::Lowes];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Retailer::Ferguson => "Ferguson",
            Retailer::HomeDepot => "Home Depot",
            Retailer::Lowes => "Lowe's",
        }
    }

    /// Web domain that scopes the search and qualifies result links.
    pub fn domain(self) -> &'static str {
        match self {
            Retailer::Ferguson => "ferguson.com",
            Retailer::HomeDepot => "homedepot.com",
            Retailer::Lowes => "lowes.com",
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-retailer lookup results. `None` means searched but not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetailerLinks {
    ferguson: Option<String>,
    home_depot: Option<String>,
    lowes: Option<String>,
}

impl RetailerLinks {
    /// Link found for a retailer.
    pub fn get(&self, retailer: Retailer) -> Option<&str> {
        self.slot(retailer).as_deref()
    }

    /// Set the result for a retailer.
    pub fn insert(&mut self, retailer: Retailer, link: Option<String>) {
        *self.slot_mut(retailer) = link;
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, retailer: Retailer, link: Option<String>) -> Self {
        self.insert(retailer, link);
        self
    }

    /// Retailers in lookup order with their result.
    pub fn iter(&self) -> impl Iterator<Item = (Retailer, Option<&str>)> {
        Retailer::ALL.into_iter().map(|r| (r, self.get(r)))
    }

    fn slot(&self, retailer: Retailer) -> &Option<String> {
        match retailer {
            Retailer::Ferguson => &self.ferguson,
            Retailer::HomeDepot => &self.home_depot,
            Retailer::Lowes => &self.lowes,
        }
    }

    fn slot_mut(&mut self, retailer: Retailer) -> &mut Option<String> {
        match retailer {
            Retailer::Ferguson => &mut self.ferguson,
            Retailer::HomeDepot => &mut self.home_depot,
            Retailer::Lowes => &mut self.lowes,
        }
    }
}

/// Looks a product number up at every retailer.
///
/// Each retailer is independent: a failed or empty lookup only clears that
/// retailer's link.
pub struct RetailerLinkResolver<S: LinkSource> {
    source: S,
    concurrent: bool,
}

impl<S: LinkSource> RetailerLinkResolver<S> {
    /// Create a resolver that queries retailers concurrently.
    pub fn new(source: S) -> Self {
        Self {
            source,
            concurrent: true,
        }
    }

    /// Query retailers concurrently (at most three in flight) or one by one.
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve links for all retailers.
    pub async fn resolve(&self, product_number: &str) -> RetailerLinks {
        let lookups = Retailer::ALL.map(|retailer| self.lookup(retailer, product_number));

        let results = if self.concurrent {
            join_all(lookups).await
        } else {
            let mut results = Vec::with_capacity(lookups.len());
            for lookup in lookups {
                results.push(lookup.await);
            }
            results
        };

        let mut links = RetailerLinks::default();
        for (retailer, link) in Retailer::ALL.into_iter().zip(results) {
            links.insert(retailer, link);
        }
        links
    }

    async fn lookup(&self, retailer: Retailer, product_number: &str) -> Option<String> {
        match self.source.resolve_link(retailer.domain(), product_number).await {
            Ok(Some(link)) => {
                info!("{}: {}", retailer, link);
                Some(link)
            }
            Ok(None) => {
                info!("{}: no matching link", retailer);
                None
            }
            Err(e) => {
                warn!("{} lookup failed: {}", retailer, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Serves canned result pages keyed by the retailer domain in the query.
    struct CannedPages {
        queries: Mutex<Vec<String>>,
    }

    impl CannedPages {
        fn new() -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for CannedPages {
        async fn fetch(&self, query: &str) -> Result<String, LookupError> {
            self.queries.lock().unwrap().push(query.to_string());

            if query.starts_with("site:ferguson.com") {
                Ok(r#"<a href="/url?q=https://www.ferguson.com/product/K-3999&sa=U">F</a>"#.to_string())
            } else if query.starts_with("site:homedepot.com") {
                Err(LookupError::Fetch("connection reset".to_string()))
            } else {
                Ok(r#"<a href="https://example.com">x</a><a href="https://www.lowes.com/pd/1&x=y">L</a>"#.to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let resolver = RetailerLinkResolver::new(WebSearchSource::new(CannedPages::new()));
        let links = resolver.resolve("K-3999").await;

        assert_eq!(links.get(Retailer::Ferguson), Some("https://www.ferguson.com/product/K-3999"));
        assert_eq!(links.get(Retailer::HomeDepot), None);
        assert_eq!(links.get(Retailer::Lowes), Some("https://www.lowes.com/pd/1"));
    }

    #[tokio::test]
    async fn test_sequential_matches_concurrent() {
        let concurrent = RetailerLinkResolver::new(WebSearchSource::new(CannedPages::new()))
            .resolve("K-3999")
            .await;

        let sequential = RetailerLinkResolver::new(WebSearchSource::new(CannedPages::new()))
            .with_concurrency(false)
            .resolve("K-3999")
            .await;

        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn test_queries_are_domain_scoped_in_order() {
        let resolver = RetailerLinkResolver::new(WebSearchSource::new(CannedPages::new()))
            .with_concurrency(false);
        resolver.resolve("ABC-123 blue").await;

        let queries = resolver.source.fetcher().queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![
                "site:ferguson.com ABC-123 blue",
                "site:homedepot.com ABC-123 blue",
                "site:lowes.com ABC-123 blue",
            ]
        );
    }

    #[test]
    fn test_links_iter_order() {
        let links = RetailerLinks::default().with(Retailer::Lowes, Some("l".to_string()));
        let collected: Vec<_> = links.iter().collect();

        assert_eq!(
            collected,
            vec![
                (Retailer::Ferguson, None),
                (Retailer::HomeDepot, None),
                (Retailer::Lowes, Some("l")),
            ]
        );
    }
}
