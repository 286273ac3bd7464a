//! Result-page scanning.

use scraper::{Html, Selector};

use crate::error::LookupError;

/// Redirect wrapper some search engines put in front of result URLs.
const REDIRECT_PREFIX: &str = "/url?q=";

/// First link in document order whose target mentions `domain`, cleaned.
///
/// The domain match is a case-insensitive substring test on the raw `href`.
pub fn first_matching_link(html: &str, domain: &str) -> Result<Option<String>, LookupError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]")
        .map_err(|e| LookupError::Parse(format!("invalid anchor selector: {}", e)))?;

    let domain = domain.to_ascii_lowercase();

    Ok(document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.to_ascii_lowercase().contains(&domain))
        .map(clean_link))
}

/// Truncate at the first `&` and strip a leading redirect wrapper.
pub fn clean_link(href: &str) -> String {
    let truncated = href.split('&').next().unwrap_or(href);
    truncated
        .strip_prefix(REDIRECT_PREFIX)
        .unwrap_or(truncated)
        .to_string()
}
