//! Walking pretalx's paginated list endpoints.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::fetch::{HttpClient, fetch_json};

/// The list envelope pretalx wraps around every collection.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<Value>,
}

impl Page {
    fn from_value(url: &str, value: Value) -> Result<Self> {
        if value.get("results").is_none_or(|r| !r.is_array()) {
            return Err(ApiError::MissingResults {
                url: url.to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Fetches `first_url` and follows `next` links until there are none left,
/// collecting the records for which `keep` returns `true`.
///
/// Stops early with a warning if a `next` link points at a page that was
/// already fetched.
pub async fn fetch_all_pages<C, F>(client: &C, first_url: &str, mut keep: F) -> Result<Vec<Value>>
where
    C: HttpClient + ?Sized,
    F: FnMut(&Value) -> bool,
{
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut next_url = Some(first_url.to_string());
    let mut page_count = 0usize;

    while let Some(url) = next_url.take() {
        if !seen.insert(url.clone()) {
            warn!(url = %url, "Pagination loop detected, stopping");
            break;
        }

        let page = Page::from_value(&url, fetch_json(client, &url).await?)?;
        page_count += 1;
        debug!(url = %url, page = page_count, records = page.results.len(), "Fetched page");

        records.extend(page.results.into_iter().filter(|r| keep(r)));
        next_url = page.next.filter(|n| !n.is_empty());
    }

    debug!(pages = page_count, kept = records.len(), "Pagination finished");
    Ok(records)
}
