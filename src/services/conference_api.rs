//! Trait for reading submissions and reviews from a conference system.

use crate::error::Result;
use crate::model::{Submission, Review};
use serde_json::Value;

/// Abstraction over a conference management backend (e.g., pretalx).
#[async_trait::async_trait]
pub trait ConferenceApi: Send + Sync {
    /// Returns every submission of the event, keeping only those whose track
    /// name contains `track` when one is given.
    async fn list_submissions(&self, track: Option<&str>) -> Result<Vec<Submission>>;

    /// Returns the raw review records for one submission.
    ///
    /// Records are left unparsed so callers can decide how to treat
    /// malformed entries.
    async fn list_reviews(&self, submission_code: &str) -> Result<Vec<Value>>;
}

/// Parses every review record, failing on the first malformed one.
pub fn parse_reviews(records: &[Value]) -> Result<Vec<Review>> {
    records.iter().map(Review::from_value).collect()
}
