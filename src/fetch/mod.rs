//! HTTP plumbing: a pluggable client trait, a plain reqwest client, token
//! authentication, and a JSON GET helper.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};

/// GETs `url` and decodes the body as JSON.
///
/// Non-success statuses become [`ApiError::Status`] with the response body
/// attached.
pub async fn fetch_json<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Value> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    debug!(url, %status, "Response received");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status,
            url: url.to_string(),
            body,
        });
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
