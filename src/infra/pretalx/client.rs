use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::fetch::auth::TokenAuth;
use crate::fetch::{BasicClient, HttpClient};
use crate::infra::pretalx::pages::fetch_all_pages;
use crate::model::{Submission, track_matches};
use crate::services::conference_api::ConferenceApi;

/// [`ConferenceApi`] backed by the pretalx REST API of a single event.
pub struct PretalxClient {
    config: ApiConfig,
    http: Box<dyn HttpClient>,
}

impl PretalxClient {
    /// Builds the HTTP stack from `config`, adding token authentication
    /// when a token is configured.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let basic = BasicClient::new(config.timeout)?;
        let http: Box<dyn HttpClient> = match config.auth_token.as_deref() {
            Some(token) => Box::new(TokenAuth::new(basic, token)?),
            None => Box::new(basic),
        };
        Ok(Self { config, http })
    }

    /// Uses a caller-supplied HTTP client as-is.
    pub fn with_client(config: ApiConfig, http: Box<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl ConferenceApi for PretalxClient {
    async fn list_submissions(&self, track: Option<&str>) -> Result<Vec<Submission>> {
        let track = track.unwrap_or_default();
        let url = self.config.submissions_url();
        info!(url = %url, track, "Fetching submissions");

        let records =
            fetch_all_pages(self.http.as_ref(), &url, |record| track_matches(record, track))
                .await?;

        info!(count = records.len(), "Submissions fetched");
        Ok(records.into_iter().map(Submission::from_value).collect())
    }

    async fn list_reviews(&self, submission_code: &str) -> Result<Vec<Value>> {
        let url = self.config.reviews_url(submission_code)?;
        fetch_all_pages(self.http.as_ref(), &url, |_| true).await
    }
}
