pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod model;
pub mod output;
pub mod services;
pub mod stats;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use infra::pretalx::PretalxClient;
pub use services::conference_api::ConferenceApi;
