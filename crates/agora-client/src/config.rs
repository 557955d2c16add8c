//! Client configuration, loaded from the environment.

use crate::error::ClientError;

/// Default API base URL when `AGORA_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Where and as whom the client talks to the interaction API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub api_url: String,
    /// Bearer token identifying the signed-in user.
    pub token: String,
}

impl ClientConfig {
    /// Build a configuration, trimming any trailing `/` from `api_url`.
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `AGORA_API_URL` -- API base URL (default `http://localhost:8080`)
    /// - `AGORA_TOKEN` -- bearer token (required)
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `AGORA_TOKEN` is missing or empty.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url = std::env::var("AGORA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let token = std::env::var("AGORA_TOKEN")
            .map_err(|e| ClientError::Config(format!("missing required env var AGORA_TOKEN: {e}")))?;
        if token.trim().is_empty() {
            return Err(ClientError::Config("AGORA_TOKEN is empty".to_owned()));
        }
        Ok(Self::new(&api_url, token.trim()))
    }
}
