//! Carrying named actions to the server.
//!
//! [`InteractionTransport`] is the seam between the sans-IO
//! [`ClientReconciler`](crate::ClientReconciler) and the network.
//! [`HttpTransport`] speaks the REST API with `reqwest`.

use std::future::Future;

use agora_types::{InteractionOutcome, NamedAction, PostId};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Sends interaction requests on behalf of the signed-in user.
pub trait InteractionTransport: Send + Sync {
    /// Perform `action` on `post_id`, returning the committed aggregate.
    fn perform(
        &self,
        post_id: PostId,
        action: NamedAction,
    ) -> impl Future<Output = Result<InteractionOutcome, ClientError>> + Send;

    /// Current counts, version and flags for `post_id`.
    fn summary(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<InteractionOutcome, ClientError>> + Send;
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// REST transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, post_id: PostId, tail: &str) -> String {
        format!("{}/posts/{post_id}/{tail}", self.config.api_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<InteractionOutcome, ClientError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.config.token))
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }

        response
            .json::<InteractionOutcome>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl InteractionTransport for HttpTransport {
    async fn perform(
        &self,
        post_id: PostId,
        action: NamedAction,
    ) -> Result<InteractionOutcome, ClientError> {
        let url = self.url(post_id, action.as_str());
        tracing::debug!(%post_id, %action, "sending interaction");
        self.send(self.client.patch(&url)).await
    }

    async fn summary(&self, post_id: PostId) -> Result<InteractionOutcome, ClientError> {
        let url = self.url(post_id, "interactions/summary");
        self.send(self.client.get(&url)).await
    }
}

/// Build an [`ClientError::Api`] from an error response, falling back to
/// the status reason when the body is not the API's JSON shape.
async fn api_error(status: StatusCode, response: reqwest::Response) -> ClientError {
    let message = match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text),
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_owned(),
    };
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_urls_follow_the_route_table() {
        let transport = HttpTransport::new(ClientConfig::new("http://api/", "t"));
        let post = PostId::new();
        assert_eq!(
            transport.url(post, NamedAction::Unfollow.as_str()),
            format!("http://api/posts/{post}/unfollow")
        );
        assert_eq!(
            transport.url(post, "interactions/summary"),
            format!("http://api/posts/{post}/interactions/summary")
        );
    }
}
