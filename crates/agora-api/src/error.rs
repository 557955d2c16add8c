//! Error types for the interaction API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use agora_core::ServiceError;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::auth::AuthError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A service-level failure (auth, validation, not found, conflict, storage).
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The authentication backend could not be consulted.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A spawned request task failed to complete.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Self::Service(ServiceError::InvalidInput(_)) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Conflict { .. }) => StatusCode::CONFLICT,
            Self::Service(ServiceError::Internal(_)) | Self::Auth(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use agora_types::PostId;

    use super::*;

    #[test]
    fn taxonomy_maps_to_documented_statuses() {
        let post = PostId::new();
        let cases = [
            (ApiError::from(ServiceError::Unauthenticated), 401),
            (ApiError::from(ServiceError::InvalidInput("x".to_owned())), 400),
            (ApiError::from(ServiceError::NotFound(post)), 404),
            (
                ApiError::from(ServiceError::Conflict {
                    post_id: post,
                    attempts: 3,
                }),
                409,
            ),
            (ApiError::from(ServiceError::Internal("db".to_owned())), 500),
            (ApiError::InvalidQuery("filter".to_owned()), 400),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status().as_u16(), expected, "{err}");
        }
    }

    #[test]
    fn unauthorized_response_advertises_bearer() {
        let response = ApiError::from(ServiceError::Unauthenticated).into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Bearer"))
        );
    }
}
