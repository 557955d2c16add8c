//! Caller authentication.
//!
//! Session issuance lives elsewhere; this module only turns the bearer
//! token on a request into a user id through an [`Authenticator`]. A
//! missing, malformed or unknown token resolves to `None`, which the
//! service reports as unauthenticated.

use std::collections::BTreeMap;
use std::future::Future;

use agora_types::UserId;
use axum::http::{HeaderMap, header};

/// The authentication backend could not answer.
#[derive(Debug, thiserror::Error)]
#[error("authentication backend unavailable: {0}")]
pub struct AuthError(pub String);

/// Resolves bearer tokens to users.
pub trait Authenticator: Send + Sync {
    /// The user owning `token`, or `None` if the token is unknown or expired.
    fn resolve(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<UserId>, AuthError>> + Send;
}

/// Fixed token table, loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: BTreeMap<String, UserId>,
}

impl StaticTokens {
    /// Build from a token -> user map.
    pub const fn new(tokens: BTreeMap<String, UserId>) -> Self {
        Self { tokens }
    }

    /// Add a token, replacing any previous owner.
    #[must_use]
    pub fn with_token(mut self, token: &str, user: UserId) -> Self {
        self.tokens.insert(token.to_owned(), user);
        self
    }
}

impl Authenticator for StaticTokens {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, AuthError> {
        Ok(self.tokens.get(token).copied())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The caller of a request, if it carries a valid token.
///
/// # Errors
///
/// Returns [`AuthError`] only when the backend fails; an absent or
/// unknown token is `Ok(None)`.
pub async fn current_user<A: Authenticator>(
    auth: &A,
    headers: &HeaderMap,
) -> Result<Option<UserId>, AuthError> {
    match bearer_token(headers) {
        Some(token) => auth.resolve(token).await,
        None => Ok(None),
    }
}
