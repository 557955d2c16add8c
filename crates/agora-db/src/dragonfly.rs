//! `Dragonfly` (Redis-compatible) session lookup.
//!
//! The sign-in service (outside this workspace) writes one key per login
//! session. The interaction API only reads them to resolve a bearer token
//! to a user.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `session:{token}` | String | UUID of the signed-in user |

use agora_types::UserId;
use fred::prelude::*;

use crate::error::DbError;

/// Key holding the user id for a session token.
fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
#[derive(Clone)]
pub struct DragonflyPool {
    client: Client,
}

impl DragonflyPool {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    /// Returns [`DbError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let config = Config::from_url(url)
            .map_err(|e| DbError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self { client })
    }

    /// Resolve a session token to its user.
    ///
    /// Returns `Ok(None)` when the session does not exist or has expired.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Corrupt`] if the stored value is not a UUID.
    /// Returns [`DbError::Dragonfly`] if the read fails.
    pub async fn session_user(&self, token: &str) -> Result<Option<UserId>, DbError> {
        let value: Option<String> = self.client.get(session_key(token)).await?;
        value
            .map(|s| {
                UserId::parse(&s)
                    .ok_or_else(|| DbError::Corrupt(format!("session value `{s}` is not a user id")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_keys_are_namespaced() {
        assert_eq!(session_key("abc"), "session:abc");
    }
}
