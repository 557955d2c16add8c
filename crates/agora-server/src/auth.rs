//! Session-backed authentication.

use agora_api::{AuthError, Authenticator};
use agora_db::DragonflyPool;
use agora_types::UserId;

/// Resolves bearer tokens against `session:{token}` keys in `Dragonfly`.
#[derive(Clone)]
pub struct DragonflySessions {
    pool: DragonflyPool,
}

impl DragonflySessions {
    /// Wrap a connected pool.
    pub const fn new(pool: DragonflyPool) -> Self {
        Self { pool }
    }
}

impl Authenticator for DragonflySessions {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, AuthError> {
        self.pool
            .session_user(token)
            .await
            .map_err(|e| AuthError(e.to_string()))
    }
}
