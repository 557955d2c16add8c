//! `PostgreSQL`-backed [`PostStore`].
//!
//! One row per post in `post_interactions`. The compare-and-swap is a
//! single `UPDATE ... WHERE post_id = $1 AND version = $2`: Postgres
//! re-checks the predicate after acquiring the row lock, so of two
//! concurrent writers holding the same version exactly one updates a row.

use std::collections::BTreeSet;

use agora_core::{CasOutcome, PostStore, StoreError};
use agora_types::{InteractionSet, PostId, UserId};
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// Interaction sets stored in `PostgreSQL`.
#[derive(Clone)]
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    /// Create a store bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, post_id: PostId) -> Result<Option<InteractionSet>, DbError> {
        let row = sqlx::query(
            "SELECT upvotes, downvotes, hides, follows, version \
             FROM post_interactions WHERE post_id = $1",
        )
        .bind(post_id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let version: i64 = row.try_get("version")?;
        Ok(Some(InteractionSet {
            upvotes: users(row.try_get("upvotes")?),
            downvotes: users(row.try_get("downvotes")?),
            hides: users(row.try_get("hides")?),
            follows: users(row.try_get("follows")?),
            version: u64::try_from(version)
                .map_err(|e| DbError::Corrupt(format!("post {post_id} version {version}: {e}")))?,
        }))
    }

    async fn swap(
        &self,
        post_id: PostId,
        expected_version: u64,
        next: &InteractionSet,
    ) -> Result<CasOutcome, DbError> {
        let expected = to_db_version(expected_version)?;
        let new_version = to_db_version(next.version)?;

        let result = sqlx::query(
            "UPDATE post_interactions \
             SET upvotes = $3, downvotes = $4, hides = $5, follows = $6, \
                 version = $7, updated_at = $8 \
             WHERE post_id = $1 AND version = $2",
        )
        .bind(post_id.into_inner())
        .bind(expected)
        .bind(uuids(&next.upvotes))
        .bind(uuids(&next.downvotes))
        .bind(uuids(&next.hides))
        .bind(uuids(&next.follows))
        .bind(new_version)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(CasOutcome::Swapped);
        }

        let current: Option<i64> =
            sqlx::query_scalar("SELECT version FROM post_interactions WHERE post_id = $1")
                .bind(post_id.into_inner())
                .fetch_optional(&self.pool)
                .await?;

        match current {
            None => Ok(CasOutcome::Missing),
            Some(v) => Ok(CasOutcome::VersionMismatch {
                current: u64::try_from(v)
                    .map_err(|e| DbError::Corrupt(format!("post {post_id} version {v}: {e}")))?,
            }),
        }
    }

    async fn insert(&self, post_id: PostId) -> Result<bool, DbError> {
        let result = sqlx::query(
            "INSERT INTO post_interactions (post_id) VALUES ($1) ON CONFLICT (post_id) DO NOTHING",
        )
        .bind(post_id.into_inner())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, post_id: PostId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM post_interactions WHERE post_id = $1")
            .bind(post_id.into_inner())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

impl PostStore for PgInteractionStore {
    async fn load(&self, post_id: PostId) -> Result<Option<InteractionSet>, StoreError> {
        Ok(self.fetch(post_id).await?)
    }

    async fn compare_and_swap(
        &self,
        post_id: PostId,
        expected_version: u64,
        next: &InteractionSet,
    ) -> Result<CasOutcome, StoreError> {
        Ok(self.swap(post_id, expected_version, next).await?)
    }

    async fn create(&self, post_id: PostId) -> Result<bool, StoreError> {
        let created = self.insert(post_id).await?;
        if created {
            tracing::debug!(%post_id, "Created interaction row");
        }
        Ok(created)
    }

    async fn delete(&self, post_id: PostId) -> Result<bool, StoreError> {
        Ok(self.remove(post_id).await?)
    }
}

fn users(ids: Vec<Uuid>) -> BTreeSet<UserId> {
    ids.into_iter().map(UserId::from).collect()
}

fn uuids(users: &BTreeSet<UserId>) -> Vec<Uuid> {
    users.iter().copied().map(UserId::into_inner).collect()
}

fn to_db_version(version: u64) -> Result<i64, DbError> {
    i64::try_from(version).map_err(|e| DbError::Corrupt(format!("version {version}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_arrays_round_trip_through_uuid_vectors() {
        let set: BTreeSet<UserId> = (0..3).map(|_| UserId::new()).collect();
        assert_eq!(users(uuids(&set)), set);
    }

    #[test]
    fn duplicate_array_entries_collapse() {
        let id = Uuid::now_v7();
        assert_eq!(users(vec![id, id]).len(), 1);
    }

    #[test]
    fn versions_beyond_bigint_are_rejected() {
        assert!(to_db_version(u64::MAX).is_err());
        assert_eq!(to_db_version(42).ok(), Some(42));
    }
}
