/// Bearer token model and database operations
///
/// This module provides the Token model backing the login/logout lifecycle.
/// A user may hold several tokens at once (one per device); logging out
/// deletes all of them.
///
/// # Security
///
/// - Tokens are stored as SHA-256 hashes (never plaintext)
/// - The plaintext is only returned on creation (never again)
/// - Revocation is a hard delete of the token rows
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tablekeep_shared::models::token::Token;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let (token, plaintext) = Token::issue(&pool, user_id).await?;
///
/// // IMPORTANT: hand plaintext to the client now - it's never shown again!
/// println!("Bearer token: {}", plaintext);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::token::{generate_token, hash_token};

/// Bearer token model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Token {
    /// Unique token ID
    pub id: Uuid,

    /// User this token authenticates
    pub user_id: Uuid,

    /// SHA-256 hash of the full token (never store plaintext!)
    pub token_hash: String,

    /// When the token was issued
    pub created_at: DateTime<Utc>,

    /// When the token was last presented
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Issues a new token for a user
    ///
    /// Returns both the database record and the plaintext token.
    /// **IMPORTANT**: The plaintext is only returned once and never stored!
    ///
    /// # Returns
    ///
    /// Tuple of (Token record, plaintext token string)
    pub async fn issue(pool: &PgPool, user_id: Uuid) -> Result<(Self, String), sqlx::Error> {
        let (plaintext, token_hash) = generate_token();

        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (user_id, token_hash)
            VALUES ($1, $2)
            RETURNING id, user_id, token_hash, created_at, last_used_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_one(pool)
        .await?;

        Ok((token, plaintext))
    }

    /// Resolves a presented plaintext token to its owner
    ///
    /// Hashes the presented value and looks up a matching stored hash,
    /// joined to the owning user for the role flag. Updates `last_used_at`
    /// on a hit.
    ///
    /// # Returns
    ///
    /// `Some((user_id, is_admin))` if the token resolves, `None` otherwise
    pub async fn validate(
        pool: &PgPool,
        plaintext: &str,
    ) -> Result<Option<(Uuid, bool)>, sqlx::Error> {
        let token_hash = hash_token(plaintext);

        let identity: Option<(Uuid, bool)> = sqlx::query_as(
            r#"
            UPDATE tokens t
            SET last_used_at = NOW()
            FROM users u
            WHERE t.token_hash = $1
              AND u.id = t.user_id
            RETURNING u.id, u.is_admin
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(identity)
    }

    /// Deletes every token owned by a user
    ///
    /// Called at logout; the effect is "log out of all devices", not just
    /// the session that made the request. A previously issued token stops
    /// validating the moment its row is gone.
    ///
    /// # Returns
    ///
    /// Number of tokens deleted (0 when the user had none - calling this
    /// twice in a row is safe)
    pub async fn revoke_all(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts tokens currently held by a user
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
