/// Reservation model and database operations
///
/// This module provides the Reservation model, the owned resource that the
/// access control rules gate. Every reservation belongs to exactly one user;
/// admins see and mutate everything, owners only their own rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reservations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     reservation_time TIMESTAMPTZ NOT NULL,
///     guests INTEGER NOT NULL CHECK (guests >= 1),
///     note TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tablekeep_shared::models::reservation::{Reservation, CreateReservation};
/// use chrono::Utc;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let reservation = Reservation::create(&pool, CreateReservation {
///     user_id,
///     reservation_time: Utc::now(),
///     guests: 2,
///     note: Some("Window table".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Reservation model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: Uuid,

    /// Owning user; always the authenticated creator, never taken from
    /// the request body
    pub user_id: Uuid,

    /// When the table is reserved for
    pub reservation_time: DateTime<Utc>,

    /// Number of guests (at least 1)
    pub guests: i32,

    /// Optional free-form note
    pub note: Option<String>,

    /// When the reservation was created
    pub created_at: DateTime<Utc>,

    /// When the reservation was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservation {
    /// Owning user
    pub user_id: Uuid,

    /// When the table is reserved for
    pub reservation_time: DateTime<Utc>,

    /// Number of guests
    pub guests: i32,

    /// Optional note
    pub note: Option<String>,
}

/// Input for partially updating a reservation
///
/// Only fields that are `Some` are written; absent fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReservation {
    /// New reservation time
    pub reservation_time: Option<DateTime<Utc>>,

    /// New guest count
    pub guests: Option<i32>,

    /// New note
    pub note: Option<String>,
}

impl Reservation {
    /// Creates a new reservation
    pub async fn create(pool: &PgPool, data: CreateReservation) -> Result<Self, sqlx::Error> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, reservation_time, guests, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, reservation_time, guests, note, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.reservation_time)
        .bind(data.guests)
        .bind(data.note)
        .fetch_one(pool)
        .await?;

        Ok(reservation)
    }

    /// Finds a reservation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, user_id, reservation_time, guests, note, created_at, updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(reservation)
    }

    /// Lists every reservation (admin view), in insertion order
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, user_id, reservation_time, guests, note, created_at, updated_at
            FROM reservations
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(reservations)
    }

    /// Lists reservations owned by a user, in insertion order
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, user_id, reservation_time, guests, note, created_at, updated_at
            FROM reservations
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(reservations)
    }

    /// Applies a partial update to a reservation
    ///
    /// Builds the SET list dynamically from the fields that are present.
    /// The `updated_at` timestamp is always refreshed.
    ///
    /// # Returns
    ///
    /// The updated reservation if found, None if the id doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateReservation,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE reservations SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.reservation_time.is_some() {
            bind_count += 1;
            query.push_str(&format!(", reservation_time = ${}", bind_count));
        }
        if data.guests.is_some() {
            bind_count += 1;
            query.push_str(&format!(", guests = ${}", bind_count));
        }
        if data.note.is_some() {
            bind_count += 1;
            query.push_str(&format!(", note = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, user_id, reservation_time, guests, note, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Reservation>(&query).bind(id);

        if let Some(reservation_time) = data.reservation_time {
            q = q.bind(reservation_time);
        }
        if let Some(guests) = data.guests {
            q = q.bind(guests);
        }
        if let Some(note) = data.note {
            q = q.bind(note);
        }

        let reservation = q.fetch_optional(pool).await?;

        Ok(reservation)
    }

    /// Deletes a reservation permanently
    ///
    /// No soft-delete, no undo.
    ///
    /// # Returns
    ///
    /// True if a reservation was deleted, false if the id didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
