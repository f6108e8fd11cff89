/// Reservation CRUD endpoints
///
/// Every endpoint requires a valid bearer token. Read, update, and delete
/// of a single reservation follow the same shape: fetch-or-404 first, then
/// the admin-or-owner access check, then the operation. The authorization
/// step never runs against a resource that doesn't exist.
///
/// # Endpoints
///
/// - `GET /reservations` - List (admin: all, others: own)
/// - `POST /reservations` - Create (owner is always the caller)
/// - `GET /reservations/:id` - Fetch one
/// - `PUT|PATCH /reservations/:id` - Partial update
/// - `DELETE /reservations/:id` - Delete permanently

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablekeep_shared::{
    auth::{access::require_access, middleware::AuthContext},
    models::reservation::{CreateReservation, Reservation, UpdateReservation},
};
use uuid::Uuid;
use validator::Validate;

/// Create reservation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    /// When the table is reserved for (ISO 8601)
    pub reservation_time: DateTime<Utc>,

    /// Number of guests
    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub guests: i32,

    /// Optional free-form note
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Update reservation request
///
/// All fields optional; absent fields are left unchanged. Present fields
/// are validated with the same rules as creation.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReservationRequest {
    /// New reservation time
    pub reservation_time: Option<DateTime<Utc>>,

    /// New guest count
    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub guests: Option<i32>,

    /// New note
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Reservation representation returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    /// Reservation ID
    pub id: String,

    /// Owning user ID
    pub user_id: String,

    /// When the table is reserved for
    pub reservation_time: DateTime<Utc>,

    /// Number of guests
    pub guests: i32,

    /// Optional note
    pub note: Option<String>,

    /// Created at
    pub created_at: DateTime<Utc>,

    /// Updated at
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id.to_string(),
            user_id: r.user_id.to_string(),
            reservation_time: r.reservation_time,
            guests: r.guests,
            note: r.note,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// List reservations response
#[derive(Debug, Serialize)]
pub struct ListReservationsResponse {
    /// Reservations visible to the caller
    pub reservations: Vec<ReservationResponse>,
}

/// Delete reservation response
#[derive(Debug, Serialize)]
pub struct DeleteReservationResponse {
    /// Whether the reservation was deleted
    pub deleted: bool,
}

/// Fetches a reservation or fails with 404
///
/// The explicit fetch happens before any authorization check, so a caller
/// probing a nonexistent id sees 404, never 403.
async fn fetch_reservation(state: &AppState, id: Uuid) -> ApiResult<Reservation> {
    Reservation::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reservation not found".to_string()))
}

/// List reservations
///
/// Admins see every reservation; everyone else sees only their own.
///
/// # Endpoint
///
/// ```text
/// GET /reservations
/// Authorization: Bearer <token>
/// ```
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListReservationsResponse>> {
    let reservations = if auth.is_admin {
        Reservation::list_all(&state.db).await?
    } else {
        Reservation::list_by_owner(&state.db, auth.user_id).await?
    };

    Ok(Json(ListReservationsResponse {
        reservations: reservations.into_iter().map(Into::into).collect(),
    }))
}

/// Create a reservation
///
/// The owner is always the authenticated caller; the request body cannot
/// assign a reservation to someone else.
///
/// # Endpoint
///
/// ```text
/// POST /reservations
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "reservation_time": "2024-01-01T10:00:00Z",
///   "guests": 2,
///   "note": "Window table"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid bearer token
/// - `422 Unprocessable Entity`: guests < 1 or note too long
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateReservationRequest>,
) -> ApiResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate()?;

    let reservation = Reservation::create(
        &state.db,
        CreateReservation {
            user_id: auth.user_id,
            reservation_time: req.reservation_time,
            guests: req.guests,
            note: req.note,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// Fetch a single reservation
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid bearer token
/// - `404 Not Found`: No reservation with this id
/// - `403 Forbidden`: Caller is neither admin nor owner
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReservationResponse>> {
    let reservation = fetch_reservation(&state, id).await?;

    require_access(&auth, reservation.user_id)?;

    Ok(Json(reservation.into()))
}

/// Partially update a reservation
///
/// # Endpoint
///
/// ```text
/// PUT /reservations/:id      (or PATCH)
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "guests": 4 }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid bearer token
/// - `404 Not Found`: No reservation with this id
/// - `403 Forbidden`: Caller is neither admin nor owner
/// - `422 Unprocessable Entity`: A present field fails validation
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReservationRequest>,
) -> ApiResult<Json<ReservationResponse>> {
    let reservation = fetch_reservation(&state, id).await?;

    require_access(&auth, reservation.user_id)?;

    req.validate()?;

    let updated = Reservation::update(
        &state.db,
        id,
        UpdateReservation {
            reservation_time: req.reservation_time,
            guests: req.guests,
            note: req.note,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Reservation not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete a reservation permanently
///
/// No soft-delete, no undo; a subsequent fetch of the same id yields 404.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid bearer token
/// - `404 Not Found`: No reservation with this id
/// - `403 Forbidden`: Caller is neither admin nor owner
pub async fn delete_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteReservationResponse>> {
    let reservation = fetch_reservation(&state, id).await?;

    require_access(&auth, reservation.user_id)?;

    let deleted = Reservation::delete(&state.db, id).await?;

    Ok(Json(DeleteReservationResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(guests: i32) -> CreateReservationRequest {
        CreateReservationRequest {
            reservation_time: "2024-01-01T10:00:00Z".parse().unwrap(),
            guests,
            note: None,
        }
    }

    #[test]
    fn test_create_request_valid() {
        assert!(create_request(1).validate().is_ok());
        assert!(create_request(2).validate().is_ok());
        assert!(create_request(12).validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_zero_guests() {
        let err = create_request(0).validate().unwrap_err();
        assert!(err.field_errors().contains_key("guests"));
    }

    #[test]
    fn test_create_request_rejects_negative_guests() {
        assert!(create_request(-3).validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_oversized_note() {
        let req = CreateReservationRequest {
            reservation_time: "2024-01-01T10:00:00Z".parse().unwrap(),
            guests: 2,
            note: Some("x".repeat(501)),
        };

        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("note"));
    }

    #[test]
    fn test_update_request_empty_is_valid() {
        // All fields absent = nothing to validate, nothing to change
        assert!(UpdateReservationRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_request_validates_present_fields() {
        let req = UpdateReservationRequest {
            guests: Some(0),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateReservationRequest {
            guests: Some(4),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_reservation_response_from_model() {
        let reservation = Reservation {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            reservation_time: Utc::now(),
            guests: 2,
            note: Some("Window table".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response: ReservationResponse = reservation.clone().into();
        assert_eq!(response.id, reservation.id.to_string());
        assert_eq!(response.user_id, reservation.user_id.to_string());
        assert_eq!(response.guests, 2);
        assert_eq!(response.note.as_deref(), Some("Window table"));
    }
}
