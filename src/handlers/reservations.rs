use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, message_response, success_response};
use crate::services::reservations::{CreateReservationRequest, UpdateReservationRequest};
use crate::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation).get(list_reservations))
        .route(
            "/:id",
            get(get_reservation)
                .put(update_reservation)
                .delete(cancel_reservation),
        )
        .with_auth(state)
}

/// Book a table for the calling user.
#[instrument(skip(state, request), fields(user_id = user.user_id))]
async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Response, ServiceError> {
    let created = state
        .services
        .reservations
        .create(user.user_id, request)
        .await?;
    Ok(created_response(created))
}

/// The calling user's own reservations.
async fn list_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state
        .services
        .reservations
        .list_for_user(user.user_id)
        .await?;
    Ok(success_response(rows))
}

/// Visible to the owner and to admins.
async fn get_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let reservation = state.services.reservations.get(id).await?;
    if reservation.user_id != user.user_id && !user.is_admin() {
        return Err(ServiceError::Forbidden(
            "Only the reservation owner may view it".into(),
        ));
    }
    Ok(success_response(reservation))
}

async fn update_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Response, ServiceError> {
    let updated = state
        .services
        .reservations
        .update(id, user.user_id, request)
        .await?;
    Ok(success_response(updated))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.reservations.cancel(id, user.user_id).await?;
    Ok(message_response("Reservation cancelled"))
}
