use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, message_response, require_admin, success_response,
};
use crate::services::orders::{
    CreateOrderRequest, UpdateOrderStatusRequest, UpdatePaymentStatusRequest,
};
use crate::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order).delete(delete_order))
        .route("/user/:user_id", get(list_orders_for_user))
        .route("/:id/status", put(update_order_status))
        .route("/:id/payment-status", put(update_payment_status))
        .with_auth(state)
}

#[instrument(skip(state, user, request))]
async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let created = state.services.orders.create(request).await?;
    Ok(created_response(created))
}

async fn list_orders(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state.services.orders.list().await?;
    Ok(success_response(rows))
}

async fn list_orders_for_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Response, ServiceError> {
    let rows = state.services.orders.list_for_user(user_id).await?;
    Ok(success_response(rows))
}

async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let order = state.services.orders.get(id).await?;
    Ok(success_response(order))
}

async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    state.services.orders.delete(id).await?;
    Ok(message_response("Order deleted"))
}

#[instrument(skip(state, user, request), fields(order_id = id))]
async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let updated = state
        .services
        .orders
        .update_status(id, &request.status)
        .await?;
    Ok(success_response(updated))
}

#[instrument(skip(state, user, request), fields(order_id = id))]
async fn update_payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let updated = state
        .services
        .orders
        .update_payment_status(id, request)
        .await?;
    Ok(success_response(updated))
}
