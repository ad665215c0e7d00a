use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::entities::{branch, dining_table, reservation};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, message_response, require_admin, success_response, validate_input,
};
use crate::AppState;

/// `is_available` is absent on purpose: availability is owned by the
/// reservation workflow and cannot be set by clients.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTableRequest {
    #[validate(length(min = 1, message = "table_number must not be empty"))]
    pub table_number: String,
    #[validate(range(min = 1, message = "seats must be at least 1"))]
    pub seats: i32,
    pub location: Option<String>,
    pub branch_id: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTableRequest {
    #[validate(length(min = 1, message = "table_number must not be empty"))]
    pub table_number: Option<String>,
    #[validate(range(min = 1, message = "seats must be at least 1"))]
    pub seats: Option<i32>,
    pub location: Option<String>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_table).get(list_tables))
        .route("/:id", get(get_table).put(update_table).delete(delete_table))
        .with_auth(state)
}

#[instrument(skip(state, user, request), fields(branch_id = request.branch_id))]
async fn create_table(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateTableRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;

    branch::Entity::find_by_id(request.branch_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Branch with id {} not found", request.branch_id))
        })?;

    let model = dining_table::ActiveModel {
        table_number: Set(request.table_number),
        seats: Set(request.seats),
        is_available: Set(true),
        location: Set(request.location),
        branch_id: Set(request.branch_id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    info!(table_id = model.id, "table created");
    Ok(created_response(model))
}

async fn list_tables(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = dining_table::Entity::find().all(state.db.as_ref()).await?;
    Ok(success_response(rows))
}

async fn get_table(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let model = find_table(&state, id).await?;
    Ok(success_response(model))
}

#[instrument(skip(state, user, request), fields(table_id = id))]
async fn update_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTableRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let model = find_table(&state, id).await?;

    let mut active: dining_table::ActiveModel = model.into();
    if let Some(table_number) = request.table_number {
        active.table_number = Set(table_number);
    }
    if let Some(seats) = request.seats {
        active.seats = Set(seats);
    }
    if let Some(location) = request.location {
        active.location = Set(Some(location));
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(success_response(updated))
}

/// A table with reservations cannot be deleted.
#[instrument(skip(state, user), fields(table_id = id))]
async fn delete_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let model = find_table(&state, id).await?;

    let reservations = reservation::Entity::find()
        .filter(reservation::Column::TableId.eq(model.id))
        .count(state.db.as_ref())
        .await?;
    if reservations > 0 {
        return Err(ServiceError::BadRequest(
            "Cannot delete table with existing reservations".into(),
        ));
    }

    dining_table::Entity::delete_by_id(model.id)
        .exec(state.db.as_ref())
        .await?;
    info!(table_id = id, "table deleted");
    Ok(message_response("Table deleted"))
}

async fn find_table(state: &AppState, id: i32) -> Result<dining_table::Model, ServiceError> {
    dining_table::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Table with id {} not found", id)))
}
