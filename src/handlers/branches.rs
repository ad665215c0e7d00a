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
use crate::entities::{branch, dining_table, order, restaurant};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, message_response, require_admin, success_response, validate_input,
};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBranchRequest {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: String,
    pub restaurant_id: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBranchRequest {
    pub address: Option<String>,
    pub city: Option<String>,
    pub restaurant_id: Option<i32>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_branch).get(list_branches))
        .route(
            "/:id",
            get(get_branch).put(update_branch).delete(delete_branch),
        )
        .with_auth(state)
}

#[instrument(skip(state, user, request), fields(restaurant_id = request.restaurant_id))]
async fn create_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateBranchRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;

    restaurant::Entity::find_by_id(request.restaurant_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Restaurant with id {} not found",
                request.restaurant_id
            ))
        })?;

    let model = branch::ActiveModel {
        address: Set(request.address),
        city: Set(request.city),
        restaurant_id: Set(request.restaurant_id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    info!(branch_id = model.id, "branch created");
    Ok(created_response(model))
}

async fn list_branches(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = branch::Entity::find().all(state.db.as_ref()).await?;
    Ok(success_response(rows))
}

async fn get_branch(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let model = find_branch(&state, id).await?;
    Ok(success_response(model))
}

#[instrument(skip(state, user, request), fields(branch_id = id))]
async fn update_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBranchRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let model = find_branch(&state, id).await?;

    if let Some(restaurant_id) = request.restaurant_id {
        restaurant::Entity::find_by_id(restaurant_id)
            .one(state.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Restaurant with id {} not found", restaurant_id))
            })?;
    }

    let mut active: branch::ActiveModel = model.into();
    if let Some(address) = request.address {
        active.address = Set(address);
    }
    if let Some(city) = request.city {
        active.city = Set(city);
    }
    if let Some(restaurant_id) = request.restaurant_id {
        active.restaurant_id = Set(restaurant_id);
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(success_response(updated))
}

#[instrument(skip(state, user), fields(branch_id = id))]
async fn delete_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let model = find_branch(&state, id).await?;
    ensure_branch_deletable(&state, model.id).await?;

    branch::Entity::delete_by_id(model.id)
        .exec(state.db.as_ref())
        .await?;
    info!(branch_id = id, "branch deleted");
    Ok(message_response("Branch deleted"))
}

/// A branch with tables or orders cannot be deleted.
pub(super) async fn ensure_branch_deletable(
    state: &AppState,
    branch_id: i32,
) -> Result<(), ServiceError> {
    let tables = dining_table::Entity::find()
        .filter(dining_table::Column::BranchId.eq(branch_id))
        .count(state.db.as_ref())
        .await?;
    if tables > 0 {
        return Err(ServiceError::BadRequest(
            "Cannot delete branch with existing tables".into(),
        ));
    }

    let orders = order::Entity::find()
        .filter(order::Column::BranchId.eq(branch_id))
        .count(state.db.as_ref())
        .await?;
    if orders > 0 {
        return Err(ServiceError::BadRequest(
            "Cannot delete branch with existing orders".into(),
        ));
    }

    Ok(())
}

async fn find_branch(state: &AppState, id: i32) -> Result<branch::Model, ServiceError> {
    branch::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Branch with id {} not found", id)))
}
