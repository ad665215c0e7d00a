use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::entities::{branch, menu, restaurant};
use crate::errors::{on_unique_violation, ServiceError};
use crate::handlers::common::{
    created_response, message_response, require_admin, success_response, validate_input,
};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    #[validate(length(min = 1, message = "contact_number must not be empty"))]
    pub contact_number: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRestaurantRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact_number: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBranchRequest {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBranchRequest {
    pub address: Option<String>,
    pub city: Option<String>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_restaurant).get(list_restaurants))
        .route(
            "/:id",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/:id/branches", post(add_branch).get(list_branches))
        .route(
            "/:id/branches/:branch_id",
            put(update_branch).delete(delete_branch),
        )
        .with_auth(state)
}

#[instrument(skip(state, user, request), fields(name = %request.name))]
async fn create_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateRestaurantRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;

    let model = restaurant::ActiveModel {
        name: Set(request.name),
        location: Set(request.location),
        contact_number: Set(request.contact_number),
        description: Set(request.description),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .map_err(|e| {
        on_unique_violation(
            e,
            ServiceError::Conflict("Restaurant name already exists".into()),
        )
    })?;

    info!(restaurant_id = model.id, "restaurant created");
    Ok(created_response(model))
}

async fn list_restaurants(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = restaurant::Entity::find().all(state.db.as_ref()).await?;
    Ok(success_response(rows))
}

async fn get_restaurant(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let model = find_restaurant(&state, id).await?;
    Ok(success_response(model))
}

#[instrument(skip(state, user, request), fields(restaurant_id = id))]
async fn update_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRestaurantRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;

    let model = find_restaurant(&state, id).await?;
    let mut active: restaurant::ActiveModel = model.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(location) = request.location {
        active.location = Set(location);
    }
    if let Some(contact_number) = request.contact_number {
        active.contact_number = Set(contact_number);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }

    let updated = active.update(state.db.as_ref()).await.map_err(|e| {
        on_unique_violation(
            e,
            ServiceError::Conflict("Restaurant name already exists".into()),
        )
    })?;
    Ok(success_response(updated))
}

/// A restaurant with branches or menus cannot be deleted; the dependents go
/// first.
#[instrument(skip(state, user), fields(restaurant_id = id))]
async fn delete_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let model = find_restaurant(&state, id).await?;

    let branches = branch::Entity::find()
        .filter(branch::Column::RestaurantId.eq(model.id))
        .count(state.db.as_ref())
        .await?;
    if branches > 0 {
        return Err(ServiceError::BadRequest(
            "Cannot delete restaurant with existing branches".into(),
        ));
    }

    let menus = menu::Entity::find()
        .filter(menu::Column::RestaurantId.eq(model.id))
        .count(state.db.as_ref())
        .await?;
    if menus > 0 {
        return Err(ServiceError::BadRequest(
            "Cannot delete restaurant with existing menus".into(),
        ));
    }

    restaurant::Entity::delete_by_id(model.id)
        .exec(state.db.as_ref())
        .await?;
    info!(restaurant_id = id, "restaurant deleted");
    Ok(message_response("Restaurant deleted"))
}

#[instrument(skip(state, user, request), fields(restaurant_id = id))]
async fn add_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<CreateBranchRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let restaurant = find_restaurant(&state, id).await?;

    let model = branch::ActiveModel {
        address: Set(request.address),
        city: Set(request.city),
        restaurant_id: Set(restaurant.id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    info!(branch_id = model.id, restaurant_id = id, "branch created");
    Ok(created_response(model))
}

async fn list_branches(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let restaurant = find_restaurant(&state, id).await?;
    let rows = branch::Entity::find()
        .filter(branch::Column::RestaurantId.eq(restaurant.id))
        .all(state.db.as_ref())
        .await?;
    Ok(success_response(rows))
}

#[instrument(skip(state, user, request), fields(restaurant_id = id, branch_id))]
async fn update_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, branch_id)): Path<(i32, i32)>,
    Json(request): Json<UpdateBranchRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let model = find_branch_of(&state, id, branch_id).await?;

    let mut active: branch::ActiveModel = model.into();
    if let Some(address) = request.address {
        active.address = Set(address);
    }
    if let Some(city) = request.city {
        active.city = Set(city);
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(success_response(updated))
}

#[instrument(skip(state, user), fields(restaurant_id = id, branch_id))]
async fn delete_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, branch_id)): Path<(i32, i32)>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let model = find_branch_of(&state, id, branch_id).await?;
    super::branches::ensure_branch_deletable(&state, model.id).await?;

    branch::Entity::delete_by_id(model.id)
        .exec(state.db.as_ref())
        .await?;
    info!(branch_id, "branch deleted");
    Ok(message_response("Branch deleted"))
}

async fn find_restaurant(state: &AppState, id: i32) -> Result<restaurant::Model, ServiceError> {
    restaurant::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Restaurant with id {} not found", id)))
}

async fn find_branch_of(
    state: &AppState,
    restaurant_id: i32,
    branch_id: i32,
) -> Result<branch::Model, ServiceError> {
    branch::Entity::find_by_id(branch_id)
        .filter(branch::Column::RestaurantId.eq(restaurant_id))
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Branch with id {} not found for restaurant {}",
                branch_id, restaurant_id
            ))
        })
}
