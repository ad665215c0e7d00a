use axum::{
    extract::{Path, State},
    response::Response,
    routing::{post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::entities::{category, item, menu};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, message_response, require_admin, success_response, validate_input,
};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub menu_id: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route("/:id", put(update_category).delete(delete_category))
        .route("/:id/items", post(add_item).get(list_items))
        .route(
            "/:id/items/:item_id",
            put(update_item).delete(delete_item),
        )
        .with_auth(state)
}

#[instrument(skip(state, user, request), fields(menu_id = request.menu_id))]
async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;

    menu::Entity::find_by_id(request.menu_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Menu with id {} not found", request.menu_id))
        })?;

    let model = category::ActiveModel {
        name: Set(request.name),
        menu_id: Set(request.menu_id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    info!(category_id = model.id, "category created");
    Ok(created_response(model))
}

async fn list_categories(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = category::Entity::find().all(state.db.as_ref()).await?;
    Ok(success_response(rows))
}

#[instrument(skip(state, user, request), fields(category_id = id))]
async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let model = find_category(&state, id).await?;

    let mut active: category::ActiveModel = model.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(success_response(updated))
}

/// A category with items cannot be deleted; the items go first.
#[instrument(skip(state, user), fields(category_id = id))]
async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let model = find_category(&state, id).await?;

    let items = item::Entity::find()
        .filter(item::Column::CategoryId.eq(model.id))
        .count(state.db.as_ref())
        .await?;
    if items > 0 {
        return Err(ServiceError::BadRequest(
            "Cannot delete category with existing items".into(),
        ));
    }

    category::Entity::delete_by_id(model.id)
        .exec(state.db.as_ref())
        .await?;
    info!(category_id = id, "category deleted");
    Ok(message_response("Category deleted"))
}

#[instrument(skip(state, user, request), fields(category_id = id))]
async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<CreateItemRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let category = find_category(&state, id).await?;

    let model = item::ActiveModel {
        name: Set(request.name),
        price: Set(request.price),
        description: Set(request.description),
        category_id: Set(category.id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    info!(item_id = model.id, category_id = id, "item created");
    Ok(created_response(model))
}

async fn list_items(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let category = find_category(&state, id).await?;
    let rows = item::Entity::find()
        .filter(item::Column::CategoryId.eq(category.id))
        .all(state.db.as_ref())
        .await?;
    Ok(success_response(rows))
}

#[instrument(skip(state, user, request), fields(category_id = id, item_id))]
async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let model = find_item_of(&state, id, item_id).await?;

    let mut active: item::ActiveModel = model.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(price) = request.price {
        active.price = Set(price);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(success_response(updated))
}

#[instrument(skip(state, user), fields(category_id = id, item_id))]
async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(i32, i32)>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let model = find_item_of(&state, id, item_id).await?;

    item::Entity::delete_by_id(model.id)
        .exec(state.db.as_ref())
        .await?;
    info!(item_id, "item deleted");
    Ok(message_response("Item deleted"))
}

async fn find_category(state: &AppState, id: i32) -> Result<category::Model, ServiceError> {
    category::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Category with id {} not found", id)))
}

async fn find_item_of(
    state: &AppState,
    category_id: i32,
    item_id: i32,
) -> Result<item::Model, ServiceError> {
    item::Entity::find_by_id(item_id)
        .filter(item::Column::CategoryId.eq(category_id))
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Item with id {} not found in category {}",
                item_id, category_id
            ))
        })
}
