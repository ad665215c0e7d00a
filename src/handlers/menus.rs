use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::entities::{category, menu, restaurant};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, message_response, require_admin, success_response, validate_input,
};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMenuRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
    pub restaurant_id: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMenuRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_menu).get(list_menus))
        .route("/:id", get(get_menu).put(update_menu).delete(delete_menu))
        .with_auth(state)
}

#[instrument(skip(state, user, request), fields(restaurant_id = request.restaurant_id))]
async fn create_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateMenuRequest>,
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

    let model = menu::ActiveModel {
        name: Set(request.name),
        price: Set(request.price),
        category: Set(request.category),
        restaurant_id: Set(request.restaurant_id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    info!(menu_id = model.id, "menu created");
    Ok(created_response(model))
}

async fn list_menus(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = menu::Entity::find().all(state.db.as_ref()).await?;
    Ok(success_response(rows))
}

async fn get_menu(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let model = find_menu(&state, id).await?;
    Ok(success_response(model))
}

#[instrument(skip(state, user, request), fields(menu_id = id))]
async fn update_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateMenuRequest>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    validate_input(&request)?;
    let model = find_menu(&state, id).await?;

    let mut active: menu::ActiveModel = model.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(price) = request.price {
        active.price = Set(price);
    }
    if let Some(category) = request.category {
        active.category = Set(Some(category));
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(success_response(updated))
}

/// A menu with categories cannot be deleted.
#[instrument(skip(state, user), fields(menu_id = id))]
async fn delete_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let model = find_menu(&state, id).await?;

    let categories = category::Entity::find()
        .filter(category::Column::MenuId.eq(model.id))
        .count(state.db.as_ref())
        .await?;
    if categories > 0 {
        return Err(ServiceError::BadRequest(
            "Cannot delete menu with existing categories".into(),
        ));
    }

    menu::Entity::delete_by_id(model.id)
        .exec(state.db.as_ref())
        .await?;
    info!(menu_id = id, "menu deleted");
    Ok(message_response("Menu deleted"))
}

async fn find_menu(state: &AppState, id: i32) -> Result<menu::Model, ServiceError> {
    menu::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Menu with id {} not found", id)))
}
