use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{hash_password, verify_password, AuthRouterExt, AuthUser, IssuedToken};
use crate::entities::staff;
use crate::errors::{on_unique_violation, ServiceError};
use crate::handlers::common::{created_response, message_response, success_response, validate_input};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3 to 50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: staff::PublicStaff,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/register", post(register))
        .with_role(state, staff::ROLE_ADMIN);
    let authed = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_auth(state);
    Router::new()
        .route("/login", post(login))
        .merge(admin)
        .merge(authed)
}

/// Create a staff account. Admin only; duplicate username or email is a
/// conflict, never a second row.
#[instrument(skip(state, request), fields(username = %request.username))]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&request)?;

    let role = request.role.unwrap_or_else(|| staff::ROLE_STAFF.to_string());
    if !staff::ROLES.contains(&role.as_str()) {
        return Err(ServiceError::ValidationError(format!(
            "Invalid role: {}",
            role
        )));
    }

    let existing = staff::Entity::find()
        .filter(
            staff::Column::Username
                .eq(&request.username)
                .or(staff::Column::Email.eq(&request.email)),
        )
        .one(state.db.as_ref())
        .await?;
    if existing.is_some() {
        return Err(ServiceError::Conflict(
            "Username or email already registered".into(),
        ));
    }

    let password_hash =
        hash_password(&request.password).map_err(|e| ServiceError::InternalError(e.to_string()))?;

    let account = staff::ActiveModel {
        username: Set(request.username),
        email: Set(request.email),
        password_hash: Set(password_hash),
        role: Set(role),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await
    .map_err(|e| {
        on_unique_violation(
            e,
            ServiceError::Conflict("Username or email already registered".into()),
        )
    })?;

    info!(staff_id = account.id, "staff account created");
    Ok(created_response(account.into_public()))
}

/// Exchange credentials for an access token. A failed lookup and a failed
/// password check produce the same response.
#[instrument(skip(state, request), fields(username = %request.username))]
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ServiceError> {
    let account = staff::Entity::find()
        .filter(staff::Column::Username.eq(&request.username))
        .one(state.db.as_ref())
        .await?;

    let account = match account {
        Some(a) if verify_password(&request.password, &a.password_hash) => a,
        _ => {
            return Err(ServiceError::Unauthorized(
                "Invalid username or password".into(),
            ))
        }
    };

    let token = state
        .auth
        .generate_token(&account)
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;

    info!(staff_id = account.id, "login succeeded");
    Ok(success_response(LoginResponse {
        token,
        user: account.into_public(),
    }))
}

/// Revoke the presented token.
async fn logout(
    State(state): State<AppState>,
    _user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| ServiceError::Unauthorized("Authentication required".into()))?;

    state
        .auth
        .revoke_token(token)
        .map_err(|e| ServiceError::Unauthorized(e.to_string()))?;

    Ok(message_response("Logged out"))
}

/// The account behind the presented token.
async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Response, ServiceError> {
    let account = staff::Entity::find_by_id(user.user_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound("Staff account not found".into()))?;
    Ok(success_response(account.into_public()))
}
