//! Restaurant management API.
//!
//! Serves restaurants, branches, menus, tables, reservations, orders,
//! invoices and staff accounts over HTTP, with JWT-authenticated access and
//! role-gated administration.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::{AuthConfig, AuthService};
use crate::db::DbPool;
use crate::services::AppServices;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub auth: AuthService,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: config::AppConfig) -> Self {
        let auth = AuthService::new(AuthConfig::new(
            config.jwt_secret.clone(),
            std::time::Duration::from_secs(config.jwt_expiration),
        ));
        let services = AppServices::new(db.clone());
        Self {
            db,
            config,
            auth,
            services,
        }
    }
}

/// Builds the full application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/auth", handlers::auth::routes(&state))
        .nest("/restaurants", handlers::restaurants::routes(&state))
        .nest("/branches", handlers::branches::routes(&state))
        .nest("/menus", handlers::menus::routes(&state))
        .nest("/categories", handlers::categories::routes(&state))
        .nest("/tables", handlers::tables::routes(&state))
        .nest("/reservations", handlers::reservations::routes(&state))
        .nest("/orders", handlers::orders::routes(&state))
        .nest("/invoices", handlers::invoices::routes(&state))
        .nest("/reports", handlers::reports::routes())
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
