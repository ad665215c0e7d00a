use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Router,
};
use tracing::instrument;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, require_admin, success_response};
use crate::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/:order_id", post(generate_invoice))
        .with_auth(state)
}

/// Generate the invoice for a completed order.
#[instrument(skip(state, user))]
async fn generate_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<i32>,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let invoice = state.services.invoices.generate(order_id).await?;
    Ok(created_response(invoice))
}

async fn list_invoices(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, ServiceError> {
    require_admin(&user)?;
    let rows = state.services.invoices.list().await?;
    Ok(success_response(rows))
}
