use axum::{extract::State, response::Response, routing::get, Router};

use crate::errors::ServiceError;
use crate::handlers::common::success_response;
use crate::AppState;

/// Reporting routes carry no auth layer.
pub fn routes() -> Router<AppState> {
    Router::new().route("/daily-sales", get(daily_sales))
}

async fn daily_sales(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let report = state.services.reports.daily_sales().await?;
    Ok(success_response(report))
}
