use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use serde::Serialize;
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::order;
use crate::errors::ServiceError;

#[derive(Debug, Serialize)]
pub struct DailySalesReport {
    pub date: NaiveDate,
    pub total_orders: u64,
    pub total_revenue: f64,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Order count and revenue for the current server-local calendar date.
    /// A day without orders reports zeros, never an error.
    #[instrument(skip(self))]
    pub async fn daily_sales(&self) -> Result<DailySalesReport, ServiceError> {
        let today = Local::now().date_naive();
        let start_local = today.and_hms_opt(0, 0, 0).expect("midnight is valid");
        let start = Local
            .from_local_datetime(&start_local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc::now() - Duration::days(1));
        let end = start + Duration::days(1);

        let window = order::Column::CreatedAt
            .gte(start)
            .and(order::Column::CreatedAt.lt(end));

        let total_orders = order::Entity::find()
            .filter(window.clone())
            .count(self.db.as_ref())
            .await?;

        let total: Option<Decimal> = order::Entity::find()
            .select_only()
            .column_as(order::Column::TotalAmount.sum(), "total")
            .filter(window)
            .into_tuple::<Option<Decimal>>()
            .one(self.db.as_ref())
            .await?
            .flatten();

        let total_revenue = total.and_then(|d| d.to_f64()).unwrap_or(0.0);

        Ok(DailySalesReport {
            date: today,
            total_orders,
            total_revenue,
        })
    }
}
