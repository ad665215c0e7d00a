use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Serialize;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{invoice, order};
use crate::errors::{on_unique_violation, ServiceError};

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: i32,
    pub order_id: i32,
    pub invoice_number: String,
    pub issue_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_status: String,
}

impl From<invoice::Model> for InvoiceResponse {
    fn from(model: invoice::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            invoice_number: model.invoice_number,
            issue_date: model.issue_date,
            total_amount: model.total_amount,
            payment_status: model.payment_status,
        }
    }
}

#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DbPool>,
}

impl InvoiceService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Generates the invoice for a completed order.
    ///
    /// The existing-invoice pre-check gives the friendly message; the UNIQUE
    /// constraint on `order_id` turns a concurrent second insert into the
    /// same 400 instead of a second invoice.
    #[instrument(skip(self), fields(order_id))]
    pub async fn generate(&self, order_id: i32) -> Result<InvoiceResponse, ServiceError> {
        let txn = self.db.begin().await?;

        let order = order::Entity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Order with id {} not found", order_id))
            })?;

        if order.status != order::STATUS_COMPLETED {
            return Err(ServiceError::BadRequest(
                "Invoice can only be generated for completed orders".into(),
            ));
        }

        let existing = invoice::Entity::find()
            .filter(invoice::Column::OrderId.eq(order.id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::BadRequest("Invoice already exists".into()));
        }

        let invoice_number = format!("INV-{}-{}", order.id, Utc::now().timestamp());
        let model = invoice::ActiveModel {
            order_id: Set(order.id),
            invoice_number: Set(invoice_number),
            issue_date: Set(Utc::now()),
            total_amount: Set(order.total_amount),
            payment_status: Set(order.payment_status.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            on_unique_violation(e, ServiceError::BadRequest("Invoice already exists".into()))
        })?;

        txn.commit().await?;

        info!(invoice_id = model.id, order_id = model.order_id, "invoice generated");
        Ok(model.into())
    }

    pub async fn list(&self) -> Result<Vec<InvoiceResponse>, ServiceError> {
        let rows = invoice::Entity::find().all(self.db.as_ref()).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
