use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{branch, order, order_item};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    pub branch_id: i32,
    pub total_amount: Decimal,
    #[validate(length(min = 1, message = "order_items must not be empty"))]
    pub order_items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct OrderItemRequest {
    pub item_id: i32,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: String,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub branch_id: i32,
    pub total_amount: Decimal,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_items: Vec<order_item::Model>,
}

impl OrderResponse {
    fn from_parts(model: order::Model, items: Vec<order_item::Model>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            branch_id: model.branch_id,
            total_amount: model.total_amount,
            status: model.status,
            payment_status: model.payment_status,
            payment_method: model.payment_method,
            created_at: model.created_at,
            order_items: items,
        }
    }
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self::from_parts(model, Vec::new())
    }
}

/// Order workflow. Creation is all-or-nothing: the order row and every line
/// commit in one transaction, with line inserts keyed by the order id the
/// first insert produced.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id, branch_id = request.branch_id))]
    pub async fn create(&self, request: CreateOrderRequest) -> Result<OrderResponse, ServiceError> {
        request.validate()?;
        for line in &request.order_items {
            line.validate()?;
        }

        let txn = self.db.begin().await?;

        branch::Entity::find_by_id(request.branch_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Branch with id {} not found", request.branch_id))
            })?;

        let order = order::ActiveModel {
            user_id: Set(request.user_id),
            branch_id: Set(request.branch_id),
            total_amount: Set(request.total_amount),
            status: Set(order::STATUS_PENDING.to_string()),
            payment_status: Set(order::PAYMENT_UNPAID.to_string()),
            payment_method: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(request.order_items.len());
        for line in &request.order_items {
            let item = order_item::ActiveModel {
                order_id: Set(order.id),
                item_id: Set(line.item_id),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                total_price: Set(line.unit_price * Decimal::from(line.quantity)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await?;

        info!(order_id = order.id, lines = items.len(), "order created");
        Ok(OrderResponse::from_parts(order, items))
    }

    pub async fn list(&self) -> Result<Vec<OrderResponse>, ServiceError> {
        let rows = order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderResponse>, ServiceError> {
        let rows = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Single order including its lines.
    pub async fn get(&self, id: i32) -> Result<OrderResponse, ServiceError> {
        let model = self.find_order(id).await?;
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .all(self.db.as_ref())
            .await?;
        Ok(OrderResponse::from_parts(model, items))
    }

    /// Deletes an order and its lines together.
    #[instrument(skip(self), fields(order_id = id))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let model = order::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order with id {} not found", id)))?;

        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderId.eq(model.id))
            .exec(&txn)
            .await?;
        order::Entity::delete_by_id(model.id).exec(&txn).await?;

        txn.commit().await?;
        info!(order_id = id, "order deleted");
        Ok(())
    }

    /// Sets the order status. The value must belong to the allowed set;
    /// which state may follow which is deliberately not constrained.
    #[instrument(skip(self), fields(order_id = id, status = %status))]
    pub async fn update_status(
        &self,
        id: i32,
        status: &str,
    ) -> Result<OrderResponse, ServiceError> {
        if !order::STATUSES.contains(&status) {
            return Err(ServiceError::InvalidStatus(format!(
                "Invalid order status: {}",
                status
            )));
        }

        let model = self.find_order(id).await?;
        let mut active: order::ActiveModel = model.into();
        active.status = Set(status.to_string());
        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    /// Sets the payment status (and optionally the method), independently of
    /// the order status.
    #[instrument(skip(self, request), fields(order_id = id))]
    pub async fn update_payment_status(
        &self,
        id: i32,
        request: UpdatePaymentStatusRequest,
    ) -> Result<OrderResponse, ServiceError> {
        if !order::PAYMENT_STATUSES.contains(&request.payment_status.as_str()) {
            return Err(ServiceError::InvalidStatus(format!(
                "Invalid payment status: {}",
                request.payment_status
            )));
        }

        let model = self.find_order(id).await?;
        let mut active: order::ActiveModel = model.into();
        active.payment_status = Set(request.payment_status);
        if let Some(method) = request.payment_method {
            active.payment_method = Set(Some(method));
        }
        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn find_order(&self, id: i32) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order with id {} not found", id)))
    }
}
