use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{dining_table, reservation};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub table_id: i32,
    pub reservation_time: DateTime<Utc>,
    #[validate(range(min = 1, message = "guests_count must be at least 1"))]
    pub guests_count: i32,
    pub special_requests: Option<String>,
}

/// Partial update: absent fields keep their prior values.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReservationRequest {
    pub reservation_time: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "guests_count must be at least 1"))]
    pub guests_count: Option<i32>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: i32,
    pub user_id: i32,
    pub table_id: i32,
    pub reservation_time: DateTime<Utc>,
    pub guests_count: i32,
    pub special_requests: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<reservation::Model> for ReservationResponse {
    fn from(model: reservation::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            table_id: model.table_id,
            reservation_time: model.reservation_time,
            guests_count: model.guests_count,
            special_requests: model.special_requests,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// Reservation workflow: claiming and releasing tables is transactional so
/// the table flag and the reservation row never observably diverge.
#[derive(Clone)]
pub struct ReservationService {
    db: Arc<DbPool>,
}

impl ReservationService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Creates a reservation for the calling user.
    ///
    /// The table is claimed with a conditional update (`is_available = false
    /// WHERE is_available = true`); zero rows affected means another caller
    /// holds the table, so concurrent attempts cannot double-book.
    #[instrument(skip(self, request), fields(user_id, table_id = request.table_id))]
    pub async fn create(
        &self,
        user_id: i32,
        request: CreateReservationRequest,
    ) -> Result<ReservationResponse, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;

        let table = dining_table::Entity::find_by_id(request.table_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Table with id {} not found", request.table_id))
            })?;

        let claimed = dining_table::Entity::update_many()
            .col_expr(dining_table::Column::IsAvailable, Expr::value(false))
            .filter(dining_table::Column::Id.eq(table.id))
            .filter(dining_table::Column::IsAvailable.eq(true))
            .exec(&txn)
            .await?;

        if claimed.rows_affected == 0 {
            return Err(ServiceError::BadRequest("Table is not available".into()));
        }

        let model = reservation::ActiveModel {
            user_id: Set(user_id),
            table_id: Set(table.id),
            reservation_time: Set(request.reservation_time),
            guests_count: Set(request.guests_count),
            special_requests: Set(request.special_requests),
            status: Set(reservation::STATUS_BOOKED.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(reservation_id = model.id, table_id = model.table_id, "reservation created");
        Ok(model.into())
    }

    /// All reservations belonging to the given user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<ReservationResponse>, ServiceError> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i32) -> Result<ReservationResponse, ServiceError> {
        let model = reservation::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Reservation with id {} not found", id))
            })?;
        Ok(model.into())
    }

    /// Partial-field update. Only the owning user may modify a reservation.
    #[instrument(skip(self, request), fields(reservation_id = id, user_id))]
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        request: UpdateReservationRequest,
    ) -> Result<ReservationResponse, ServiceError> {
        request.validate()?;

        let model = reservation::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Reservation with id {} not found", id))
            })?;

        if model.user_id != user_id {
            return Err(ServiceError::Forbidden(
                "Only the reservation owner may modify it".into(),
            ));
        }

        let mut active: reservation::ActiveModel = model.into();
        if let Some(time) = request.reservation_time {
            active.reservation_time = Set(time);
        }
        if let Some(guests) = request.guests_count {
            active.guests_count = Set(guests);
        }
        if let Some(requests) = request.special_requests {
            active.special_requests = Set(Some(requests));
        }

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    /// Cancels a reservation: frees the table and removes the row in one
    /// transaction. Only the owning user may cancel.
    #[instrument(skip(self), fields(reservation_id = id, user_id))]
    pub async fn cancel(&self, id: i32, user_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let model = reservation::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Reservation with id {} not found", id))
            })?;

        if model.user_id != user_id {
            return Err(ServiceError::Forbidden(
                "Only the reservation owner may cancel it".into(),
            ));
        }

        dining_table::Entity::update_many()
            .col_expr(dining_table::Column::IsAvailable, Expr::value(true))
            .filter(dining_table::Column::Id.eq(model.table_id))
            .exec(&txn)
            .await?;

        let reservation_id = model.id;
        reservation::Entity::delete_by_id(reservation_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(reservation_id, "reservation cancelled");
        Ok(())
    }
}
