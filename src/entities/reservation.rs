use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub table_id: i32,
    pub reservation_time: DateTime<Utc>,
    pub guests_count: i32,
    pub special_requests: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// The only status ever written: rows are created booked and cancellation
/// deletes them outright.
pub const STATUS_BOOKED: &str = "booked";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dining_table::Entity",
        from = "Column::TableId",
        to = "super::dining_table::Column::Id"
    )]
    DiningTable,
}

impl Related<super::dining_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
