use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A staff account. `password_hash` never leaves the server: responses are
/// built from [`Model::into_public`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}

/// Roles understood by the authorization layer.
pub const ROLES: [&str; 3] = ["admin", "staff", "customer"];

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// Staff record with the credential column stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicStaff {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl Model {
    pub fn into_public(self) -> PublicStaff {
        PublicStaff {
            id: self.id,
            username: self.username,
            email: self.email,
            role: self.role,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
