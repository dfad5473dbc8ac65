//! Client entity - Represents a customer of the studio.
//!
//! Clients are created manually or by the public booking operation. Projects
//! reference clients by id; deleting a client detaches its ledger history
//! rather than destroying it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name of the client
    pub name: String,
    /// Contact email address
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Optional Instagram handle
    pub instagram: Option<String>,
    /// Lifecycle status: `"active"`, `"inactive"`, `"lead"`, or `"lost"`
    pub status: String,
    /// Kind of client: `"direct"` or `"vendor"`
    pub client_type: String,
    /// Date the client relationship started
    pub since: Date,
    /// Opaque token for the client-facing portal link
    pub portal_access_id: String,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many projects
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
