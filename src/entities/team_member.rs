//! Team member entity - A freelancer the studio books for projects.
//!
//! No reward balance is stored here; a member's balance is always the sum of
//! their [`super::reward_entry`] rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    /// Unique identifier for the team member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Role on shoots (e.g., "Photographer", "Editor")
    pub role: String,
    /// Contact email, if known
    pub email: Option<String>,
    /// Contact phone, if known
    pub phone: Option<String>,
    /// Default fee per project
    pub standard_fee: f64,
}

/// Defines relationships between team members and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One team member has many reward ledger entries
    #[sea_orm(has_many = "super::reward_entry::Entity")]
    RewardEntries,
}

impl Related<super::reward_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RewardEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
