//! Reward ledger entry - A signed credit or debit on a freelancer's
//! incentive balance. Positive amounts are credits, negative amounts are
//! withdrawals. Both member balances and the reward-pool total are derived by
//! summing these rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reward ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reward_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the team member this entry belongs to
    pub team_member_id: i64,
    /// Signed amount: positive credit, negative withdrawal
    pub amount: f64,
    /// What the entry is for
    pub description: String,
    /// Date the entry was recorded
    pub date: Date,
    /// Project that earned the reward, if any
    pub project_id: Option<i64>,
}

/// Defines relationships between reward entries and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one team member
    #[sea_orm(
        belongs_to = "super::team_member::Entity",
        from = "Column::TeamMemberId",
        to = "super::team_member::Column::Id"
    )]
    TeamMember,
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
