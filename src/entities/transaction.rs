//! Transaction entity - The append-only financial ledger.
//!
//! Each row records a positive `amount` with a `tx_type` of `"income"` or
//! `"expense"` and exactly one funds source: a card or a pocket. Card and
//! pocket balances are derived state that must track the signed sum of the
//! rows affecting them; the ledger operations in [`crate::core::ledger`]
//! maintain that invariant atomically.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Date the money moved
    pub date: Date,
    /// Human-readable description
    pub description: String,
    /// Amount as a positive magnitude; direction comes from `tx_type`
    pub amount: f64,
    /// `"income"` or `"expense"`
    pub tx_type: String,
    /// Reporting category (e.g., "DP Payment", "Equipment", "Transfer")
    pub category: String,
    /// ID of the project this row relates to, if any
    pub project_id: Option<i64>,
    /// Card the money moved through; mutually exclusive with `pocket_id`
    pub card_id: Option<i64>,
    /// Pocket the money moved through; mutually exclusive with `card_id`
    pub pocket_id: Option<i64>,
    /// For transfer legs, the id of the paired entry on the other side
    pub ref_id: Option<i64>,
    /// Signature reference for vendor payouts, if any
    pub vendor_signature: Option<String>,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction may belong to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    /// Each transaction may move through one card
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::CardId",
        to = "super::card::Column::Id"
    )]
    Card,
    /// Each transaction may move through one pocket
    #[sea_orm(
        belongs_to = "super::pocket::Entity",
        from = "Column::PocketId",
        to = "super::pocket::Column::Id"
    )]
    Pocket,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl Related<super::pocket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pocket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// `tx_type` value for money coming in.
pub const TYPE_INCOME: &str = "income";
/// `tx_type` value for money going out.
pub const TYPE_EXPENSE: &str = "expense";
