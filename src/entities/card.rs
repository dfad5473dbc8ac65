//! Card entity - A real-world funds account (bank card or cash drawer).
//!
//! `balance` is derived state: it must equal the signed sum of the
//! transactions that reference this card. Only the ledger operations mutate
//! it, via atomic deltas.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Card database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Unique identifier for the card
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Issuing bank, or a label like "Cash" for the cash account
    pub bank_name: String,
    /// `"debit"`, `"credit"`, or `"cash"`
    pub card_type: String,
    /// Last four digits of the card number, or "CASH"
    pub last_four: String,
    /// Current balance
    pub balance: f64,
}

/// Defines relationships between Card and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One card has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
