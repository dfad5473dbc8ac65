//! Pocket entity - A named subdivision of card funds for budgeting and saving.
//!
//! Pockets are ledger-backed: every change to `amount` corresponds to a
//! transaction row. Recurring budgets (`pocket_type = "expense"`) carry an
//! explicit `period_start`/`period_end` pair that the budget-close operation
//! advances; reward-pool pockets keep `amount` at zero and report the sum of
//! the reward ledger instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pocket database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pockets")]
pub struct Model {
    /// Unique identifier for the pocket
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the pocket
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// `"saving"`, `"expense"`, `"locked"`, or `"reward_pool"`
    pub pocket_type: String,
    /// Current balance; always zero for reward pools
    pub amount: f64,
    /// Savings target, if any
    pub goal_amount: Option<f64>,
    /// For locked pockets, the date withdrawals become allowed again
    pub lock_end_date: Option<Date>,
    /// Card this pocket draws from by default, if any
    pub source_card_id: Option<i64>,
    /// Start of the current budget period (expense pockets only)
    pub period_start: Option<Date>,
    /// End of the current budget period, exclusive (expense pockets only)
    pub period_end: Option<Date>,
}

/// Defines relationships between Pocket and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One pocket has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// `pocket_type` for long-term savings.
pub const TYPE_SAVING: &str = "saving";
/// `pocket_type` for a recurring spending budget.
pub const TYPE_EXPENSE: &str = "expense";
/// `pocket_type` for time-locked savings.
pub const TYPE_LOCKED: &str = "locked";
/// `pocket_type` for the freelancer reward pool.
pub const TYPE_REWARD_POOL: &str = "reward_pool";
