//! Card and pocket account management.
//!
//! Accounts are ledger-backed: a card created with an opening balance gets an
//! opening ledger entry rather than a bare balance write, and an account can
//! only be deleted once its balance is zero, with any remaining ledger rows
//! detached rather than destroyed.

use crate::{
    entities::{
        Card, Pocket, Transaction, card, pocket,
        transaction::{self, TYPE_INCOME},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Deserialize;

/// Input for creating a card.
#[derive(Debug, Clone, Deserialize)]
pub struct CardInput {
    /// Issuing bank, or a label like "Cash"
    pub bank_name: String,
    /// `"debit"`, `"credit"`, or `"cash"`
    pub card_type: String,
    /// Last four digits, or "CASH"
    pub last_four: String,
    /// Opening balance, recorded as an opening ledger entry
    #[serde(default)]
    pub opening_balance: f64,
}

/// Input for creating a pocket.
#[derive(Debug, Clone, Deserialize)]
pub struct PocketInput {
    /// Pocket name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// `"saving"`, `"expense"`, `"locked"`, or `"reward_pool"`
    pub pocket_type: String,
    /// Savings target, if any
    pub goal_amount: Option<f64>,
    /// For locked pockets, when withdrawals unlock
    pub lock_end_date: Option<NaiveDate>,
    /// Default funding card, if any
    pub source_card_id: Option<i64>,
    /// Budget period start (required for expense pockets)
    pub period_start: Option<NaiveDate>,
    /// Budget period end, exclusive (required for expense pockets)
    pub period_end: Option<NaiveDate>,
}

const CARD_TYPES: &[&str] = &["debit", "credit", "cash"];
const POCKET_TYPES: &[&str] = &[
    pocket::TYPE_SAVING,
    pocket::TYPE_EXPENSE,
    pocket::TYPE_LOCKED,
    pocket::TYPE_REWARD_POOL,
];

/// Creates a card. A nonzero opening balance is written through the ledger as
/// an "Opening Balance" income entry so the balance invariant holds from the
/// first row.
pub async fn create_card(
    db: &DatabaseConnection,
    input: CardInput,
    date: NaiveDate,
) -> Result<card::Model> {
    if !CARD_TYPES.contains(&input.card_type.as_str()) {
        return Err(Error::Validation {
            message: format!("unknown card type: {}", input.card_type),
        });
    }
    if !input.opening_balance.is_finite() || input.opening_balance < 0.0 {
        return Err(Error::InvalidAmount {
            amount: input.opening_balance,
        });
    }

    let txn = db.begin().await?;

    let card = card::ActiveModel {
        bank_name: Set(input.bank_name.clone()),
        card_type: Set(input.card_type.clone()),
        last_four: Set(input.last_four.clone()),
        balance: Set(input.opening_balance),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if input.opening_balance > 0.0 {
        transaction::ActiveModel {
            date: Set(date),
            description: Set(format!("Opening balance for {}", card.bank_name)),
            amount: Set(input.opening_balance),
            tx_type: Set(TYPE_INCOME.to_string()),
            category: Set("Opening Balance".to_string()),
            card_id: Set(Some(card.id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(card)
}

/// Creates a pocket with a zero balance; money arrives through deposits.
/// Expense pockets must declare their budget period up front.
pub async fn create_pocket(db: &DatabaseConnection, input: PocketInput) -> Result<pocket::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "pocket name cannot be empty".to_string(),
        });
    }
    if !POCKET_TYPES.contains(&input.pocket_type.as_str()) {
        return Err(Error::Validation {
            message: format!("unknown pocket type: {}", input.pocket_type),
        });
    }
    if input.pocket_type == pocket::TYPE_EXPENSE
        && (input.period_start.is_none() || input.period_end.is_none())
    {
        return Err(Error::Validation {
            message: "an expense pocket needs period_start and period_end".to_string(),
        });
    }

    pocket::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(input.description.clone()),
        pocket_type: Set(input.pocket_type.clone()),
        amount: Set(0.0),
        goal_amount: Set(input.goal_amount),
        lock_end_date: Set(input.lock_end_date),
        source_card_id: Set(input.source_card_id),
        period_start: Set(input.period_start),
        period_end: Set(input.period_end),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Balances this close to zero count as empty for deletion. Repeated float
/// deltas can leave sub-cent residue that would otherwise make an account
/// undeletable.
const ZERO_BALANCE_EPSILON: f64 = 1e-6;

fn is_zero_balance(balance: f64) -> bool {
    balance.abs() < ZERO_BALANCE_EPSILON
}

/// Deletes a card once its balance is zero, detaching its ledger rows.
pub async fn delete_card(db: &DatabaseConnection, card_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let card = Card::find_by_id(card_id)
        .one(&txn)
        .await?
        .ok_or(Error::CardNotFound { id: card_id })?;
    if !is_zero_balance(card.balance) {
        return Err(Error::Validation {
            message: format!(
                "card still holds {:.2}; move the balance before deleting",
                card.balance
            ),
        });
    }

    Transaction::update_many()
        .col_expr(transaction::Column::CardId, Expr::value(Option::<i64>::None))
        .filter(transaction::Column::CardId.eq(card_id))
        .exec(&txn)
        .await?;
    card.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Deletes a pocket once its balance is zero, detaching its ledger rows.
pub async fn delete_pocket(db: &DatabaseConnection, pocket_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let pocket = Pocket::find_by_id(pocket_id)
        .one(&txn)
        .await?
        .ok_or(Error::PocketNotFound { id: pocket_id })?;
    if !is_zero_balance(pocket.amount) {
        return Err(Error::Validation {
            message: format!(
                "pocket still holds {:.2}; withdraw the balance before deleting",
                pocket.amount
            ),
        });
    }

    Transaction::update_many()
        .col_expr(
            transaction::Column::PocketId,
            Expr::value(Option::<i64>::None),
        )
        .filter(transaction::Column::PocketId.eq(pocket_id))
        .exec(&txn)
        .await?;
    pocket.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Retrieves all cards, ordered by bank name.
pub async fn list_cards(db: &DatabaseConnection) -> Result<Vec<card::Model>> {
    Card::find()
        .order_by_asc(card::Column::BankName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all pockets, ordered alphabetically by name.
pub async fn list_pockets(db: &DatabaseConnection) -> Result<Vec<pocket::Model>> {
    Pocket::find()
        .order_by_asc(pocket::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
