//! Ledger business logic - Keeps card and pocket balances consistent with the
//! transaction ledger.
//!
//! Every operation here is atomic: the ledger row and the balance delta it
//! implies commit in the same database transaction or not at all. Editing a
//! transaction reverses the old entry's signed effect before applying the new
//! one; deleting reverses it and removes the row. Pockets are ledger-backed,
//! so card-to-pocket transfers write a paired entry on each side.

use crate::{
    core::pricing,
    entities::{
        Card, Pocket, Project, Transaction, card, pocket, project,
        transaction::{self, TYPE_EXPENSE, TYPE_INCOME},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};

/// Input for recording a new ledger entry.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewTransaction {
    /// Date the money moved
    pub date: NaiveDate,
    /// Human-readable description
    pub description: String,
    /// Positive magnitude; direction comes from `tx_type`
    pub amount: f64,
    /// `"income"` or `"expense"`
    pub tx_type: String,
    /// Reporting category
    pub category: String,
    /// Related project, if any
    pub project_id: Option<i64>,
    /// Card source/destination; mutually exclusive with `pocket_id`
    pub card_id: Option<i64>,
    /// Pocket source/destination; mutually exclusive with `card_id`
    pub pocket_id: Option<i64>,
    /// Signature reference for vendor payouts, if any
    pub vendor_signature: Option<String>,
}

/// Both legs of a card-to-pocket transfer.
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// The expense leg on the debited side
    pub out_leg: transaction::Model,
    /// The income leg on the credited side
    pub in_leg: transaction::Model,
}

/// Converts a positive magnitude and direction into the signed delta the
/// source balance moves by: `+amount` for income, `-amount` for expense.
#[must_use]
pub fn signed_delta(tx_type: &str, amount: f64) -> f64 {
    if tx_type == TYPE_INCOME { amount } else { -amount }
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_tx_type(tx_type: &str) -> Result<()> {
    if tx_type != TYPE_INCOME && tx_type != TYPE_EXPENSE {
        return Err(Error::Validation {
            message: format!("unknown transaction type: {tx_type}"),
        });
    }
    Ok(())
}

fn validate_source(card_id: Option<i64>, pocket_id: Option<i64>) -> Result<()> {
    match (card_id, pocket_id) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(Error::Validation {
            message: "a transaction needs exactly one source: a card or a pocket".to_string(),
        }),
    }
}

/// Looks up a card, failing with `CardNotFound` if it does not exist.
pub(crate) async fn find_card<C>(db: &C, card_id: i64) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    Card::find_by_id(card_id)
        .one(db)
        .await?
        .ok_or(Error::CardNotFound { id: card_id })
}

/// Looks up a pocket, failing with `PocketNotFound` if it does not exist.
pub(crate) async fn find_pocket<C>(db: &C, pocket_id: i64) -> Result<pocket::Model>
where
    C: ConnectionTrait,
{
    Pocket::find_by_id(pocket_id)
        .one(db)
        .await?
        .ok_or(Error::PocketNotFound { id: pocket_id })
}

/// Atomically adds `delta` to a card balance with a single
/// `UPDATE cards SET balance = balance + ? WHERE id = ?`, avoiding
/// read-modify-write races. Returns the updated card.
pub(crate) async fn apply_card_delta<C>(db: &C, card_id: i64, delta: f64) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    let _card = find_card(db, card_id).await?;

    Card::update_many()
        .col_expr(
            card::Column::Balance,
            Expr::col(card::Column::Balance).add(delta),
        )
        .filter(card::Column::Id.eq(card_id))
        .exec(db)
        .await?;

    find_card(db, card_id).await
}

/// Atomically adds `delta` to a pocket balance; same single-statement shape as
/// [`apply_card_delta`]. Returns the updated pocket.
pub(crate) async fn apply_pocket_delta<C>(
    db: &C,
    pocket_id: i64,
    delta: f64,
) -> Result<pocket::Model>
where
    C: ConnectionTrait,
{
    let _pocket = find_pocket(db, pocket_id).await?;

    Pocket::update_many()
        .col_expr(
            pocket::Column::Amount,
            Expr::col(pocket::Column::Amount).add(delta),
        )
        .filter(pocket::Column::Id.eq(pocket_id))
        .exec(db)
        .await?;

    find_pocket(db, pocket_id).await
}

/// Applies the signed effect of an entry to whichever source it names.
async fn apply_entry_delta<C>(
    db: &C,
    card_id: Option<i64>,
    pocket_id: Option<i64>,
    delta: f64,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(card_id) = card_id {
        apply_card_delta(db, card_id, delta).await?;
    }
    if let Some(pocket_id) = pocket_id {
        apply_pocket_delta(db, pocket_id, delta).await?;
    }
    Ok(())
}

/// Checks that an expense can be funded. Only pockets enforce a floor: a
/// pocket can never go negative, while card balances may (credit cards).
async fn check_expense_funds<C>(
    db: &C,
    pocket_id: Option<i64>,
    tx_type: &str,
    amount: f64,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if tx_type != TYPE_EXPENSE {
        return Ok(());
    }
    if let Some(pocket_id) = pocket_id {
        let pocket = find_pocket(db, pocket_id).await?;
        if pocket.amount < amount {
            return Err(Error::InsufficientFunds {
                current: pocket.amount,
                required: amount,
            });
        }
    }
    Ok(())
}

/// Verifies a pocket is still at or above zero after deltas applied earlier
/// in the same database transaction. Reversing an income entry can overdraw
/// a pocket whose money was already spent; failing here rolls the whole
/// operation back.
async fn check_pocket_floor<C>(db: &C, pocket_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(pocket_id) = pocket_id else {
        return Ok(());
    };
    let pocket = find_pocket(db, pocket_id).await?;
    if pocket.amount < 0.0 {
        return Err(Error::InsufficientFunds {
            current: pocket.amount,
            required: 0.0,
        });
    }
    Ok(())
}

async fn insert_entry<C>(db: &C, new: &NewTransaction, ref_id: Option<i64>) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    transaction::ActiveModel {
        date: Set(new.date),
        description: Set(new.description.clone()),
        amount: Set(new.amount),
        tx_type: Set(new.tx_type.clone()),
        category: Set(new.category.clone()),
        project_id: Set(new.project_id),
        card_id: Set(new.card_id),
        pocket_id: Set(new.pocket_id),
        ref_id: Set(ref_id),
        vendor_signature: Set(new.vendor_signature.clone()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Records a new ledger entry and moves the source balance by its signed
/// amount, in one database transaction. An expense that would overdraw a
/// pocket is rejected before anything is written.
pub async fn record_transaction(
    db: &DatabaseConnection,
    new: NewTransaction,
) -> Result<transaction::Model> {
    validate_amount(new.amount)?;
    validate_tx_type(&new.tx_type)?;
    validate_source(new.card_id, new.pocket_id)?;

    let txn = db.begin().await?;

    check_expense_funds(&txn, new.pocket_id, &new.tx_type, new.amount).await?;

    let entry = insert_entry(&txn, &new, None).await?;
    apply_entry_delta(
        &txn,
        new.card_id,
        new.pocket_id,
        signed_delta(&new.tx_type, new.amount),
    )
    .await?;

    txn.commit().await?;
    Ok(entry)
}

/// Rewrites an existing entry: the old entry's signed effect is reversed
/// against its old source, then the new values are validated and applied
/// against the new source. Runs in one database transaction, so a failure
/// anywhere leaves both balances untouched. Transfer legs cannot be edited;
/// delete the transfer and record it again.
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    new: NewTransaction,
) -> Result<transaction::Model> {
    validate_amount(new.amount)?;
    validate_tx_type(&new.tx_type)?;
    validate_source(new.card_id, new.pocket_id)?;

    let txn = db.begin().await?;

    let old = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    if old.ref_id.is_some() || has_paired_entry(&txn, old.id).await? {
        return Err(Error::Validation {
            message: "transfer legs cannot be edited; delete the transfer and record it again"
                .to_string(),
        });
    }

    let old_pocket_id = old.pocket_id;

    // Reverse the old effect first so a same-source edit checks funds against
    // the balance as it would be without this entry.
    apply_entry_delta(
        &txn,
        old.card_id,
        old.pocket_id,
        -signed_delta(&old.tx_type, old.amount),
    )
    .await?;

    check_expense_funds(&txn, new.pocket_id, &new.tx_type, new.amount).await?;

    let mut active: transaction::ActiveModel = old.into();
    active.date = Set(new.date);
    active.description = Set(new.description.clone());
    active.amount = Set(new.amount);
    active.tx_type = Set(new.tx_type.clone());
    active.category = Set(new.category.clone());
    active.project_id = Set(new.project_id);
    active.card_id = Set(new.card_id);
    active.pocket_id = Set(new.pocket_id);
    active.vendor_signature = Set(new.vendor_signature.clone());
    let updated = active.update(&txn).await?;

    apply_entry_delta(
        &txn,
        new.card_id,
        new.pocket_id,
        signed_delta(&new.tx_type, new.amount),
    )
    .await?;

    // The old pocket may have been overdrawn by the reversal if the edit
    // moved the entry elsewhere or shrank an income.
    check_pocket_floor(&txn, old_pocket_id).await?;

    txn.commit().await?;
    Ok(updated)
}

async fn has_paired_entry<C>(db: &C, transaction_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(Transaction::find()
        .filter(transaction::Column::RefId.eq(transaction_id))
        .one(db)
        .await?
        .is_some())
}

/// Deletes an entry and reverses its balance effect. A transfer leg takes its
/// paired entry with it, reversing both sides.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let entry = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let paired = match entry.ref_id {
        Some(ref_id) => Transaction::find_by_id(ref_id).one(&txn).await?,
        None => {
            Transaction::find()
                .filter(transaction::Column::RefId.eq(entry.id))
                .one(&txn)
                .await?
        }
    };

    let entry_pocket_id = entry.pocket_id;
    apply_entry_delta(
        &txn,
        entry.card_id,
        entry.pocket_id,
        -signed_delta(&entry.tx_type, entry.amount),
    )
    .await?;
    entry.delete(&txn).await?;

    let mut pair_pocket_id = None;
    if let Some(pair) = paired {
        pair_pocket_id = pair.pocket_id;
        apply_entry_delta(
            &txn,
            pair.card_id,
            pair.pocket_id,
            -signed_delta(&pair.tx_type, pair.amount),
        )
        .await?;
        pair.delete(&txn).await?;
    }

    // Reversing a pocket income (a plain entry or a deposit's incoming leg)
    // must not leave the pocket overdrawn once its money was spent.
    check_pocket_floor(&txn, entry_pocket_id).await?;
    check_pocket_floor(&txn, pair_pocket_id).await?;

    txn.commit().await?;
    Ok(())
}

/// Retrieves all ledger entries, newest first.
pub async fn list_transactions(db: &DatabaseConnection) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all entries linked to one project, newest first.
pub async fn transactions_for_project(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::ProjectId.eq(project_id))
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records a payment against a project: rejects anything above the remaining
/// balance, then credits the destination card through an income entry and
/// bumps `amount_paid`, all in one database transaction. Returns the ledger
/// entry and the updated project.
pub async fn record_payment(
    db: &DatabaseConnection,
    project_id: i64,
    amount: f64,
    card_id: i64,
    date: NaiveDate,
) -> Result<(transaction::Model, project::Model)> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let project = Project::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })?;

    let remaining = pricing::remaining_balance(project.total_cost, project.amount_paid);
    if amount > remaining {
        return Err(Error::Overpayment { amount, remaining });
    }

    let _card = find_card(&txn, card_id).await?;

    let entry = insert_entry(
        &txn,
        &NewTransaction {
            date,
            description: format!("Payment for {}", project.name),
            amount,
            tx_type: TYPE_INCOME.to_string(),
            category: "Project Payment".to_string(),
            project_id: Some(project_id),
            card_id: Some(card_id),
            pocket_id: None,
            vendor_signature: None,
        },
        None,
    )
    .await?;
    apply_card_delta(&txn, card_id, amount).await?;

    let new_paid = project.amount_paid + amount;
    let mut active: project::ActiveModel = project.into();
    active.amount_paid = Set(new_paid);
    let updated_project = active.update(&txn).await?;

    txn.commit().await?;
    Ok((entry, updated_project))
}

/// Moves money from a card into a pocket through two ref-paired ledger
/// entries (expense on the card, income on the pocket), adjusting both
/// balances atomically. Reward pools cannot be deposited into directly; their
/// balance is derived from the reward ledger.
pub async fn deposit_to_pocket(
    db: &DatabaseConnection,
    card_id: i64,
    pocket_id: i64,
    amount: f64,
    date: NaiveDate,
) -> Result<TransferResult> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let _card = find_card(&txn, card_id).await?;
    let pocket = find_pocket(&txn, pocket_id).await?;
    reject_reward_pool(&pocket)?;

    let out_leg = insert_entry(
        &txn,
        &NewTransaction {
            date,
            description: format!("Deposit to {}", pocket.name),
            amount,
            tx_type: TYPE_EXPENSE.to_string(),
            category: "Transfer".to_string(),
            project_id: None,
            card_id: Some(card_id),
            pocket_id: None,
            vendor_signature: None,
        },
        None,
    )
    .await?;
    apply_card_delta(&txn, card_id, -amount).await?;

    let in_leg = insert_entry(
        &txn,
        &NewTransaction {
            date,
            description: format!("Deposit to {}", pocket.name),
            amount,
            tx_type: TYPE_INCOME.to_string(),
            category: "Transfer".to_string(),
            project_id: None,
            card_id: None,
            pocket_id: Some(pocket_id),
            vendor_signature: None,
        },
        Some(out_leg.id),
    )
    .await?;
    apply_pocket_delta(&txn, pocket_id, amount).await?;

    // Pair the first leg back to the second so either side finds the other.
    let mut out_active: transaction::ActiveModel = out_leg.into();
    out_active.ref_id = Set(Some(in_leg.id));
    let out_leg = out_active.update(&txn).await?;

    txn.commit().await?;
    Ok(TransferResult { out_leg, in_leg })
}

/// Moves money back from a pocket to a card, with an insufficient-balance
/// check against the pocket and a lock check for locked pockets.
pub async fn withdraw_from_pocket(
    db: &DatabaseConnection,
    pocket_id: i64,
    card_id: i64,
    amount: f64,
    date: NaiveDate,
) -> Result<TransferResult> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let pocket = find_pocket(&txn, pocket_id).await?;
    let _card = find_card(&txn, card_id).await?;
    reject_reward_pool(&pocket)?;

    if pocket.pocket_type == crate::entities::pocket::TYPE_LOCKED {
        if let Some(until) = pocket.lock_end_date {
            if date < until {
                return Err(Error::PocketLocked { until });
            }
        }
    }
    if pocket.amount < amount {
        return Err(Error::InsufficientFunds {
            current: pocket.amount,
            required: amount,
        });
    }

    let out_leg = insert_entry(
        &txn,
        &NewTransaction {
            date,
            description: format!("Withdrawal from {}", pocket.name),
            amount,
            tx_type: TYPE_EXPENSE.to_string(),
            category: "Transfer".to_string(),
            project_id: None,
            card_id: None,
            pocket_id: Some(pocket_id),
            vendor_signature: None,
        },
        None,
    )
    .await?;
    apply_pocket_delta(&txn, pocket_id, -amount).await?;

    let in_leg = insert_entry(
        &txn,
        &NewTransaction {
            date,
            description: format!("Withdrawal from {}", pocket.name),
            amount,
            tx_type: TYPE_INCOME.to_string(),
            category: "Transfer".to_string(),
            project_id: None,
            card_id: Some(card_id),
            pocket_id: None,
            vendor_signature: None,
        },
        Some(out_leg.id),
    )
    .await?;
    apply_card_delta(&txn, card_id, amount).await?;

    let mut out_active: transaction::ActiveModel = out_leg.into();
    out_active.ref_id = Set(Some(in_leg.id));
    let out_leg = out_active.update(&txn).await?;

    txn.commit().await?;
    Ok(TransferResult { out_leg, in_leg })
}

fn reject_reward_pool(pocket: &pocket::Model) -> Result<()> {
    if pocket.pocket_type == crate::entities::pocket::TYPE_REWARD_POOL {
        return Err(Error::Validation {
            message: "reward pool balance is derived from the reward ledger".to_string(),
        });
    }
    Ok(())
}
