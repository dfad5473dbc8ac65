//! Budget period close-out for expense pockets.
//!
//! An expense pocket carries an explicit `[period_start, period_end)` window.
//! When the period ends, any leftover balance is swept into a freshly created
//! saving pocket and the window advances by one month. The sweep is written
//! through the ledger so pocket balances stay equal to their entry sums.

use crate::{
    entities::{
        Pocket, pocket,
        transaction::{self, TYPE_EXPENSE, TYPE_INCOME},
    },
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait, prelude::*};
use serde::Serialize;

/// Outcome of closing one budget period.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetCloseResult {
    /// Pocket whose period was closed
    pub pocket_id: i64,
    /// Balance swept out, zero when nothing was left
    pub leftover: f64,
    /// Saving pocket created to hold the leftover, if any
    pub savings_pocket_id: Option<i64>,
    /// Start of the new period
    pub new_period_start: NaiveDate,
    /// End of the new period
    pub new_period_end: NaiveDate,
}

/// Whether a pocket's budget period has ended as of `today`.
/// The end date is exclusive, so a period ending on the 1st is due on the 1st.
pub fn is_due(pocket: &pocket::Model, today: NaiveDate) -> bool {
    pocket.pocket_type == pocket::TYPE_EXPENSE
        && pocket.period_end.is_some_and(|end| today >= end)
}

fn advance_period(start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    (start + Months::new(1), end + Months::new(1))
}

/// Closes one expense pocket's budget period.
///
/// Returns `Ok(None)` when the pocket's period has not ended yet. A positive
/// leftover is moved to a new saving pocket via a paired transfer; the pocket
/// then starts its next period at zero.
pub async fn close_budget_period(
    db: &DatabaseConnection,
    pocket_id: i64,
    today: NaiveDate,
) -> Result<Option<BudgetCloseResult>> {
    let pocket = Pocket::find_by_id(pocket_id)
        .one(db)
        .await?
        .ok_or(Error::PocketNotFound { id: pocket_id })?;

    if pocket.pocket_type != pocket::TYPE_EXPENSE {
        return Err(Error::Validation {
            message: format!("pocket '{}' is not an expense pocket", pocket.name),
        });
    }
    if !is_due(&pocket, today) {
        return Ok(None);
    }

    let (period_start, period_end) = match (pocket.period_start, pocket.period_end) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            return Err(Error::Validation {
                message: format!("pocket '{}' has no budget period set", pocket.name),
            });
        }
    };
    let (new_start, new_end) = advance_period(period_start, period_end);
    let leftover = pocket.amount;

    let txn = db.begin().await?;

    let savings_pocket_id = if leftover > 0.0 {
        let savings = pocket::ActiveModel {
            name: Set(format!("{} leftover {}", pocket.name, period_start.format("%Y-%m"))),
            pocket_type: Set(pocket::TYPE_SAVING.to_string()),
            amount: Set(leftover),
            source_card_id: Set(pocket.source_card_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let description = format!("Budget close-out: {}", pocket.name);
        let out_leg = transaction::ActiveModel {
            date: Set(today),
            description: Set(description.clone()),
            amount: Set(leftover),
            tx_type: Set(TYPE_EXPENSE.to_string()),
            category: Set("Budget Close".to_string()),
            pocket_id: Set(Some(pocket.id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let in_leg = transaction::ActiveModel {
            date: Set(today),
            description: Set(description),
            amount: Set(leftover),
            tx_type: Set(TYPE_INCOME.to_string()),
            category: Set("Budget Close".to_string()),
            pocket_id: Set(Some(savings.id)),
            ref_id: Set(Some(out_leg.id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let mut out_active: transaction::ActiveModel = out_leg.into();
        out_active.ref_id = Set(Some(in_leg.id));
        out_active.update(&txn).await?;

        Some(savings.id)
    } else {
        None
    };

    let mut active: pocket::ActiveModel = pocket.into();
    active.amount = Set(0.0);
    active.period_start = Set(Some(new_start));
    active.period_end = Set(Some(new_end));
    active.update(&txn).await?;

    txn.commit().await?;

    Ok(Some(BudgetCloseResult {
        pocket_id,
        leftover: leftover.max(0.0),
        savings_pocket_id,
        new_period_start: new_start,
        new_period_end: new_end,
    }))
}

/// Closes every expense pocket whose period has ended. Run at startup.
pub async fn close_due_budget_periods(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<BudgetCloseResult>> {
    let pockets = Pocket::find()
        .filter(pocket::Column::PocketType.eq(pocket::TYPE_EXPENSE))
        .all(db)
        .await?;

    let mut results = Vec::new();
    for pocket in pockets {
        // A pocket more than one period behind is closed repeatedly until
        // its window catches up with today.
        while let Some(result) = close_budget_period(db, pocket.id, today).await? {
            tracing::info!(
                pocket_id = result.pocket_id,
                leftover = result.leftover,
                "closed budget period"
            );
            results.push(result);
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn budget_pocket(
        db: &DatabaseConnection,
        amount: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<pocket::Model> {
        let card = create_test_card(db, amount + 1_000_000.0).await?;
        let pocket = pocket::ActiveModel {
            name: Set("Monthly Ops".to_string()),
            pocket_type: Set(pocket::TYPE_EXPENSE.to_string()),
            amount: Set(0.0),
            period_start: Set(Some(start)),
            period_end: Set(Some(end)),
            ..Default::default()
        }
        .insert(db)
        .await?;
        if amount > 0.0 {
            crate::core::ledger::deposit_to_pocket(db, card.id, pocket.id, amount, start).await?;
        }
        Ok(pocket)
    }

    #[tokio::test]
    async fn test_not_due_returns_none() -> Result<()> {
        let db = setup_test_db().await?;
        let pocket =
            budget_pocket(&db, 100_000.0, date(2026, 8, 1), date(2026, 9, 1)).await?;

        let result = close_budget_period(&db, pocket.id, date(2026, 8, 15)).await?;
        assert!(result.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_leftover_swept_to_new_saving_pocket() -> Result<()> {
        let db = setup_test_db().await?;
        let pocket =
            budget_pocket(&db, 150_000.0, date(2026, 8, 1), date(2026, 9, 1)).await?;

        let result = close_budget_period(&db, pocket.id, date(2026, 9, 1))
            .await?
            .unwrap();
        assert_eq!(result.leftover, 150_000.0);
        assert_eq!(result.new_period_start, date(2026, 9, 1));
        assert_eq!(result.new_period_end, date(2026, 10, 1));

        let reloaded = Pocket::find_by_id(pocket.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.amount, 0.0);
        assert_eq!(reloaded.period_start, Some(date(2026, 9, 1)));

        let savings = Pocket::find_by_id(result.savings_pocket_id.unwrap())
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(savings.pocket_type, pocket::TYPE_SAVING);
        assert_eq!(savings.amount, 150_000.0);

        // Both close-out legs are ref-paired.
        let entries = crate::core::ledger::list_transactions(&db).await?;
        let legs: Vec<_> = entries
            .iter()
            .filter(|e| e.category == "Budget Close")
            .collect();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].ref_id, Some(legs[1].id));
        assert_eq!(legs[1].ref_id, Some(legs[0].id));

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_leftover_just_advances_period() -> Result<()> {
        let db = setup_test_db().await?;
        let pocket = budget_pocket(&db, 0.0, date(2026, 8, 1), date(2026, 9, 1)).await?;

        let result = close_budget_period(&db, pocket.id, date(2026, 9, 3))
            .await?
            .unwrap();
        assert_eq!(result.leftover, 0.0);
        assert!(result.savings_pocket_id.is_none());

        let reloaded = Pocket::find_by_id(pocket.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.period_end, Some(date(2026, 10, 1)));
        assert!(crate::core::ledger::list_transactions(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_sweep_catches_up_multiple_periods() -> Result<()> {
        let db = setup_test_db().await?;
        let pocket = budget_pocket(&db, 0.0, date(2026, 6, 1), date(2026, 7, 1)).await?;

        let results = close_due_budget_periods(&db, date(2026, 9, 1)).await?;
        assert_eq!(results.len(), 3);

        let reloaded = Pocket::find_by_id(pocket.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.period_start, Some(date(2026, 9, 1)));
        assert_eq!(reloaded.period_end, Some(date(2026, 10, 1)));

        Ok(())
    }

    #[tokio::test]
    async fn test_saving_pocket_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let pocket = create_test_pocket(&db, "Savings", 0.0).await?;

        let result = close_budget_period(&db, pocket.id, test_date()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }
}
