//! Project business logic - CRUD and the derived payment status.
//!
//! `payment_status` is never stored. It is recomputed from `amount_paid` vs
//! `total_cost` wherever it is needed, which makes drift between the two
//! impossible by construction.

use crate::{
    core::pricing,
    entities::{
        AddOn, Package, Project, PromoCode, Transaction, add_on, project, transaction,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};

/// Derived payment state of a project. Always computed, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing has been paid yet
    Unpaid,
    /// A deposit has been paid but the total is not covered
    DepositPaid,
    /// The full total has been paid
    PaidInFull,
}

impl PaymentStatus {
    /// The three-way rule: `paid <= 0` is unpaid, `paid >= total` is paid in
    /// full, anything in between is a deposit.
    #[must_use]
    pub fn from_amounts(amount_paid: f64, total_cost: f64) -> Self {
        if amount_paid <= 0.0 {
            Self::Unpaid
        } else if amount_paid >= total_cost {
            Self::PaidInFull
        } else {
            Self::DepositPaid
        }
    }
}

/// Computes the derived payment status of a project row.
#[must_use]
pub fn payment_status(project: &project::Model) -> PaymentStatus {
    PaymentStatus::from_amounts(project.amount_paid, project.total_cost)
}

/// Input for creating or re-pricing a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    /// Owning client
    pub client_id: i64,
    /// Project name
    pub name: String,
    /// Kind of engagement
    pub project_type: String,
    /// Scheduled date
    pub date: NaiveDate,
    /// Package to price from
    pub package_id: i64,
    /// Selected duration tier label, if any
    pub duration_selection: Option<String>,
    /// Selected add-on ids
    #[serde(default)]
    pub add_on_ids: Vec<i64>,
    /// Promo code id to apply, if any
    pub promo_code_id: Option<i64>,
    /// Transport fee
    #[serde(default)]
    pub transport_cost: f64,
}

/// Resolves the catalog rows a project input references and prices it.
/// Returns the quote plus everything needed to snapshot the booking.
pub(crate) async fn price_input<C>(
    db: &C,
    input: &ProjectInput,
    today: NaiveDate,
) -> Result<PricedInput>
where
    C: ConnectionTrait,
{
    let package = Package::find_by_id(input.package_id)
        .one(db)
        .await?
        .ok_or(Error::PackageNotFound {
            id: input.package_id,
        })?;

    let mut add_ons = Vec::with_capacity(input.add_on_ids.len());
    for add_on_id in &input.add_on_ids {
        let add_on = AddOn::find_by_id(*add_on_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::Validation {
                message: format!("unknown add-on id: {add_on_id}"),
            })?;
        add_ons.push(add_on);
    }

    let promo = match input.promo_code_id {
        Some(promo_id) => Some(
            PromoCode::find_by_id(promo_id)
                .one(db)
                .await?
                .ok_or(Error::PromoCodeNotFound { id: promo_id })?,
        ),
        None => None,
    };

    let quote = pricing::price_booking(
        &package,
        input.duration_selection.as_deref(),
        &add_ons,
        promo.as_ref(),
        input.transport_cost,
        today,
    )?;

    Ok(PricedInput {
        package,
        add_ons,
        promo,
        quote,
    })
}

/// A project input with its catalog references resolved and priced.
pub(crate) struct PricedInput {
    pub package: crate::entities::package::Model,
    pub add_ons: Vec<add_on::Model>,
    pub promo: Option<crate::entities::promo_code::Model>,
    pub quote: pricing::Quote,
}

/// Serializes the add-on snapshot stored on a project row.
pub(crate) fn snapshot_add_ons(add_ons: &[add_on::Model]) -> Json {
    serde_json::json!(
        add_ons
            .iter()
            .map(|a| serde_json::json!({"id": a.id, "name": a.name, "price": a.price}))
            .collect::<Vec<_>>()
    )
}

/// Creates a project priced from the catalog, with validated name and a
/// snapshot of the selected add-ons.
pub async fn create_project(
    db: &DatabaseConnection,
    input: ProjectInput,
    today: NaiveDate,
) -> Result<project::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "project name cannot be empty".to_string(),
        });
    }

    let client = crate::core::client::get_client(db, input.client_id).await?;
    let priced = price_input(db, &input, today).await?;

    let tier_price = input
        .duration_selection
        .as_deref()
        .map(|label| pricing::base_price(&priced.package, Some(label)))
        .transpose()?;

    let discount = (priced.quote.discount > 0.0).then_some(priced.quote.discount);
    project::ActiveModel {
        client_id: Set(client.id),
        name: Set(input.name.trim().to_string()),
        project_type: Set(input.project_type.clone()),
        date: Set(input.date),
        package_id: Set(Some(priced.package.id)),
        package_name: Set(priced.package.name.clone()),
        add_ons: Set(snapshot_add_ons(&priced.add_ons)),
        duration_selection: Set(input.duration_selection.clone()),
        unit_price: Set(tier_price),
        promo_code_id: Set(priced.promo.as_ref().map(|p| p.id)),
        discount_amount: Set(discount),
        transport_cost: Set(input.transport_cost),
        total_cost: Set(priced.quote.total),
        amount_paid: Set(0.0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Re-prices and rewrites a project from fresh inputs. `amount_paid` is
/// preserved; the derived payment status follows the new total automatically.
pub async fn update_project(
    db: &DatabaseConnection,
    project_id: i64,
    input: ProjectInput,
    today: NaiveDate,
) -> Result<project::Model> {
    let existing = get_project(db, project_id).await?;
    let priced = price_input(db, &input, today).await?;

    let tier_price = input
        .duration_selection
        .as_deref()
        .map(|label| pricing::base_price(&priced.package, Some(label)))
        .transpose()?;

    let discount = (priced.quote.discount > 0.0).then_some(priced.quote.discount);
    let mut active: project::ActiveModel = existing.into();
    active.client_id = Set(input.client_id);
    active.name = Set(input.name.trim().to_string());
    active.project_type = Set(input.project_type.clone());
    active.date = Set(input.date);
    active.package_id = Set(Some(priced.package.id));
    active.package_name = Set(priced.package.name.clone());
    active.add_ons = Set(snapshot_add_ons(&priced.add_ons));
    active.duration_selection = Set(input.duration_selection.clone());
    active.unit_price = Set(tier_price);
    active.promo_code_id = Set(priced.promo.as_ref().map(|p| p.id));
    active.discount_amount = Set(discount);
    active.transport_cost = Set(input.transport_cost);
    active.total_cost = Set(priced.quote.total);
    active.update(db).await.map_err(Into::into)
}

/// Deletes a project, detaching its ledger entries first: their `project_id`
/// is nulled, never cascaded away.
pub async fn delete_project(db: &DatabaseConnection, project_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let project = Project::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })?;

    detach_transactions(&txn, project.id).await?;
    project.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Nulls `project_id` on every ledger entry pointing at a project.
pub(crate) async fn detach_transactions<C>(db: &C, project_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Transaction::update_many()
        .col_expr(transaction::Column::ProjectId, Expr::value(Option::<i64>::None))
        .filter(transaction::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Looks up a project, failing with `ProjectNotFound` if it does not exist.
pub async fn get_project(db: &DatabaseConnection, project_id: i64) -> Result<project::Model> {
    Project::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })
}

/// Retrieves all projects, soonest engagement first.
pub async fn list_projects(db: &DatabaseConnection) -> Result<Vec<project::Model>> {
    Project::find()
        .order_by_asc(project::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_payment_status_three_way_rule() {
        assert_eq!(
            PaymentStatus::from_amounts(0.0, 1_000_000.0),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::from_amounts(-50.0, 1_000_000.0),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::from_amounts(500_000.0, 1_000_000.0),
            PaymentStatus::DepositPaid
        );
        assert_eq!(
            PaymentStatus::from_amounts(1_000_000.0, 1_000_000.0),
            PaymentStatus::PaidInFull
        );
        assert_eq!(
            PaymentStatus::from_amounts(1_200_000.0, 1_000_000.0),
            PaymentStatus::PaidInFull
        );
    }

    #[tokio::test]
    async fn test_create_project_snapshots_add_ons() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Client").await?;
        let package = create_test_package(&db, "Silver", 5_000_000.0).await?;
        let add_on = create_test_add_on(&db, "Drone Footage", 500_000.0).await?;

        let project = create_project(
            &db,
            ProjectInput {
                client_id: client.id,
                name: "Wedding of A & B".to_string(),
                project_type: "Wedding".to_string(),
                date: test_date(),
                package_id: package.id,
                duration_selection: None,
                add_on_ids: vec![add_on.id],
                promo_code_id: None,
                transport_cost: 0.0,
            },
            test_date(),
        )
        .await?;

        assert_eq!(project.total_cost, 5_500_000.0);
        assert_eq!(project.package_name, "Silver");
        assert_eq!(payment_status(&project), PaymentStatus::Unpaid);

        // The snapshot carries the price at booking time
        let snapshot: Vec<serde_json::Value> =
            serde_json::from_value(project.add_ons.clone()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0]["name"], "Drone Footage");
        assert_eq!(snapshot[0]["price"], 500_000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_project_rejects_unknown_add_on() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Client").await?;
        let package = create_test_package(&db, "Silver", 5_000_000.0).await?;

        let result = create_project(
            &db,
            ProjectInput {
                client_id: client.id,
                name: "Broken".to_string(),
                project_type: "Wedding".to_string(),
                date: test_date(),
                package_id: package.id,
                duration_selection: None,
                add_on_ids: vec![999],
                promo_code_id: None,
                transport_cost: 0.0,
            },
            test_date(),
        )
        .await;

        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_project_preserves_amount_paid() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Client").await?;
        let package = create_test_package(&db, "Silver", 5_000_000.0).await?;
        let card = create_test_card(&db, 0.0).await?;

        let project = create_project(
            &db,
            ProjectInput {
                client_id: client.id,
                name: "Wedding".to_string(),
                project_type: "Wedding".to_string(),
                date: test_date(),
                package_id: package.id,
                duration_selection: None,
                add_on_ids: vec![],
                promo_code_id: None,
                transport_cost: 0.0,
            },
            test_date(),
        )
        .await?;

        crate::core::ledger::record_payment(&db, project.id, 2_000_000.0, card.id, test_date())
            .await?;

        let updated = update_project(
            &db,
            project.id,
            ProjectInput {
                client_id: client.id,
                name: "Wedding (revised)".to_string(),
                project_type: "Wedding".to_string(),
                date: test_date(),
                package_id: package.id,
                duration_selection: None,
                add_on_ids: vec![],
                promo_code_id: None,
                transport_cost: 250_000.0,
            },
            test_date(),
        )
        .await?;

        assert_eq!(updated.amount_paid, 2_000_000.0);
        assert_eq!(updated.total_cost, 5_250_000.0);
        assert_eq!(payment_status(&updated), PaymentStatus::DepositPaid);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_project_detaches_transactions() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Client").await?;
        let package = create_test_package(&db, "Silver", 1_000_000.0).await?;
        let card = create_test_card(&db, 0.0).await?;

        let project = create_project(
            &db,
            ProjectInput {
                client_id: client.id,
                name: "Wedding".to_string(),
                project_type: "Wedding".to_string(),
                date: test_date(),
                package_id: package.id,
                duration_selection: None,
                add_on_ids: vec![],
                promo_code_id: None,
                transport_cost: 0.0,
            },
            test_date(),
        )
        .await?;

        let (entry, _) =
            crate::core::ledger::record_payment(&db, project.id, 500_000.0, card.id, test_date())
                .await?;

        delete_project(&db, project.id).await?;

        // The ledger row survives, detached; the card balance stands
        let entry = Transaction::find_by_id(entry.id).one(&db).await?.unwrap();
        assert_eq!(entry.project_id, None);
        assert_eq!(entry.amount, 500_000.0);

        Ok(())
    }
}
