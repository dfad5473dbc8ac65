//! Shared test utilities.
//!
//! Helper functions for setting up in-memory test databases and creating
//! test entities with sensible defaults.

use crate::{
    entities::{self, card, client, package, pocket, project, promo_code, team_member},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed date for tests that need one.
#[allow(clippy::unwrap_used)]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
}

/// Creates a test card with the given balance, bypassing the opening-balance
/// ledger entry. Defaults to a debit card at "Test Bank".
pub async fn create_test_card(
    db: &DatabaseConnection,
    balance: f64,
) -> Result<entities::card::Model> {
    card::ActiveModel {
        bank_name: Set("Test Bank".to_string()),
        card_type: Set("debit".to_string()),
        last_four: Set("0000".to_string()),
        balance: Set(balance),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a saving pocket with the given balance.
pub async fn create_test_pocket(
    db: &DatabaseConnection,
    name: &str,
    amount: f64,
) -> Result<entities::pocket::Model> {
    pocket::ActiveModel {
        name: Set(name.to_string()),
        pocket_type: Set(pocket::TYPE_SAVING.to_string()),
        amount: Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a locked pocket whose withdrawals are blocked until `until`.
pub async fn create_locked_pocket(
    db: &DatabaseConnection,
    name: &str,
    amount: f64,
    until: NaiveDate,
) -> Result<entities::pocket::Model> {
    pocket::ActiveModel {
        name: Set(name.to_string()),
        pocket_type: Set(pocket::TYPE_LOCKED.to_string()),
        amount: Set(amount),
        lock_end_date: Set(Some(until)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active direct client with placeholder contact details.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        phone: Set("0800000000".to_string()),
        status: Set("active".to_string()),
        client_type: Set("direct".to_string()),
        since: Set(test_date()),
        portal_access_id: Set(uuid::Uuid::new_v4().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a project with the given total and nothing paid, written directly
/// so no catalog rows are needed.
pub async fn create_test_project(
    db: &DatabaseConnection,
    client_id: i64,
    total_cost: f64,
) -> Result<entities::project::Model> {
    project::ActiveModel {
        client_id: Set(client_id),
        name: Set("Test Project".to_string()),
        project_type: Set("wedding".to_string()),
        date: Set(test_date()),
        package_name: Set("Custom".to_string()),
        add_ons: Set(serde_json::json!([])),
        transport_cost: Set(0.0),
        total_cost: Set(total_cost),
        amount_paid: Set(0.0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a package without duration tiers.
pub async fn create_test_package(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::package::Model> {
    package::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an add-on with a flat price.
pub async fn create_test_add_on(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::add_on::Model> {
    entities::add_on::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active, uncapped percentage promo code.
pub async fn create_test_promo(
    db: &DatabaseConnection,
    code: &str,
    percent: f64,
) -> Result<entities::promo_code::Model> {
    promo_code::ActiveModel {
        code: Set(code.to_string()),
        discount_type: Set(promo_code::DISCOUNT_PERCENTAGE.to_string()),
        discount_value: Set(percent),
        is_active: Set(true),
        usage_count: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a photographer team member with a standard fee.
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::team_member::Model> {
    team_member::ActiveModel {
        name: Set(name.to_string()),
        role: Set("photographer".to_string()),
        standard_fee: Set(300_000.0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
