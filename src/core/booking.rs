//! Public booking form intake.
//!
//! A booking submission creates the client, a converted lead record, and the
//! priced project in one database transaction, bumps the promo code's usage
//! count, and optionally records the down payment. Nothing persists if any
//! step fails.

use crate::{
    core::{
        client::{self, ClientInput},
        ledger, pricing,
        project::{self, ProjectInput},
    },
    entities::{
        PromoCode, lead, promo_code,
        transaction::{self, TYPE_INCOME},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

/// A submission from the public booking form.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    /// Client full name
    pub client_name: String,
    /// Client email
    pub email: String,
    /// Client phone
    pub phone: String,
    /// Instagram handle, if given
    pub instagram: Option<String>,
    /// Where the client is located
    pub location: Option<String>,
    /// Kind of engagement, e.g. "wedding"
    pub project_type: String,
    /// Requested session date
    pub date: NaiveDate,
    /// Package being booked
    pub package_id: i64,
    /// Duration tier label, if the package has tiers
    pub duration_selection: Option<String>,
    /// Selected add-on ids
    #[serde(default)]
    pub add_on_ids: Vec<i64>,
    /// Promo code as typed; matched case-insensitively
    pub promo_code: Option<String>,
    /// Transport fee quoted for the location
    #[serde(default)]
    pub transport_cost: f64,
    /// Down payment made with the submission, if any
    pub down_payment: Option<f64>,
    /// Card the down payment landed on; required with `down_payment`
    pub card_id: Option<i64>,
}

/// Everything a booking submission created.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResult {
    pub client: crate::entities::ClientModel,
    pub lead: crate::entities::LeadModel,
    pub project: crate::entities::ProjectModel,
    pub quote: pricing::Quote,
    pub payment: Option<crate::entities::TransactionModel>,
}

/// Looks up an active promo by code, case-insensitively, and checks it is
/// usable today. Unknown codes are rejected rather than silently ignored.
async fn resolve_promo<C>(
    db: &C,
    code: &str,
    today: NaiveDate,
) -> Result<promo_code::Model>
where
    C: ConnectionTrait,
{
    let promo = PromoCode::find()
        .filter(promo_code::Column::Code.eq(code.trim().to_uppercase()))
        .one(db)
        .await?
        .ok_or_else(|| Error::PromoInvalid {
            reason: format!("unknown promo code: {code}"),
        })?;
    pricing::validate_promo(&promo, today)?;
    Ok(promo)
}

/// Processes one booking form submission.
pub async fn submit_booking(
    db: &DatabaseConnection,
    request: BookingRequest,
    today: NaiveDate,
) -> Result<BookingResult> {
    if request.client_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "client name cannot be empty".to_string(),
        });
    }
    if request.down_payment.is_some() && request.card_id.is_none() {
        return Err(Error::Validation {
            message: "a down payment needs a destination card".to_string(),
        });
    }

    let txn = db.begin().await?;

    let promo = match request.promo_code.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(code) => Some(resolve_promo(&txn, code, today).await?),
        None => None,
    };

    let client = client::create_client(
        &txn,
        ClientInput {
            name: request.client_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            instagram: request.instagram.clone(),
            status: Some("lead".to_string()),
            client_type: None,
        },
        today,
    )
    .await?;

    let lead = lead::ActiveModel {
        name: Set(client.name.clone()),
        contact_channel: Set("booking_form".to_string()),
        location: Set(request.location.clone()),
        status: Set("converted".to_string()),
        date: Set(today),
        notes: Set(Some(format!("Booked {} via form", request.project_type))),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let input = ProjectInput {
        client_id: client.id,
        name: format!("{} - {}", request.project_type, client.name),
        project_type: request.project_type.clone(),
        date: request.date,
        package_id: request.package_id,
        duration_selection: request.duration_selection.clone(),
        add_on_ids: request.add_on_ids.clone(),
        promo_code_id: promo.as_ref().map(|p| p.id),
        transport_cost: request.transport_cost,
    };
    let priced = project::price_input(&txn, &input, today).await?;

    let tier_price = input
        .duration_selection
        .as_deref()
        .map(|label| pricing::base_price(&priced.package, Some(label)))
        .transpose()?;
    let discount = (priced.quote.discount > 0.0).then_some(priced.quote.discount);

    let down_payment = match request.down_payment {
        Some(dp) => {
            if dp <= 0.0 || !dp.is_finite() {
                return Err(Error::InvalidAmount { amount: dp });
            }
            if dp > priced.quote.total {
                return Err(Error::Overpayment {
                    amount: dp,
                    remaining: priced.quote.total,
                });
            }
            dp
        }
        None => 0.0,
    };

    let project = crate::entities::project::ActiveModel {
        client_id: Set(client.id),
        name: Set(input.name.clone()),
        project_type: Set(input.project_type.clone()),
        date: Set(input.date),
        package_id: Set(Some(priced.package.id)),
        package_name: Set(priced.package.name.clone()),
        add_ons: Set(project::snapshot_add_ons(&priced.add_ons)),
        duration_selection: Set(input.duration_selection.clone()),
        unit_price: Set(tier_price),
        promo_code_id: Set(promo.as_ref().map(|p| p.id)),
        discount_amount: Set(discount),
        transport_cost: Set(input.transport_cost),
        total_cost: Set(priced.quote.total),
        amount_paid: Set(down_payment),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(promo) = promo {
        let count = promo.usage_count + 1;
        let mut active: promo_code::ActiveModel = promo.into();
        active.usage_count = Set(count);
        active.update(&txn).await?;
    }

    let payment = if down_payment > 0.0 {
        let card_id = request.card_id.ok_or_else(|| Error::Validation {
            message: "a down payment needs a destination card".to_string(),
        })?;
        ledger::find_card(&txn, card_id).await?;
        let entry = transaction::ActiveModel {
            date: Set(today),
            description: Set(format!("Down payment for {}", project.name)),
            amount: Set(down_payment),
            tx_type: Set(TYPE_INCOME.to_string()),
            category: Set("Project Payment".to_string()),
            project_id: Set(Some(project.id)),
            card_id: Set(Some(card_id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        ledger::apply_card_delta(&txn, card_id, down_payment).await?;
        Some(entry)
    } else {
        None
    };

    txn.commit().await?;

    Ok(BookingResult {
        client,
        lead,
        project,
        quote: priced.quote,
        payment,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{core::project::PaymentStatus, entities::Lead, test_utils::*};

    fn request(package_id: i64) -> BookingRequest {
        BookingRequest {
            client_name: "Rani Wijaya".to_string(),
            email: "rani@example.com".to_string(),
            phone: "08123456789".to_string(),
            instagram: Some("@rani".to_string()),
            location: Some("Bandung".to_string()),
            project_type: "wedding".to_string(),
            date: test_date(),
            package_id,
            duration_selection: None,
            add_on_ids: Vec::new(),
            promo_code: None,
            transport_cost: 0.0,
            down_payment: None,
            card_id: None,
        }
    }

    #[tokio::test]
    async fn test_booking_creates_client_lead_and_project() -> Result<()> {
        let db = setup_test_db().await?;
        let package = create_test_package(&db, "Wedding Standard", 5_000_000.0).await?;

        let result = submit_booking(&db, request(package.id), test_date()).await?;

        assert_eq!(result.client.status, "lead");
        assert_eq!(result.lead.contact_channel, "booking_form");
        assert_eq!(result.lead.status, "converted");
        assert_eq!(result.project.total_cost, 5_000_000.0);
        assert_eq!(result.project.amount_paid, 0.0);
        assert!(result.payment.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_booking_with_promo_and_down_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let package = create_test_package(&db, "Wedding Standard", 5_000_000.0).await?;
        let promo = create_test_promo(&db, "LAUNCH10", 10.0).await?;
        let card = create_test_card(&db, 0.0).await?;

        let mut req = request(package.id);
        req.promo_code = Some("launch10".to_string());
        req.down_payment = Some(1_000_000.0);
        req.card_id = Some(card.id);

        let result = submit_booking(&db, req, test_date()).await?;

        assert_eq!(result.quote.total, 4_500_000.0);
        assert_eq!(result.project.amount_paid, 1_000_000.0);
        assert_eq!(
            PaymentStatus::from_amounts(
                result.project.amount_paid,
                result.project.total_cost
            ),
            PaymentStatus::DepositPaid
        );

        let payment = result.payment.unwrap();
        assert_eq!(payment.category, "Project Payment");
        assert_eq!(payment.project_id, Some(result.project.id));

        let card = ledger::find_card(&db, card.id).await?;
        assert_eq!(card.balance, 1_000_000.0);

        let reloaded = PromoCode::find_by_id(promo.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.usage_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_promo_rolls_everything_back() -> Result<()> {
        let db = setup_test_db().await?;
        let package = create_test_package(&db, "Wedding Standard", 5_000_000.0).await?;

        let mut req = request(package.id);
        req.promo_code = Some("NOPE".to_string());

        let result = submit_booking(&db, req, test_date()).await;
        assert!(matches!(result.unwrap_err(), Error::PromoInvalid { .. }));

        assert!(crate::core::client::list_clients(&db).await?.is_empty());
        assert!(Lead::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_down_payment_over_total_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let package = create_test_package(&db, "Mini Session", 1_000_000.0).await?;
        let card = create_test_card(&db, 0.0).await?;

        let mut req = request(package.id);
        req.down_payment = Some(1_500_000.0);
        req.card_id = Some(card.id);

        let result = submit_booking(&db, req, test_date()).await;
        assert!(matches!(result.unwrap_err(), Error::Overpayment { .. }));
        assert!(crate::core::project::list_projects(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_down_payment_without_card_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let package = create_test_package(&db, "Mini Session", 1_000_000.0).await?;

        let mut req = request(package.id);
        req.down_payment = Some(500_000.0);

        let result = submit_booking(&db, req, test_date()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }
}
