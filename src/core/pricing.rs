//! Pricing business logic - Pure quote computation for bookings and projects.
//!
//! Everything here is a deterministic function of its inputs: the same
//! package, add-ons, promo, and date always produce the same quote. Display
//! formatting (currency symbols, thousands separators) is not a pricing
//! concern and lives with the clients of this module.

use crate::{
    entities::{
        add_on, package,
        promo_code::{self, DISCOUNT_FIXED, DISCOUNT_PERCENTAGE},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One duration tier of a package, as stored in its `duration_options` JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationTier {
    /// Label the booking form selects by (e.g., "6 hours")
    pub label: String,
    /// Price of this tier, replacing the package's flat price
    pub price: f64,
}

/// The fully broken-down price of a booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Flat package price or the selected duration tier price
    pub base_price: f64,
    /// Sum of selected add-on prices
    pub add_ons_total: f64,
    /// `base_price + add_ons_total`
    pub subtotal: f64,
    /// Promo discount, clamped so it never exceeds the subtotal
    pub discount: f64,
    /// Transport fee, additive and never discounted
    pub transport_fee: f64,
    /// `subtotal - discount + transport_fee`
    pub total: f64,
}

/// Parses a package's duration tiers out of its JSON column.
pub fn duration_tiers(package: &package::Model) -> Result<Vec<DurationTier>> {
    match &package.duration_options {
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|e| Error::Config {
                message: format!("package {} has malformed duration options: {e}", package.id),
            })
        }
        None => Ok(Vec::new()),
    }
}

/// Resolves the base price: the selected tier's price when a label is given,
/// the flat package price otherwise. Selecting a label the package does not
/// define is an error rather than a silent fallback.
pub fn base_price(package: &package::Model, duration_label: Option<&str>) -> Result<f64> {
    match duration_label {
        None => Ok(package.price),
        Some(label) => {
            let tiers = duration_tiers(package)?;
            tiers
                .iter()
                .find(|tier| tier.label == label)
                .map(|tier| tier.price)
                .ok_or_else(|| Error::Validation {
                    message: format!(
                        "package '{}' has no duration option '{label}'",
                        package.name
                    ),
                })
        }
    }
}

/// Checks that a promo code is redeemable on `today`: active, not expired,
/// and under its usage cap.
pub fn validate_promo(promo: &promo_code::Model, today: NaiveDate) -> Result<()> {
    if !promo.is_active {
        return Err(Error::PromoInvalid {
            reason: format!("code {} is inactive", promo.code),
        });
    }
    if let Some(expiry) = promo.expiry_date {
        if today > expiry {
            return Err(Error::PromoInvalid {
                reason: format!("code {} expired on {expiry}", promo.code),
            });
        }
    }
    if let Some(max) = promo.max_usage {
        if promo.usage_count >= max {
            return Err(Error::PromoInvalid {
                reason: format!("code {} has reached its usage limit", promo.code),
            });
        }
    }
    Ok(())
}

/// Computes the discount a promo grants on a subtotal. Percentage codes take
/// `subtotal * value / 100` exactly; fixed codes take their value, clamped to
/// the subtotal so the total can never go negative.
#[must_use]
pub fn promo_discount(promo: &promo_code::Model, subtotal: f64) -> f64 {
    let raw = match promo.discount_type.as_str() {
        DISCOUNT_PERCENTAGE => subtotal * promo.discount_value / 100.0,
        DISCOUNT_FIXED => promo.discount_value,
        _ => 0.0,
    };
    raw.min(subtotal)
}

/// Prices a booking from its components. Pure and reproducible: no clock, no
/// database.
///
/// # Arguments
/// * `package` - The selected package
/// * `duration_label` - Selected duration tier, if the package defines tiers
/// * `add_ons` - The selected add-ons (already resolved from ids)
/// * `promo` - An applied promo code; validated against `today` before use
/// * `transport_fee` - Additive fee, never discounted
/// * `today` - Date the quote is made, for promo expiry checks
pub fn price_booking(
    package: &package::Model,
    duration_label: Option<&str>,
    add_ons: &[add_on::Model],
    promo: Option<&promo_code::Model>,
    transport_fee: f64,
    today: NaiveDate,
) -> Result<Quote> {
    if !transport_fee.is_finite() || transport_fee < 0.0 {
        return Err(Error::InvalidAmount {
            amount: transport_fee,
        });
    }

    let base_price = base_price(package, duration_label)?;
    let add_ons_total: f64 = add_ons.iter().map(|a| a.price).sum();
    let subtotal = base_price + add_ons_total;

    let discount = match promo {
        Some(promo) => {
            validate_promo(promo, today)?;
            promo_discount(promo, subtotal)
        }
        None => 0.0,
    };

    let total = subtotal - discount + transport_fee;

    Ok(Quote {
        base_price,
        add_ons_total,
        subtotal,
        discount,
        transport_fee,
        total,
    })
}

/// What a project still owes: `total - paid`, floored at zero.
#[must_use]
pub fn remaining_balance(total_cost: f64, amount_paid: f64) -> f64 {
    (total_cost - amount_paid).max(0.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use sea_orm::prelude::Json;

    fn test_package(price: f64, tiers: Option<Json>) -> package::Model {
        package::Model {
            id: 1,
            name: "Silver Wedding Package".to_string(),
            price,
            description: None,
            duration_options: tiers,
        }
    }

    fn test_add_on(id: i64, price: f64) -> add_on::Model {
        add_on::Model {
            id,
            name: format!("Add-on {id}"),
            price,
        }
    }

    fn percent_promo(value: f64) -> promo_code::Model {
        promo_code::Model {
            id: 1,
            code: "TEST10".to_string(),
            discount_type: DISCOUNT_PERCENTAGE.to_string(),
            discount_value: value,
            is_active: true,
            usage_count: 0,
            max_usage: None,
            expiry_date: None,
        }
    }

    fn fixed_promo(value: f64) -> promo_code::Model {
        promo_code::Model {
            discount_type: DISCOUNT_FIXED.to_string(),
            discount_value: value,
            ..percent_promo(0.0)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_flat_price_with_addon_and_percent_promo() {
        // Spec scenario: 5,000,000 package + 500,000 add-on + 10% promo
        let package = test_package(5_000_000.0, None);
        let add_ons = [test_add_on(1, 500_000.0)];
        let promo = percent_promo(10.0);

        let quote =
            price_booking(&package, None, &add_ons, Some(&promo), 0.0, today()).unwrap();

        assert_eq!(quote.subtotal, 5_500_000.0);
        assert_eq!(quote.discount, 550_000.0);
        assert_eq!(quote.total, 4_950_000.0);
    }

    #[test]
    fn test_total_formula_with_transport() {
        let package = test_package(2_000_000.0, None);
        let add_ons = [test_add_on(1, 300_000.0), test_add_on(2, 200_000.0)];

        let quote = price_booking(&package, None, &add_ons, None, 150_000.0, today()).unwrap();

        assert_eq!(
            quote.total,
            quote.base_price + quote.add_ons_total - quote.discount + quote.transport_fee
        );
        assert_eq!(quote.total, 2_650_000.0);
    }

    #[test]
    fn test_duration_tier_selection() {
        let tiers = serde_json::json!([
            {"label": "4 hours", "price": 3_000_000.0},
            {"label": "8 hours", "price": 5_000_000.0},
        ]);
        let package = test_package(3_000_000.0, Some(tiers));

        let quote = price_booking(&package, Some("8 hours"), &[], None, 0.0, today()).unwrap();
        assert_eq!(quote.base_price, 5_000_000.0);

        // Unknown label is rejected, not silently priced at the flat rate
        let result = price_booking(&package, Some("12 hours"), &[], None, 0.0, today());
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
    }

    #[test]
    fn test_fixed_discount_clamped_to_subtotal() {
        let package = test_package(400_000.0, None);
        let promo = fixed_promo(1_000_000.0);

        let quote = price_booking(&package, None, &[], Some(&promo), 50_000.0, today()).unwrap();

        assert_eq!(quote.discount, 400_000.0);
        // Transport is still added after the clamp
        assert_eq!(quote.total, 50_000.0);
    }

    #[test]
    fn test_transport_fee_is_not_discounted() {
        let package = test_package(1_000_000.0, None);
        let promo = percent_promo(50.0);

        let quote =
            price_booking(&package, None, &[], Some(&promo), 200_000.0, today()).unwrap();

        // 50% applies to the 1,000,000 subtotal only
        assert_eq!(quote.discount, 500_000.0);
        assert_eq!(quote.total, 700_000.0);
    }

    #[test]
    fn test_promo_validity_checks() {
        let mut promo = percent_promo(10.0);
        assert!(validate_promo(&promo, today()).is_ok());

        promo.is_active = false;
        assert!(matches!(
            validate_promo(&promo, today()).unwrap_err(),
            Error::PromoInvalid { .. }
        ));

        promo.is_active = true;
        promo.expiry_date = Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert!(matches!(
            validate_promo(&promo, today()).unwrap_err(),
            Error::PromoInvalid { .. }
        ));

        // Valid through the expiry date itself
        promo.expiry_date = Some(today());
        assert!(validate_promo(&promo, today()).is_ok());

        promo.expiry_date = None;
        promo.max_usage = Some(5);
        promo.usage_count = 5;
        assert!(matches!(
            validate_promo(&promo, today()).unwrap_err(),
            Error::PromoInvalid { .. }
        ));

        promo.usage_count = 4;
        assert!(validate_promo(&promo, today()).is_ok());
    }

    #[test]
    fn test_quote_is_deterministic() {
        let package = test_package(5_000_000.0, None);
        let add_ons = [test_add_on(1, 500_000.0)];
        let promo = percent_promo(10.0);

        let first =
            price_booking(&package, None, &add_ons, Some(&promo), 75_000.0, today()).unwrap();
        let second =
            price_booking(&package, None, &add_ons, Some(&promo), 75_000.0, today()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_remaining_balance() {
        assert_eq!(remaining_balance(4_950_000.0, 2_000_000.0), 2_950_000.0);
        assert_eq!(remaining_balance(1_000_000.0, 1_000_000.0), 0.0);
        // Never negative even if data drifted
        assert_eq!(remaining_balance(1_000_000.0, 1_200_000.0), 0.0);
    }

    #[test]
    fn test_negative_transport_fee_rejected() {
        let package = test_package(1_000_000.0, None);
        let result = price_booking(&package, None, &[], None, -10.0, today());
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
    }
}
