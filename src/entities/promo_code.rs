//! Promo code entity - Discount codes redeemable at booking time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Promo code database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promo_codes")]
pub struct Model {
    /// Unique identifier for the promo code
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The code clients type in (stored uppercase)
    pub code: String,
    /// `"percentage"` or `"fixed"`
    pub discount_type: String,
    /// Percentage points or fixed amount, depending on `discount_type`
    pub discount_value: f64,
    /// Whether the code can currently be redeemed
    pub is_active: bool,
    /// Number of successful redemptions so far
    pub usage_count: i32,
    /// Redemption cap; None means unlimited
    pub max_usage: Option<i32>,
    /// Last valid date; None means no expiry
    pub expiry_date: Option<Date>,
}

/// Promo codes have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// `discount_type` for percentage-of-subtotal discounts.
pub const DISCOUNT_PERCENTAGE: &str = "percentage";
/// `discount_type` for fixed-amount discounts.
pub const DISCOUNT_FIXED: &str = "fixed";
