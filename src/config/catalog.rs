//! Service catalog loading from config.toml.
//!
//! Packages, add-ons, and promo codes defined in config.toml seed the
//! database on first run. Seeding is skipped for any table that already has
//! rows, so edits made through the API are never clobbered on restart.

use crate::{
    entities::{AddOn, Package, PromoCode, add_on, package, promo_code},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde::Deserialize;
use std::path::Path;

/// The whole config.toml file.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Service packages offered
    #[serde(default)]
    pub packages: Vec<PackageConfig>,
    /// Add-ons that can be attached to any package
    #[serde(default)]
    pub add_ons: Vec<AddOnConfig>,
    /// Promo codes accepted by the booking form
    #[serde(default)]
    pub promo_codes: Vec<PromoConfig>,
}

/// One service package.
#[derive(Debug, Deserialize, Clone)]
pub struct PackageConfig {
    /// Package name
    pub name: String,
    /// Base price, used when the package has no duration tiers
    pub price: f64,
    /// Marketing description
    pub description: Option<String>,
    /// Optional duration tiers; when present each tier carries its own price
    #[serde(default)]
    pub durations: Vec<DurationConfig>,
}

/// One duration tier of a package.
#[derive(Debug, Deserialize, Clone)]
pub struct DurationConfig {
    /// Tier label, e.g. "4 hours"
    pub label: String,
    /// Price for this tier
    pub price: f64,
}

/// One add-on.
#[derive(Debug, Deserialize, Clone)]
pub struct AddOnConfig {
    /// Add-on name
    pub name: String,
    /// Flat price
    pub price: f64,
}

/// One promo code.
#[derive(Debug, Deserialize, Clone)]
pub struct PromoConfig {
    /// Code as customers type it; stored uppercased
    pub code: String,
    /// `"percentage"` or `"fixed"`
    pub discount_type: String,
    /// Percent (0-100) or fixed amount, per `discount_type`
    pub discount_value: f64,
    /// Redemption cap, unlimited when absent
    pub max_usage: Option<i32>,
    /// Last valid date, inclusive
    pub expiry_date: Option<NaiveDate>,
}

/// Loads the catalog from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid, or a
/// promo declares an unknown discount type.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses and validates catalog TOML.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    for promo in &config.promo_codes {
        if promo.discount_type != promo_code::DISCOUNT_PERCENTAGE
            && promo.discount_type != promo_code::DISCOUNT_FIXED
        {
            return Err(Error::Config {
                message: format!(
                    "promo '{}' has unknown discount type '{}'",
                    promo.code, promo.discount_type
                ),
            });
        }
    }

    Ok(config)
}

/// Loads the catalog from the default location (./config.toml).
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

fn duration_json(durations: &[DurationConfig]) -> Option<sea_orm::prelude::Json> {
    if durations.is_empty() {
        return None;
    }
    Some(serde_json::json!(
        durations
            .iter()
            .map(|d| serde_json::json!({"label": d.label, "price": d.price}))
            .collect::<Vec<_>>()
    ))
}

/// Seeds the catalog tables from a parsed config. Each table is seeded only
/// when it is empty.
pub async fn seed_catalog(db: &DatabaseConnection, config: &Config) -> Result<()> {
    if Package::find().count(db).await? == 0 {
        for pkg in &config.packages {
            package::ActiveModel {
                name: Set(pkg.name.clone()),
                price: Set(pkg.price),
                description: Set(pkg.description.clone()),
                duration_options: Set(duration_json(&pkg.durations)),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        tracing::info!(count = config.packages.len(), "seeded packages");
    }

    if AddOn::find().count(db).await? == 0 {
        for add_on in &config.add_ons {
            add_on::ActiveModel {
                name: Set(add_on.name.clone()),
                price: Set(add_on.price),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        tracing::info!(count = config.add_ons.len(), "seeded add-ons");
    }

    if PromoCode::find().count(db).await? == 0 {
        for promo in &config.promo_codes {
            promo_code::ActiveModel {
                code: Set(promo.code.trim().to_uppercase()),
                discount_type: Set(promo.discount_type.clone()),
                discount_value: Set(promo.discount_value),
                is_active: Set(true),
                usage_count: Set(0),
                max_usage: Set(promo.max_usage),
                expiry_date: Set(promo.expiry_date),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        tracing::info!(count = config.promo_codes.len(), "seeded promo codes");
    }

    Ok(())
}
