//! Package entity - A priced service offering on the public booking page.
//!
//! A package either has one flat `price` or a set of duration tiers stored as
//! a JSON array of `{label, price}`; when tiers exist the booking form selects
//! one by label.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Package database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    /// Unique identifier for the package
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Silver Wedding Package")
    pub name: String,
    /// Flat price, used when no duration tier is selected
    pub price: f64,
    /// Optional marketing description
    pub description: Option<String>,
    /// Optional JSON array of `{label, price}` duration tiers
    pub duration_options: Option<Json>,
}

/// Packages have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
