//! Project entity - A booked engagement for a client.
//!
//! The selected add-ons are stored as a JSON snapshot (`{id, name, price}`)
//! taken at booking time, so later catalog edits never change what a client
//! agreed to pay. Payment status is intentionally absent from this table:
//! it is always derived from `amount_paid` vs `total_cost` in
//! [`crate::core::project::PaymentStatus`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the client this project belongs to
    pub client_id: i64,
    /// Human-readable project name (e.g., "Wedding of A & B")
    pub name: String,
    /// Kind of engagement (e.g., "Wedding", "Prewedding", "Corporate")
    pub project_type: String,
    /// Scheduled date of the engagement
    pub date: Date,
    /// ID of the package this project was priced from, if any
    pub package_id: Option<i64>,
    /// Name of the package at booking time
    pub package_name: String,
    /// Snapshot of selected add-ons: JSON array of `{id, name, price}`
    pub add_ons: Json,
    /// Selected duration tier label, if the package defines tiers
    pub duration_selection: Option<String>,
    /// Price of the selected duration tier
    pub unit_price: Option<f64>,
    /// ID of the promo code applied at booking, if any
    pub promo_code_id: Option<i64>,
    /// Discount locked in at booking time
    pub discount_amount: Option<f64>,
    /// Transport fee, additive and never discounted
    pub transport_cost: f64,
    /// Total agreed price
    pub total_cost: f64,
    /// Sum of payments recorded against this project
    pub amount_paid: f64,
}

/// Defines relationships between Project and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each project belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// One project has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
