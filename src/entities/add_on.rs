//! Add-on entity - Optional extras selectable alongside a package.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Add-on database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "add_ons")]
pub struct Model {
    /// Unique identifier for the add-on
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Drone Footage")
    pub name: String,
    /// Price added to the booking subtotal
    pub price: f64,
}

/// Add-ons have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
