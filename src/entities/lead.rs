//! Lead entity - A prospective client in the sales funnel.
//!
//! The public booking operation records a converted lead alongside the client
//! it creates, so funnel reporting sees every inbound contact.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lead database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    /// Unique identifier for the lead
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the prospect
    pub name: String,
    /// Where the contact came from (e.g., "booking_form", "instagram")
    pub contact_channel: String,
    /// Event location, if mentioned
    pub location: Option<String>,
    /// `"new"`, `"discussion"`, `"follow_up"`, `"converted"`, or `"rejected"`
    pub status: String,
    /// Date the lead came in
    pub date: Date,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Leads have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
