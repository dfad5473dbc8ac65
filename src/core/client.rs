//! Client business logic - CRUD with detach-on-delete semantics.
//!
//! Deleting a client removes the client and its projects, but ledger entries
//! are history: they are detached from the deleted projects, never destroyed.

use crate::{
    core::project::detach_transactions,
    entities::{Client, Project, client, project},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use uuid::Uuid;

/// Input for creating or updating a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Instagram handle, if any
    pub instagram: Option<String>,
    /// Lifecycle status; defaults to `"active"`
    pub status: Option<String>,
    /// `"direct"` or `"vendor"`; defaults to `"direct"`
    pub client_type: Option<String>,
}

const STATUSES: &[&str] = &["active", "inactive", "lead", "lost"];
const CLIENT_TYPES: &[&str] = &["direct", "vendor"];

fn validate_input(input: &ClientInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "client name cannot be empty".to_string(),
        });
    }
    if let Some(status) = &input.status {
        if !STATUSES.contains(&status.as_str()) {
            return Err(Error::Validation {
                message: format!("unknown client status: {status}"),
            });
        }
    }
    if let Some(client_type) = &input.client_type {
        if !CLIENT_TYPES.contains(&client_type.as_str()) {
            return Err(Error::Validation {
                message: format!("unknown client type: {client_type}"),
            });
        }
    }
    Ok(())
}

/// Creates a client with a fresh portal access token.
pub async fn create_client<C>(db: &C, input: ClientInput, since: NaiveDate) -> Result<client::Model>
where
    C: ConnectionTrait,
{
    validate_input(&input)?;

    client::ActiveModel {
        name: Set(input.name.trim().to_string()),
        email: Set(input.email.clone()),
        phone: Set(input.phone.clone()),
        instagram: Set(input.instagram.clone()),
        status: Set(input.status.unwrap_or_else(|| "active".to_string())),
        client_type: Set(input.client_type.unwrap_or_else(|| "direct".to_string())),
        since: Set(since),
        portal_access_id: Set(Uuid::new_v4().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Rewrites a client's contact fields and status. The portal token and
/// `since` date are not editable.
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    input: ClientInput,
) -> Result<client::Model> {
    validate_input(&input)?;
    let existing = get_client(db, client_id).await?;

    let mut active: client::ActiveModel = existing.clone().into();
    active.name = Set(input.name.trim().to_string());
    active.email = Set(input.email.clone());
    active.phone = Set(input.phone.clone());
    active.instagram = Set(input.instagram.clone());
    active.status = Set(input.status.unwrap_or(existing.status));
    active.client_type = Set(input.client_type.unwrap_or(existing.client_type));
    active.update(db).await.map_err(Into::into)
}

/// Deletes a client and its projects. Each project's ledger entries are
/// detached first, so financial history survives intact.
pub async fn delete_client(db: &DatabaseConnection, client_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let client = Client::find_by_id(client_id)
        .one(&txn)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let projects = Project::find()
        .filter(project::Column::ClientId.eq(client_id))
        .all(&txn)
        .await?;
    for proj in projects {
        detach_transactions(&txn, proj.id).await?;
        proj.delete(&txn).await?;
    }

    client.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Looks up a client, failing with `ClientNotFound` if it does not exist.
pub async fn get_client<C>(db: &C, client_id: i64) -> Result<client::Model>
where
    C: ConnectionTrait,
{
    Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })
}

/// Finds a client by their portal access token, for the client-facing link.
pub async fn get_client_by_portal_id(
    db: &DatabaseConnection,
    portal_access_id: &str,
) -> Result<Option<client::Model>> {
    Client::find()
        .filter(client::Column::PortalAccessId.eq(portal_access_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all clients, ordered alphabetically by name.
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
