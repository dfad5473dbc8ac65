//! Team member reward tracking.
//!
//! Reward entries are signed: positive entries credit a member, negative
//! entries are withdrawals. Member balances and the shared pool total are
//! always derived by summing entries, never stored.

use crate::{
    entities::{RewardEntry, TeamMember, reward_entry, team_member},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectionTrait, QueryOrder, Set, prelude::*};

/// Input for creating a team member.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MemberInput {
    pub name: String,
    /// e.g. "photographer", "editor"
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Usual per-project fee
    #[serde(default)]
    pub standard_fee: f64,
}

/// Input for one reward entry.
#[derive(Debug, Clone)]
pub struct RewardInput {
    pub team_member_id: i64,
    /// Signed: positive credits, negative withdraws
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub project_id: Option<i64>,
}

/// Sum of a member's reward entries.
pub async fn member_balance<C: ConnectionTrait>(db: &C, team_member_id: i64) -> Result<f64> {
    let entries = RewardEntry::find()
        .filter(reward_entry::Column::TeamMemberId.eq(team_member_id))
        .all(db)
        .await?;
    Ok(entries.iter().map(|e| e.amount).sum())
}

/// Sum of every reward entry across all members.
pub async fn pool_balance<C: ConnectionTrait>(db: &C) -> Result<f64> {
    let entries = RewardEntry::find().all(db).await?;
    Ok(entries.iter().map(|e| e.amount).sum())
}

/// Records a reward entry. A withdrawal larger than the member's derived
/// balance is rejected.
pub async fn add_reward_entry<C: ConnectionTrait>(
    db: &C,
    input: RewardInput,
) -> Result<reward_entry::Model> {
    if input.amount == 0.0 || !input.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: input.amount,
        });
    }
    TeamMember::find_by_id(input.team_member_id)
        .one(db)
        .await?
        .ok_or(Error::TeamMemberNotFound {
            id: input.team_member_id,
        })?;

    if input.amount < 0.0 {
        let balance = member_balance(db, input.team_member_id).await?;
        let required = -input.amount;
        if required > balance {
            return Err(Error::InsufficientFunds {
                current: balance,
                required,
            });
        }
    }

    reward_entry::ActiveModel {
        team_member_id: Set(input.team_member_id),
        amount: Set(input.amount),
        description: Set(input.description),
        date: Set(input.date),
        project_id: Set(input.project_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// A member's entries, newest first.
pub async fn entries_for_member<C: ConnectionTrait>(
    db: &C,
    team_member_id: i64,
) -> Result<Vec<reward_entry::Model>> {
    TeamMember::find_by_id(team_member_id)
        .one(db)
        .await?
        .ok_or(Error::TeamMemberNotFound { id: team_member_id })?;
    RewardEntry::find()
        .filter(reward_entry::Column::TeamMemberId.eq(team_member_id))
        .order_by_desc(reward_entry::Column::Date)
        .order_by_desc(reward_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes an entry. The member's derived balance adjusts automatically.
pub async fn delete_entry<C: ConnectionTrait>(db: &C, entry_id: i64) -> Result<()> {
    let entry = RewardEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or(Error::RewardEntryNotFound { id: entry_id })?;
    entry.delete(db).await?;
    Ok(())
}

/// Creates a team member.
pub async fn create_member<C: ConnectionTrait>(
    db: &C,
    input: MemberInput,
) -> Result<team_member::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "team member name cannot be empty".to_string(),
        });
    }
    team_member::ActiveModel {
        name: Set(input.name.trim().to_string()),
        role: Set(input.role.clone()),
        email: Set(input.email.clone()),
        phone: Set(input.phone.clone()),
        standard_fee: Set(input.standard_fee),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// All team members, ordered by name.
pub async fn list_members<C: ConnectionTrait>(db: &C) -> Result<Vec<team_member::Model>> {
    TeamMember::find()
        .order_by_asc(team_member::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_balance_derived_from_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Raka").await?;

        add_reward_entry(
            &db,
            RewardInput {
                team_member_id: member.id,
                amount: 500_000.0,
                description: "Wedding shoot fee".to_string(),
                date: test_date(),
                project_id: None,
            },
        )
        .await?;
        add_reward_entry(
            &db,
            RewardInput {
                team_member_id: member.id,
                amount: -200_000.0,
                description: "Cash out".to_string(),
                date: test_date(),
                project_id: None,
            },
        )
        .await?;

        assert_eq!(member_balance(&db, member.id).await?, 300_000.0);
        assert_eq!(pool_balance(&db).await?, 300_000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_overdraw_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Sinta").await?;

        add_reward_entry(
            &db,
            RewardInput {
                team_member_id: member.id,
                amount: 100_000.0,
                description: "Editing fee".to_string(),
                date: test_date(),
                project_id: None,
            },
        )
        .await?;

        let result = add_reward_entry(
            &db,
            RewardInput {
                team_member_id: member.id,
                amount: -150_000.0,
                description: "Cash out".to_string(),
                date: test_date(),
                project_id: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientFunds {
                current,
                required
            } if current == 100_000.0 && required == 150_000.0
        ));
        assert_eq!(member_balance(&db, member.id).await?, 100_000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_entry_adjusts_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Dewi").await?;

        let entry = add_reward_entry(
            &db,
            RewardInput {
                team_member_id: member.id,
                amount: 250_000.0,
                description: "Assist fee".to_string(),
                date: test_date(),
                project_id: None,
            },
        )
        .await?;
        delete_entry(&db, entry.id).await?;

        assert_eq!(member_balance(&db, member.id).await?, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Bima").await?;

        let result = add_reward_entry(
            &db,
            RewardInput {
                team_member_id: member.id,
                amount: 0.0,
                description: "Nothing".to_string(),
                date: test_date(),
                project_id: None,
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_member_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add_reward_entry(
            &db,
            RewardInput {
                team_member_id: 999,
                amount: 100_000.0,
                description: "Fee".to_string(),
                date: test_date(),
                project_id: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TeamMemberNotFound { id: 999 }
        ));

        Ok(())
    }
}
