//! Report generation business logic.
//!
//! Aggregations over the ledger and projects: category splits, monthly cash
//! flow, per-client profitability, and card usage. The aggregation itself is
//! pure over fetched rows so the math is easy to test; thin async wrappers do
//! the fetching.

use crate::{
    entities::{
        Client, Project, Transaction, client, project,
        transaction::{self, TYPE_EXPENSE, TYPE_INCOME},
    },
    errors::Result,
};
use sea_orm::{DatabaseConnection, QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::BTreeMap;

/// Income and expense totals for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySplit {
    pub category: String,
    pub income: f64,
    pub expense: f64,
}

/// One month's cash movement with the running balance after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    /// Month key, `"YYYY-MM"`
    pub month: String,
    pub income: f64,
    pub expense: f64,
    /// income - expense for the month
    pub net: f64,
    /// Cumulative net across all months up to and including this one
    pub running_balance: f64,
}

/// Revenue, cost, and margin for one client across their projects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientProfit {
    pub client_id: i64,
    pub client_name: String,
    pub project_count: usize,
    /// Sum of income entries recorded against this client's projects
    pub revenue: f64,
    /// Sum of production-cost expenses attributed to this client's projects
    pub production_cost: f64,
    pub profit: f64,
}

/// Net flow through one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardUsage {
    pub card_id: i64,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub entry_count: usize,
}

/// Expense categories that count against a client's profitability. Overhead
/// categories like rent stay out of per-client margins.
pub const PRODUCTION_COST_CATEGORIES: &[&str] = &[
    "Crew Fee",
    "Equipment Rental",
    "Transport",
    "Printing",
    "Venue",
    "Props",
];

/// Splits ledger entries into per-category income and expense totals.
/// Categories are returned alphabetically.
pub fn category_totals(entries: &[transaction::Model]) -> Vec<CategorySplit> {
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for entry in entries {
        let slot = totals.entry(entry.category.as_str()).or_default();
        match entry.tx_type.as_str() {
            TYPE_INCOME => slot.0 += entry.amount,
            TYPE_EXPENSE => slot.1 += entry.amount,
            _ => {}
        }
    }
    totals
        .into_iter()
        .map(|(category, (income, expense))| CategorySplit {
            category: category.to_string(),
            income,
            expense,
        })
        .collect()
}

/// Buckets ledger entries by calendar month and carries a running balance.
/// Months with no entries do not appear.
pub fn monthly_cashflow(entries: &[transaction::Model]) -> Vec<MonthlyFlow> {
    let mut months: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for entry in entries {
        let key = entry.date.format("%Y-%m").to_string();
        let slot = months.entry(key).or_default();
        match entry.tx_type.as_str() {
            TYPE_INCOME => slot.0 += entry.amount,
            TYPE_EXPENSE => slot.1 += entry.amount,
            _ => {}
        }
    }

    let mut running = 0.0;
    months
        .into_iter()
        .map(|(month, (income, expense))| {
            let net = income - expense;
            running += net;
            MonthlyFlow {
                month,
                income,
                expense,
                net,
                running_balance: running,
            }
        })
        .collect()
}

/// Computes per-client profitability from projects and their ledger entries.
///
/// Revenue is cash received: income entries recorded against the client's
/// projects. An agreed-but-unpaid project contributes nothing until payments
/// land. Costs count only production expense categories attached to the
/// client's projects.
pub fn client_profitability(
    clients: &[client::Model],
    projects: &[project::Model],
    entries: &[transaction::Model],
) -> Vec<ClientProfit> {
    clients
        .iter()
        .map(|client| {
            let client_projects: Vec<&project::Model> = projects
                .iter()
                .filter(|p| p.client_id == client.id)
                .collect();
            let for_client = |e: &&transaction::Model| {
                e.project_id
                    .is_some_and(|pid| client_projects.iter().any(|p| p.id == pid))
            };
            let revenue: f64 = entries
                .iter()
                .filter(|e| e.tx_type == TYPE_INCOME && for_client(e))
                .map(|e| e.amount)
                .sum();
            let production_cost: f64 = entries
                .iter()
                .filter(|e| {
                    e.tx_type == TYPE_EXPENSE
                        && PRODUCTION_COST_CATEGORIES.contains(&e.category.as_str())
                        && for_client(e)
                })
                .map(|e| e.amount)
                .sum();
            ClientProfit {
                client_id: client.id,
                client_name: client.name.clone(),
                project_count: client_projects.len(),
                revenue,
                production_cost,
                profit: revenue - production_cost,
            }
        })
        .collect()
}

/// Totals the signed flow through each card that appears in the entries.
pub fn card_usage(entries: &[transaction::Model]) -> Vec<CardUsage> {
    let mut cards: BTreeMap<i64, (f64, f64, usize)> = BTreeMap::new();
    for entry in entries {
        let Some(card_id) = entry.card_id else {
            continue;
        };
        let slot = cards.entry(card_id).or_default();
        match entry.tx_type.as_str() {
            TYPE_INCOME => slot.0 += entry.amount,
            TYPE_EXPENSE => slot.1 += entry.amount,
            _ => {}
        }
        slot.2 += 1;
    }
    cards
        .into_iter()
        .map(|(card_id, (income, expense, entry_count))| CardUsage {
            card_id,
            income,
            expense,
            net: income - expense,
            entry_count,
        })
        .collect()
}

/// Fetches the ledger and reports per-category totals.
pub async fn fetch_category_totals(db: &DatabaseConnection) -> Result<Vec<CategorySplit>> {
    let entries = Transaction::find().all(db).await?;
    Ok(category_totals(&entries))
}

/// Fetches the ledger and reports monthly cash flow oldest-first.
pub async fn fetch_monthly_cashflow(db: &DatabaseConnection) -> Result<Vec<MonthlyFlow>> {
    let entries = Transaction::find()
        .order_by_asc(transaction::Column::Date)
        .all(db)
        .await?;
    Ok(monthly_cashflow(&entries))
}

/// Fetches clients, projects, and the ledger and reports profitability.
pub async fn fetch_client_profitability(db: &DatabaseConnection) -> Result<Vec<ClientProfit>> {
    let clients = Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await?;
    let projects = Project::find().all(db).await?;
    let entries = Transaction::find().all(db).await?;
    Ok(client_profitability(&clients, &projects, &entries))
}

/// Fetches the ledger and reports per-card usage.
pub async fn fetch_card_usage(db: &DatabaseConnection) -> Result<Vec<CardUsage>> {
    let entries = Transaction::find().all(db).await?;
    Ok(card_usage(&entries))
}
