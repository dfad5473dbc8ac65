/// Card and pocket account management
pub mod accounts;

/// Public booking form intake
pub mod booking;

/// Budget period close-out for expense pockets
pub mod budget;

/// Client CRUD and portal access tokens
pub mod client;

/// The financial ledger: entries, balances, payments, and transfers
pub mod ledger;

/// Deterministic booking price calculation
pub mod pricing;

/// Project CRUD, pricing snapshots, and derived payment status
pub mod project;

/// Aggregated reports over the ledger and projects
pub mod reporting;

/// Team member reward entries and derived balances
pub mod rewards;
