//! Unified error types and result handling.
//!
//! Every core operation returns [`Result`]; the API layer maps these variants
//! to HTTP statuses. No operation reports failure through any other channel.

use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Input failed validation before any persistence call
    #[error("Validation error: {message}")]
    Validation {
        /// What the caller got wrong
        message: String,
    },

    /// Transaction amount is zero, negative, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A debit would overdraw a card or pocket
    #[error("Insufficient funds: balance is {current:.2}, required {required:.2}")]
    InsufficientFunds {
        /// Balance before the attempted debit
        current: f64,
        /// Amount the operation needed
        required: f64,
    },

    /// A payment exceeds what the project still owes
    #[error("Overpayment: {amount:.2} exceeds remaining balance {remaining:.2}")]
    Overpayment {
        /// The rejected payment amount
        amount: f64,
        /// `total_cost - amount_paid` at the time of the attempt
        remaining: f64,
    },

    /// Promo code is inactive, expired, or over its usage cap
    #[error("Promo code rejected: {reason}")]
    PromoInvalid {
        /// Why the code was rejected
        reason: String,
    },

    /// Withdrawal from a locked pocket before its lock expires
    #[error("Pocket is locked until {until}")]
    PocketLocked {
        /// End of the lock period
        until: chrono::NaiveDate,
    },

    /// Portal access token does not match any client
    #[error("Portal token not recognized")]
    PortalTokenInvalid,

    /// Referenced client does not exist
    #[error("Client not found: {id}")]
    ClientNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced project does not exist
    #[error("Project not found: {id}")]
    ProjectNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced transaction does not exist
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced card does not exist
    #[error("Card not found: {id}")]
    CardNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced pocket does not exist
    #[error("Pocket not found: {id}")]
    PocketNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced promo code does not exist
    #[error("Promo code not found: {id}")]
    PromoCodeNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced package does not exist
    #[error("Package not found: {id}")]
    PackageNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced team member does not exist
    #[error("Team member not found: {id}")]
    TeamMemberNotFound {
        /// The missing id
        id: i64,
    },

    /// Referenced reward entry does not exist
    #[error("Reward entry not found: {id}")]
    RewardEntryNotFound {
        /// The missing id
        id: i64,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
