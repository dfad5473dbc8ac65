/// Database configuration and connection management
pub mod database;

/// Service catalog (packages, add-ons, promo codes) loading from config.toml
pub mod catalog;
