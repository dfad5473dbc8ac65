//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod add_on;
pub mod card;
pub mod client;
pub mod lead;
pub mod package;
pub mod pocket;
pub mod project;
pub mod promo_code;
pub mod reward_entry;
pub mod team_member;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use add_on::{Column as AddOnColumn, Entity as AddOn, Model as AddOnModel};
pub use card::{Column as CardColumn, Entity as Card, Model as CardModel};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use lead::{Column as LeadColumn, Entity as Lead, Model as LeadModel};
pub use package::{Column as PackageColumn, Entity as Package, Model as PackageModel};
pub use pocket::{Column as PocketColumn, Entity as Pocket, Model as PocketModel};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel};
pub use promo_code::{Column as PromoCodeColumn, Entity as PromoCode, Model as PromoCodeModel};
pub use reward_entry::{
    Column as RewardEntryColumn, Entity as RewardEntry, Model as RewardEntryModel,
};
pub use team_member::{Column as TeamMemberColumn, Entity as TeamMember, Model as TeamMemberModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
