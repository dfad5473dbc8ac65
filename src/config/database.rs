//! Database connection and table creation using `SeaORM`.
//!
//! Tables are generated with `Schema::create_table_from_entity` so the schema
//! always matches the entity definitions without hand-written SQL.

use crate::entities::{
    AddOn, Card, Client, Lead, Package, Pocket, Project, PromoCode, RewardEntry, TeamMember,
    Transaction,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from `DATABASE_URL`, falling back to a local
/// `SQLite` file.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/studio_ledger.sqlite".to_string())
}

/// Connects to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates every table from the entity definitions. Safe to call against a
/// fresh in-memory database; the statements are plain `CREATE TABLE`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Client)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Project)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Transaction)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Card)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Pocket)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Package)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(AddOn)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PromoCode)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(TeamMember)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(RewardEntry)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Lead)))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Each table should accept a query once created.
        let _ = Client::find().limit(1).all(&db).await?;
        let _ = Project::find().limit(1).all(&db).await?;
        let _ = Transaction::find().limit(1).all(&db).await?;
        let _ = Card::find().limit(1).all(&db).await?;
        let _ = Pocket::find().limit(1).all(&db).await?;
        let _ = Package::find().limit(1).all(&db).await?;
        let _ = AddOn::find().limit(1).all(&db).await?;
        let _ = PromoCode::find().limit(1).all(&db).await?;
        let _ = TeamMember::find().limit(1).all(&db).await?;
        let _ = RewardEntry::find().limit(1).all(&db).await?;
        let _ = Lead::find().limit(1).all(&db).await?;

        Ok(())
    }
}
