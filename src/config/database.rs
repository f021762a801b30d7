//! Database connection and schema management.
//!
//! Connections are built from [`AppConfig`] with bounded pooling and
//! connect/acquire timeouts so an unreachable backend fails within a known
//! window instead of hanging a request. Table creation uses `SeaORM`'s
//! `Schema::create_table_from_entity` so the SQL always matches the entity
//! definition, and the secondary indexes back the status and date filters
//! the aggregate queries lean on.

use crate::config::AppConfig;
use crate::entities::{contact, Contact};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::debug;

/// Opens a pooled connection to the relational backend.
///
/// # Errors
/// Returns the driver error when the URL is malformed or the backend
/// cannot be reached within the configured timeouts.
pub async fn connect(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(config.max_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    debug!(max_connections = config.max_connections, "opening database connection pool");
    Database::connect(options).await.map_err(Into::into)
}

/// Creates the `contact_submissions` table and its indexes if needed.
///
/// # Errors
/// Returns the driver error when a statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut table = schema.create_table_from_entity(Contact);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;

    for index in index_statements() {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

/// Secondary indexes supporting the admin queries: lookups by email,
/// newest-first listings, status filters, and the status+age scan behind
/// retention cleanup.
fn index_statements() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_contact_submissions_email")
            .table(Contact)
            .col(contact::Column::Email)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_contact_submissions_created_at")
            .table(Contact)
            .col(contact::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_contact_submissions_status")
            .table(Contact)
            .col(contact::Column::Status)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_contact_submissions_status_created_at")
            .table(Contact)
            .col(contact::Column::Status)
            .col(contact::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
    ]
}
