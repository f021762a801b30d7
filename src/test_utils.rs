//! Shared test utilities.
//!
//! Helpers for setting up throwaway backends (in-memory SQLite, temp-dir
//! JSON files) and building contact fixtures with sensible defaults.

use crate::config::database;
use crate::entities::{contact, ContactStatus};
use crate::errors::Result;
use crate::store::{FileStore, NewContact, SqlStore};
use chrono::{DateTime, Local, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with the schema initialized.
/// This is the standard setup for relational integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// An [`SqlStore`] over a fresh in-memory database.
pub async fn setup_sql_store() -> Result<SqlStore> {
    Ok(SqlStore::new(setup_test_db().await?))
}

/// A [`FileStore`] over a file inside a fresh temp directory. Keep the
/// returned `TempDir` alive for the duration of the test.
pub fn setup_file_store() -> (tempfile::TempDir, FileStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = FileStore::new(dir.path().join("contacts.json"));
    (dir, store)
}

/// A valid submission for `name`, with a derived email address.
pub fn sample_form(name: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        subject: "Quote request".to_string(),
        message: "Could you send me a quote?".to_string(),
        ip_address: None,
        user_agent: None,
    }
}

/// A stored contact with explicit id, status and creation instant;
/// `updated_at` mirrors `created_at`.
pub fn contact_at(id: i64, status: ContactStatus, created_at: DateTime<Utc>) -> contact::Model {
    contact::Model {
        id,
        name: format!("Visitor {id}"),
        email: format!("visitor{id}@example.com"),
        subject: "Quote request".to_string(),
        message: "Could you send me a quote?".to_string(),
        ip_address: None,
        user_agent: None,
        status,
        created_at,
        updated_at: created_at,
    }
}

/// A stored contact created now, in the given status.
pub fn contact_with_status(id: i64, status: ContactStatus) -> contact::Model {
    contact_at(id, status, Utc::now())
}

/// A stored contact created at the given server-local date and hour, so
/// local-time bucketing assertions hold in any test timezone.
pub fn contact_local(id: i64, year: i32, month: u32, day: u32, hour: u32) -> contact::Model {
    let local = Local
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("unambiguous local instant");
    contact_at(id, ContactStatus::New, local.with_timezone(&Utc))
}
