//! Fallback selector - routes operations between the relational and file
//! backends.
//!
//! Availability is decided once, at construction: a configured backend gets
//! one connect + ping probe, and a failure means the file path serves the
//! whole process lifetime (no background reconnect loop). When the
//! relational path is live, every operation still falls back to the file
//! for that single call if the relational call errors, without flipping
//! availability; a transient outage costs latency, not data. Validation
//! errors are the exception: bad input is bad on every backend and is
//! never retried.

use crate::config::{database, AppConfig};
use crate::entities::{contact, ContactStatus};
use crate::errors::Result;
use crate::store::{ContactFilter, ContactStats, ContactStore, FileStore, NewContact, SqlStore};
use async_trait::async_trait;
use tracing::{info, warn};

/// The backend-agnostic store handed to the service layer.
#[derive(Debug)]
pub struct FallbackStore {
    sql: Option<SqlStore>,
    file: FileStore,
    available: bool,
}

impl FallbackStore {
    /// Wires a store from explicit parts; this is the seam tests use to
    /// inject backends without touching configuration.
    #[must_use]
    pub const fn new(sql: Option<SqlStore>, file: FileStore, available: bool) -> Self {
        Self {
            sql,
            file,
            available,
        }
    }

    /// Connects according to configuration: probes the relational backend
    /// when a URL is present, otherwise goes straight to file-only mode.
    ///
    /// Never fails outright while the file path can be used; a dead
    /// relational backend degrades to the fallback with a warning.
    ///
    /// # Errors
    /// Currently only configuration-independent invariants can fail;
    /// backend probe failures are absorbed into file-only mode.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let file = FileStore::new(&config.fallback_path);

        let sql = if let Some(url) = &config.database_url {
            match Self::probe(url, config).await {
                Ok(store) => {
                    info!("relational backend ready");
                    Some(store)
                }
                Err(e) => {
                    warn!(error = %e, "relational backend unavailable, running on file fallback");
                    None
                }
            }
        } else {
            info!("no database URL configured, running on file fallback");
            None
        };

        let available = sql.is_some();
        Ok(Self {
            sql,
            file,
            available,
        })
    }

    async fn probe(url: &str, config: &AppConfig) -> Result<SqlStore> {
        let db = database::connect(url, config).await?;
        db.ping().await?;
        database::create_tables(&db).await?;
        Ok(SqlStore::new(db))
    }

    /// Whether the relational path was reachable at startup.
    #[must_use]
    pub const fn is_relational_available(&self) -> bool {
        self.available && self.sql.is_some()
    }

    /// Live probe of the relational backend; `false` in file-only mode.
    pub async fn health_check(&self) -> bool {
        match self.relational() {
            Some(sql) => sql.ping().await.is_ok(),
            None => false,
        }
    }

    fn relational(&self) -> Option<&SqlStore> {
        if self.available { self.sql.as_ref() } else { None }
    }
}

#[async_trait]
impl ContactStore for FallbackStore {
    async fn create(&self, input: NewContact) -> Result<contact::Model> {
        if let Some(sql) = self.relational() {
            match sql.create(input.clone()).await {
                Ok(stored) => return Ok(stored),
                Err(e) if e.is_validation() => return Err(e),
                Err(e) => warn!(error = %e, "relational create failed, retrying on file fallback"),
            }
        }
        self.file.create(input).await
    }

    async fn list(&self, filter: &ContactFilter) -> Result<Vec<contact::Model>> {
        if let Some(sql) = self.relational() {
            match sql.list(filter).await {
                Ok(contacts) => return Ok(contacts),
                Err(e) => warn!(error = %e, "relational list failed, retrying on file fallback"),
            }
        }
        self.file.list(filter).await
    }

    async fn get(&self, id: i64) -> Result<Option<contact::Model>> {
        if let Some(sql) = self.relational() {
            match sql.get(id).await {
                Ok(found) => return Ok(found),
                Err(e) => warn!(error = %e, "relational get failed, retrying on file fallback"),
            }
        }
        self.file.get(id).await
    }

    async fn stats(&self) -> Result<ContactStats> {
        if let Some(sql) = self.relational() {
            match sql.stats().await {
                Ok(stats) => return Ok(stats),
                Err(e) => warn!(error = %e, "relational stats failed, retrying on file fallback"),
            }
        }
        self.file.stats().await
    }

    async fn update_status(&self, id: i64, status: ContactStatus) -> Result<u64> {
        if let Some(sql) = self.relational() {
            match sql.update_status(id, status).await {
                Ok(affected) => return Ok(affected),
                Err(e) => {
                    warn!(error = %e, "relational status update failed, retrying on file fallback");
                }
            }
        }
        self.file.update_status(id, status).await
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        if let Some(sql) = self.relational() {
            match sql.delete(id).await {
                Ok(affected) => return Ok(affected),
                Err(e) => warn!(error = %e, "relational delete failed, retrying on file fallback"),
            }
        }
        self.file.delete(id).await
    }

    async fn cleanup(&self, max_age_days: u32) -> Result<u64> {
        if let Some(sql) = self.relational() {
            match sql.cleanup(max_age_days).await {
                Ok(deleted) => return Ok(deleted),
                Err(e) => warn!(error = %e, "relational cleanup failed, retrying on file fallback"),
            }
        }
        self.file.cleanup(max_age_days).await
    }

    async fn all(&self) -> Result<Vec<contact::Model>> {
        if let Some(sql) = self.relational() {
            match sql.all().await {
                Ok(contacts) => return Ok(contacts),
                Err(e) => warn!(error = %e, "relational dump failed, retrying on file fallback"),
            }
        }
        self.file.all().await
    }
}
