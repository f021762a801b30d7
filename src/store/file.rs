//! JSON-file implementation of the contact store.
//!
//! The whole collection lives in one JSON array and every mutation is a
//! read-modify-write of that file, so all operations funnel through a
//! single async mutex: in-process writers are strictly sequential. Writers
//! in *other* processes are not coordinated; deployments that need that
//! use the relational backend.
//!
//! A missing file reads as an empty collection, which makes first-run
//! writes and stats over a fresh install work without any setup step.

use crate::analytics;
use crate::entities::{contact, ContactStatus};
use crate::errors::Result;
use crate::store::{ContactFilter, ContactStats, ContactStore, NewContact};
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Contact store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    /// Creates a store over the given file path. The file and its parent
    /// directory are created lazily on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<contact::Model>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, contacts: &[contact::Model]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(contacts)?;
        fs::write(&self.path, body).await?;
        Ok(())
    }

    /// Ids are millisecond timestamps, bumped past the current maximum when
    /// two submissions land in the same millisecond.
    fn next_id(contacts: &[contact::Model], now: DateTime<Utc>) -> i64 {
        let millis = now.timestamp_millis();
        let max = contacts.iter().map(|c| c.id).max().unwrap_or(0);
        if millis > max { millis } else { max + 1 }
    }

    fn sort_newest_first(contacts: &mut [contact::Model]) {
        contacts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
    }

    fn matches_search(c: &contact::Model, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            c.name.as_str(),
            c.email.as_str(),
            c.subject.as_str(),
            c.message.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[async_trait]
impl ContactStore for FileStore {
    async fn create(&self, input: NewContact) -> Result<contact::Model> {
        let input = input.into_validated()?;
        let _guard = self.guard.lock().await;

        let mut contacts = self.load().await?;
        let now = Utc::now();
        let stored = contact::Model {
            id: Self::next_id(&contacts, now),
            name: input.name,
            email: input.email,
            subject: input.subject,
            message: input.message,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        };

        contacts.push(stored.clone());
        self.persist(&contacts).await?;
        debug!(id = stored.id, path = %self.path.display(), "contact stored in fallback file");
        Ok(stored)
    }

    async fn list(&self, filter: &ContactFilter) -> Result<Vec<contact::Model>> {
        let _guard = self.guard.lock().await;
        let mut contacts = self.load().await?;

        if let Some(status) = filter.status {
            contacts.retain(|c| c.status == status);
        }
        if let Some(term) = filter.search_term() {
            contacts.retain(|c| Self::matches_search(c, term));
        }

        Self::sort_newest_first(&mut contacts);
        let offset = usize::try_from(filter.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.effective_limit()).unwrap_or(usize::MAX);
        Ok(contacts.into_iter().skip(offset).take(limit).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<contact::Model>> {
        let _guard = self.guard.lock().await;
        let contacts = self.load().await?;
        Ok(contacts.into_iter().find(|c| c.id == id))
    }

    async fn stats(&self) -> Result<ContactStats> {
        let _guard = self.guard.lock().await;
        let contacts = self.load().await?;
        Ok(analytics::quick_stats(&contacts, Local::now()))
    }

    async fn update_status(&self, id: i64, status: ContactStatus) -> Result<u64> {
        let _guard = self.guard.lock().await;
        let mut contacts = self.load().await?;

        let Some(target) = contacts.iter_mut().find(|c| c.id == id) else {
            return Ok(0);
        };
        target.status = status;
        target.updated_at = Utc::now();

        self.persist(&contacts).await?;
        Ok(1)
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let _guard = self.guard.lock().await;
        let mut contacts = self.load().await?;

        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        if contacts.len() == before {
            return Ok(0);
        }

        self.persist(&contacts).await?;
        Ok((before - contacts.len()) as u64)
    }

    async fn cleanup(&self, max_age_days: u32) -> Result<u64> {
        let _guard = self.guard.lock().await;
        let mut contacts = self.load().await?;

        let cutoff = Utc::now() - chrono::Duration::days(i64::from(max_age_days));
        let before = contacts.len();
        contacts.retain(|c| !(c.status.cleanup_eligible() && c.created_at < cutoff));
        let deleted = (before - contacts.len()) as u64;

        if deleted > 0 {
            self.persist(&contacts).await?;
        }
        debug!(deleted, max_age_days, "fallback file retention cleanup finished");
        Ok(deleted)
    }

    async fn all(&self) -> Result<Vec<contact::Model>> {
        let _guard = self.guard.lock().await;
        let mut contacts = self.load().await?;
        Self::sort_newest_first(&mut contacts);
        Ok(contacts)
    }
}
