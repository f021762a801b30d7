//! Contact record store - one trait, two backends, and a fallback selector.
//!
//! [`ContactStore`] is the capability set every backend provides. The
//! relational implementation lives in [`sql`], the JSON-file implementation
//! in [`file`], and [`fallback::FallbackStore`] wraps one of each so callers
//! never have to know which path served an operation.

pub mod fallback;
pub mod file;
pub mod sql;

pub use fallback::FallbackStore;
pub use file::FileStore;
pub use sql::SqlStore;

use crate::entities::contact;
use crate::entities::ContactStatus;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;

/// Page size applied when a listing does not ask for one, keeping
/// unbounded scans out of the hot path.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// A validated-on-write contact submission, as received from the form.
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    /// Visitor's name, required
    pub name: String,
    /// Visitor's email address, required
    pub email: String,
    /// Subject line, required
    pub subject: String,
    /// Message body, required
    pub message: String,
    /// Remote address, captured when available
    pub ip_address: Option<String>,
    /// Browser user agent, captured when available
    pub user_agent: Option<String>,
}

impl NewContact {
    /// Checks required fields and returns a copy with name, email and
    /// subject trimmed, ready for storage.
    ///
    /// # Errors
    /// `Error::Validation` naming the first offending field.
    pub fn into_validated(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.subject = self.subject.trim().to_string();

        if self.name.is_empty() {
            return Err(Error::validation("name", "is required"));
        }
        if self.email.is_empty() {
            return Err(Error::validation("email", "is required"));
        }
        validate_email(&self.email)?;
        if self.subject.is_empty() {
            return Err(Error::validation("subject", "is required"));
        }
        if self.message.trim().is_empty() {
            return Err(Error::validation("message", "is required"));
        }

        Ok(self)
    }
}

/// Basic structural email check: one `@`, a non-empty local part, and a
/// domain containing a dot. Deliverability is not our problem here.
fn validate_email(email: &str) -> Result<()> {
    if email.contains(char::is_whitespace) {
        return Err(Error::validation("email", "must not contain whitespace"));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(Error::validation("email", "must contain exactly one @"));
    }

    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() {
        return Err(Error::validation("email", "is missing the part before @"));
    }
    if domain.is_empty() || !domain.contains('.') {
        return Err(Error::validation(
            "email",
            "must have a domain with at least one dot",
        ));
    }

    Ok(())
}

/// Listing filter: optional status and search constraints plus pagination.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    /// Restrict to a single workflow status
    pub status: Option<ContactStatus>,
    /// Case-insensitive substring match over name, email, subject and message
    pub search: Option<String>,
    /// Page size; [`DEFAULT_PAGE_SIZE`] when unset
    pub limit: Option<u64>,
    /// Rows to skip before the page starts
    pub offset: Option<u64>,
}

impl ContactFilter {
    /// The limit actually applied to the query.
    #[must_use]
    pub fn effective_limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// The search term, if one was given and is non-blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContactStats {
    /// Every stored contact
    pub total: u64,
    /// Contacts still in `new`
    pub new_contacts: u64,
    /// Contacts created on the current server-local calendar day
    pub today_contacts: u64,
    /// Contacts created within the trailing 7 days
    pub week_contacts: u64,
}

/// The backend capability set.
///
/// `update_status`, `delete` and `cleanup` report affected-row counts and
/// never error for a missing id; callers branch on zero instead of catching.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Validates and persists a submission, assigning id, timestamps and
    /// the initial `new` status. Returns the stored record.
    async fn create(&self, input: NewContact) -> Result<contact::Model>;

    /// Newest-first page of contacts matching the filter.
    async fn list(&self, filter: &ContactFilter) -> Result<Vec<contact::Model>>;

    /// Single-record lookup by id.
    async fn get(&self, id: i64) -> Result<Option<contact::Model>>;

    /// Headline counts for the dashboard.
    async fn stats(&self) -> Result<ContactStats>;

    /// Sets the status and refreshes `updated_at`; 1 if a row changed, 0 if
    /// the id does not exist.
    async fn update_status(&self, id: i64, status: ContactStatus) -> Result<u64>;

    /// Removes one contact; 0 if the id does not exist.
    async fn delete(&self, id: i64) -> Result<u64>;

    /// Removes read/archived contacts older than `max_age_days`, returning
    /// how many went. New and replied contacts are never touched.
    async fn cleanup(&self, max_age_days: u32) -> Result<u64>;

    /// The full collection, newest first, for analytics and export.
    async fn all(&self) -> Result<Vec<contact::Model>>;
}
