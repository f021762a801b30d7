//! Contact entity - Represents one contact-form submission.
//!
//! Each row carries the visitor's message, optional provenance metadata
//! (IP address and user agent) and a workflow status used by the admin
//! panel. The same model doubles as the JSON shape of the file fallback,
//! so it derives `Serialize`/`Deserialize` alongside the SeaORM macros.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Workflow status of a contact submission.
///
/// Stored as a short string so the column reads the same from SQL consoles
/// and from the JSON fallback file. The set is closed: unknown strings are
/// rejected at the parsing boundary and cannot reach storage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Just submitted, nobody has looked at it yet
    #[default]
    #[sea_orm(string_value = "new")]
    New,
    /// Opened by an admin
    #[sea_orm(string_value = "read")]
    Read,
    /// An answer went out
    #[sea_orm(string_value = "replied")]
    Replied,
    /// Filed away, eligible for retention cleanup
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl ContactStatus {
    /// Parses the wire form (`"new"`, `"read"`, `"replied"`, `"archived"`).
    /// Case-insensitive; returns `None` for anything outside the enum.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Some(Self::New),
            "read" => Some(Self::Read),
            "replied" => Some(Self::Replied),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// The wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
        }
    }

    /// Whether retention cleanup may delete contacts in this status.
    /// `New` and `Replied` represent unresolved or active leads and are
    /// never auto-deleted.
    #[must_use]
    pub const fn cleanup_eligible(self) -> bool {
        matches!(self, Self::Read | Self::Archived)
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact submission database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_submissions")]
pub struct Model {
    /// Unique identifier; auto-increment on the relational path,
    /// time-derived on the file path
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Visitor's name as typed into the form
    pub name: String,
    /// Visitor's email address
    pub email: String,
    /// Subject line of the submission
    pub subject: String,
    /// Free-form message body
    #[sea_orm(column_type = "Text")]
    pub message: String,
    /// Remote address captured at submission time, if known
    pub ip_address: Option<String>,
    /// Browser user agent captured at submission time, if known
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    /// Workflow status, starts at `new`
    pub status: ContactStatus,
    /// Set once at creation, immutable afterwards
    pub created_at: DateTimeUtc,
    /// Refreshed on every status change
    pub updated_at: DateTimeUtc,
}

/// Contacts relate to nothing else; the table stands alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
