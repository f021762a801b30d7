//! Service boundary - translates store results into response envelopes.
//!
//! Everything crossing this boundary is a serializable `{success, ...}`
//! envelope; failures become `success: false` with a human-readable
//! message instead of propagating errors to the collaborator on the other
//! side (the HTTP layer, which is not this crate's concern). Validation
//! failures carry field-level guidance. A submission whose notification
//! fails is still a success, with `notified: false` flagging the secondary
//! failure; the durable write is the primary contract.

use crate::analytics::{self, AdvancedAnalytics, AnalyticsReport};
use crate::entities::{contact, ContactStatus};
use crate::errors::Error;
use crate::export::{self, ExportFormat};
use crate::notify::Notifier;
use crate::store::{ContactFilter, ContactStats, ContactStore, NewContact};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// A contact-form submission as received from the outside.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    /// Visitor's name
    pub name: String,
    /// Visitor's email address
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub message: String,
    /// Remote address, when the edge captured one
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Browser user agent, when the edge captured one
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl From<ContactForm> for NewContact {
    fn from(form: ContactForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            ip_address: form.ip_address,
            user_agent: form.user_agent,
        }
    }
}

/// Listing parameters as received from the outside; status arrives as a
/// string and is validated here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Restrict to one workflow status
    #[serde(default)]
    pub status: Option<String>,
    /// Substring search over name, email, subject and message
    #[serde(default)]
    pub search: Option<String>,
    /// Page size
    #[serde(default)]
    pub limit: Option<u64>,
    /// Rows to skip
    #[serde(default)]
    pub offset: Option<u64>,
}

/// Envelope for `submit`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    /// Whether the submission was durably stored
    pub success: bool,
    /// Assigned id on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Whether the notification step also succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified: Option<bool>,
    /// Outcome description, field-level on validation failures
    pub message: String,
}

/// Envelope for `list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    /// Whether the listing loaded
    pub success: bool,
    /// The requested page, newest first
    pub data: Vec<contact::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Failure description
    pub message: Option<String>,
}

/// Envelope for `stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Whether the counts loaded
    pub success: bool,
    /// Headline counts on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ContactStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Failure description
    pub message: Option<String>,
}

/// Envelope for `advanced`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    /// Whether the aggregates loaded
    pub success: bool,
    /// Period aggregates on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AdvancedAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Failure description
    pub message: Option<String>,
}

/// Envelope for `report`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    /// Whether the report was built
    pub success: bool,
    /// The combined report on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalyticsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Failure description
    pub message: Option<String>,
}

/// Envelope for `update_status` and `delete`.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedResponse {
    /// Whether a row was actually touched
    pub success: bool,
    /// Affected row count (0 or 1)
    pub affected: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Failure or not-found description
    pub message: Option<String>,
}

/// Envelope for `cleanup`.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Whether the cleanup pass ran
    pub success: bool,
    /// Contacts removed
    pub deleted_count: u64,
    /// Outcome description
    pub message: String,
}

/// Envelope for `export`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    /// Whether the export rendered
    pub success: bool,
    /// The wire form of the format (`"csv"` or `"json"`)
    pub format: String,
    /// MIME type for the download
    pub content_type: String,
    /// Rendered document; empty on failure
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Failure description
    pub message: Option<String>,
}

/// The boundary object: a store plus a notifier.
#[derive(Debug)]
pub struct ContactService<S, N> {
    store: S,
    notifier: N,
}

impl<S: ContactStore, N: Notifier> ContactService<S, N> {
    /// Wires the service from its collaborators.
    pub const fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Access to the wrapped store, for callers needing raw operations.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validates and stores a submission, then dispatches the notifier.
    pub async fn submit(&self, form: ContactForm) -> SubmitResponse {
        let stored = match self.store.create(form.into()).await {
            Ok(stored) => stored,
            Err(e) if e.is_validation() => {
                return SubmitResponse {
                    success: false,
                    id: None,
                    notified: None,
                    message: e.to_string(),
                };
            }
            Err(e) => {
                error!(error = %e, "could not save contact submission");
                return SubmitResponse {
                    success: false,
                    id: None,
                    notified: None,
                    message: "Could not save the contact submission".to_string(),
                };
            }
        };

        let notified = match self.notifier.contact_received(&stored).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, id = stored.id, "contact stored but notification failed");
                false
            }
        };

        SubmitResponse {
            success: true,
            id: Some(stored.id),
            notified: Some(notified),
            message: "Contact submission received".to_string(),
        }
    }

    /// Loads a page of contacts.
    pub async fn list(&self, params: ListParams) -> ListResponse {
        let status = match parse_status_param(params.status.as_deref()) {
            Ok(status) => status,
            Err(message) => {
                return ListResponse {
                    success: false,
                    data: Vec::new(),
                    message: Some(message),
                };
            }
        };

        let filter = ContactFilter {
            status,
            search: params.search,
            limit: params.limit,
            offset: params.offset,
        };

        match self.store.list(&filter).await {
            Ok(data) => ListResponse {
                success: true,
                data,
                message: None,
            },
            Err(e) => {
                error!(error = %e, "could not list contacts");
                ListResponse {
                    success: false,
                    data: Vec::new(),
                    message: Some("Could not load contacts".to_string()),
                }
            }
        }
    }

    /// Loads the dashboard headline counts.
    pub async fn stats(&self) -> StatsResponse {
        match self.store.stats().await {
            Ok(stats) => StatsResponse {
                success: true,
                stats: Some(stats),
                message: None,
            },
            Err(e) => {
                error!(error = %e, "could not load contact stats");
                StatsResponse {
                    success: false,
                    stats: None,
                    message: Some("Could not load contact statistics".to_string()),
                }
            }
        }
    }

    /// Computes trailing-period aggregates.
    pub async fn advanced(&self, period_days: i64) -> AnalyticsResponse {
        let period = match positive_days(period_days, "period_days") {
            Ok(period) => period,
            Err(message) => {
                return AnalyticsResponse {
                    success: false,
                    analytics: None,
                    message: Some(message),
                };
            }
        };

        let contacts = match self.store.all().await {
            Ok(contacts) => contacts,
            Err(e) => {
                error!(error = %e, "could not load contacts for analytics");
                return AnalyticsResponse {
                    success: false,
                    analytics: None,
                    message: Some("Could not load analytics".to_string()),
                };
            }
        };

        match analytics::advanced_analytics(&contacts, period, Utc::now()) {
            Ok(analytics) => AnalyticsResponse {
                success: true,
                analytics: Some(analytics),
                message: None,
            },
            Err(e) => AnalyticsResponse {
                success: false,
                analytics: None,
                message: Some(e.to_string()),
            },
        }
    }

    /// Builds the combined admin report.
    pub async fn report(&self, period_days: i64) -> ReportResponse {
        let period = match positive_days(period_days, "period_days") {
            Ok(period) => period,
            Err(message) => {
                return ReportResponse {
                    success: false,
                    report: None,
                    message: Some(message),
                };
            }
        };

        let contacts = match self.store.all().await {
            Ok(contacts) => contacts,
            Err(e) => {
                error!(error = %e, "could not load contacts for report");
                return ReportResponse {
                    success: false,
                    report: None,
                    message: Some("Could not build the analytics report".to_string()),
                };
            }
        };

        match analytics::build_report(&contacts, period, Utc::now()) {
            Ok(report) => ReportResponse {
                success: true,
                report: Some(report),
                message: None,
            },
            Err(e) => ReportResponse {
                success: false,
                report: None,
                message: Some(e.to_string()),
            },
        }
    }

    /// Moves a contact to a new workflow status.
    pub async fn update_status(&self, id: i64, status: &str) -> AffectedResponse {
        let Some(status) = ContactStatus::parse(status) else {
            return AffectedResponse {
                success: false,
                affected: 0,
                message: Some(format!(
                    "Unknown status '{status}'; expected new, read, replied or archived"
                )),
            };
        };

        match self.store.update_status(id, status).await {
            Ok(0) => AffectedResponse {
                success: false,
                affected: 0,
                message: Some("Contact not found".to_string()),
            },
            Ok(affected) => AffectedResponse {
                success: true,
                affected,
                message: None,
            },
            Err(e) => {
                error!(error = %e, id, "could not update contact status");
                AffectedResponse {
                    success: false,
                    affected: 0,
                    message: Some("Could not update the contact status".to_string()),
                }
            }
        }
    }

    /// Deletes one contact.
    pub async fn delete(&self, id: i64) -> AffectedResponse {
        match self.store.delete(id).await {
            Ok(0) => AffectedResponse {
                success: false,
                affected: 0,
                message: Some("Contact not found".to_string()),
            },
            Ok(affected) => AffectedResponse {
                success: true,
                affected,
                message: None,
            },
            Err(e) => {
                error!(error = %e, id, "could not delete contact");
                AffectedResponse {
                    success: false,
                    affected: 0,
                    message: Some("Could not delete the contact".to_string()),
                }
            }
        }
    }

    /// Runs a retention cleanup pass.
    pub async fn cleanup(&self, max_age_days: i64) -> CleanupResponse {
        let days = match positive_days(max_age_days, "max_age_days") {
            Ok(days) => days,
            Err(message) => {
                return CleanupResponse {
                    success: false,
                    deleted_count: 0,
                    message,
                };
            }
        };

        match self.store.cleanup(days).await {
            Ok(deleted_count) => CleanupResponse {
                success: true,
                deleted_count,
                message: format!("{deleted_count} old contacts removed"),
            },
            Err(e) => {
                error!(error = %e, "retention cleanup failed");
                CleanupResponse {
                    success: false,
                    deleted_count: 0,
                    message: "Could not run the cleanup".to_string(),
                }
            }
        }
    }

    /// Renders the full collection for download.
    pub async fn export(&self, format: &str) -> ExportResponse {
        let Some(format) = ExportFormat::parse(format) else {
            return ExportResponse {
                success: false,
                format: format.trim().to_ascii_lowercase(),
                content_type: String::new(),
                body: String::new(),
                message: Some(format!("Unknown export format '{format}'; expected csv or json")),
            };
        };

        let contacts = match self.store.all().await {
            Ok(contacts) => contacts,
            Err(e) => {
                error!(error = %e, "could not load contacts for export");
                return ExportResponse {
                    success: false,
                    format: format.as_str().to_string(),
                    content_type: format.content_type().to_string(),
                    body: String::new(),
                    message: Some("Could not load contacts".to_string()),
                };
            }
        };

        match export::render(&contacts, format) {
            Ok(body) => ExportResponse {
                success: true,
                format: format.as_str().to_string(),
                content_type: format.content_type().to_string(),
                body,
                message: None,
            },
            Err(e) => {
                error!(error = %e, "could not render export");
                ExportResponse {
                    success: false,
                    format: format.as_str().to_string(),
                    content_type: format.content_type().to_string(),
                    body: String::new(),
                    message: Some("Could not render the export".to_string()),
                }
            }
        }
    }
}

fn parse_status_param(raw: Option<&str>) -> std::result::Result<Option<ContactStatus>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => ContactStatus::parse(value).map(Some).ok_or_else(|| {
            format!("Unknown status '{value}'; expected new, read, replied or archived")
        }),
    }
}

fn positive_days(days: i64, field: &'static str) -> std::result::Result<u32, String> {
    u32::try_from(days)
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| Error::validation(field, "must be a positive number of days").to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::notify::LogNotifier;
    use crate::store::FileStore;
    use crate::test_utils::{sample_form, setup_file_store};
    use async_trait::async_trait;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn contact_received(&self, _contact: &contact::Model) -> crate::errors::Result<()> {
            Err(Error::Notify {
                message: "smtp unreachable".to_string(),
            })
        }
    }

    fn file_service() -> (tempfile::TempDir, ContactService<FileStore, LogNotifier>) {
        let (dir, store) = setup_file_store();
        (dir, ContactService::new(store, LogNotifier))
    }

    fn form(name: &str) -> ContactForm {
        let input = sample_form(name);
        ContactForm {
            name: input.name,
            email: input.email,
            subject: input.subject,
            message: input.message,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
        }
    }

    #[tokio::test]
    async fn submit_returns_the_assigned_id() {
        let (_dir, service) = file_service();

        let response = service.submit(form("Ana")).await;
        assert!(response.success);
        assert!(response.id.is_some());
        assert_eq!(response.notified, Some(true));
    }

    #[tokio::test]
    async fn submit_surfaces_field_level_validation_messages() {
        let (_dir, service) = file_service();

        let mut bad = form("Ana");
        bad.email = "broken".to_string();
        let response = service.submit(bad).await;
        assert!(!response.success);
        assert!(response.id.is_none());
        assert!(response.message.contains("email"), "got: {}", response.message);
    }

    #[tokio::test]
    async fn submit_reports_partial_success_when_notification_fails() {
        let (_dir, store) = setup_file_store();
        let service = ContactService::new(store, FailingNotifier);

        let response = service.submit(form("Ana")).await;
        assert!(response.success, "stored submissions stay successful");
        assert_eq!(response.notified, Some(false));

        // The record really is durable.
        let listed = service.list(ListParams::default()).await;
        assert_eq!(listed.data.len(), 1);
    }

    #[tokio::test]
    async fn list_rejects_unknown_status_strings() {
        let (_dir, service) = file_service();

        let response = service
            .list(ListParams {
                status: Some("spam".to_string()),
                ..ListParams::default()
            })
            .await;
        assert!(!response.success);
        assert!(response.message.unwrap().contains("Unknown status"));
    }

    #[tokio::test]
    async fn update_status_distinguishes_missing_from_updated() {
        let (_dir, service) = file_service();
        let submitted = service.submit(form("Ana")).await;
        let id = submitted.id.unwrap();

        let updated = service.update_status(id, "read").await;
        assert!(updated.success);
        assert_eq!(updated.affected, 1);

        let missing = service.update_status(id + 1, "read").await;
        assert!(!missing.success);
        assert_eq!(missing.affected, 0);
        assert_eq!(missing.message.as_deref(), Some("Contact not found"));

        let unknown = service.update_status(id, "junk").await;
        assert!(!unknown.success);
        assert!(unknown.message.unwrap().contains("Unknown status"));
    }

    #[tokio::test]
    async fn stats_and_advanced_envelopes_carry_their_payloads() {
        let (_dir, service) = file_service();
        service.submit(form("Ana")).await;

        let stats = service.stats().await;
        assert!(stats.success);
        assert_eq!(stats.stats.unwrap().total, 1);

        let advanced = service.advanced(30).await;
        assert!(advanced.success);
        let analytics = advanced.analytics.unwrap();
        assert_eq!(analytics.total, 1);
        assert_eq!(analytics.period_count, 1);
    }

    #[tokio::test]
    async fn advanced_rejects_non_positive_periods() {
        let (_dir, service) = file_service();

        for bad in [0, -5] {
            let response = service.advanced(bad).await;
            assert!(!response.success);
            assert!(response.message.unwrap().contains("period_days"));
        }
    }

    #[tokio::test]
    async fn report_includes_all_chart_datasets() {
        let (_dir, service) = file_service();
        service.submit(form("Ana")).await;
        service.submit(form("Bruno")).await;

        let response = service.report(30).await;
        assert!(response.success);
        let report = response.report.unwrap();
        assert_eq!(report.summary.total_contacts, 2);
        assert_eq!(report.trends.len(), 7);
        assert_eq!(report.hourly_distribution.iter().sum::<u32>(), 2);
    }

    #[tokio::test]
    async fn cleanup_reports_the_deleted_count() {
        let (_dir, service) = file_service();
        service.submit(form("Ana")).await;

        let response = service.cleanup(90).await;
        assert!(response.success);
        assert_eq!(response.deleted_count, 0);

        let invalid = service.cleanup(0).await;
        assert!(!invalid.success);
    }

    #[tokio::test]
    async fn export_renders_both_formats_and_rejects_others() {
        let (_dir, service) = file_service();
        service.submit(form("Ana")).await;

        let csv = service.export("csv").await;
        assert!(csv.success);
        assert_eq!(csv.content_type, "text/csv");
        assert!(csv.body.starts_with("id,name,email"));

        let json = service.export("JSON").await;
        assert!(json.success);
        assert_eq!(json.content_type, "application/json");
        assert!(json.body.trim_start().starts_with('['));

        let bad = service.export("xml").await;
        assert!(!bad.success);
        assert!(bad.message.unwrap().contains("Unknown export format"));
    }

    #[tokio::test]
    async fn delete_distinguishes_missing_from_deleted() {
        let (_dir, service) = file_service();
        let id = service.submit(form("Ana")).await.id.unwrap();

        let deleted = service.delete(id).await;
        assert!(deleted.success);
        assert_eq!(deleted.affected, 1);

        let missing = service.delete(id).await;
        assert!(!missing.success);
        assert_eq!(missing.affected, 0);
    }
}
