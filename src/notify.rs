//! Notification dispatcher seam.
//!
//! Sending the actual email (templating, SMTP) belongs to an external
//! collaborator; this module only defines the handoff point. The service
//! layer treats a failed notification as a secondary-step failure: the
//! submission is already durably stored, so the response stays successful
//! and carries a `notified: false` sub-flag instead.

use crate::entities::contact;
use crate::errors::Result;
use async_trait::async_trait;
use tracing::info;

/// Receives validated, already-persisted contact submissions.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Called once per stored submission.
    async fn contact_received(&self, contact: &contact::Model) -> Result<()>;
}

/// Logs submissions instead of dispatching anything; the default wiring
/// when no mail collaborator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn contact_received(&self, contact: &contact::Model) -> Result<()> {
        info!(
            id = contact.id,
            email = %contact.email,
            subject = %contact.subject,
            "new contact submission received"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContactStatus;
    use crate::test_utils::contact_with_status;

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        let contact = contact_with_status(1, ContactStatus::New);
        assert!(LogNotifier.contact_received(&contact).await.is_ok());
    }
}
