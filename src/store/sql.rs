//! Relational implementation of the contact store.
//!
//! Every operation is a single `SeaORM` statement (counts included), so the
//! backend's per-statement transaction model is all the isolation this path
//! needs. The connection is handed in by the caller, which keeps the
//! implementation engine-agnostic: SQLite in tests, MySQL or Postgres in
//! deployments.

use crate::entities::{contact, Contact, ContactStatus};
use crate::errors::Result;
use crate::store::{ContactFilter, ContactStats, ContactStore, NewContact};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

/// Contact store backed by a relational engine.
#[derive(Debug, Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    /// Wraps an already-open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Access to the underlying connection, mainly for tests.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Lightweight round-trip probe.
    ///
    /// # Errors
    /// Returns the driver error when the backend does not answer.
    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await.map_err(Into::into)
    }
}

/// UTC instants bounding the current server-local calendar day.
fn local_today_bounds(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN);
    let end = start + Duration::days(1);
    (local_naive_to_utc(start), local_naive_to_utc(end))
}

fn local_naive_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            dt.with_timezone(&Utc)
        }
        // Midnight erased by a DST jump; the naive instant read as UTC is
        // the closest boundary we can still name.
        chrono::LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

#[async_trait]
impl ContactStore for SqlStore {
    async fn create(&self, input: NewContact) -> Result<contact::Model> {
        let input = input.into_validated()?;
        let now = Utc::now();

        let model = contact::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            subject: Set(input.subject),
            message: Set(input.message),
            ip_address: Set(input.ip_address),
            user_agent: Set(input.user_agent),
            status: Set(ContactStatus::New),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let stored = model.insert(&self.db).await?;
        debug!(id = stored.id, "contact submission stored");
        Ok(stored)
    }

    async fn list(&self, filter: &ContactFilter) -> Result<Vec<contact::Model>> {
        let mut query = Contact::find();

        if let Some(status) = filter.status {
            query = query.filter(contact::Column::Status.eq(status));
        }
        if let Some(term) = filter.search_term() {
            query = query.filter(
                Condition::any()
                    .add(contact::Column::Name.contains(term))
                    .add(contact::Column::Email.contains(term))
                    .add(contact::Column::Subject.contains(term))
                    .add(contact::Column::Message.contains(term)),
            );
        }

        query
            .order_by_desc(contact::Column::CreatedAt)
            .order_by_desc(contact::Column::Id)
            .offset(filter.offset.unwrap_or(0))
            .limit(filter.effective_limit())
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn get(&self, id: i64) -> Result<Option<contact::Model>> {
        Contact::find_by_id(id).one(&self.db).await.map_err(Into::into)
    }

    async fn stats(&self) -> Result<ContactStats> {
        let (today_start, today_end) = local_today_bounds(Local::now());
        let week_cutoff = Utc::now() - Duration::days(7);

        let total = Contact::find().count(&self.db).await?;
        let new_contacts = Contact::find()
            .filter(contact::Column::Status.eq(ContactStatus::New))
            .count(&self.db)
            .await?;
        let today_contacts = Contact::find()
            .filter(contact::Column::CreatedAt.gte(today_start))
            .filter(contact::Column::CreatedAt.lt(today_end))
            .count(&self.db)
            .await?;
        let week_contacts = Contact::find()
            .filter(contact::Column::CreatedAt.gte(week_cutoff))
            .count(&self.db)
            .await?;

        Ok(ContactStats {
            total,
            new_contacts,
            today_contacts,
            week_contacts,
        })
    }

    async fn update_status(&self, id: i64, status: ContactStatus) -> Result<u64> {
        let result = Contact::update_many()
            .col_expr(contact::Column::Status, Expr::value(status))
            .col_expr(contact::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(contact::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let result = Contact::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    async fn cleanup(&self, max_age_days: u32) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(max_age_days));
        let result = Contact::delete_many()
            .filter(
                contact::Column::Status
                    .is_in([ContactStatus::Read, ContactStatus::Archived]),
            )
            .filter(contact::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await?;
        debug!(deleted = result.rows_affected, max_age_days, "retention cleanup finished");
        Ok(result.rows_affected)
    }

    async fn all(&self) -> Result<Vec<contact::Model>> {
        Contact::find()
            .order_by_desc(contact::Column::CreatedAt)
            .order_by_desc(contact::Column::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }
}
