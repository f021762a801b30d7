//! Analytics aggregation - pure functions over in-memory contact rows.
//!
//! Everything here is side-effect free and backend-agnostic: the store
//! hands over a slice of contacts and these functions derive the numbers
//! the admin panel charts. Time-dependent aggregations take the reference
//! instant as a parameter so tests stay deterministic; calendar bucketing
//! uses the server-local timezone, matching what a small business owner
//! expects "today" to mean.

use crate::entities::contact;
use crate::entities::ContactStatus;
use crate::errors::{Error, Result};
use crate::store::ContactStats;
use chrono::{DateTime, Duration, Local, NaiveDate, Timelike, Utc};
use serde::Serialize;

/// Contact counts broken down by workflow status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    /// Contacts in `new`
    pub new: u64,
    /// Contacts in `read`
    pub read: u64,
    /// Contacts in `replied`
    pub replied: u64,
    /// Contacts in `archived`
    pub archived: u64,
}

impl StatusDistribution {
    /// Sum over all four buckets.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.new + self.read + self.replied + self.archived
    }
}

/// One day of the trailing-week trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// The calendar day (server-local)
    pub date: NaiveDate,
    /// Short weekday label for chart axes, e.g. `"Mon"`
    pub label: String,
    /// Contacts created on that day
    pub count: u64,
}

/// Aggregates over a caller-chosen trailing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedAnalytics {
    /// Every stored contact
    pub total: u64,
    /// Per-status breakdown over the whole collection
    pub status: StatusDistribution,
    /// The trailing window the period figures cover
    pub period_days: u32,
    /// Contacts created within the window
    pub period_count: u64,
    /// `period_count / period_days`, rounded
    pub daily_average: u64,
}

/// Headline block of an [`AnalyticsReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Every stored contact
    pub total_contacts: u64,
    /// Replied share of the collection, whole percent
    pub response_rate: u32,
    /// Busiest local hour of day
    pub peak_hour: usize,
    /// Average contacts per day over the trailing week, rounded
    pub avg_daily_contacts: u64,
}

/// The combined report the admin panel renders: summary tiles plus the
/// three chart datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    /// The trailing window the period figures cover
    pub period_days: u32,
    /// Headline numbers
    pub summary: ReportSummary,
    /// Trailing-week trend, oldest first
    pub trends: Vec<TrendPoint>,
    /// Contacts per local hour of day
    pub hourly_distribution: [u32; 24],
    /// Per-status breakdown
    pub status_breakdown: StatusDistribution,
    /// Period aggregates backing the summary
    pub period: AdvancedAnalytics,
}

/// Replied contacts as a whole percentage of the collection; 0 when empty.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn response_rate(contacts: &[contact::Model]) -> u32 {
    if contacts.is_empty() {
        return 0;
    }
    let replied = contacts
        .iter()
        .filter(|c| c.status == ContactStatus::Replied)
        .count();
    ((replied as f64 / contacts.len() as f64) * 100.0).round() as u32
}

/// Contacts bucketed by the local hour of day they arrived in.
#[must_use]
pub fn hourly_distribution(contacts: &[contact::Model]) -> [u32; 24] {
    let mut buckets = [0u32; 24];
    for c in contacts {
        let hour = c.created_at.with_timezone(&Local).hour() as usize;
        buckets[hour] += 1;
    }
    buckets
}

/// Busiest local hour; ties resolve to the lowest hour index.
#[must_use]
pub fn peak_hour(contacts: &[contact::Model]) -> usize {
    let buckets = hourly_distribution(contacts);
    let mut peak = 0;
    for (hour, &count) in buckets.iter().enumerate() {
        if count > buckets[peak] {
            peak = hour;
        }
    }
    peak
}

/// Counts per workflow status.
#[must_use]
pub fn status_distribution(contacts: &[contact::Model]) -> StatusDistribution {
    let mut dist = StatusDistribution::default();
    for c in contacts {
        match c.status {
            ContactStatus::New => dist.new += 1,
            ContactStatus::Read => dist.read += 1,
            ContactStatus::Replied => dist.replied += 1,
            ContactStatus::Archived => dist.archived += 1,
        }
    }
    dist
}

/// Contacts per calendar day for the 7 days ending at `today`, oldest
/// first. Always exactly 7 entries; days without contacts count zero.
#[must_use]
pub fn trailing_week_trend(contacts: &[contact::Model], today: NaiveDate) -> Vec<TrendPoint> {
    (0..7i64)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let count = contacts
                .iter()
                .filter(|c| c.created_at.with_timezone(&Local).date_naive() == day)
                .count() as u64;
            TrendPoint {
                date: day,
                label: day.format("%a").to_string(),
                count,
            }
        })
        .collect()
}

/// Totals plus trailing-period figures for a caller-chosen window.
///
/// # Errors
/// `Error::Validation` when `period_days` is zero; callers asking for a
/// non-positive window made a mistake we refuse to paper over.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn advanced_analytics(
    contacts: &[contact::Model],
    period_days: u32,
    now: DateTime<Utc>,
) -> Result<AdvancedAnalytics> {
    if period_days == 0 {
        return Err(Error::validation(
            "period_days",
            "must be a positive number of days",
        ));
    }

    let cutoff = now - Duration::days(i64::from(period_days));
    let period_count = contacts.iter().filter(|c| c.created_at >= cutoff).count() as u64;
    let daily_average = (period_count as f64 / f64::from(period_days)).round() as u64;

    Ok(AdvancedAnalytics {
        total: contacts.len() as u64,
        status: status_distribution(contacts),
        period_days,
        period_count,
        daily_average,
    })
}

/// Builds the full admin report: summary, week trend, hourly distribution
/// and status breakdown in one serializable value.
///
/// # Errors
/// `Error::Validation` when `period_days` is zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn build_report(
    contacts: &[contact::Model],
    period_days: u32,
    now: DateTime<Utc>,
) -> Result<AnalyticsReport> {
    let period = advanced_analytics(contacts, period_days, now)?;
    let today = now.with_timezone(&Local).date_naive();
    let trends = trailing_week_trend(contacts, today);
    let week_total: u64 = trends.iter().map(|p| p.count).sum();
    let avg_daily_contacts = (week_total as f64 / 7.0).round() as u64;

    Ok(AnalyticsReport {
        period_days,
        summary: ReportSummary {
            total_contacts: contacts.len() as u64,
            response_rate: response_rate(contacts),
            peak_hour: peak_hour(contacts),
            avg_daily_contacts,
        },
        trends,
        hourly_distribution: hourly_distribution(contacts),
        status_breakdown: status_distribution(contacts),
        period,
    })
}

/// Dashboard headline counts computed in memory; the file backend's answer
/// to what the relational backend does with `COUNT` filters.
#[must_use]
pub fn quick_stats(contacts: &[contact::Model], now: DateTime<Local>) -> ContactStats {
    let today = now.date_naive();
    let week_cutoff = now.with_timezone(&Utc) - Duration::days(7);

    ContactStats {
        total: contacts.len() as u64,
        new_contacts: contacts
            .iter()
            .filter(|c| c.status == ContactStatus::New)
            .count() as u64,
        today_contacts: contacts
            .iter()
            .filter(|c| c.created_at.with_timezone(&Local).date_naive() == today)
            .count() as u64,
        week_contacts: contacts.iter().filter(|c| c.created_at >= week_cutoff).count() as u64,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{contact_at, contact_local, contact_with_status};
    use chrono::TimeZone;

    #[test]
    fn response_rate_of_empty_collection_is_zero() {
        assert_eq!(response_rate(&[]), 0);
    }

    #[test]
    fn response_rate_rounds_to_whole_percent() {
        let mut contacts: Vec<_> = (0..7)
            .map(|i| contact_with_status(i, ContactStatus::New))
            .collect();
        contacts.push(contact_with_status(7, ContactStatus::Replied));
        contacts.push(contact_with_status(8, ContactStatus::Replied));
        contacts.push(contact_with_status(9, ContactStatus::Replied));
        // 3 replied of 10
        assert_eq!(response_rate(&contacts), 30);

        // 1 of 3 -> 33.33 rounds to 33
        let contacts = vec![
            contact_with_status(1, ContactStatus::Replied),
            contact_with_status(2, ContactStatus::New),
            contact_with_status(3, ContactStatus::Read),
        ];
        assert_eq!(response_rate(&contacts), 33);
    }

    #[test]
    fn hourly_distribution_buckets_by_local_hour() {
        let contacts = vec![
            contact_local(1, 2026, 3, 10, 9),
            contact_local(2, 2026, 3, 10, 9),
            contact_local(3, 2026, 3, 10, 17),
        ];
        let buckets = hourly_distribution(&contacts);
        assert_eq!(buckets[9], 2);
        assert_eq!(buckets[17], 1);
        assert_eq!(buckets.iter().sum::<u32>(), 3);
    }

    #[test]
    fn peak_hour_ties_resolve_to_the_lowest_hour() {
        // Two at hour 0, two at hour 1: the earlier hour wins.
        let contacts = vec![
            contact_local(1, 2026, 3, 10, 0),
            contact_local(2, 2026, 3, 10, 0),
            contact_local(3, 2026, 3, 10, 1),
            contact_local(4, 2026, 3, 10, 1),
        ];
        assert_eq!(peak_hour(&contacts), 0);
    }

    #[test]
    fn peak_hour_of_empty_collection_is_zero() {
        assert_eq!(peak_hour(&[]), 0);
    }

    #[test]
    fn status_distribution_counts_every_bucket() {
        let contacts = vec![
            contact_with_status(1, ContactStatus::New),
            contact_with_status(2, ContactStatus::New),
            contact_with_status(3, ContactStatus::Read),
            contact_with_status(4, ContactStatus::Replied),
            contact_with_status(5, ContactStatus::Archived),
        ];
        let dist = status_distribution(&contacts);
        assert_eq!(
            dist,
            StatusDistribution {
                new: 2,
                read: 1,
                replied: 1,
                archived: 1,
            }
        );
        assert_eq!(dist.total(), 5);
    }

    #[test]
    fn trailing_week_trend_is_always_seven_entries() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 20).unwrap();

        let empty = trailing_week_trend(&[], today);
        assert_eq!(empty.len(), 7);
        assert!(empty.iter().all(|p| p.count == 0));
        assert_eq!(empty[0].date, NaiveDate::from_ymd_opt(2026, 5, 14).unwrap());
        assert_eq!(empty[6].date, today);

        let contacts = vec![
            contact_local(1, 2026, 5, 20, 10),
            contact_local(2, 2026, 5, 20, 11),
            contact_local(3, 2026, 5, 17, 9),
            // outside the window
            contact_local(4, 2026, 5, 1, 9),
        ];
        let trend = trailing_week_trend(&contacts, today);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[6].count, 2);
        assert_eq!(trend[3].count, 1);
        assert_eq!(trend.iter().map(|p| p.count).sum::<u64>(), 3);
    }

    #[test]
    fn advanced_analytics_rejects_zero_period() {
        let err = advanced_analytics(&[], 0, Utc::now()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn advanced_analytics_counts_the_trailing_window() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap();
        let contacts = vec![
            contact_at(1, ContactStatus::New, now - Duration::days(2)),
            contact_at(2, ContactStatus::Replied, now - Duration::days(10)),
            contact_at(3, ContactStatus::Read, now - Duration::days(40)),
        ];

        let analytics = advanced_analytics(&contacts, 30, now).unwrap();
        assert_eq!(analytics.total, 3);
        assert_eq!(analytics.period_count, 2);
        // 2 / 30 rounds to 0
        assert_eq!(analytics.daily_average, 0);

        let analytics = advanced_analytics(&contacts, 7, now).unwrap();
        assert_eq!(analytics.period_count, 1);
        assert_eq!(analytics.status.replied, 1);
    }

    #[test]
    fn report_combines_summary_and_chart_data() {
        let now = Utc::now();
        let contacts = vec![
            contact_at(1, ContactStatus::Replied, now - Duration::hours(1)),
            contact_at(2, ContactStatus::New, now - Duration::hours(2)),
        ];

        let report = build_report(&contacts, 30, now).unwrap();
        assert_eq!(report.summary.total_contacts, 2);
        assert_eq!(report.summary.response_rate, 50);
        assert_eq!(report.trends.len(), 7);
        assert_eq!(report.hourly_distribution.iter().sum::<u32>(), 2);
        assert_eq!(report.status_breakdown.total(), 2);
    }

    #[test]
    fn quick_stats_buckets_today_and_week() {
        let now = Local.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap();
        let contacts = vec![
            contact_at(
                1,
                ContactStatus::New,
                now.with_timezone(&Utc) - Duration::hours(1),
            ),
            contact_at(
                2,
                ContactStatus::Read,
                now.with_timezone(&Utc) - Duration::days(3),
            ),
            contact_at(
                3,
                ContactStatus::Archived,
                now.with_timezone(&Utc) - Duration::days(30),
            ),
        ];

        let stats = quick_stats(&contacts, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.new_contacts, 1);
        assert_eq!(stats.today_contacts, 1);
        assert_eq!(stats.week_contacts, 2);
    }
}
