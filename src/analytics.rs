//! Financial analytics over transaction snapshots
//!
//! Pure functions: every operation takes a caller-supplied slice of
//! transaction records plus its parameters (including the reference instant)
//! and allocates only transient local structures. No clock reads, no I/O, no
//! mutation, so concurrent callers need no coordination.

use crate::database::entities::{TransactionRecord, TransactionStatus};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

/// Trend window when the caller passes a non-positive month count
pub const DEFAULT_TREND_MONTHS: i32 = 12;
/// Recent-activity window when the caller passes a non-positive day count
pub const DEFAULT_RECENT_DAYS: i64 = 7;
/// Cap on recent-activity results
pub const RECENT_LIMIT: usize = 10;

/// Revenue sums across a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RevenueTotals {
    pub total: Decimal,
    pub paid: Decimal,
    pub unpaid: Decimal,
}

/// Revenue attributed to one service type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServiceTypeRevenue {
    pub service_type: String,
    pub revenue: Decimal,
}

/// One month bucket of the revenue trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyRevenue {
    /// Short label, e.g. "Jan 2025"
    pub month: String,
    pub revenue: Decimal,
}

/// Financial position of a single patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PatientFinancialSummary {
    pub patient_id: i32,
    pub total: Decimal,
    pub paid: Decimal,
    pub unpaid: Decimal,
}

/// Sum amounts across the snapshot, split by payment status
pub fn revenue_totals(records: &[TransactionRecord]) -> RevenueTotals {
    let mut paid = Decimal::ZERO;
    let mut unpaid = Decimal::ZERO;

    for record in records {
        match record.status {
            TransactionStatus::Paid => paid += record.amount,
            TransactionStatus::Unpaid => unpaid += record.amount,
        }
    }

    RevenueTotals {
        total: paid + unpaid,
        paid,
        unpaid,
    }
}

/// Revenue grouped by service type, highest first
///
/// Ties keep the input order of first occurrence (stable sort).
pub fn revenue_by_service_type(records: &[TransactionRecord]) -> Vec<ServiceTypeRevenue> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for record in records {
        let service_type = record.service_type.as_str();
        if !totals.contains_key(service_type) {
            first_seen.push(service_type);
        }
        *totals.entry(service_type).or_insert(Decimal::ZERO) += record.amount;
    }

    let mut breakdown: Vec<ServiceTypeRevenue> = first_seen
        .into_iter()
        .map(|service_type| ServiceTypeRevenue {
            service_type: service_type.to_string(),
            revenue: totals[service_type],
        })
        .collect();

    breakdown.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    breakdown
}

/// Record counts grouped by payment status label
pub fn count_by_status(records: &[TransactionRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();

    for record in records {
        *counts.entry(record.status.label().to_string()).or_insert(0) += 1;
    }

    counts
}

/// Monthly revenue trend ending in the month containing `now`
///
/// Returns exactly `months` entries (non-positive coerces to
/// [`DEFAULT_TREND_MONTHS`]), oldest first, one per calendar month. Months
/// without transactions report zero. The window covers the whole current
/// month, so transactions dated after `now` but inside its month still count.
pub fn monthly_revenue_trend(
    records: &[TransactionRecord],
    months: i32,
    now: DateTime<Utc>,
) -> Vec<MonthlyRevenue> {
    let months = if months <= 0 { DEFAULT_TREND_MONTHS } else { months };

    let end_month = month_start(now);
    let start_month = shift_months(end_month, -(months - 1));
    let window_end = shift_months(end_month, 1);

    // Single-pass grouping keyed by first-of-month instant
    let mut buckets: HashMap<DateTime<Utc>, Decimal> = HashMap::new();
    for record in records {
        if record.transaction_date >= start_month && record.transaction_date < window_end {
            *buckets
                .entry(month_start(record.transaction_date))
                .or_insert(Decimal::ZERO) += record.amount;
        }
    }

    // Zero-filled reconstruction, oldest to newest
    let mut trend = Vec::with_capacity(months as usize);
    let mut month = start_month;
    for _ in 0..months {
        trend.push(MonthlyRevenue {
            month: month_label(month),
            revenue: buckets.get(&month).copied().unwrap_or(Decimal::ZERO),
        });
        month = shift_months(month, 1);
    }

    trend
}

/// Transactions dated within the last `days` days of `now`, newest first
///
/// The lower bound is inclusive; the result is capped at [`RECENT_LIMIT`]
/// entries. A non-positive day count coerces to [`DEFAULT_RECENT_DAYS`].
pub fn recent_transactions(
    records: &[TransactionRecord],
    days: i64,
    now: DateTime<Utc>,
) -> Vec<TransactionRecord> {
    let days = if days <= 0 { DEFAULT_RECENT_DAYS } else { days };
    let cutoff = now - Duration::days(days);

    let mut recent: Vec<TransactionRecord> = records
        .iter()
        .filter(|record| record.transaction_date >= cutoff)
        .cloned()
        .collect();

    recent.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    recent.truncate(RECENT_LIMIT);
    recent
}

/// Financial summary for one patient
///
/// `paid` is derived as `total - unpaid`, never independently summed. No
/// existence check: an unknown patient yields zero-valued totals, and
/// confirming existence is the caller's job.
pub fn patient_financial_summary(
    records: &[TransactionRecord],
    patient_id: i32,
) -> PatientFinancialSummary {
    let mut total = Decimal::ZERO;
    let mut unpaid = Decimal::ZERO;

    for record in records.iter().filter(|r| r.patient_id == patient_id) {
        total += record.amount;
        if !record.status.is_paid() {
            unpaid += record.amount;
        }
    }

    PatientFinancialSummary {
        patient_id,
        total,
        paid: total - unpaid,
        unpaid,
    }
}

/// Truncate an instant to the first day of its month, midnight UTC
pub fn month_start(instant: DateTime<Utc>) -> DateTime<Utc> {
    let naive_date = instant.date_naive().with_day(1).unwrap_or(instant.date_naive());
    naive_date
        .and_hms_opt(0, 0, 0)
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        .unwrap_or(instant)
}

/// Shift a first-of-month instant by `delta` calendar months
pub fn shift_months(month: DateTime<Utc>, delta: i32) -> DateTime<Utc> {
    let total_months = month.year() * 12 + month.month0() as i32 + delta;
    let year = total_months.div_euclid(12);
    let month0 = total_months.rem_euclid(12) as u32;

    Utc.with_ymd_and_hms(year, month0 + 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(month)
}

/// Short human-readable month label, e.g. "Jan 2025"
pub fn month_label(month: DateTime<Utc>) -> String {
    month.format("%b %Y").to_string()
}
