use crate::{
    analytics::{
        self, MonthlyRevenue, PatientFinancialSummary, RevenueTotals, ServiceTypeRevenue,
    },
    database::{TransactionQuery, entities::TransactionRecord},
    error::AppError,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json,
    routing::get,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Create dashboard API routes
///
/// These are the query façade over the analytics engine: each handler loads
/// one transaction snapshot, hands it to the engine with `Utc::now()` as the
/// reference instant, and returns the result untouched.
pub fn create_dashboard_routes() -> Router<Server> {
    Router::new()
        .route("/dashboard/summary", get(get_dashboard_summary))
        .route("/dashboard/revenue-trend", get(get_revenue_trend))
        .route("/dashboard/recent", get(get_recent_transactions))
        .route("/patients/{id}/summary", get(get_patient_summary))
}

/// Query parameters for the revenue trend
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// Number of months in the window; non-positive or absent means 12
    pub months: Option<i32>,
}

/// Query parameters for recent activity
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    /// Day window; non-positive or absent means 7
    pub days: Option<i64>,
}

/// Aggregate dashboard view
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub totals: RevenueTotals,
    pub status_counts: BTreeMap<String, u64>,
    pub revenue_by_service_type: Vec<ServiceTypeRevenue>,
    pub recent_transactions: Vec<TransactionRecord>,
}

async fn get_dashboard_summary(
    State(server): State<Server>,
) -> Result<Json<DashboardSummary>, AppError> {
    let snapshot = server
        .database
        .transactions()
        .get_records(&TransactionQuery::default())
        .await?;
    let now = Utc::now();

    Ok(Json(DashboardSummary {
        totals: analytics::revenue_totals(&snapshot),
        status_counts: analytics::count_by_status(&snapshot),
        revenue_by_service_type: analytics::revenue_by_service_type(&snapshot),
        recent_transactions: analytics::recent_transactions(
            &snapshot,
            analytics::DEFAULT_RECENT_DAYS,
            now,
        ),
    }))
}

async fn get_revenue_trend(
    State(server): State<Server>,
    Query(params): Query<TrendQuery>,
) -> Result<Json<Vec<MonthlyRevenue>>, AppError> {
    let months = params.months.unwrap_or(analytics::DEFAULT_TREND_MONTHS);
    let now = Utc::now();

    // Ranged fetch for the trend window; the engine re-filters, so the
    // coercion below only has to match its defaulting rule
    let effective_months = if months <= 0 {
        analytics::DEFAULT_TREND_MONTHS
    } else {
        months
    };
    let start_month = analytics::shift_months(analytics::month_start(now), -(effective_months - 1));
    let snapshot = server
        .database
        .transactions()
        .get_records(&TransactionQuery {
            start_date: Some(start_month),
            ..Default::default()
        })
        .await?;

    Ok(Json(analytics::monthly_revenue_trend(&snapshot, months, now)))
}

async fn get_recent_transactions(
    State(server): State<Server>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<Vec<TransactionRecord>>, AppError> {
    let days = params.days.unwrap_or(analytics::DEFAULT_RECENT_DAYS);
    let now = Utc::now();

    let effective_days = if days <= 0 {
        analytics::DEFAULT_RECENT_DAYS
    } else {
        days
    };
    let snapshot = server
        .database
        .transactions()
        .get_records(&TransactionQuery {
            start_date: Some(now - Duration::days(effective_days)),
            ..Default::default()
        })
        .await?;

    Ok(Json(analytics::recent_transactions(&snapshot, days, now)))
}

async fn get_patient_summary(
    State(server): State<Server>,
    Path(id): Path<i32>,
) -> Result<Json<PatientFinancialSummary>, AppError> {
    // Existence is the façade's job; the engine reports zeros for any ID
    if !server.database.patients().exists(id).await? {
        return Err(AppError::NotFound(format!("Patient not found: {}", id)));
    }

    let snapshot = server
        .database
        .transactions()
        .get_records(&TransactionQuery {
            patient_id: Some(id),
            ..Default::default()
        })
        .await?;

    Ok(Json(analytics::patient_financial_summary(&snapshot, id)))
}
