//! Visit logging and the dashboard's summary view.
//!
//! The summary is illustrative: totals, monthly buckets and top pages are
//! computed from raw counters on every read.

use crate::cache::{QueryCache, QueryKey};
use crate::error::{ServiceError, ServiceResult};
use crate::model::analytics::VisitorAnalytics;
use crate::repo::AnalyticsRepository;
use chrono::{NaiveDate, Utc};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

const ENTITY: &str = "visitor analytics";
const TOP_PAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyVisits {
    /// `YYYY-MM`.
    pub month: String,
    pub visitors: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVisits {
    pub path: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_visits: i64,
    /// Ascending by month.
    pub monthly: Vec<MonthlyVisits>,
    /// Most visited first, at most five; ties ordered by path.
    pub top_pages: Vec<PageVisits>,
}

impl AnalyticsSummary {
    pub fn from_rows(rows: &[VisitorAnalytics]) -> Self {
        let mut monthly: BTreeMap<String, i64> = BTreeMap::new();
        let mut pages: BTreeMap<&str, i64> = BTreeMap::new();
        for row in rows {
            *monthly.entry(row.month_key()).or_default() += row.visit_count;
            *pages.entry(row.page_path.as_str()).or_default() += row.visit_count;
        }

        let mut top_pages: Vec<PageVisits> = pages
            .into_iter()
            .map(|(path, count)| PageVisits {
                path: path.to_string(),
                count,
            })
            .collect();
        top_pages.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
        top_pages.truncate(TOP_PAGES);

        Self {
            total_visits: rows.iter().map(|row| row.visit_count).sum(),
            monthly: monthly
                .into_iter()
                .map(|(month, visitors)| MonthlyVisits { month, visitors })
                .collect(),
            top_pages,
        }
    }

    /// Visits recorded in the month containing `today`.
    pub fn visits_in_month_of(&self, today: NaiveDate) -> i64 {
        let key = today.format("%Y-%m").to_string();
        self.monthly
            .iter()
            .find(|bucket| bucket.month == key)
            .map_or(0, |bucket| bucket.visitors)
    }
}

pub struct AnalyticsService<'c, R: AnalyticsRepository> {
    repo: R,
    cache: &'c QueryCache,
}

impl<'c, R: AnalyticsRepository> AnalyticsService<'c, R> {
    pub fn new(repo: R, cache: &'c QueryCache) -> Self {
        Self { repo, cache }
    }

    pub fn log_visit(&self, page_path: &str, visit_date: NaiveDate) -> ServiceResult<i64> {
        let row = self
            .repo
            .record_visit(page_path, visit_date)
            .map_err(ServiceError::write(ENTITY))?;
        self.cache.invalidate(QueryKey::Analytics);
        debug!(
            "event=visit_log module=service status=ok page={} count={}",
            row.page_path, row.visit_count
        );
        Ok(row.visit_count)
    }

    /// Logs a visit dated with the current UTC day.
    pub fn log_visit_today(&self, page_path: &str) -> ServiceResult<i64> {
        self.log_visit(page_path, Utc::now().date_naive())
    }

    /// Raw counters, newest day first.
    pub fn visits(&self) -> ServiceResult<Vec<VisitorAnalytics>> {
        self.cache.get_or_fetch(QueryKey::Analytics, || {
            self.repo.list_visits().map_err(ServiceError::read(ENTITY))
        })
    }

    pub fn summary(&self) -> ServiceResult<AnalyticsSummary> {
        Ok(AnalyticsSummary::from_rows(&self.visits()?))
    }
}
