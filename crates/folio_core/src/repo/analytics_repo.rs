//! Visit counter persistence.
//!
//! # Invariants
//! - One row per `(page_path, visit_date)`; repeated visits increment it.

use super::entity_repo::{
    Entity, EntityRepository, ListOrder, RepoError, RepoResult, SqliteEntityRepository,
};
use crate::model::analytics::{VisitorAnalytics, VISIT_DATE_FORMAT};
use crate::model::now_epoch_ms;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

pub trait AnalyticsRepository {
    /// Increments the counter for `page_path` on `visit_date`, creating it
    /// with a count of one when absent. Returns the stored row.
    fn record_visit(&self, page_path: &str, visit_date: NaiveDate)
        -> RepoResult<VisitorAnalytics>;
    fn list_visits(&self) -> RepoResult<Vec<VisitorAnalytics>>;
}

pub struct SqliteAnalyticsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAnalyticsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AnalyticsRepository for SqliteAnalyticsRepository<'_> {
    fn record_visit(
        &self,
        page_path: &str,
        visit_date: NaiveDate,
    ) -> RepoResult<VisitorAnalytics> {
        VisitorAnalytics::first_visit(page_path, visit_date).validate()?;
        let date_text = visit_date.format(VISIT_DATE_FORMAT).to_string();

        self.conn.execute(
            "INSERT INTO visitor_analytics (id, page_path, visit_count, visit_date, created_at)
             VALUES (?1, ?2, 1, ?3, ?4)
             ON CONFLICT (page_path, visit_date)
             DO UPDATE SET visit_count = visit_count + 1;",
            params![
                Uuid::new_v4().to_string(),
                page_path,
                date_text,
                now_epoch_ms()
            ],
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT id, page_path, visit_count, visit_date, created_at
             FROM visitor_analytics
             WHERE page_path = ?1 AND visit_date = ?2;",
        )?;
        let mut rows = stmt.query(params![page_path, date_text])?;
        match rows.next()? {
            Some(row) => VisitorAnalytics::from_row(row),
            None => Err(RepoError::InvalidData(format!(
                "visit counter for `{page_path}` missing after upsert"
            ))),
        }
    }

    fn list_visits(&self) -> RepoResult<Vec<VisitorAnalytics>> {
        SqliteEntityRepository::<VisitorAnalytics>::new(self.conn)
            .list_all(ListOrder::desc("visit_date"))
    }
}
