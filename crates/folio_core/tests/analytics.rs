use chrono::NaiveDate;
use folio_core::cache::QueryCache;
use folio_core::db::open_db_in_memory;
use folio_core::repo::SqliteAnalyticsRepository;
use folio_core::service::AnalyticsService;

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[test]
fn repeated_visits_increment_one_daily_row() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = AnalyticsService::new(SqliteAnalyticsRepository::new(&conn), &cache);

    assert_eq!(service.log_visit("/", day("2024-05-01")).unwrap(), 1);
    assert_eq!(service.log_visit("/", day("2024-05-01")).unwrap(), 2);
    assert_eq!(service.log_visit("/", day("2024-05-02")).unwrap(), 1);

    let rows = service.visits().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].visit_date, day("2024-05-02"));
}

#[test]
fn summary_totals_months_and_top_pages() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = AnalyticsService::new(SqliteAnalyticsRepository::new(&conn), &cache);

    for _ in 0..3 {
        service.log_visit("/", day("2024-04-30")).unwrap();
    }
    service.log_visit("/projects", day("2024-05-01")).unwrap();
    service.log_visit("/contact", day("2024-05-02")).unwrap();

    let summary = service.summary().unwrap();
    assert_eq!(summary.total_visits, 5);

    let months: Vec<(&str, i64)> = summary
        .monthly
        .iter()
        .map(|bucket| (bucket.month.as_str(), bucket.visitors))
        .collect();
    assert_eq!(months, vec![("2024-04", 3), ("2024-05", 2)]);

    let pages: Vec<&str> = summary
        .top_pages
        .iter()
        .map(|page| page.path.as_str())
        .collect();
    assert_eq!(pages, vec!["/", "/contact", "/projects"]);
    assert_eq!(summary.visits_in_month_of(day("2024-05-20")), 2);
}

#[test]
fn logging_a_visit_invalidates_cached_counters() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = AnalyticsService::new(SqliteAnalyticsRepository::new(&conn), &cache);

    service.log_visit("/", day("2024-05-01")).unwrap();
    assert_eq!(service.summary().unwrap().total_visits, 1);
    service.log_visit("/", day("2024-05-01")).unwrap();
    assert_eq!(service.summary().unwrap().total_visits, 2);
}
