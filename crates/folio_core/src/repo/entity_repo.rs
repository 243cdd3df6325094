//! Generic entity contract and SQLite-backed repository.
//!
//! # Responsibility
//! - Map a record type to its table, columns and row decoding (`Entity`).
//! - Provide `fetch_one/get/create_one/update_one/delete_one/list_all` for
//!   every entity through one implementation.
//!
//! # Invariants
//! - `id` is always the first selected column and the update key.
//! - `list_all` only orders by declared columns; ties break on `id ASC`.
//! - Create/update read the stored row back so callers observe what
//!   other readers will observe.

use crate::db::DbError;
use crate::model::{now_epoch_ms, EntityId, ValidationError};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::marker::PhantomData;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{table} record not found: {id}")]
    NotFound { table: &'static str, id: EntityId },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("unknown column `{column}` for table `{table}`")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Ordering for `list_all`, naming one column of the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl ListOrder {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// Table mapping for a persisted record type.
pub trait Entity: Sized {
    /// Backing table name.
    const TABLE: &'static str;
    /// Non-id columns, in the order produced by `to_values`.
    const COLUMNS: &'static [&'static str];
    const DEFAULT_ORDER: ListOrder;
    /// Column refreshed with the current time on every update.
    const TOUCH_COLUMN: Option<&'static str> = None;

    fn id(&self) -> EntityId;
    fn to_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Per-entity store contract consumed by services and dashboard sessions.
pub trait EntityRepository<E: Entity> {
    /// First record by default order, if any.
    fn fetch_one(&self) -> RepoResult<Option<E>>;
    fn get(&self, id: EntityId) -> RepoResult<Option<E>>;
    fn create_one(&self, record: &E) -> RepoResult<E>;
    fn update_one(&self, record: &E) -> RepoResult<E>;
    fn delete_one(&self, id: EntityId) -> RepoResult<()>;
    fn list_all(&self, order: ListOrder) -> RepoResult<Vec<E>>;
}

/// SQLite-backed repository for any `Entity`.
pub struct SqliteEntityRepository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: Entity> SqliteEntityRepository<'conn, E> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!("SELECT id, {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
    }

    fn order_clause(order: ListOrder) -> RepoResult<String> {
        if order.column != "id" && !E::COLUMNS.contains(&order.column) {
            return Err(RepoError::UnknownColumn {
                table: E::TABLE,
                column: order.column,
            });
        }
        Ok(format!(
            " ORDER BY {} {}, id ASC",
            order.column,
            order.direction.sql()
        ))
    }

    fn read_back(&self, id: EntityId) -> RepoResult<E> {
        self.get(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("{} row {id} missing after write", E::TABLE))
        })
    }
}

impl<E: Entity> EntityRepository<E> for SqliteEntityRepository<'_, E> {
    fn fetch_one(&self) -> RepoResult<Option<E>> {
        let sql = format!(
            "{}{} LIMIT 1;",
            Self::select_sql(),
            Self::order_clause(E::DEFAULT_ORDER)?
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(E::from_row(row)?)),
            None => Ok(None),
        }
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<E>> {
        let sql = format!("{} WHERE id = ?1;", Self::select_sql());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(E::from_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_one(&self, record: &E) -> RepoResult<E> {
        record.validate()?;

        let placeholders = (1..=E::COLUMNS.len() + 1)
            .map(|idx| format!("?{idx}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} (id, {}) VALUES ({placeholders});",
            E::TABLE,
            E::COLUMNS.join(", ")
        );

        let mut values = Vec::with_capacity(E::COLUMNS.len() + 1);
        values.push(Value::Text(record.id().to_string()));
        values.extend(record.to_values());
        self.conn.execute(&sql, params_from_iter(values))?;

        debug!(
            "event=entity_write module=repo op=create table={} id={} status=ok",
            E::TABLE,
            record.id()
        );
        self.read_back(record.id())
    }

    fn update_one(&self, record: &E) -> RepoResult<E> {
        record.validate()?;

        let assignments = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, column)| format!("{column} = ?{}", idx + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{};",
            E::TABLE,
            E::COLUMNS.len() + 1
        );

        let mut values = record.to_values();
        if let Some(touch) = E::TOUCH_COLUMN {
            if let Some(idx) = E::COLUMNS.iter().position(|column| *column == touch) {
                values[idx] = Value::Integer(now_epoch_ms());
            }
        }
        values.push(Value::Text(record.id().to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            warn!(
                "event=entity_write module=repo op=update table={} id={} status=error error_code=not_found",
                E::TABLE,
                record.id()
            );
            return Err(RepoError::NotFound {
                table: E::TABLE,
                id: record.id(),
            });
        }

        debug!(
            "event=entity_write module=repo op=update table={} id={} status=ok",
            E::TABLE,
            record.id()
        );
        self.read_back(record.id())
    }

    fn delete_one(&self, id: EntityId) -> RepoResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1;", E::TABLE);
        let changed = self.conn.execute(&sql, [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { table: E::TABLE, id });
        }
        debug!(
            "event=entity_write module=repo op=delete table={} id={} status=ok",
            E::TABLE,
            id
        );
        Ok(())
    }

    fn list_all(&self, order: ListOrder) -> RepoResult<Vec<E>> {
        let sql = format!("{}{};", Self::select_sql(), Self::order_clause(order)?);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(E::from_row(row)?);
        }
        Ok(records)
    }
}

/// Counts rows of an entity table.
pub fn count_rows<E: Entity>(conn: &Connection) -> RepoResult<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {};", E::TABLE), [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(count)
}

pub(crate) fn parse_id(row: &Row<'_>, table: &str) -> RepoResult<EntityId> {
    let text: String = row.get("id")?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.id")))
}

pub(crate) fn parse_bool(row: &Row<'_>, table: &str, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {table}.{column}"
        ))),
    }
}

pub(crate) fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |value| Value::Text(value.to_string()))
}

pub(crate) fn bool_value(value: bool) -> Value {
    Value::Integer(i64::from(value))
}
