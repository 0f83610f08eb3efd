use std::path::Path;
use std::time::Duration;

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use supagent_models::{Entity, FieldSet, FieldValue, Page, Pagination};

use crate::database::Database;
use crate::error::StoreError;
use crate::query::{self, SelectQuery, Statement};

/// Generic record store: insert, update and paginated select for any
/// `Entity`, one scoped connection per call.
#[derive(Debug, Clone)]
pub struct RecordStore {
    db: Database,
}

impl RecordStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open a file-backed store, creating the schema when missing.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self::new(Database::open(path)?.with_busy_timeout(busy_timeout)))
    }

    /// Open a private in-memory store. Useful for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn insert<E: Entity>(&self, values: &FieldSet<E::Column>) -> Result<(), StoreError> {
        self.write(|tx| tx.insert::<E>(values))
    }

    /// Returns the number of rows matched.
    pub fn update<E: Entity>(
        &self,
        set: &FieldSet<E::Column>,
        predicate: &FieldSet<E::Column>,
    ) -> Result<usize, StoreError> {
        self.write(|tx| tx.update::<E>(set, predicate))
    }

    /// Page of rows plus the total matching count, read in one transaction
    /// so the two always agree.
    pub fn select<E: Entity>(&self, query: &SelectQuery<E::Column>) -> Result<Page<E>, StoreError> {
        self.read(|tx| tx.select::<E>(query))
    }

    pub fn find_one<E: Entity>(
        &self,
        predicate: &FieldSet<E::Column>,
    ) -> Result<Option<E>, StoreError> {
        self.read(|tx| tx.find_one::<E>(predicate))
    }

    /// Run several operations atomically under the write lock. Any error
    /// returned by `op` rolls the whole unit back.
    pub fn write<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&StoreTx<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.db.write(|tx| op(&StoreTx { conn: tx }))
    }

    pub fn read<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&StoreTx<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.db.read(|tx| op(&StoreTx { conn: tx }))
    }
}

/// Typed record operations bound to one open transaction.
pub struct StoreTx<'a> {
    conn: &'a Connection,
}

impl StoreTx<'_> {
    pub fn insert<E: Entity>(&self, values: &FieldSet<E::Column>) -> Result<(), StoreError> {
        let stmt = query::insert(E::TABLE, values)?;
        self.execute(&stmt)?;
        tracing::debug!(table = E::TABLE, columns = values.len(), "Inserted record");
        Ok(())
    }

    pub fn update<E: Entity>(
        &self,
        set: &FieldSet<E::Column>,
        predicate: &FieldSet<E::Column>,
    ) -> Result<usize, StoreError> {
        let stmt = query::update(E::TABLE, set, predicate)?;
        let matched = self.execute(&stmt)?;
        tracing::debug!(table = E::TABLE, rows = matched, "Updated records");
        Ok(matched)
    }

    pub fn select<E: Entity>(&self, query: &SelectQuery<E::Column>) -> Result<Page<E>, StoreError> {
        let total_items = self.count::<E>(&query.predicate)?;
        let stmt = query::select(E::TABLE, query);
        let items = self.fetch::<E>(&stmt)?;
        tracing::debug!(
            table = E::TABLE,
            rows = items.len(),
            total = total_items,
            "Selected records"
        );
        Ok(Page { total_items, items })
    }

    pub fn find_one<E: Entity>(
        &self,
        predicate: &FieldSet<E::Column>,
    ) -> Result<Option<E>, StoreError> {
        let query = SelectQuery::new()
            .filter(predicate.clone())
            .paginate(Pagination::first());
        let stmt = query::select(E::TABLE, &query);
        Ok(self.fetch::<E>(&stmt)?.into_iter().next())
    }

    pub fn count<E: Entity>(&self, predicate: &FieldSet<E::Column>) -> Result<u64, StoreError> {
        let stmt = query::count(E::TABLE, predicate);
        let count: i64 = self.conn.query_row(
            &stmt.sql,
            rusqlite::params_from_iter(stmt.params.iter().map(to_sql)),
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    pub fn exists<E: Entity>(&self, predicate: &FieldSet<E::Column>) -> Result<bool, StoreError> {
        Ok(self.count::<E>(predicate)? > 0)
    }

    fn execute(&self, stmt: &Statement) -> Result<usize, StoreError> {
        Ok(self.conn.execute(
            &stmt.sql,
            rusqlite::params_from_iter(stmt.params.iter().map(to_sql)),
        )?)
    }

    fn fetch<E: Entity>(&self, stmt: &Statement) -> Result<Vec<E>, StoreError> {
        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let names: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let rows = prepared
            .query_map(
                rusqlite::params_from_iter(stmt.params.iter().map(to_sql)),
                |row| {
                    let mut object = serde_json::Map::with_capacity(names.len());
                    for (idx, name) in names.iter().enumerate() {
                        let value: SqlValue = row.get(idx)?;
                        object.insert(name.clone(), to_json(value));
                    }
                    Ok(object)
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let records = rows
            .into_iter()
            .map(|object| serde_json::from_value(serde_json::Value::Object(object)))
            .collect::<Result<Vec<E>, _>>()?;
        Ok(records)
    }
}

fn to_sql(value: &FieldValue) -> SqlValue {
    match value {
        FieldValue::Integer(i) => SqlValue::Integer(*i),
        FieldValue::Real(f) => SqlValue::Real(*f),
        FieldValue::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn to_json(value: SqlValue) -> serde_json::Value {
    match value {
        SqlValue::Null => serde_json::Value::Null,
        SqlValue::Integer(i) => serde_json::Value::from(i),
        SqlValue::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        SqlValue::Text(s) => serde_json::Value::String(s),
        SqlValue::Blob(bytes) => serde_json::Value::from(bytes),
    }
}
