//! Parameterized SQL construction.
//!
//! Table and column names come only from `Entity` / `Column` declarations;
//! every value is a numbered bound parameter.

use supagent_models::schema::ROW_KEY;
use supagent_models::{Column, FieldSet, FieldValue, Pagination};

use crate::error::StoreError;

/// SQL text plus the values bound to its `?N` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

/// A filtered, ordered, paginated read.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery<C> {
    /// Result columns. Empty selects every column.
    pub columns: Vec<C>,
    /// Equality predicates, AND-ed together.
    pub predicate: FieldSet<C>,
    /// Ascending sort column. Insertion order when `None`.
    pub order_by: Option<C>,
    pub pagination: Pagination,
}

impl<C: Column> Default for SelectQuery<C> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            predicate: FieldSet::new(),
            order_by: None,
            pagination: Pagination::default(),
        }
    }
}

impl<C: Column> SelectQuery<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &[C]) -> Self {
        self.columns = columns.to_vec();
        self
    }

    pub fn filter(mut self, predicate: FieldSet<C>) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn order_by(mut self, column: Option<C>) -> Self {
        self.order_by = column;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}

pub fn insert<C: Column>(table: &'static str, values: &FieldSet<C>) -> Result<Statement, StoreError> {
    if values.is_empty() {
        return Err(StoreError::EmptyInsert { table });
    }
    let columns: Vec<&str> = values.columns().map(Column::name).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    Ok(Statement {
        sql: format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        ),
        params: values.values().cloned().collect(),
    })
}

/// `UPDATE ... SET ... WHERE ...`. An empty predicate is refused rather than
/// turned into a table-wide update.
pub fn update<C: Column>(
    table: &'static str,
    set: &FieldSet<C>,
    predicate: &FieldSet<C>,
) -> Result<Statement, StoreError> {
    if predicate.is_empty() {
        return Err(StoreError::EmptyPredicate { table });
    }
    if set.is_empty() {
        return Err(StoreError::NothingToUpdate { table });
    }

    let mut params: Vec<FieldValue> = set.values().cloned().collect();
    let assignments: Vec<String> = set
        .columns()
        .enumerate()
        .map(|(i, c)| format!("{} = ?{}", c.name(), i + 1))
        .collect();
    let where_sql = where_clause(predicate, &mut params);

    Ok(Statement {
        sql: format!("UPDATE {table} SET {}{where_sql}", assignments.join(", ")),
        params,
    })
}

pub fn select<C: Column>(table: &'static str, query: &SelectQuery<C>) -> Statement {
    let columns = if query.columns.is_empty() {
        "*".to_string()
    } else {
        query
            .columns
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let order = query.order_by.map(Column::name).unwrap_or(ROW_KEY);

    let mut params = Vec::new();
    let where_sql = where_clause(&query.predicate, &mut params);
    params.push(FieldValue::Integer(to_i64(query.pagination.limit())));
    let limit_idx = params.len();
    params.push(FieldValue::Integer(to_i64(query.pagination.offset())));
    let offset_idx = params.len();

    Statement {
        sql: format!(
            "SELECT {columns} FROM {table}{where_sql} ORDER BY {order} ASC LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
        ),
        params,
    }
}

pub fn count<C: Column>(table: &'static str, predicate: &FieldSet<C>) -> Statement {
    let mut params = Vec::new();
    let where_sql = where_clause(predicate, &mut params);
    Statement {
        sql: format!("SELECT COUNT(1) FROM {table}{where_sql}"),
        params,
    }
}

/// Appends predicate values to `params` and returns ` WHERE a = ?n AND ...`,
/// or an empty string when there is nothing to match on.
fn where_clause<C: Column>(predicate: &FieldSet<C>, params: &mut Vec<FieldValue>) -> String {
    if predicate.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = predicate
        .iter()
        .map(|(column, value)| {
            params.push(value.clone());
            format!("{} = ?{}", column.name(), params.len())
        })
        .collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
