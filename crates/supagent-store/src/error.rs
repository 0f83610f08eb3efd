use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Row mapping error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Refusing unconditional update of {table}: predicate is empty")]
    EmptyPredicate { table: &'static str },

    #[error("Nothing to update in {table}")]
    NothingToUpdate { table: &'static str },

    #[error("Nothing to insert into {table}")]
    EmptyInsert { table: &'static str },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(message.clone().unwrap_or_else(|| code.to_string()))
            }
            _ => StoreError::Sqlite(err),
        }
    }
}
