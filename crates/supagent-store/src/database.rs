use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use supagent_models::schema::SCHEMA_DDL;

use crate::error::StoreError;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    /// Private shared-cache in-memory database. The anchor connection keeps
    /// the database alive between per-call connections.
    Memory {
        uri: String,
        _anchor: Arc<Mutex<Connection>>,
    },
}

/// Where the relational store lives, and how to reach it.
///
/// Holds no connection between calls: every unit of work opens its own
/// connection, runs inside a transaction, and closes the connection when
/// the work returns, whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct Database {
    location: Location,
    busy_timeout: Duration,
}

impl Database {
    /// Open (or create) a file database. Creates the schema if it doesn't
    /// exist and enables WAL so readers don't block the writer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA_DDL)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::info!(path = %path.display(), "Opened record store");
        Ok(Self {
            location: Location::File(path),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        })
    }

    /// Open a private in-memory database with the schema applied. Useful for
    /// testing; the data lives as long as any clone of the returned value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let uri = format!(
            "file:supagent-{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4().simple()
        );
        let anchor = Connection::open_with_flags(&uri, Self::flags())?;
        anchor.execute_batch(SCHEMA_DDL)?;
        Ok(Self {
            location: Location::Memory {
                uri,
                _anchor: Arc::new(Mutex::new(anchor)),
            },
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        })
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn flags() -> OpenFlags {
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = match &self.location {
            Location::File(path) => Connection::open_with_flags(path, Self::flags())?,
            Location::Memory { uri, .. } => Connection::open_with_flags(uri, Self::flags())?,
        };
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Run `op` in a deferred (read) transaction on a fresh connection.
    pub fn read<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.run(TransactionBehavior::Deferred, op)
    }

    /// Run `op` in an immediate (write) transaction on a fresh connection.
    /// The write lock is taken up front so a read-then-write sequence inside
    /// `op` cannot be interleaved with another writer.
    pub fn write<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.run(TransactionBehavior::Immediate, op)
    }

    fn run<T, E, F>(&self, behavior: TransactionBehavior, op: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction_with_behavior(behavior)
            .map_err(StoreError::from)?;
        match op(&tx) {
            Ok(value) => {
                tx.commit().map_err(StoreError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
        // `conn` is closed on drop, on every path.
    }
}
