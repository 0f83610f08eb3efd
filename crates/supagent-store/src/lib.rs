pub mod database;
pub mod error;
pub mod query;
pub mod store;

pub use database::Database;
pub use error::StoreError;
pub use query::SelectQuery;
pub use store::{RecordStore, StoreTx};
