pub mod config;
pub mod entities;
pub mod entity;
pub mod pagination;
pub mod schema;

pub use config::{AuthConfig, DatabaseConfig, ServerConfig, SupagentConfig};
pub use entities::{
    Agent, AgentColumn, AgentSession, AgentSessionColumn, ChatHistory, ChatHistoryColumn,
    CycleStatus, Notification, NotificationColumn, Payment, PaymentColumn, SessionStatus,
    Strategy, StrategyColumn, Test, TestColumn, User, UserColumn, WalletSnapshot,
    WalletSnapshotColumn,
};
pub use entity::{Column, Entity, FieldSet, FieldValue, ToField};
pub use pagination::{Page, Pagination, PaginationError};
