//! Entity schemas for every record kind the service stores.
//!
//! Each `entity!` block declares the readable columns, which of them are
//! writable on create and on update, and which columns an update matches on.
//! Store-defaulted timestamps (`created_at`) are readable but never writable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{entity, FieldValue, ToField};

/// Lifecycle state of an agent session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Stopped,
    Stopping,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Stopping => "stopping",
        }
    }
}

impl ToField for SessionStatus {
    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.as_str().to_string())
    }
}

/// State of the current trading cycle inside a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    Running,
    Finished,
}

impl CycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }
}

impl ToField for CycleStatus {
    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.as_str().to_string())
    }
}

entity! {
    /// A trading agent owned by a user.
    Agent: AgentColumn {
        route: "agent",
        table: "sup_agents",
        id: AgentId => agent_id,
        create: [UserId, Name, Configuration, WalletAddress],
        update: [UserId, Name, Configuration, WalletAddress, UpdatedAt],
        keys: [AgentId],
        fields: {
            AgentId => agent_id: String,
            UserId => user_id: String,
            Name => name: String,
            /// Serialized JSON configuration, stored verbatim.
            Configuration => configuration: String,
            WalletAddress => wallet_address: String,
            CreatedAt => created_at: DateTime<Utc>,
            UpdatedAt => updated_at: DateTime<Utc>,
        },
    }
}

entity! {
    /// One run of an agent. Counters are kept as decimal text.
    AgentSession: AgentSessionColumn {
        route: "agent_sessions",
        table: "sup_agent_sessions",
        id: SessionId => session_id,
        create: [
            AgentId, Status, StartedAt, EndedAt, TradesCount, CycleCount,
            SessionInterval, WillEndAt, LastCycle, StatusCycle,
        ],
        update: [
            Status, StartedAt, EndedAt, TradesCount, CycleCount,
            SessionInterval, WillEndAt, LastCycle, StatusCycle,
        ],
        keys: [SessionId, AgentId],
        fields: {
            SessionId => session_id: String,
            AgentId => agent_id: String,
            Status => status: SessionStatus,
            StartedAt => started_at: DateTime<Utc>,
            EndedAt => ended_at: DateTime<Utc>,
            TradesCount => trades_count: String,
            CycleCount => cycle_count: String,
            /// Seconds between trading cycles.
            SessionInterval => session_interval: i64,
            WillEndAt => will_end_at: DateTime<Utc>,
            LastCycle => last_cycle: DateTime<Utc>,
            StatusCycle => status_cycle: CycleStatus,
        },
    }
}

entity! {
    /// A strategy generated for an agent.
    Strategy: StrategyColumn {
        route: "strategies",
        table: "sup_strategies",
        id: StrategyId => strategy_id,
        create: [AgentId, SummarizedDesc, FullDesc, Parameters, StrategyResult],
        update: [AgentId, SummarizedDesc, FullDesc, Parameters, StrategyResult, UpdatedAt],
        keys: [StrategyId],
        fields: {
            StrategyId => strategy_id: String,
            AgentId => agent_id: String,
            SummarizedDesc => summarized_desc: String,
            FullDesc => full_desc: String,
            Parameters => parameters: String,
            StrategyResult => strategy_result: String,
            CreatedAt => created_at: DateTime<Utc>,
            UpdatedAt => updated_at: DateTime<Utc>,
        },
    }
}

entity! {
    ChatHistory: ChatHistoryColumn {
        route: "chat_history",
        table: "sup_chat_history",
        id: HistoryId => history_id,
        create: [AgentId, SessionId, Role, Message],
        update: [Role, Message],
        keys: [HistoryId],
        fields: {
            HistoryId => history_id: String,
            AgentId => agent_id: String,
            SessionId => session_id: String,
            Role => role: String,
            Message => message: String,
            CreatedAt => created_at: DateTime<Utc>,
        },
    }
}

entity! {
    /// A market notification ingested from an external scraper.
    Notification: NotificationColumn {
        route: "notification",
        table: "sup_notifications",
        id: NotificationId => notification_id,
        create: [Source, ShortDesc, LongDesc, NotificationDate, BotUsername],
        update: [Source, ShortDesc, LongDesc, NotificationDate, BotUsername],
        keys: [NotificationId],
        fields: {
            NotificationId => notification_id: String,
            Source => source: String,
            ShortDesc => short_desc: String,
            LongDesc => long_desc: String,
            NotificationDate => notification_date: DateTime<Utc>,
            BotUsername => bot_username: String,
            CreatedAt => created_at: DateTime<Utc>,
        },
    }
}

entity! {
    /// Point-in-time valuation of an agent's wallet.
    WalletSnapshot: WalletSnapshotColumn {
        route: "wallet_snapshots",
        table: "sup_wallet_snapshots",
        id: SnapshotId => snapshot_id,
        create: [AgentId, WalletAddress, TotalValueUsd, Assets, SnapshotTime],
        update: [AgentId, WalletAddress, TotalValueUsd, Assets, SnapshotTime],
        keys: [SnapshotId],
        fields: {
            SnapshotId => snapshot_id: String,
            AgentId => agent_id: String,
            WalletAddress => wallet_address: String,
            TotalValueUsd => total_value_usd: Decimal,
            /// Serialized JSON holdings list.
            Assets => assets: String,
            SnapshotTime => snapshot_time: DateTime<Utc>,
        },
    }
}

entity! {
    /// A platform user. Creation is idempotent on `wallet_address`.
    User: UserColumn {
        route: "user",
        table: "sup_users",
        id: UserId => user_id,
        create: [Username, Email, WalletAddress],
        update: [Username, Email, WalletAddress, UpdatedAt],
        keys: [UserId],
        fields: {
            UserId => user_id: String,
            Username => username: String,
            Email => email: String,
            WalletAddress => wallet_address: String,
            CreatedAt => created_at: DateTime<Utc>,
            UpdatedAt => updated_at: DateTime<Utc>,
        },
    }
}

entity! {
    Payment: PaymentColumn {
        route: "payments",
        table: "sup_payments",
        id: PaymentId => payment_id,
        create: [UserId, AgentId, Amount, Currency, TxHash, Status],
        update: [Status, TxHash],
        keys: [PaymentId],
        fields: {
            PaymentId => payment_id: String,
            UserId => user_id: String,
            AgentId => agent_id: String,
            Amount => amount: Decimal,
            Currency => currency: String,
            TxHash => tx_hash: String,
            Status => status: String,
            CreatedAt => created_at: DateTime<Utc>,
        },
    }
}

entity! {
    /// Scratch entity for smoke-testing a deployment.
    Test: TestColumn {
        route: "test",
        table: "sup_test",
        id: TestId => test_id,
        create: [Name, Description],
        update: [Name, Description],
        keys: [TestId],
        fields: {
            TestId => test_id: String,
            Name => name: String,
            Description => description: String,
            CreatedAt => created_at: DateTime<Utc>,
        },
    }
}
