/// Relational schema for every entity table.
///
/// Every table carries an internal `id INTEGER PRIMARY KEY AUTOINCREMENT`
/// and a unique external string identifier. Timestamps are RFC 3339 text;
/// `created_at` / `updated_at` default to the insert time in the same format
/// `ToField` writes (`YYYY-MM-DDTHH:MM:SS.sssZ`).
///
/// Counters on `sup_agent_sessions` are `TEXT` so the decimal strings clients
/// send are stored and returned verbatim.
pub const SCHEMA_DDL: &str = "\
CREATE TABLE IF NOT EXISTS sup_agents (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    agent_id        TEXT NOT NULL UNIQUE,
    user_id         TEXT,
    name            TEXT,
    configuration   TEXT,
    wallet_address  TEXT,
    created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_agents_user ON sup_agents(user_id);

CREATE TABLE IF NOT EXISTS sup_agent_sessions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id        TEXT NOT NULL UNIQUE,
    agent_id          TEXT,
    status            TEXT CHECK (status IN ('running', 'stopped', 'stopping')),
    started_at        TEXT,
    ended_at          TEXT,
    trades_count      TEXT,
    cycle_count       TEXT,
    session_interval  INTEGER,
    will_end_at       TEXT,
    last_cycle        TEXT,
    status_cycle      TEXT CHECK (status_cycle IN ('running', 'finished'))
);
CREATE INDEX IF NOT EXISTS idx_agent_sessions_agent ON sup_agent_sessions(agent_id);

CREATE TABLE IF NOT EXISTS sup_strategies (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    strategy_id      TEXT NOT NULL UNIQUE,
    agent_id         TEXT,
    summarized_desc  TEXT,
    full_desc        TEXT,
    parameters       TEXT,
    strategy_result  TEXT,
    created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_strategies_agent ON sup_strategies(agent_id);

CREATE TABLE IF NOT EXISTS sup_chat_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    history_id  TEXT NOT NULL UNIQUE,
    agent_id    TEXT,
    session_id  TEXT,
    role        TEXT,
    message     TEXT,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_chat_history_session ON sup_chat_history(session_id);

CREATE TABLE IF NOT EXISTS sup_notifications (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    notification_id    TEXT NOT NULL UNIQUE,
    source             TEXT,
    short_desc         TEXT,
    long_desc          TEXT,
    notification_date  TEXT,
    bot_username       TEXT,
    created_at         TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS sup_wallet_snapshots (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    snapshot_id      TEXT NOT NULL UNIQUE,
    agent_id         TEXT,
    wallet_address   TEXT,
    total_value_usd  TEXT,
    assets           TEXT,
    snapshot_time    TEXT
);
CREATE INDEX IF NOT EXISTS idx_wallet_snapshots_agent ON sup_wallet_snapshots(agent_id);

CREATE TABLE IF NOT EXISTS sup_users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         TEXT NOT NULL UNIQUE,
    username        TEXT,
    email           TEXT,
    wallet_address  TEXT,
    created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_users_wallet ON sup_users(wallet_address);

CREATE TABLE IF NOT EXISTS sup_payments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    payment_id  TEXT NOT NULL UNIQUE,
    user_id     TEXT,
    agent_id    TEXT,
    amount      TEXT,
    currency    TEXT,
    tx_hash     TEXT,
    status      TEXT,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_payments_user ON sup_payments(user_id);

CREATE TABLE IF NOT EXISTS sup_test (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    test_id      TEXT NOT NULL UNIQUE,
    name         TEXT,
    description  TEXT,
    created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// Name of the internal auto-increment key every table carries.
pub const ROW_KEY: &str = "id";
