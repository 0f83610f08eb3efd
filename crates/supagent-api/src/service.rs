//! Request semantics shared by every entity route, independent of HTTP.

use chrono::Utc;
use supagent_models::{
    Agent, AgentColumn, AgentSession, AgentSessionColumn, ChatHistory, Column, Entity, FieldSet,
    FieldValue, Notification, Page, Pagination, Payment, Strategy, Test, ToField, User,
    UserColumn, WalletSnapshot,
};
use supagent_store::{RecordStore, SelectQuery, StoreTx};
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{GetRequest, Progress, ProgressRequest};

/// What a pre-create hook decided.
#[derive(Debug)]
pub enum Precheck<E> {
    Proceed,
    /// An equivalent record already exists; return it instead of inserting.
    Existing(E),
}

#[derive(Debug)]
pub enum Created<E> {
    New(String),
    Existing(E),
}

#[derive(Debug)]
pub enum Fetched<E> {
    One(E),
    Many(Page<E>),
}

/// An entity exposed over HTTP. The hook runs inside the insert
/// transaction, so anything it reads stays consistent with the insert.
pub trait Endpoint: Entity {
    fn before_create(_tx: &StoreTx<'_>, _payload: &Self) -> Result<Precheck<Self>, ApiError> {
        Ok(Precheck::Proceed)
    }
}

impl Endpoint for Agent {}
impl Endpoint for Strategy {}
impl Endpoint for ChatHistory {}
impl Endpoint for Notification {}
impl Endpoint for WalletSnapshot {}
impl Endpoint for Payment {}
impl Endpoint for Test {}

impl Endpoint for AgentSession {
    fn before_create(tx: &StoreTx<'_>, payload: &Self) -> Result<Precheck<Self>, ApiError> {
        let agent_id = payload
            .agent_id
            .as_deref()
            .ok_or_else(|| ApiError::Validation("agent_id is required".into()))?;

        let owner = FieldSet::new().with(AgentColumn::AgentId, agent_id.to_string());
        if !tx.exists::<Agent>(&owner)? {
            return Err(ApiError::NotFound(format!("agent {agent_id} does not exist")));
        }
        Ok(Precheck::Proceed)
    }
}

impl Endpoint for User {
    fn before_create(tx: &StoreTx<'_>, payload: &Self) -> Result<Precheck<Self>, ApiError> {
        let Some(wallet) = payload.wallet_address.as_deref() else {
            return Ok(Precheck::Proceed);
        };
        let by_wallet = FieldSet::new().with(UserColumn::WalletAddress, wallet.to_string());
        match tx.find_one::<User>(&by_wallet)? {
            Some(existing) => {
                tracing::debug!(wallet = %wallet, "User already registered");
                Ok(Precheck::Existing(existing))
            }
            None => Ok(Precheck::Proceed),
        }
    }
}

pub fn create<E: Endpoint>(store: &RecordStore, payload: E) -> Result<Created<E>, ApiError> {
    store.write(|tx| {
        if let Precheck::Existing(record) = E::before_create(tx, &payload)? {
            return Ok(Created::Existing(record));
        }

        let id = Uuid::new_v4().to_string();
        let mut values = payload.present(E::CREATE_COLUMNS);
        values.push(E::ID, FieldValue::Text(id.clone()));
        tx.insert::<E>(&values)?;
        tracing::info!(table = E::TABLE, id = %id, "Created record");
        Ok(Created::New(id))
    })
}

/// Returns the number of rows matched.
pub fn update<E: Endpoint>(store: &RecordStore, payload: &E) -> Result<usize, ApiError> {
    let predicate = payload.present(E::UPDATE_KEYS);
    if !predicate.contains(E::ID) {
        return Err(ApiError::Validation(format!(
            "{} is required to update",
            E::ID.name()
        )));
    }
    let set = payload.present(E::UPDATE_COLUMNS);
    Ok(store.update::<E>(&set, &predicate)?)
}

pub fn get<E: Endpoint>(store: &RecordStore, request: GetRequest<E>) -> Result<Fetched<E>, ApiError> {
    if let Some(id) = request.record.id() {
        let by_id = FieldSet::new().with(E::ID, id.to_string());
        return match store.find_one::<E>(&by_id)? {
            Some(record) => Ok(Fetched::One(record)),
            None => Err(ApiError::NotFound(format!(
                "no {} with {} {id}",
                E::ROUTE,
                E::ID.name()
            ))),
        };
    }

    let order_by = request
        .order_by
        .as_deref()
        .map(|name| {
            E::Column::parse(name)
                .ok_or_else(|| ApiError::Validation(format!("cannot order by {name}")))
        })
        .transpose()?;
    let pagination = Pagination::new(request.page, request.page_size)?;

    let query = SelectQuery::new()
        .columns(E::COLUMNS)
        .filter(request.record.filter())
        .order_by(order_by)
        .paginate(pagination);
    Ok(Fetched::Many(store.select::<E>(&query)?))
}

/// Add trade and cycle deltas to a session in one write transaction.
pub fn record_progress(store: &RecordStore, request: &ProgressRequest) -> Result<Progress, ApiError> {
    store.write(|tx| {
        let key = FieldSet::new().with(AgentSessionColumn::SessionId, request.session_id.clone());
        let session = tx.find_one::<AgentSession>(&key)?.ok_or_else(|| {
            ApiError::NotFound(format!("session {} does not exist", request.session_id))
        })?;

        let trades = parse_counter("trades_count", session.trades_count.as_deref())?
            .saturating_add(request.trades);
        let cycles = parse_counter("cycle_count", session.cycle_count.as_deref())?
            .saturating_add(request.cycles);
        let last_cycle = match request.last_cycle {
            Some(at) => Some(at),
            None if request.cycles > 0 => Some(Utc::now()),
            None => session.last_cycle,
        };

        let mut set = FieldSet::new()
            .with(AgentSessionColumn::TradesCount, trades.to_string())
            .with(AgentSessionColumn::CycleCount, cycles.to_string());
        if let Some(at) = last_cycle {
            set.push(AgentSessionColumn::LastCycle, at.to_field());
        }
        tx.update::<AgentSession>(&set, &key)?;

        Ok(Progress {
            session_id: request.session_id.clone(),
            trades_count: trades.to_string(),
            cycle_count: cycles.to_string(),
            last_cycle,
        })
    })
}

/// Counters are stored as decimal text; a missing or blank value is zero.
fn parse_counter(column: &str, value: Option<&str>) -> Result<u64, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(0),
        Some(text) => text
            .parse()
            .map_err(|_| ApiError::Validation(format!("{column} is not a number: {text}"))),
    }
}
