use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use supagent_models::{
    Agent, AgentSession, ChatHistory, Notification, Payment, Strategy, Test, User, WalletSnapshot,
};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::service::Endpoint;
use crate::state::AppState;

/// `POST /api_v1/<route>/{create,update,get}` for one entity.
fn entity_routes<E: Endpoint>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/api_v1/{}", E::ROUTE);
    router
        .route(&format!("{base}/create"), post(handlers::create::<E>))
        .route(&format!("{base}/update"), post(handlers::update::<E>))
        .route(&format!("{base}/get"), post(handlers::get::<E>))
}

pub fn create_router(state: AppState) -> Router {
    let mut api = Router::new();
    api = entity_routes::<Agent>(api);
    api = entity_routes::<AgentSession>(api);
    api = entity_routes::<Strategy>(api);
    api = entity_routes::<ChatHistory>(api);
    api = entity_routes::<Notification>(api);
    api = entity_routes::<WalletSnapshot>(api);
    api = entity_routes::<User>(api);
    api = entity_routes::<Payment>(api);
    api = entity_routes::<Test>(api);

    let api = api
        .route(
            "/api_v1/agent_sessions/record_progress",
            post(handlers::record_progress),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
