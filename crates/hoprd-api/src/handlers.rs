//! HTTP handlers and router.
//!
//! All endpoints are read-only. Handlers turn domain results into the
//! response shapes of [`crate::responses`] and domain errors into
//! [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};

use hoprd_network::{Pinger, ReachabilityProber};
use hoprd_node::{AliasCache, Resolver, SnapshotAggregator};
use hoprd_types::config::AppConfig;
use hoprd_types::{PeerId, Result as HoprdResult};

use crate::auth::{require_token, ApiToken};
use crate::error::ApiError;
use crate::responses::{
    aliases_response, AliasesResponse, BalancesResponse, NodeInfoResponse, PingResponse,
};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Node collaborators the API state is built from.
pub struct NodeServices {
    pub aggregator: SnapshotAggregator,
    /// Stored `(alias, peer)` pairs loaded into the alias cache.
    pub aliases: Vec<(String, PeerId)>,
    pub pinger: Arc<dyn Pinger>,
}

/// Shared state of all handlers.
pub struct AppState {
    pub aggregator: SnapshotAggregator,
    pub resolver: Resolver,
    pub prober: ReachabilityProber<Arc<dyn Pinger>>,
    pub ping_timeout: Duration,
}

impl AppState {
    pub fn new(
        aggregator: SnapshotAggregator,
        resolver: Resolver,
        pinger: Arc<dyn Pinger>,
        ping_timeout: Duration,
    ) -> Self {
        Self {
            aggregator,
            resolver,
            prober: ReachabilityProber::new(pinger),
            ping_timeout,
        }
    }

    /// Builds the state from validated diagnostics settings and the
    /// node's stored aliases.
    pub fn from_config<I, S>(
        config: &AppConfig,
        aggregator: SnapshotAggregator,
        aliases: I,
        pinger: Arc<dyn Pinger>,
    ) -> HoprdResult<Self>
    where
        I: IntoIterator<Item = (S, PeerId)>,
        S: AsRef<str>,
    {
        config.validate()?;
        let cache = AliasCache::from_entries(config.max_alias_len, aliases)?;
        Ok(Self::new(
            aggregator,
            Resolver::new(Arc::new(cache)),
            pinger,
            config.ping_timeout(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /account/balances
pub async fn balances_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let snapshot = state.aggregator.balance_snapshot().await?;
    Ok(Json(snapshot.into()))
}

/// GET /node/info
pub async fn node_info_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NodeInfoResponse>, ApiError> {
    let info = state.aggregator.node_info_snapshot().await?;
    Ok(Json(NodeInfoResponse::from(&info)))
}

/// GET /peers/:peer/ping
pub async fn ping_handler(
    State(state): State<Arc<AppState>>,
    Path(peer): Path<String>,
) -> Result<Json<PingResponse>, ApiError> {
    let peer = state.resolver.resolve(&peer)?;
    let outcome = state.prober.probe(&peer, state.ping_timeout).await;
    tracing::info!(%peer, ?outcome, "manual ping");
    PingResponse::from_outcome(outcome)
        .map(Json)
        .map_err(ApiError::Unprocessable)
}

/// GET /aliases
pub async fn aliases_handler(State(state): State<Arc<AppState>>) -> Json<AliasesResponse> {
    Json(aliases_response(state.resolver.aliases().entries()))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Builds the `/api/v3` router. With `api_token` set every route
/// requires the token.
pub fn build_router(state: Arc<AppState>, api_token: Option<&str>) -> Router {
    let api = Router::new()
        .route("/account/balances", get(balances_handler))
        .route("/node/info", get(node_info_handler))
        .route("/peers/:peer/ping", get(ping_handler))
        .route("/aliases", get(aliases_handler))
        .with_state(state);

    let api = match api_token {
        Some(token) => api.layer(middleware::from_fn_with_state(
            ApiToken::new(token),
            require_token,
        )),
        None => api,
    };

    Router::new().nest("/api/v3", api)
}
