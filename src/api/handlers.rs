//! API Handlers
//!
//! HTTP request handlers for the worker control endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::local::{AuthData, FavoriteProduct, KeyValueStore, SessionStore, Stored};
use crate::models::{
    ActivateResponse, ClickResponse, GenerationsResponse, HealthResponse, InstallRequest,
    LoginRequest, MessageResponse, StatsResponse, UpgradeRequest,
};
use crate::network::{Fetcher, ReqwestFetcher};
use crate::notify::{LogNotifier, LogOpener, Notification, NotificationRelay};
use crate::worker::{InstallReport, UpgradeReport, Worker, WorkerSettings};

/// Application state shared across all handlers.
///
/// Every service is an explicit handle; nothing is reached through globals.
#[derive(Clone)]
pub struct AppState {
    /// Interceptor and cache lifecycle
    pub worker: Worker,
    /// Push notification relay
    pub relay: Arc<NotificationRelay>,
    /// Auth and favorites storage
    pub session: Arc<SessionStore>,
}

impl AppState {
    pub fn new(worker: Worker, relay: NotificationRelay, session: SessionStore) -> Self {
        Self {
            worker,
            relay: Arc::new(relay),
            session: Arc::new(session),
        }
    }

    /// Wraps a worker with logging notification handles and empty local storage.
    pub fn with_worker(worker: Worker) -> Self {
        let relay = NotificationRelay::new(Arc::new(LogNotifier::new()), Arc::new(LogOpener::new()));
        Self::new(worker, relay, SessionStore::new(KeyValueStore::new()))
    }

    /// Creates a new AppState from configuration.
    ///
    /// Cache misses are forwarded to the configured origin with reqwest.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = WorkerSettings::from_config(config)?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(
            ReqwestFetcher::new(settings.origin.clone(), config.upstream_timeout())
                .map_err(|e| CacheError::Internal(e.to_string()))?,
        );
        Ok(Self::with_worker(Worker::new(settings, fetcher)))
    }
}

/// Handler for GET /_worker/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.worker.current_generation().await))
}

/// Handler for GET /_worker/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.worker.stats().await))
}

/// Handler for GET /_worker/caches
pub async fn caches_handler(State(state): State<AppState>) -> Json<GenerationsResponse> {
    Json(GenerationsResponse {
        current: state.worker.current_generation().await,
        generations: state.worker.generations().await,
    })
}

/// Handler for POST /_worker/install
///
/// Populates a generation from the manifest without switching to it.
pub async fn install_handler(
    State(state): State<AppState>,
    Json(req): Json<InstallRequest>,
) -> Result<Json<InstallReport>> {
    let version = match req.version {
        Some(version) => version,
        None => state.worker.version().await,
    };
    Ok(Json(state.worker.install(&version).await?))
}

/// Handler for POST /_worker/activate
pub async fn activate_handler(State(state): State<AppState>) -> Json<ActivateResponse> {
    let deleted = state.worker.activate().await;
    Json(ActivateResponse {
        current: state.worker.current_generation().await,
        deleted,
    })
}

/// Handler for POST /_worker/upgrade
pub async fn upgrade_handler(
    State(state): State<AppState>,
    Json(req): Json<UpgradeRequest>,
) -> Result<Json<UpgradeReport>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }
    Ok(Json(state.worker.upgrade(req.version.trim()).await?))
}

/// Handler for POST /_worker/push
///
/// Takes the raw body so malformed payloads get the same JSON error as
/// everything else.
pub async fn push_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Notification>> {
    Ok(Json(state.relay.push(&body).await?))
}

/// Handler for GET /_worker/notifications
pub async fn notifications_handler(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.relay.active().await)
}

/// Handler for POST /_worker/notifications/:id/click
pub async fn click_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ClickResponse>> {
    let opened_url = state.relay.click(id).await?;
    Ok(Json(ClickResponse { id, opened_url }))
}

/// Handler for GET /_worker/storage/auth
pub async fn auth_handler(State(state): State<AppState>) -> Json<Stored<AuthData>> {
    Json(state.session.auth().await)
}

/// Handler for POST /_worker/storage/auth
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthData>> {
    Ok(Json(state.session.login(&req.username, &req.password).await?))
}

/// Handler for DELETE /_worker/storage/auth
pub async fn logout_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.session.clear_auth().await;
    Json(MessageResponse::new(true, "Signed out"))
}

/// Handler for GET /_worker/storage/favorites
pub async fn favorites_handler(
    State(state): State<AppState>,
) -> Json<Stored<Vec<FavoriteProduct>>> {
    Json(state.session.favorites().await)
}

/// Handler for POST /_worker/storage/favorites
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    Json(product): Json<FavoriteProduct>,
) -> Result<Json<MessageResponse>> {
    let added = state.session.add_favorite(product).await?;
    Ok(Json(if added {
        MessageResponse::new(true, "Product added to favorites")
    } else {
        MessageResponse::new(false, "Product is already in favorites")
    }))
}

/// Handler for DELETE /_worker/storage/favorites/:id
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.session.remove_favorite(&id).await?;
    Ok(Json(MessageResponse::new(
        true,
        "Product removed from favorites",
    )))
}
