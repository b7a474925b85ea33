//! API Routes
//!
//! Configures the Axum router: control endpoints under `/_worker`, everything
//! else through the interceptor.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    activate_handler, add_favorite_handler, auth_handler, caches_handler, click_handler,
    favorites_handler, health_handler, install_handler, login_handler, logout_handler,
    notifications_handler, push_handler, remove_favorite_handler, stats_handler, upgrade_handler,
    AppState,
};
use super::proxy::proxy_handler;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /_worker/health`, `GET /_worker/stats`, `GET /_worker/caches`
/// - `POST /_worker/install`, `POST /_worker/activate`, `POST /_worker/upgrade`
/// - `POST /_worker/push`, `GET /_worker/notifications`,
///   `POST /_worker/notifications/:id/click`
/// - `GET|POST|DELETE /_worker/storage/auth`
/// - `GET|POST /_worker/storage/favorites`, `DELETE /_worker/storage/favorites/:id`
/// - anything else: intercepted and proxied to the origin
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let control = Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/caches", get(caches_handler))
        .route("/install", post(install_handler))
        .route("/activate", post(activate_handler))
        .route("/upgrade", post(upgrade_handler))
        .route("/push", post(push_handler))
        .route("/notifications", get(notifications_handler))
        .route("/notifications/:id/click", post(click_handler))
        .route(
            "/storage/auth",
            get(auth_handler).post(login_handler).delete(logout_handler),
        )
        .route(
            "/storage/favorites",
            get(favorites_handler).post(add_favorite_handler),
        )
        .route("/storage/favorites/:id", delete(remove_favorite_handler));

    Router::new()
        .nest("/_worker", control)
        .fallback(proxy_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::test_support::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let manifest = ["/"];
        let state = AppState::with_worker(worker("v1", &manifest, stub_serving(&manifest)));
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_worker/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_worker/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_goes_through_proxy() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-worker-source"], "network");
    }

    #[tokio::test]
    async fn test_click_unknown_notification_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/_worker/notifications/41/click")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
