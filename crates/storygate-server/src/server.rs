//! Router assembly and the serve loop.

use axum::Router;
use axum::routing::{get, post};
use storygate_settings::StorygateSettings;
use storygate_store::Store;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{admin, visitor};
use crate::health::health_handler;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;

/// Build the full router: `/api` routes under the configured base path and
/// `/health` at the root.
pub fn build_router(state: AppState) -> Router {
    let base_path = state.settings.server.normalized_base_path();

    let api = Router::new()
        .route("/api/session", get(visitor::session))
        .route("/api/submit-name", post(visitor::submit_name))
        .route("/api/submit-sender", post(visitor::submit_sender))
        .route("/api/submit-feelings", post(visitor::submit_feelings))
        .route("/api/timer", get(visitor::timer))
        .route("/api/story", get(visitor::story))
        .route("/api/admin/auth", post(admin::login).delete(admin::logout))
        .route("/api/admin/responses", get(admin::responses))
        .route(
            "/api/admin/story",
            get(admin::get_story).post(admin::update_story),
        )
        .route("/api/admin/reset", post(admin::reset));

    let app = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(&base_path, api)
    };

    app.route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until a shutdown signal arrives.
pub async fn serve(settings: StorygateSettings, store: Store) -> std::io::Result<()> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let base_path = settings.server.normalized_base_path();
    let app = build_router(AppState::new(store, settings));

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, base_path = %base_path, "storygate listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn app_with_base(base_path: &str) -> Router {
        let mut settings = StorygateSettings::default();
        settings.server.base_path = base_path.to_string();
        build_router(AppState::new(Store::in_memory().unwrap(), settings))
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = app_with_base("");
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert!(parsed["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn routes_nest_under_base_path() {
        let app = app_with_base("/story/");
        assert_eq!(status_of(app.clone(), "/story/api/session").await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "/api/session").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of(app, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        assert_eq!(
            status_of(app_with_base(""), "/nonexistent").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        assert_eq!(
            status_of(app_with_base(""), "/api/submit-name").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
