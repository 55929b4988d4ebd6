//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let api_routes = Router::new()
        // Interview sessions
        .route("/interviews", post(handlers::interview::create_interview))
        .route(
            "/interviews/my-interviews",
            get(handlers::interview::list_my_interviews),
        )
        .route(
            "/interviews/admin/all",
            get(handlers::interview::list_all_interviews),
        )
        .route(
            "/interviews/{id}",
            get(handlers::interview::get_interview).delete(handlers::interview::delete_interview),
        )
        .route(
            "/interviews/{id}/messages",
            get(handlers::interview::list_messages),
        )
        .route(
            "/interviews/{id}/messages/add",
            post(handlers::interview::add_message),
        )
        .route(
            "/interviews/{id}/start",
            post(handlers::interview::start_interview),
        )
        .route("/interviews/{id}/end", post(handlers::interview::end_interview))
        .route(
            "/interviews/{id}/response",
            post(handlers::interview::respond),
        )
        .route("/interviews/{id}/time", post(handlers::interview::update_time))
        .route(
            "/interviews/{id}/time-running-out",
            post(handlers::interview::time_running_out),
        )
        // Feedback
        .route(
            "/interviews/{id}/feedback",
            get(handlers::feedback::get_feedback).post(handlers::feedback::generate_feedback),
        )
        .route(
            "/feedback/my-feedbacks",
            get(handlers::feedback::list_my_feedback),
        )
        // Realtime gateway
        .route("/interviews/ws/{id}", get(handlers::ws::interview_ws))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins; an empty list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// GET /health - liveness plus a database round-trip (no auth required).
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool.reader).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Health check database probe failed");
            "unavailable"
        }
    };
    let status = if database == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if database == "ok" { "ok" } else { "degraded" },
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_state;

    #[tokio::test]
    async fn test_health_check() {
        let (state, _dir) = test_state(&[]).await;
        let (status, Json(body)) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "ok");
    }

    #[tokio::test]
    async fn test_router_builds() {
        let (state, _dir) = test_state(&[]).await;
        let _router = build_router(state);
    }

    #[test]
    fn test_cors_with_origins() {
        let _layer = cors_layer(&["http://localhost:5173".to_string(), "bad\norigin".to_string()]);
    }
}
