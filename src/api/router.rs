use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::dashboard;
use super::health;
use super::state::AppState;
use super::user;

/// Create a minimal router without state (for testing/backward compatibility)
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints (no state needed)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Account lifecycle
        .nest("/api/auth", auth::create_auth_router())
        // Authenticated account endpoints
        .nest("/api/user", user::create_user_router())
        // Dashboard data
        .nest("/api", dashboard::create_dashboard_router())
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = create_router_with_state(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signup_route_end_to_end() {
        let app = create_router_with_state(test_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/signup",
                serde_json::json!({
                    "name": "Asha",
                    "email": "asha@example.com",
                    "password": "secret123"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(payload["token"].as_str().is_some());
        assert_eq!(payload["user"]["email"], "asha@example.com");

        // Same email again comes back as a conflict envelope
        let duplicate = app
            .oneshot(json_request(
                "POST",
                "/api/auth/signup",
                serde_json::json!({
                    "name": "Asha",
                    "email": "asha@example.com",
                    "password": "secret123"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let body = to_bytes(duplicate.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["error"]["type"], "conflict_error");
    }

    #[tokio::test]
    async fn test_dashboard_routes_require_bearer_token() {
        let app = create_router_with_state(test_state());

        for uri in ["/api/weather?district=Ludhiana", "/api/news"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router_with_state(test_state());

        let response = app
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
