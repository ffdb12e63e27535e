//! Stockroom REST API
//!
//! HTTP API layer for Stockroom, built with Axum.
//!
//! # Endpoints
//!
//! ## Products
//! - `GET /api/v1/products?page&limit&sortBy&order` - Paginated listing
//! - `POST /api/v1/products` - Add a product
//! - `GET /api/v1/products/:id` - Get a product
//!
//! ## Sales
//! - `GET /api/v1/sales?page&limit&sortBy&order` - Paginated listing
//! - `POST /api/v1/sales` - Record a sale
//!
//! ## Analytics
//! - `GET /api/v1/analytics/summary`
//! - `GET /api/v1/analytics/monthly`
//! - `GET /api/v1/analytics/categories`
//! - `GET /api/v1/analytics/goals?target=N`
//!
//! ## Session
//! - `GET /api/v1/session` - Authentication state for the bearer token
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check
//! - `GET /health` - Full health status
//!
//! Everything under `/api/v1` except `/session` requires a bearer token,
//! unless guest access is enabled.

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::CurrentUser;
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    let api_routes = Router::new()
        // Product routes
        .route(
            "/products",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route("/products/:id", get(routes::products::get_product))
        // Sales routes
        .route(
            "/sales",
            get(routes::sales::list_sales).post(routes::sales::create_sale),
        )
        // Analytics routes
        .route("/analytics/summary", get(routes::analytics::summary))
        .route("/analytics/monthly", get(routes::analytics::monthly))
        .route("/analytics/categories", get(routes::analytics::categories))
        .route("/analytics/goals", get(routes::analytics::goals))
        // Session routes
        .route("/session", get(routes::session::get_session));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(shared_state)
}

/// Allow the listed origins, or any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state, config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Stockroom API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Stockroom API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, AuthResult, Identity, IdentityProvider, StaticTokenProvider};
    use crate::inventory::InventoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    const TOKEN: &str = "test-token";

    fn test_state(allow_guest: bool) -> AppState {
        let provider = StaticTokenProvider::new().with_token(
            TOKEN,
            Identity::new("alice").email("alice@example.com"),
        );
        AppState::new(InventoryStore::demo(), Arc::new(provider)).allow_guest(allow_guest)
    }

    fn create_test_app() -> Router {
        build_router(test_state(false), &ApiConfig::default())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Authorization", format!("Bearer {}", TOKEN))
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {}", TOKEN))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["products"], 12);
        assert_eq!(body["identityProvider"], "static");
    }

    #[tokio::test]
    async fn test_list_products_paged_and_sorted() {
        let response = create_test_app()
            .oneshot(get("/api/v1/products?page=1&limit=3&sortBy=price&order=descending"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["total"], 12);
        assert_eq!(body["totalPages"], 4);
        assert_eq!(body["hasNext"], true);
        let skus: Vec<&str> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["sku"].as_str().unwrap())
            .collect();
        assert_eq!(skus, vec!["MN-320", "MN-270", "DK-400"]);
    }

    #[tokio::test]
    async fn test_list_products_defaults() {
        let response = create_test_app().oneshot(get("/api/v1/products")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["items"][0]["name"], "1080p Webcam");
    }

    #[tokio::test]
    async fn test_list_products_page_past_end() {
        let response = create_test_app()
            .oneshot(get("/api/v1/products?page=9&limit=25"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_list_products_rejects_bad_pagination() {
        for uri in [
            "/api/v1/products?page=0",
            "/api/v1/products?limit=0",
            "/api/v1/products?limit=1000",
            "/api/v1/products?sortBy=secret",
            "/api/v1/products?order=sideways",
        ] {
            let response = create_test_app().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }

        let response = create_test_app()
            .oneshot(get("/api/v1/products?limit=1000"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_PAGINATION");
    }

    #[tokio::test]
    async fn test_requires_token() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/api/v1/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_token_rejected_even_with_guest() {
        let app = build_router(test_state(true), &ApiConfig::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products")
                    .header("Authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guest_access() {
        let app = build_router(test_state(true), &ApiConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/api/v1/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_product() {
        let response = create_test_app().oneshot(get("/api/v1/products/3")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["sku"], "MN-270");
        assert_eq!(body["lowStock"], true);

        let response = create_test_app().oneshot(get("/api/v1/products/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_product() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/products",
                r#"{"sku": "NEW-1", "name": "Trackball", "category": "peripherals", "price": 64.0, "quantity": 9}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["id"], 13);

        let response = app
            .oneshot(post_json(
                "/api/v1/products",
                r#"{"sku": "NEW-1", "name": "Again", "category": "x", "price": 1.0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_sale() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/sales", r#"{"productId": 1, "quantity": 2}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["revenue"], 178.0);

        let response = app
            .clone()
            .oneshot(get("/api/v1/products/1"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["quantity"], 40);

        let response = app
            .oneshot(post_json("/api/v1/sales", r#"{"productId": 9, "quantity": 50}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_sales_sorted() {
        let response = create_test_app()
            .oneshot(get("/api/v1/sales?sortBy=soldAt&order=desc&limit=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 12);
        assert_eq!(body["items"][0]["productId"], 12);

        // Response fields use the same names as the sort keys
        let sale = &body["items"][0];
        assert!(sale["soldAt"].is_string());
        assert!(sale.get("sold_at").is_none());
        assert!(sale["unitPrice"].is_number());
        assert_eq!(body["hasPrev"], false);
    }

    #[tokio::test]
    async fn test_analytics() {
        let app = create_test_app();

        let response = app.clone().oneshot(get("/api/v1/analytics/monthly")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 4);
        assert_eq!(body[0]["month"], "2024-01");

        let response = app.clone().oneshot(get("/api/v1/analytics/summary")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["productCount"], 12);
        assert_eq!(body["salesCount"], 12);

        let response = app.clone().oneshot(get("/api/v1/analytics/categories")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get("/api/v1/analytics/goals?target=100&metric=units"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["achieved"], 73.0);
        assert_eq!(body["percent"], 73.0);
        assert_eq!(body["reached"], false);

        let response = app
            .oneshot(get("/api/v1/analytics/goals?target=-5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_states() {
        let response = create_test_app().oneshot(get("/api/v1/session")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["state"]["status"], "ready");
        assert_eq!(body["effectiveIdentity"]["userId"], "alice");

        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/session")
                    .header("Authorization", "Bearer nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["state"]["status"], "failed");
        assert!(body["effectiveIdentity"].is_null());

        let response = build_router(test_state(true), &ApiConfig::default())
            .oneshot(Request::builder().uri("/api/v1/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["state"]["status"], "unauthenticated");
        assert_eq!(body["effectiveIdentity"]["userId"], "guest");
    }

    struct UnreachableProvider;

    #[async_trait::async_trait]
    impl IdentityProvider for UnreachableProvider {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn verify(&self, _token: &str) -> AuthResult<Identity> {
            Err(AuthError::Unavailable)
        }
    }

    #[tokio::test]
    async fn test_session_provider_outage() {
        let state = AppState::new(InventoryStore::demo(), Arc::new(UnreachableProvider));
        let app = build_router(state, &ApiConfig::default());

        let response = app.clone().oneshot(get("/api/v1/session")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "IDENTITY_PROVIDER_UNAVAILABLE");
        assert!(body["requestId"].is_string());

        // Without a token the provider is never consulted
        let response = app
            .oneshot(Request::builder().uri("/api/v1/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
