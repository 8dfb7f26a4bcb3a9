//! Dealership Reviews Server
//!
//! Serves dealerships and reviews over HTTP. PostgreSQL is used when it
//! answers at startup; otherwise the process runs on an in-memory store
//! seeded from the same JSON files.

mod config;
mod handlers;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use dealer_core::{startup, ConnectionSupervisor, RecordStore, SeedDataset};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
    {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting Dealership Reviews Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, seed_dir={}, database={}",
        config.bind_address,
        config.seed_dir.display(),
        if config.database_url.is_some() {
            "configured"
        } else {
            "none"
        }
    );

    // No base dataset, no service.
    let dataset = SeedDataset::load(&config.seed_dir)
        .await
        .context("Failed to load seed data")?;

    let supervisor = ConnectionSupervisor::new(config.database_url.clone())
        .connect_timeout(config.connect_timeout())
        .max_connections(config.max_connections);
    let store = startup(supervisor, dataset).await;
    info!("Serving from {} store", store.mode());

    let app = build_router(AppState { store });

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .merge(dealer_routes())
        .merge(review_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn dealer_routes() -> Router<AppState> {
    Router::new()
        .route("/dealers", get(handlers::dealers::list))
        .route("/dealers/:id", get(handlers::dealers::get))
        .route("/dealers/state/:state", get(handlers::dealers::by_state))
        // Paths used by the browser UI
        .route("/fetchDealers", get(handlers::dealers::list))
        .route("/fetchDealer/:id", get(handlers::dealers::get))
        .route("/fetchDealers/:state", get(handlers::dealers::by_state))
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reviews",
            get(handlers::reviews::list).post(handlers::reviews::create),
        )
        .route("/reviews/dealer/:id", get(handlers::reviews::by_dealer))
        .route("/fetchReviews", get(handlers::reviews::list))
        .route("/fetchReviews/dealer/:id", get(handlers::reviews::by_dealer))
        .route("/insert_review", post(handlers::reviews::create))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use dealer_core::{BootstrapLoader, InMemoryRecordStore};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let dataset = SeedDataset::from_json(
            &json!({"dealerships": [
                {"id": 1, "state": "CA", "full_name": "Alpha Motors", "city": "Fresno"},
                {"id": 2, "state": "CA", "full_name": "Bravo Autos", "city": "Oakland"},
                {"id": 3, "state": "TX", "full_name": "Charlie Cars", "city": "Austin"}
            ]})
            .to_string(),
            &json!({"reviews": [
                {"id": 1, "name": "A", "dealership": 7, "review": "Great", "purchase": false},
                {"id": 2, "name": "B", "dealership": 7, "review": "Fine", "purchase": false},
                {"id": 3, "name": "C", "dealership": 3, "review": "Slow", "purchase": false}
            ]})
            .to_string(),
        )
        .unwrap();

        let store = InMemoryRecordStore::new();
        BootstrapLoader::new(dataset).seed(&store).await.unwrap();
        build_router(AppState {
            store: Arc::new(store),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_review(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/reviews")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_dealers_by_state() {
        let (status, body) = send(app().await, get_request("/dealers/state/CA")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let (_, body) = send(app().await, get_request("/fetchDealers/TX")).await;
        assert_eq!(body[0]["city"], json!("Austin"));
    }

    #[tokio::test]
    async fn test_missing_dealer_is_404() {
        let (status, body) = send(app().await, get_request("/dealers/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, body) = send(app().await, get_request("/fetchDealer/2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], json!("Bravo Autos"));
    }

    #[tokio::test]
    async fn test_reviews_by_dealer_rejects_non_numeric_id() {
        let (status, body) = send(app().await, get_request("/reviews/dealer/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let (status, _) = send(app().await, get_request("/reviews/dealer/seven")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_review_assigns_next_id() {
        let app = app().await;

        let (status, body) = send(
            app.clone(),
            post_review(json!({
                "name": "New Customer",
                "dealership": "7",
                "review": "Smooth purchase",
                "purchase": true,
                "purchase_date": "2024-05-01",
                "car_make": "Kia",
                "car_model": "Soul",
                "car_year": 2023
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], json!(4));
        assert_eq!(body["dealership"], json!(7));

        let (_, body) = send(app, get_request("/fetchReviews/dealer/7")).await;
        assert_eq!(body.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_post_invalid_review_is_400() {
        let (status, body) = send(
            app().await,
            post_review(json!({"name": " ", "dealership": 7, "review": "text"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_health_reports_mode_and_counts() {
        let (status, body) = send(app().await, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], json!("in_memory"));
        assert_eq!(body["dealerships"], json!(3));
        assert_eq!(body["reviews"], json!(3));
    }
}
