use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::actions;
use crate::config::AppConfig;
use crate::db::PgPool;
use crate::elevation::{ArcGisElevationClient, ElevationService};
use crate::metrics::render_metrics;
use crate::recommendations::{CohereClient, RecommendationEngine};

// App state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub elevation: ElevationService,
    pub recommender: Arc<dyn RecommendationEngine>,
    /// Present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the ArcGIS and Cohere clients from configuration
    pub fn from_config(
        pool: PgPool,
        config: AppConfig,
        http: reqwest::Client,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let elevation = ElevationService::new(
            Arc::new(ArcGisElevationClient::new(http.clone(), &config.arcgis)),
            config.arcgis.batch_size,
        );
        let recommender: Arc<dyn RecommendationEngine> =
            Arc::new(CohereClient::new(http, config.cohere.clone()));

        Self {
            pool,
            config: Arc::new(config),
            elevation,
            recommender,
            metrics,
        }
    }
}

// Middleware for request logging with correlation ID
async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();
    let start_time = Instant::now();

    info!("Started {} {} [{}]", method, path, request_id);

    let response = next.run(request).await;
    let duration = start_time.elapsed();
    let status = response.status();

    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method.to_string())
        .record(duration.as_secs_f64());

    if status.is_server_error() {
        report_server_error(&request_id, &method, &path, status);
    }

    info!(
        "Completed {} {} [{}] {} in {:.2}ms",
        method,
        path,
        request_id,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}

/// Send a 5xx response to Sentry, tagged so it can be matched to the request log
fn report_server_error(request_id: &str, method: &Method, path: &str, status: StatusCode) {
    error!(
        "{} {} [{}] failed with HTTP {}",
        method,
        path,
        request_id,
        status.as_u16()
    );

    sentry::with_scope(
        |scope| {
            scope.set_tag("request_id", request_id);
            scope.set_tag("http.method", method.as_str());
            scope.set_tag("http.route", path);
            scope.set_tag("http.status_code", status.as_u16().to_string());
        },
        || {
            sentry::capture_message(
                &format!("HTTP {} on {} {}", status.as_u16(), method, path),
                sentry::Level::Error,
            )
        },
    );
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        // Route resampling
        .route("/analyze/submit", post(actions::submit_route))
        .route("/analyze/profile", post(actions::profile_route))
        // Persistence
        .route("/data/collect", post(actions::collect_route))
        .route("/config/save", post(actions::save_config))
        // Recommendations and collaborator diagnostics
        .route("/ai/generate", post(actions::generate_recommendations))
        .route("/ai/test", get(actions::test_recommendations))
        .route("/ai/test-arcgis", get(actions::test_arcgis));

    let mut app = Router::new()
        .nest("/api", api_router)
        .route("/", get(actions::index))
        .route("/health", get(actions::health))
        .route("/metrics", get(render_metrics));

    if let Some(dir) = &state.config.frontend_dir {
        app = app.nest_service("/frontend", ServeDir::new(dir));
    }

    let request_timeout = state.config.request_timeout;

    app.fallback(actions::not_found)
        .with_state(state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive())
}

pub async fn start_web_server(interface: String, port: u16, state: AppState) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "web-server");
    });
    info!("Starting web server on {}:{}", interface, port);

    actions::init_server_start_time();

    if let Some(handle) = state.metrics.clone() {
        tokio::spawn(crate::metrics::process_metrics_task(handle));
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", interface, port)).await?;
    info!("Web server listening on http://{}:{}", interface, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
