use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pedagio_rs::{Credentials, PedagioClient, TollVoucher, cnpj, format};

/// Server configuration
struct ServerConfig {
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        }
    }
}

/// Application state shared across all requests
#[derive(Clone)]
struct AppState {
    client: Arc<PedagioClient>,
    metrics: Arc<Metrics>,
}

/// Server metrics
struct Metrics {
    total_requests: AtomicU64,
    requests_in_flight: AtomicU64,
    start_time: Instant,
}

/// RAII guard for tracking in-flight requests
struct RequestGuard<'a>(&'a AtomicU64);

impl<'a> Drop for RequestGuard<'a> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Read configuration from environment
    let config = ServerConfig::from_env();
    let credentials = Credentials::from_env()?;

    let client = Arc::new(PedagioClient::new(credentials).context("Failed to build API client")?);

    // Build Axum app with routes
    let app = build_app(client);

    // Bind server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Build the Axum application with routes and middleware
fn build_app(client: Arc<PedagioClient>) -> Router {
    let metrics = Arc::new(Metrics {
        total_requests: AtomicU64::new(0),
        requests_in_flight: AtomicU64::new(0),
        start_time: Instant::now(),
    });

    let state = AppState { client, metrics };

    Router::new()
        // Web form
        .route("/", get(form_page))
        .route("/consulta", post(consulta_form))
        // Health check
        .route("/health", get(health_check))
        // API routes
        .route("/api/consulta", post(consulta_json))
        .route("/api/metrics", get(get_metrics))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Form page: CNPJ selector plus the transport document field
async fn form_page() -> Html<String> {
    Html(render_page(None, None))
}

#[derive(Deserialize)]
struct ConsultaForm {
    cnpj: String,
    doc_transporte: String,
}

/// Form submission: runs the token + query flow and renders the result
/// inline. Each submission is a pure function of (cnpj, doc_transporte).
async fn consulta_form(
    State(state): State<AppState>,
    Form(form): Form<ConsultaForm>,
) -> Html<String> {
    state.metrics.total_requests.fetch_add(1, Ordering::Relaxed);
    state
        .metrics
        .requests_in_flight
        .fetch_add(1, Ordering::Relaxed);
    let _guard = RequestGuard(&state.metrics.requests_in_flight);

    let cnpj_value = form.cnpj.trim();
    let doc_transporte = form.doc_transporte.trim();

    if cnpj_value.is_empty() || doc_transporte.is_empty() {
        return Html(render_page(
            None,
            Some("Por favor, preencha todos os campos."),
        ));
    }
    if !cnpj::is_allowed(cnpj_value) {
        return Html(render_page(None, Some("CNPJ não autorizado.")));
    }

    tracing::info!(cnpj = cnpj_value, doc_transporte, "Form lookup");

    match state.client.lookup(cnpj_value, doc_transporte).await {
        Ok(voucher) => Html(render_page(Some(&voucher), None)),
        Err(e) => {
            tracing::error!("Lookup error: {}", e);
            Html(render_page(None, Some(&format!("{}", e))))
        }
    }
}

/// JSON API variant of the lookup
async fn consulta_json(
    State(state): State<AppState>,
    Json(request): Json<ConsultaRequest>,
) -> Result<Json<ConsultaResponse>, ApiError> {
    state.metrics.total_requests.fetch_add(1, Ordering::Relaxed);
    state
        .metrics
        .requests_in_flight
        .fetch_add(1, Ordering::Relaxed);
    let _guard = RequestGuard(&state.metrics.requests_in_flight);

    let cnpj_value = request.cnpj.trim();
    let doc_transporte = request.doc_transporte.trim();

    if doc_transporte.is_empty() {
        return Err(ApiError::BadRequest(
            "doc_transporte cannot be empty".to_string(),
        ));
    }
    if !cnpj::is_allowed(cnpj_value) {
        return Err(ApiError::BadRequest(format!(
            "cnpj {} is not in the authorized list",
            cnpj_value
        )));
    }

    tracing::info!(cnpj = cnpj_value, doc_transporte, "API lookup");

    let voucher = state
        .client
        .lookup(cnpj_value, doc_transporte)
        .await
        .map_err(|e| {
            tracing::error!("Lookup error: {}", e);
            ApiError::InternalError(e.to_string())
        })?;

    Ok(Json(ConsultaResponse {
        success: true,
        data: voucher,
    }))
}

#[derive(Deserialize)]
struct ConsultaRequest {
    cnpj: String,
    doc_transporte: String,
}

#[derive(Serialize)]
struct ConsultaResponse {
    success: bool,
    data: TollVoucher,
}

/// Get server metrics
async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        total_requests: state.metrics.total_requests.load(Ordering::Relaxed),
        requests_in_flight: state.metrics.requests_in_flight.load(Ordering::Relaxed),
        uptime_seconds: state.metrics.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct MetricsResponse {
    total_requests: u64,
    requests_in_flight: u64,
    uptime_seconds: u64,
}

/// Render the full page: form on top, then the result fragment or an
/// inline error
fn render_page(voucher: Option<&TollVoucher>, error: Option<&str>) -> String {
    let options: String = cnpj::ALLOWED
        .iter()
        .map(|c| format!("      <option value=\"{c}\">{c}</option>\n"))
        .collect();

    let body = match (voucher, error) {
        (Some(v), _) => format::render_result(v),
        (None, Some(message)) => format!(
            "<p class=\"erro\">{}</p>",
            format::escape_html(message)
        ),
        (None, None) => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>Consulta de Pedágio - Braskem</title>
  <style>
    body {{ font-family: Arial, sans-serif; max-width: 720px; margin: 2em auto; }}
    .resumo {{ display: flex; gap: 2em; background: #f8f9fa; padding: 20px; border-radius: 8px; text-align: center; }}
    .rotulo {{ color: black; font-weight: bold; }}
    .valor {{ color: #0056b3; font-weight: bold; }}
    .detalhes {{ margin-top: 1em; }}
    .erro {{ color: #b30000; font-weight: bold; }}
    label {{ display: block; margin-top: 1em; }}
  </style>
</head>
<body>
  <h1>Consulta de Pedágio - Braskem</h1>
  <form method="post" action="/consulta">
    <label for="cnpj">Selecione o CNPJ</label>
    <select id="cnpj" name="cnpj">
{options}    </select>
    <label for="doc_transporte">DOC_TRANSPORTE</label>
    <input id="doc_transporte" name="doc_transporte" type="text">
    <button type="submit">Consultar</button>
  </form>
{body}
</body>
</html>"#
    )
}

/// API error types
enum ApiError {
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}
