use crate::catalog::{CatalogClient, Normalizer, TmdbCatalogClient};
use crate::config::Config;
use crate::orchestrator::{OrchestratorHandle, OrchestratorService};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_movies;
pub mod routes_view;

pub use error::ProxyError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Upstream catalog used by the proxy routes and the view session
    pub client: Arc<dyn CatalogClient>,
    pub normalizer: Normalizer,
    /// Server-side view session (optional so the proxy can run alone)
    pub view: Option<OrchestratorHandle>,
}

impl AppContext {
    /// Build a context whose normalizer follows the TMDB config.
    pub fn new(config: Config, client: Arc<dyn CatalogClient>) -> Self {
        let normalizer = Normalizer::new(&config.tmdb.image_base_url, &config.tmdb.language);
        Self {
            config: Arc::new(config),
            client,
            normalizer,
            view: None,
        }
    }

    /// Start a view session over this context's client.
    pub fn with_view_session(mut self) -> Self {
        let handle = OrchestratorService::spawn(
            Arc::clone(&self.client),
            self.normalizer.clone(),
            self.config.view.clone().into(),
        );
        self.view = Some(handle);
        self
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let mut api = routes_movies::movie_routes();
    if ctx.view.is_some() {
        api = api.merge(routes_view::view_routes());
        tracing::info!("View session routes enabled");
    }

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server with the TMDB client described by `config`
pub async fn start_server(config: Config) -> Result<()> {
    let client = TmdbCatalogClient::from_config(&config.tmdb)?;
    start_server_with_client(config, Arc::new(client)).await
}

/// Start the HTTP server over an arbitrary catalog client
pub async fn start_server_with_client(
    config: Config,
    client: Arc<dyn CatalogClient>,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config, client).with_view_session();
    let view = ctx.view.clone();

    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(view) = view {
        view.shutdown();
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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

    tracing::info!("Shutdown signal received");
}
