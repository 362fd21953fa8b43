//! Web server module
//!
//! Serves the form page and the JSON API:
//!
//! - `GET /` form page, `GET /static/*` its styles and script
//! - `POST /api/improve-text` rewrite a free-text field
//! - `POST /api/submit-form` persist a submission
//! - `GET /logs` dump the aggregate log
//! - `GET /api/status` liveness

pub mod http;
pub mod page;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::improver::{Improver, RuleBasedImprover};
use crate::store::SubmissionStore;

pub use page::FormPage;

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<SubmissionStore>,
    pub improver: Arc<dyn Improver>,
    pub page: Arc<FormPage>,
    pub max_body_bytes: usize,
}

impl ServerState {
    /// Build state from configuration, creating the logs directory
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = SubmissionStore::open(&config.storage.logs_dir)
            .context("Failed to open submission store")?;

        Ok(Self {
            store: Arc::new(store),
            improver: Arc::new(RuleBasedImprover),
            page: FormPage::load(),
            max_body_bytes: config.server.max_body_bytes,
        })
    }
}

/// Build the application router
pub fn router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(page::index_page))
        .route("/static/styles.css", get(page::styles))
        .route("/static/script.js", get(page::script))
        .route("/api/improve-text", post(http::improve_text_handler))
        .route("/api/submit-form", post(http::submit_form_handler))
        .route("/api/status", get(http::status_handler))
        .route("/logs", get(http::logs_handler))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server and run until Ctrl+C or SIGTERM
pub async fn start(config: Config) -> Result<()> {
    let state = ServerState::from_config(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    let app = router(state);

    info!("Submissions are stored in {}", config.storage.logs_dir.display());
    info!("Binding to {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
