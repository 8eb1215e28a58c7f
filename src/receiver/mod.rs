//! Alert receiver service
//!
//! The default destination of the alert endpoint. Accepts access alerts
//! over HTTP, journals them, and optionally forwards each one to an
//! external webhook.
//!
//! ## Endpoint Map
//!
//! | Method | Path          | Description                              |
//! |--------|---------------|------------------------------------------|
//! | GET    | `/health`     | Liveness probe                           |
//! | POST   | `/alert`      | Receive one access alert                 |
//! | GET    | `/api/alerts` | Most recent journaled alerts             |
//! | GET    | `/api/stats`  | Total alerts, distinct users and tables  |

mod journal;

pub use journal::{AlertJournal, AlertStats, JournalEntry};

use crate::config::ReceiverConfig;
use crate::error::{HoneypotError, Result};
use crate::types::AlertEvent;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Forwards received alerts to an external webhook, fire-and-forget
pub struct WebhookForwarder {
    client: reqwest::Client,
    url: String,
}

impl WebhookForwarder {
    /// Create a forwarder whose requests time out after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HoneypotError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Webhook URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `entry` in the background; outcome is only logged
    pub fn forward(&self, entry: JournalEntry) {
        let request = self.client.post(&self.url).json(&entry);
        let url = self.url.clone();
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) => {
                    tracing::info!(
                        url = %url,
                        status = %response.status(),
                        "Alert forwarded to webhook"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        url = %url,
                        error = %e,
                        "Failed to forward alert to webhook"
                    );
                }
            }
        });
    }
}

/// Shared receiver state
#[derive(Clone)]
pub struct ReceiverState {
    pub journal: Arc<AlertJournal>,
    pub forwarder: Option<Arc<WebhookForwarder>>,
    pub recent_limit: usize,
}

impl ReceiverState {
    /// Build state from configuration
    pub fn from_config(config: &ReceiverConfig) -> Result<Self> {
        let forwarder = config
            .webhook_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| {
                WebhookForwarder::new(url, Duration::from_secs(config.forward_timeout_secs))
                    .map(Arc::new)
            })
            .transpose()?;

        Ok(Self {
            journal: Arc::new(AlertJournal::new(&config.journal_path)),
            forwarder,
            recent_limit: config.recent_limit,
        })
    }
}

/// Build the receiver `Router`
pub fn router(state: ReceiverState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/alert", post(receive_alert))
        .route("/api/alerts", get(list_alerts))
        .route("/api/stats", get(alert_stats))
        .fallback(not_found)
        .with_state(state)
}

/// Bind `config.bind_addr()` and serve until `shutdown` resolves
pub async fn serve(
    config: &ReceiverConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let state = ReceiverState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .map_err(|e| HoneypotError::Http(format!("Failed to bind {}: {}", config.bind_addr(), e)))?;

    tracing::info!(addr = %config.bind_addr(), "Honeypot receiver listening");
    tracing::info!(journal = %state.journal.path().display(), "Alert journal");
    if let Some(forwarder) = &state.forwarder {
        tracing::info!(url = %forwarder.url(), "Forwarding alerts to webhook");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| HoneypotError::Http(e.to_string()))?;

    tracing::info!("Honeypot receiver stopped");
    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({"status": "healthy", "service": "honeypot_receiver"}))
}

async fn receive_alert(
    State(state): State<ReceiverState>,
    payload: std::result::Result<Json<AlertEvent>, JsonRejection>,
) -> impl IntoResponse {
    let mut alert = match payload {
        Ok(Json(alert)) => alert,
        Err(e) => {
            tracing::error!(error = %e, "Error processing alert");
            return internal_error();
        }
    };

    let received_at = Utc::now().to_rfc3339();
    if alert.timestamp.is_empty() {
        alert.timestamp = received_at.clone();
    }

    tracing::warn!(
        table = %alert.table_name,
        user = %alert.user_name,
        client = %alert.client_addr,
        timestamp = %alert.timestamp,
        "HONEYPOT ALERT"
    );

    let entry = JournalEntry { received_at, alert };

    if let Err(e) = state.journal.append(&entry).await {
        tracing::error!(error = %e, "Failed to save alert");
        return internal_error();
    }

    if let Some(forwarder) = &state.forwarder {
        forwarder.forward(entry);
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({"status": "alert received"})),
    )
}

async fn list_alerts(State(state): State<ReceiverState>) -> impl IntoResponse {
    match state.journal.recent(state.recent_limit).await {
        Ok(entries) => (StatusCode::OK, Json(serde_json::json!(entries))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read alerts");
            (StatusCode::OK, Json(serde_json::json!([])))
        }
    }
}

async fn alert_stats(State(state): State<ReceiverState>) -> impl IntoResponse {
    match state.journal.stats().await {
        Ok(stats) => (StatusCode::OK, Json(serde_json::json!(stats))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to compute alert stats");
            internal_error()
        }
    }
}

fn internal_error() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Internal server error"})),
    )
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Not found"})),
    )
}
