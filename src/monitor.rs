//! Access detection and alert dispatch
//!
//! `AccessMonitor::on_access` is called by the host whenever a decoy is
//! read. It logs the access, builds an `AlertEvent`, and hands it to a
//! background worker over an unbounded channel; the caller never waits on
//! the network. The worker delivers each alert through an `AlertSink` in
//! its own task, with at most `max_in_flight` deliveries outstanding;
//! alerts arriving while that limit is reached are dropped and logged.
//! Delivery failures are logged at WARN and dropped: no retry, no queue.

use crate::config::{MonitorConfig, RuntimeConfig};
use crate::error::{HoneypotError, Result};
use crate::types::AlertEvent;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock, Semaphore};

/// Destination for access alerts
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one alert to `endpoint`
    async fn deliver(&self, endpoint: &str, alert: &AlertEvent) -> Result<()>;

    /// Sink name (e.g., "http", "memory")
    fn name(&self) -> &str;
}

/// POSTs alerts as JSON over HTTP
pub struct HttpAlertSink {
    client: reqwest::Client,
}

impl HttpAlertSink {
    /// Build a sink whose requests time out per `config`
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("decoy-honeypot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HoneypotError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AlertSink for HttpAlertSink {
    async fn deliver(&self, endpoint: &str, alert: &AlertEvent) -> Result<()> {
        let response = self
            .client
            .post(endpoint)
            .json(alert)
            .send()
            .await
            .map_err(|e| HoneypotError::Delivery {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HoneypotError::Delivery {
                endpoint: endpoint.to_string(),
                reason: format!("receiver returned {}", status),
            });
        }

        tracing::debug!(endpoint, status = %status, table = %alert.table_name, "Alert delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Records alerts in memory
///
/// Useful for tests and for hosts that poll alerts instead of receiving
/// them. `failing()` builds a sink that rejects every delivery.
#[derive(Default)]
pub struct MemoryAlertSink {
    delivered: RwLock<Vec<(String, AlertEvent)>>,
    fail: bool,
}

impl MemoryAlertSink {
    /// Create an empty in-memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose deliveries always fail
    pub fn failing() -> Self {
        Self {
            delivered: RwLock::new(Vec::new()),
            fail: true,
        }
    }

    /// Delivered `(endpoint, alert)` pairs, oldest first
    pub async fn delivered(&self) -> Vec<(String, AlertEvent)> {
        self.delivered.read().await.clone()
    }

    /// Number of delivered alerts
    pub async fn count(&self) -> usize {
        self.delivered.read().await.len()
    }
}

#[async_trait]
impl AlertSink for MemoryAlertSink {
    async fn deliver(&self, endpoint: &str, alert: &AlertEvent) -> Result<()> {
        if self.fail {
            return Err(HoneypotError::Delivery {
                endpoint: endpoint.to_string(),
                reason: "memory sink configured to fail".to_string(),
            });
        }
        self.delivered
            .write()
            .await
            .push((endpoint.to_string(), alert.clone()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// An alert bound to the endpoint current at access time
struct Dispatch {
    endpoint: String,
    alert: AlertEvent,
}

/// Fire-and-forget access alerting
///
/// Cheap to clone; all clones feed the same worker.
#[derive(Clone)]
pub struct AccessMonitor {
    config: Arc<RuntimeConfig>,
    tx: mpsc::UnboundedSender<Dispatch>,
    dispatched: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl AccessMonitor {
    /// Start the delivery worker on the current tokio runtime
    ///
    /// Must be called from within a runtime. The worker runs until every
    /// clone of the monitor is dropped. Uses the default in-flight limit.
    pub fn spawn(config: Arc<RuntimeConfig>, sink: Arc<dyn AlertSink>) -> Self {
        Self::spawn_with_limit(config, sink, MonitorConfig::default().max_in_flight)
    }

    /// Start the delivery worker with at most `max_in_flight` concurrent
    /// deliveries (minimum 1)
    pub fn spawn_with_limit(
        config: Arc<RuntimeConfig>,
        sink: Arc<dyn AlertSink>,
        max_in_flight: usize,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let dropped = Arc::new(AtomicU64::new(0));
        let limit = Arc::new(Semaphore::new(max_in_flight.max(1)));
        tokio::spawn(run_worker(rx, sink, limit, Arc::clone(&dropped)));
        Self {
            config,
            tx,
            dispatched: Arc::new(AtomicU64::new(0)),
            dropped,
        }
    }

    /// Start a monitor that POSTs alerts over HTTP
    pub fn spawn_http(config: Arc<RuntimeConfig>, monitor: &MonitorConfig) -> Result<Self> {
        let sink = HttpAlertSink::new(monitor)?;
        Ok(Self::spawn_with_limit(
            config,
            Arc::new(sink),
            monitor.max_in_flight,
        ))
    }

    /// Record an access to `table_name` and dispatch an alert
    ///
    /// Never fails and never blocks on I/O; missing identity fields are
    /// reported as `"unknown"`.
    pub fn on_access(&self, table_name: &str, user_name: Option<&str>, client_addr: Option<&str>) {
        let alert = AlertEvent::new(table_name, user_name, client_addr);

        tracing::warn!(
            table = %alert.table_name,
            user = %alert.user_name,
            client = %alert.client_addr,
            "HONEYPOT ACCESSED"
        );

        let dispatch = Dispatch {
            endpoint: self.config.alert_endpoint(),
            alert,
        };

        if let Err(e) = self.tx.send(dispatch) {
            tracing::warn!(
                table = %e.0.alert.table_name,
                "Alert worker stopped, alert dropped"
            );
            return;
        }
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Alerts handed to the worker so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Alerts dropped because the in-flight limit was reached
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Dispatch>,
    sink: Arc<dyn AlertSink>,
    limit: Arc<Semaphore>,
    dropped: Arc<AtomicU64>,
) {
    tracing::debug!(sink = sink.name(), "Alert worker started");

    while let Some(dispatch) = rx.recv().await {
        let permit = match Arc::clone(&limit).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    table = %dispatch.alert.table_name,
                    endpoint = %dispatch.endpoint,
                    "Too many alerts in flight, alert dropped"
                );
                continue;
            }
        };

        let sink = Arc::clone(&sink);
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = sink.deliver(&dispatch.endpoint, &dispatch.alert).await {
                tracing::warn!(
                    table = %dispatch.alert.table_name,
                    endpoint = %dispatch.endpoint,
                    error = %e,
                    "Failed to send honeypot alert"
                );
            }
        });
    }

    tracing::debug!("Alert worker stopped");
}
