//! # decoy-honeypot
//!
//! Decoy tables that look like they hold sensitive records, and alerts
//! whenever anyone reads them.
//!
//! ## Overview
//!
//! `decoy-honeypot` provides the pieces a database-like host calls into:
//! a deterministic generator of plausible fake secrets, an unbounded
//! throttled row stream, and fire-and-forget access alerting.
//!
//! ## Quick Start
//!
//! ```rust
//! use decoy_honeypot::{generate, DataCategory};
//!
//! assert_eq!(generate(123, DataCategory::Ssn), "321-12-0000");
//! ```
//!
//! ```rust,no_run
//! use decoy_honeypot::{AccessMonitor, MonitorConfig, RowStreamEngine, RuntimeConfig};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! # async fn example() -> decoy_honeypot::Result<()> {
//! let config = Arc::new(RuntimeConfig::default());
//! let monitor = AccessMonitor::spawn_http(config.clone(), &MonitorConfig::default())?;
//! let engine = RowStreamEngine::new(config);
//!
//! monitor.on_access("customer_secrets", Some("mallory"), None);
//! let rows: Vec<_> = engine.stream_rows(6).take(10).collect().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **pattern** — pure `(seed, category)` → fake value generators
//! - **stream** — `RowStreamEngine`, lazy decoy rows under `StreamConfig`
//! - **monitor** — `AccessMonitor` and the `AlertSink` trait
//! - **catalog** — `DecoyCatalog`, an in-process reference host
//! - **receiver** — HTTP service that journals incoming alerts
//! - **config** — `RuntimeConfig` shared handle and static settings

pub mod catalog;
pub mod config;
pub mod error;
pub mod monitor;
pub mod pattern;
pub mod receiver;
pub mod stream;
pub mod types;

// Re-export core types
pub use catalog::{DecoyCatalog, DecoyInfo, DecoyKind};
pub use config::{
    MonitorConfig, ReceiverConfig, RuntimeConfig, StreamConfig, StreamConfigUpdate,
    DEFAULT_ALERT_ENDPOINT,
};
pub use error::{HoneypotError, Result};
pub use monitor::{AccessMonitor, AlertSink, HttpAlertSink, MemoryAlertSink};
pub use pattern::generate;
pub use stream::{RowCursor, RowStream, RowStreamEngine};
pub use types::{AccessIdentity, AlertEvent, DataCategory, GeneratedRecord};
