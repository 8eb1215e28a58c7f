//! Configuration
//!
//! `RuntimeConfig` is the only shared mutable state in the crate: the
//! stream throttle/bound settings and the alert endpoint. It is created
//! once, wrapped in an `Arc`, and handed to the stream engine and the
//! access monitor at construction. Readers always get a whole-value
//! snapshot, so a row decision never mixes fields from two updates.
//!
//! `MonitorConfig` and `ReceiverConfig` are static settings fixed at
//! startup.

use crate::error::{HoneypotError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Default alert receiver address
pub const DEFAULT_ALERT_ENDPOINT: &str = "http://localhost:8080/alert";

/// Upper bound for `delay_ms_per_row`
pub const MAX_DELAY_MS: u32 = 1000;

/// Throttle and bound settings for decoy row streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Rows served per stream before end-of-stream (0 = unbounded)
    pub max_rows_per_query: u32,

    /// Sleep before each row, in milliseconds (0..=1000)
    pub delay_ms_per_row: u32,

    /// Perturb emitted ids through the LCG
    pub randomize: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_rows_per_query: 1000,
            delay_ms_per_row: 0,
            randomize: false,
        }
    }
}

impl StreamConfig {
    /// Whether a stream that already emitted `emitted` rows must stop
    pub fn is_exhausted(&self, emitted: u64) -> bool {
        self.max_rows_per_query > 0 && emitted >= u64::from(self.max_rows_per_query)
    }

    /// Per-row throttle, if any
    pub fn row_delay(&self) -> Option<Duration> {
        (self.delay_ms_per_row > 0).then(|| Duration::from_millis(u64::from(self.delay_ms_per_row)))
    }
}

/// Partial update for `StreamConfig`; `None` leaves a field unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomize: Option<bool>,
}

impl StreamConfigUpdate {
    /// Set the row cap (0 = unbounded)
    pub fn max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Set the per-row delay in milliseconds
    pub fn delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// Enable or disable id randomization
    pub fn randomize(mut self, randomize: bool) -> Self {
        self.randomize = Some(randomize);
        self
    }

    fn apply(&self, current: StreamConfig) -> StreamConfig {
        StreamConfig {
            max_rows_per_query: self.max_rows.unwrap_or(current.max_rows_per_query),
            delay_ms_per_row: self.delay_ms.unwrap_or(current.delay_ms_per_row),
            randomize: self.randomize.unwrap_or(current.randomize),
        }
    }
}

/// Process-wide runtime configuration handle
///
/// Setters take effect for subsequent reads only; rows already emitted
/// are never revisited.
#[derive(Debug)]
pub struct RuntimeConfig {
    stream: RwLock<StreamConfig>,
    alert_endpoint: RwLock<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(StreamConfig::default(), DEFAULT_ALERT_ENDPOINT)
    }
}

impl RuntimeConfig {
    /// Create a runtime config with explicit initial values
    pub fn new(stream: StreamConfig, alert_endpoint: impl Into<String>) -> Self {
        Self {
            stream: RwLock::new(stream),
            alert_endpoint: RwLock::new(alert_endpoint.into()),
        }
    }

    /// Consistent snapshot of the stream settings
    pub fn stream_config(&self) -> StreamConfig {
        *self.stream.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a partial stream update, returning the new settings
    ///
    /// An out-of-range `delay_ms` is rejected and leaves the previous
    /// settings untouched.
    pub fn set_stream_config(&self, update: StreamConfigUpdate) -> Result<StreamConfig> {
        if let Some(value) = update.delay_ms {
            if value > MAX_DELAY_MS {
                return Err(HoneypotError::InvalidDelay {
                    value,
                    max: MAX_DELAY_MS,
                });
            }
        }

        let updated = {
            let mut stream = self.stream.write().unwrap_or_else(PoisonError::into_inner);
            *stream = update.apply(*stream);
            *stream
        };

        tracing::info!(
            max_rows_per_query = updated.max_rows_per_query,
            delay_ms_per_row = updated.delay_ms_per_row,
            randomize = updated.randomize,
            "Stream config updated"
        );

        Ok(updated)
    }

    /// Current alert endpoint
    pub fn alert_endpoint(&self) -> String {
        self.alert_endpoint
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the alert endpoint
    pub fn set_alert_endpoint(&self, url: impl Into<String>) {
        let url = url.into();
        tracing::info!(url = %url, "Alert endpoint set");
        *self
            .alert_endpoint
            .write()
            .unwrap_or_else(PoisonError::into_inner) = url;
    }
}

/// Outbound alert client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Per-request timeout for alert POSTs
    pub request_timeout_secs: u64,

    /// Deliveries allowed in flight at once; alerts beyond this are dropped
    pub max_in_flight: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 5,
            max_in_flight: 64,
        }
    }
}

/// Alert receiver service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Newline-delimited JSON journal of received alerts
    pub journal_path: String,

    /// External webhook to forward each alert to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    /// Timeout for webhook forwards
    pub forward_timeout_secs: u64,

    /// Entries returned by `/api/alerts`
    pub recent_limit: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            journal_path: "honeypot_alerts.json".to_string(),
            webhook_url: None,
            forward_timeout_secs: 10,
            recent_limit: 100,
        }
    }
}

impl ReceiverConfig {
    /// `host:port` socket address string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.alert_endpoint(), DEFAULT_ALERT_ENDPOINT);
        assert_eq!(config.stream_config(), StreamConfig::default());
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let config = RuntimeConfig::default();
        config
            .set_stream_config(StreamConfigUpdate::default().max_rows(5).randomize(true))
            .unwrap();
        let updated = config
            .set_stream_config(StreamConfigUpdate::default().delay_ms(20))
            .unwrap();

        assert_eq!(updated.max_rows_per_query, 5);
        assert_eq!(updated.delay_ms_per_row, 20);
        assert!(updated.randomize);
    }

    #[test]
    fn test_invalid_delay_rejected_without_change() {
        let config = RuntimeConfig::default();
        let before = config.stream_config();

        let err = config
            .set_stream_config(StreamConfigUpdate::default().max_rows(3).delay_ms(1001))
            .unwrap_err();

        assert!(matches!(err, HoneypotError::InvalidDelay { value: 1001, max: 1000 }));
        assert_eq!(config.stream_config(), before);
    }

    #[test]
    fn test_delay_bounds_inclusive() {
        let config = RuntimeConfig::default();
        assert!(config.set_stream_config(StreamConfigUpdate::default().delay_ms(0)).is_ok());
        assert!(config.set_stream_config(StreamConfigUpdate::default().delay_ms(1000)).is_ok());
    }

    #[test]
    fn test_set_alert_endpoint_is_idempotent() {
        let config = RuntimeConfig::default();
        config.set_alert_endpoint("http://siem.internal/hooks/honeypot");
        config.set_alert_endpoint("http://siem.internal/hooks/honeypot");
        assert_eq!(config.alert_endpoint(), "http://siem.internal/hooks/honeypot");
    }

    #[test]
    fn test_is_exhausted() {
        let bounded = StreamConfig {
            max_rows_per_query: 3,
            ..Default::default()
        };
        assert!(!bounded.is_exhausted(2));
        assert!(bounded.is_exhausted(3));

        let unbounded = StreamConfig {
            max_rows_per_query: 0,
            ..Default::default()
        };
        assert!(!unbounded.is_exhausted(u64::MAX));
    }

    #[test]
    fn test_receiver_config_from_partial_json() {
        let config: ReceiverConfig = serde_json::from_str(r#"{"port": 9090}"#).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.recent_limit, 100);
        assert_eq!(config.bind_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_monitor_config_defaults() {
        let config: MonitorConfig = serde_json::from_str(r#"{"request_timeout_secs": 2}"#).unwrap();
        assert_eq!(config.request_timeout_secs, 2);
        assert_eq!(config.max_in_flight, 64);
    }
}
