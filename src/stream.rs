//! Unbounded decoy row streams
//!
//! A stream is a lazy sequence of `GeneratedRecord`s driven by a cursor
//! of `(start_id, emitted)`. Each pull takes one `StreamConfig` snapshot
//! and, in order: stops if the row cap is reached, sleeps the per-row
//! delay, derives the id, and emits the row. Nothing is buffered, so
//! dropping the stream releases everything and a new stream always
//! starts a fresh cursor.

use crate::config::{RuntimeConfig, StreamConfig};
use crate::pattern::{self, lcg_step};
use crate::types::{DataCategory, GeneratedRecord};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

/// Boxed stream of decoy rows
pub type RowStream = BoxStream<'static, GeneratedRecord>;

/// Position within one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCursor {
    start_id: i64,
    emitted: u64,
}

impl RowCursor {
    /// Cursor positioned at `start_id` with nothing emitted
    pub fn new(start_id: i64) -> Self {
        Self {
            start_id,
            emitted: 0,
        }
    }

    /// Rows emitted so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Id of the next row under `config`
    pub fn next_id(&self, config: &StreamConfig) -> i64 {
        let id = self.start_id.wrapping_add(self.emitted as i64);
        if config.randomize {
            lcg_step(id)
        } else {
            id
        }
    }

    fn advance(&mut self) {
        self.emitted += 1;
    }
}

/// Produces decoy row streams under the shared `RuntimeConfig`
#[derive(Clone)]
pub struct RowStreamEngine {
    config: Arc<RuntimeConfig>,
}

impl RowStreamEngine {
    /// Create an engine reading settings from `config`
    pub fn new(config: Arc<RuntimeConfig>) -> Self {
        Self { config }
    }

    /// Shared runtime configuration
    pub fn config(&self) -> &Arc<RuntimeConfig> {
        &self.config
    }

    /// Stream rows starting at `start_id`
    ///
    /// Infinite unless the current `max_rows_per_query` caps it. The
    /// config is consulted on every pull, not at construction. Once ended
    /// the stream stays ended.
    pub fn stream_rows(&self, start_id: i64) -> RowStream {
        let config = Arc::clone(&self.config);

        tracing::debug!(start_id, "Row stream opened");

        stream::unfold(RowCursor::new(start_id), move |mut cursor| {
            let config = Arc::clone(&config);
            async move {
                let snapshot = config.stream_config();
                if snapshot.is_exhausted(cursor.emitted()) {
                    tracing::debug!(start_id, rows = cursor.emitted(), "Row stream exhausted");
                    return None;
                }

                if let Some(delay) = snapshot.row_delay() {
                    tokio::time::sleep(delay).await;
                }

                let id = cursor.next_id(&snapshot);
                let record = GeneratedRecord::new(id, pattern::generate(id, DataCategory::Mixed));
                cursor.advance();
                Some((record, cursor))
            }
        })
        .fuse()
        .boxed()
    }
}
