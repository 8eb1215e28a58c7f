//! In-process decoy catalog
//!
//! A minimal reference host for the generator, stream engine, and access
//! monitor. It holds each decoy's seed rows, presents them followed by
//! the unbounded stream as one row sequence, and raises an access alert
//! on every read.

use crate::error::{HoneypotError, Result};
use crate::monitor::AccessMonitor;
use crate::pattern;
use crate::stream::{RowStream, RowStreamEngine};
use crate::types::{AccessIdentity, DataCategory, GeneratedRecord};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Seed-row count used when the requested count is out of range
pub const DEFAULT_SEED_ROWS: u32 = 5;

/// Largest accepted seed-row count
pub const MAX_SEED_ROWS: u32 = 100;

const MAX_TABLE_NAME_LEN: usize = 63;

const FIXED_ROWS: [&str; 4] = [
    "Social Security Numbers: 123-45-6789, 987-65-4321",
    "Credit Card: 4532-1234-5678-9012",
    "API Keys: sk-1234567890abcdef",
    "Passwords: admin123, password!@#",
];

/// Shape of a decoy table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DecoyKind {
    /// Four canned rows, nothing streamed
    Fixed,
    /// Generated seed rows followed by an unbounded stream
    Unbounded {
        category: DataCategory,
        seed_rows: u32,
    },
}

/// Catalog entry summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoyInfo {
    pub name: String,
    pub kind: DecoyKind,
    pub created_at: DateTime<Utc>,
}

struct DecoyTable {
    info: DecoyInfo,
    seed_rows: Arc<[GeneratedRecord]>,
}

/// Registry of provisioned decoy tables
pub struct DecoyCatalog {
    tables: RwLock<HashMap<String, DecoyTable>>,
    engine: RowStreamEngine,
    monitor: AccessMonitor,
}

impl DecoyCatalog {
    /// Create an empty catalog
    pub fn new(engine: RowStreamEngine, monitor: AccessMonitor) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            engine,
            monitor,
        }
    }

    /// Provision a fixed-size decoy with the canned rows
    pub async fn create_table(&self, name: &str) -> Result<DecoyInfo> {
        validate_table_name(name)?;
        let rows = FIXED_ROWS
            .iter()
            .zip(1..)
            .map(|(data, id)| GeneratedRecord::new(id, *data))
            .collect();
        self.insert(name, DecoyKind::Fixed, rows).await
    }

    /// Provision an unbounded decoy
    ///
    /// Seed rows `1..=seed_rows` are generated with `category`; a count
    /// outside `1..=100` falls back to 5. Reads continue with the row
    /// stream from `seed_rows + 1`.
    pub async fn create_unbounded_table(
        &self,
        name: &str,
        category: DataCategory,
        seed_rows: i64,
    ) -> Result<DecoyInfo> {
        validate_table_name(name)?;
        let seed_rows = match u32::try_from(seed_rows) {
            Ok(n) if (1..=MAX_SEED_ROWS).contains(&n) => n,
            _ => DEFAULT_SEED_ROWS,
        };
        let rows = (1..=i64::from(seed_rows))
            .map(|id| GeneratedRecord::new(id, pattern::generate(id, category)))
            .collect();
        self.insert(name, DecoyKind::Unbounded { category, seed_rows }, rows)
            .await
    }

    async fn insert(
        &self,
        name: &str,
        kind: DecoyKind,
        rows: Vec<GeneratedRecord>,
    ) -> Result<DecoyInfo> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(name) {
            return Err(HoneypotError::TableExists(name.to_string()));
        }

        let info = DecoyInfo {
            name: name.to_string(),
            kind,
            created_at: Utc::now(),
        };
        tables.insert(
            name.to_string(),
            DecoyTable {
                info: info.clone(),
                seed_rows: rows.into(),
            },
        );

        tracing::info!(table = %name, kind = ?kind, "Created honeypot table");
        Ok(info)
    }

    /// Read a decoy: raise an access alert and return its rows
    pub async fn read(&self, name: &str, identity: &AccessIdentity) -> Result<RowStream> {
        let (kind, rows) = {
            let tables = self.tables.read().await;
            let table = tables
                .get(name)
                .ok_or_else(|| HoneypotError::TableNotFound(name.to_string()))?;
            (table.info.kind, Arc::clone(&table.seed_rows))
        };

        self.monitor.on_access(
            name,
            identity.user_name.as_deref(),
            identity.client_addr.as_deref(),
        );

        let prefix = stream::iter((0..rows.len()).map(move |i| rows[i].clone()));
        Ok(match kind {
            DecoyKind::Fixed => prefix.boxed(),
            DecoyKind::Unbounded { seed_rows, .. } => prefix
                .chain(self.engine.stream_rows(i64::from(seed_rows) + 1))
                .boxed(),
        })
    }

    /// Remove a decoy
    pub async fn drop_table(&self, name: &str) -> Result<()> {
        let removed = self.tables.write().await.remove(name);
        match removed {
            Some(_) => {
                tracing::info!(table = %name, "Dropped honeypot table");
                Ok(())
            }
            None => Err(HoneypotError::TableNotFound(name.to_string())),
        }
    }

    /// Summary of one decoy
    pub async fn describe(&self, name: &str) -> Option<DecoyInfo> {
        self.tables.read().await.get(name).map(|t| t.info.clone())
    }

    /// All decoys, sorted by name
    pub async fn list_tables(&self) -> Vec<DecoyInfo> {
        let tables = self.tables.read().await;
        let mut infos: Vec<DecoyInfo> = tables.values().map(|t| t.info.clone()).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*` up to 63 characters
fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_TABLE_NAME_LEN {
        Ok(())
    } else {
        Err(HoneypotError::InvalidTableName(name.to_string()))
    }
}
