//! Newline-delimited JSON journal of received alerts

use crate::error::{HoneypotError, Result};
use crate::types::AlertEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One journaled alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// RFC 3339 time the receiver accepted the alert
    pub received_at: String,

    #[serde(flatten)]
    pub alert: AlertEvent,
}

/// Summary counters over the whole journal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStats {
    pub total: usize,
    pub unique_users: usize,
    pub unique_tables: usize,
}

/// Append-only alert journal
///
/// Appends are serialized through a lock so concurrent requests never
/// interleave lines. Lines that fail to parse are skipped on read.
pub struct AlertJournal {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AlertJournal {
    /// Journal at `path`; the file is created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Journal file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry
    pub async fn append(&self, entry: &JournalEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                HoneypotError::Journal(format!(
                    "Failed to create journal directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                HoneypotError::Journal(format!(
                    "Failed to open journal {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        file.write_all(&line).await.map_err(|e| {
            HoneypotError::Journal(format!(
                "Failed to write journal {}: {}",
                self.path.display(),
                e
            ))
        })?;
        file.flush().await.map_err(|e| {
            HoneypotError::Journal(format!(
                "Failed to flush journal {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// All readable entries, oldest first
    pub async fn entries(&self) -> Result<Vec<JournalEntry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HoneypotError::Journal(format!(
                    "Failed to read journal {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let entries: Vec<JournalEntry> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable journal line");
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    /// The last `limit` entries, oldest first
    pub async fn recent(&self, limit: usize) -> Result<Vec<JournalEntry>> {
        let mut entries = self.entries().await?;
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        Ok(entries)
    }

    /// Totals and distinct users/tables
    pub async fn stats(&self) -> Result<AlertStats> {
        let entries = self.entries().await?;
        let users: HashSet<&str> = entries.iter().map(|e| e.alert.user_name.as_str()).collect();
        let tables: HashSet<&str> = entries.iter().map(|e| e.alert.table_name.as_str()).collect();

        Ok(AlertStats {
            total: entries.len(),
            unique_users: users.len(),
            unique_tables: tables.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_journal() -> (AlertJournal, PathBuf) {
        let dir = std::env::temp_dir().join(format!("honeypot-journal-{}", uuid::Uuid::new_v4()));
        let journal = AlertJournal::new(dir.join("alerts.json"));
        (journal, dir)
    }

    fn entry(table: &str, user: &str) -> JournalEntry {
        JournalEntry {
            received_at: chrono::Utc::now().to_rfc3339(),
            alert: AlertEvent::new(table, Some(user), None),
        }
    }

    #[tokio::test]
    async fn test_missing_journal_reads_empty() {
        let (journal, _dir) = temp_journal();
        assert!(journal.entries().await.unwrap().is_empty());
        assert_eq!(journal.stats().await.unwrap(), AlertStats::default());
    }

    #[tokio::test]
    async fn test_append_creates_dirs_and_reads_back() {
        let (journal, dir) = temp_journal();

        journal.append(&entry("payroll", "eve")).await.unwrap();
        journal.append(&entry("secrets", "mallory")).await.unwrap();

        let entries = journal.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].alert.table_name, "payroll");
        assert_eq!(entries[1].alert.user_name, "mallory");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_line_layout_is_flat() {
        let (journal, dir) = temp_journal();
        journal.append(&entry("payroll", "eve")).await.unwrap();

        let content = std::fs::read_to_string(journal.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["table"], "payroll");
        assert_eq!(value["user"], "eve");
        assert!(value["received_at"].is_string());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_recent_keeps_newest() {
        let (journal, dir) = temp_journal();
        for i in 0..5 {
            journal.append(&entry(&format!("t{}", i), "eve")).await.unwrap();
        }

        let recent = journal.recent(2).await.unwrap();
        let tables: Vec<&str> = recent.iter().map(|e| e.alert.table_name.as_str()).collect();
        assert_eq!(tables, vec!["t3", "t4"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_lines_skipped_and_stats() {
        let (journal, dir) = temp_journal();
        journal.append(&entry("payroll", "eve")).await.unwrap();
        {
            use std::io::Write;
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(journal.path())
                .unwrap();
            writeln!(file, "not json").unwrap();
        }
        journal.append(&entry("payroll", "mallory")).await.unwrap();
        journal.append(&entry("secrets", "eve")).await.unwrap();

        let stats = journal.stats().await.unwrap();
        assert_eq!(
            stats,
            AlertStats {
                total: 3,
                unique_users: 2,
                unique_tables: 2
            }
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
