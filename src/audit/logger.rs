//! Append-only audit log
//!
//! One JSON object per line. Reading streams the file, so showing the tail
//! of a long log only keeps `count` entries in memory.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{ApuError, ApuResult};

use super::entry::{AuditEntry, EntityType};

/// Which entries a read should return
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    /// Prefix of the entity's display ID ("bud-1a2b")
    pub entity_id: Option<String>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.entity_type.map_or(true, |t| entry.entity_type == t)
            && self
                .entity_id
                .as_deref()
                .map_or(true, |id| entry.entity_id.starts_with(id))
    }
}

/// Audit log file handle
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry; updates that changed nothing are skipped
    ///
    /// Returns whether a line was written.
    pub fn log(&self, entry: &AuditEntry) -> ApuResult<bool> {
        if entry.is_noop() {
            return Ok(false);
        }

        let line = serde_json::to_string(entry)
            .map_err(|e| ApuError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| ApuError::Io(format!("Failed to open audit log: {}", e)))?;
        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .map_err(|e| ApuError::Io(format!("Failed to write audit entry: {}", e)))?;

        Ok(true)
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> ApuResult<Vec<AuditEntry>> {
        let mut entries = Vec::new();
        self.scan(|entry| entries.push(entry))?;
        Ok(entries)
    }

    /// The last `count` entries matching `filter`, oldest first
    pub fn read_recent(&self, count: usize, filter: &AuditFilter) -> ApuResult<Vec<AuditEntry>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut tail = VecDeque::with_capacity(count);

        self.scan(|entry| {
            if filter.matches(&entry) {
                if tail.len() == count {
                    tail.pop_front();
                }
                tail.push_back(entry);
            }
        })?;
        Ok(tail.into())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn scan<F>(&self, mut visit: F) -> ApuResult<()>
    where
        F: FnMut(AuditEntry),
    {
        if !self.log_path.exists() {
            return Ok(());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| ApuError::Io(format!("Failed to open audit log: {}", e)))?;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                ApuError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                ApuError::Json(format!("Bad audit entry at line {}: {}", index + 1, e))
            })?;
            visit(entry);
        }

        Ok(())
    }
}
