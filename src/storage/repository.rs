//! Generic JSON-file repository
//!
//! Every collection is kept in memory behind an `RwLock<HashMap>` and
//! written back to its own file as a whole.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApuError;

use super::file_io::{read_json, write_json_atomic};

/// An entity persisted by a [`JsonRepository`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash;

    fn record_id(&self) -> Self::Id;

    /// Name used for case-insensitive lookups
    fn label(&self) -> &str;

    /// Listing order
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.label().to_lowercase().cmp(&b.label().to_lowercase())
    }
}

/// On-disk layout of a collection file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct RecordFile<T> {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

fn default_version() -> u32 {
    1
}

impl<T> Default for RecordFile<T> {
    fn default() -> Self {
        Self {
            version: default_version(),
            records: Vec::new(),
        }
    }
}

/// Repository for one collection file
pub struct JsonRepository<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> JsonRepository<T> {
    /// Create an empty repository backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load records from disk, replacing anything in memory
    pub fn load(&self) -> Result<(), ApuError> {
        let file_data: RecordFile<T> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| ApuError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for record in file_data.records {
            data.insert(record.record_id(), record);
        }

        Ok(())
    }

    /// Write all records to disk
    pub fn save(&self) -> Result<(), ApuError> {
        let records = self.get_all()?;
        write_json_atomic(
            &self.path,
            &RecordFile {
                version: default_version(),
                records,
            },
        )
    }

    /// Get a record by ID
    pub fn get(&self, id: T::Id) -> Result<Option<T>, ApuError> {
        let data = self.read_lock()?;
        Ok(data.get(&id).cloned())
    }

    /// All records in listing order
    pub fn get_all(&self) -> Result<Vec<T>, ApuError> {
        let data = self.read_lock()?;
        let mut records: Vec<T> = data.values().cloned().collect();
        records.sort_by(T::listing_order);
        Ok(records)
    }

    /// Records matching a predicate, in listing order
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<T>, ApuError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.get_all()?.into_iter().filter(|r| predicate(r)).collect())
    }

    /// First record (in listing order) matching a predicate
    pub fn find<F>(&self, predicate: F) -> Result<Option<T>, ApuError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.get_all()?.into_iter().find(|r| predicate(r)))
    }

    /// Get a record by label (case-insensitive)
    pub fn get_by_label(&self, label: &str) -> Result<Option<T>, ApuError> {
        let wanted = label.trim().to_lowercase();
        self.find(|r| r.label().to_lowercase() == wanted)
    }

    /// Check if a label is taken, optionally ignoring one record
    pub fn label_exists(&self, label: &str, exclude_id: Option<T::Id>) -> Result<bool, ApuError> {
        let wanted = label.trim().to_lowercase();
        let data = self.read_lock()?;
        Ok(data.values().any(|r| {
            r.label().to_lowercase() == wanted && Some(r.record_id()) != exclude_id
        }))
    }

    /// Insert or replace a record
    pub fn upsert(&self, record: T) -> Result<(), ApuError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ApuError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(record.record_id(), record);
        Ok(())
    }

    /// Insert or replace a record and write the collection to disk
    ///
    /// Returns the record previously stored under the same ID. When the
    /// write fails the in-memory collection is restored; if restoring fails
    /// too, both errors are reported.
    pub fn commit(&self, record: T) -> Result<Option<T>, ApuError> {
        let id = record.record_id();
        let previous = self.get(id)?;
        self.upsert(record)?;

        if let Err(e) = self.save() {
            let restored = match &previous {
                Some(previous) => self.upsert(previous.clone()),
                None => self.delete(id).map(|_| ()),
            };
            return Err(match restored {
                Ok(()) => e,
                Err(rollback) => ApuError::Storage(format!(
                    "{}; restoring the previous copy also failed: {}",
                    e, rollback
                )),
            });
        }

        Ok(previous)
    }

    /// Remove a record, returning it if it existed
    pub fn delete(&self, id: T::Id) -> Result<Option<T>, ApuError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ApuError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    /// Number of records
    pub fn count(&self) -> Result<usize, ApuError> {
        Ok(self.read_lock()?.len())
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<T::Id, T>>, ApuError> {
        self.data
            .read()
            .map_err(|e| ApuError::Storage(format!("Failed to acquire read lock: {}", e)))
    }
}
