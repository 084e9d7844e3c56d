//! Whole-document persistence: load everything, save everything.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, info};
use safetynet_alerts::parse_snapshot_str;
use safetynet_core::{AlertsError, DataSnapshot, Result};

/// Source of the data document. Every call works on a full snapshot.
pub trait SnapshotStore {
    fn load(&self) -> Result<DataSnapshot>;
    fn save(&self, snapshot: &DataSnapshot) -> Result<()>;
}

/// JSON file on disk, rewritten in full on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<DataSnapshot> {
        let document = fs::read_to_string(&self.path)?;
        let snapshot = parse_snapshot_str(&document)?;
        debug!(
            "loaded {}: {} persons, {} firestations, {} medical records",
            self.path.display(),
            snapshot.persons.len(),
            snapshot.firestations.len(),
            snapshot.medicalrecords.len()
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &DataSnapshot) -> Result<()> {
        let document = serde_json::to_string_pretty(snapshot)
            .map_err(|err| AlertsError::Parse(err.to_string()))?;

        // The target is only replaced once the staged copy is fully written.
        let staging = self.staging_path();
        fs::write(&staging, document)?;
        fs::rename(&staging, &self.path).inspect_err(|_| {
            let _ = fs::remove_file(&staging);
        })?;

        info!("saved {}", self.path.display());
        Ok(())
    }
}

/// In-process store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<DataSnapshot>,
}

impl MemoryStore {
    pub fn new(snapshot: DataSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    pub fn into_inner(self) -> DataSnapshot {
        self.snapshot
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<DataSnapshot> {
        Ok(self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, snapshot: &DataSnapshot) -> Result<()> {
        *self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        Ok(())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load(&self) -> Result<DataSnapshot> {
        (**self).load()
    }

    fn save(&self, snapshot: &DataSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }
}
