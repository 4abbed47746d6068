//! Dual-channel result store.
//!
//! The last successful result is written to every configured channel so the
//! insights handoff survives any single channel being cleared or
//! unavailable. Writes are best-effort per channel; a failure is logged and
//! never surfaced or allowed to block the others.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::errors::AppError;

/// Storage key under which the serialized insight payload lives, in every
/// channel.
pub const INSIGHT_KEY: &str = "panchanga_data";

/// One independently writable/readable storage backend.
pub trait StorageChannel: Send + Sync {
    /// Channel name, for log lines.
    fn name(&self) -> &str;

    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;

    fn read(&self, key: &str) -> Result<Option<String>, AppError>;
}

/// Persistent channel: one file per key under a directory.
pub struct FileChannel {
    dir: PathBuf,
}

impl FileChannel {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageChannel for FileChannel {
    fn name(&self) -> &str {
        "file"
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::Storage(format!("create {}: {}", self.dir.display(), e)))?;
        std::fs::write(self.path_for(key), value)
            .map_err(|e| AppError::Storage(format!("write {}: {}", key, e)))
    }

    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("read {}: {}", key, e))),
        }
    }
}

/// Session-scoped channel: lives only as long as the process.
#[derive(Default)]
pub struct MemoryChannel {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageChannel for MemoryChannel {
    fn name(&self) -> &str {
        "session"
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Storage("session channel poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Storage("session channel poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }
}

/// An ordered list of storage channels: writes go to all of them, reads
/// return the first channel that has data.
pub struct InsightStore {
    channels: Vec<Box<dyn StorageChannel>>,
}

impl InsightStore {
    pub fn new(channels: Vec<Box<dyn StorageChannel>>) -> Self {
        Self { channels }
    }

    /// The standard pair: a persistent file channel backed by `data_dir`
    /// plus a session-scoped in-memory channel.
    pub fn standard(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(vec![
            Box::new(FileChannel::new(data_dir)),
            Box::new(MemoryChannel::new()),
        ])
    }

    /// Writes `value` to every channel. Per-channel failures are logged and
    /// swallowed; the remaining channels are still written.
    pub fn write_all(&self, key: &str, value: &str) {
        for channel in &self.channels {
            if let Err(e) = channel.write(key, value) {
                tracing::warn!("Storage channel '{}' write failed: {}", channel.name(), e);
            }
        }
    }

    /// Reads `key` from the first channel that has data. Unreadable
    /// channels are logged and skipped.
    pub fn read_first(&self, key: &str) -> Option<String> {
        for channel in &self.channels {
            match channel.read(key) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Storage channel '{}' read failed: {}", channel.name(), e);
                }
            }
        }
        None
    }
}
