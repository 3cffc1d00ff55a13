use crate::device::DeviceClass;
use crate::error::PlaylistError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persisted catalog sizes observed by earlier sessions
pub trait CatalogStore: Send {
    fn stored_count(&self, device: DeviceClass) -> Result<Option<u32>, PlaylistError>;
    fn save_count(&mut self, device: DeviceClass, count: u32) -> Result<(), PlaylistError>;
}

fn store_key(device: DeviceClass) -> &'static str {
    match device {
        DeviceClass::Pointer => "HADC",
        DeviceClass::Touch => "HAMC",
    }
}

/// Store backed by a small JSON object on disk
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, u32>, PlaylistError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| PlaylistError::Store {
            details: format!("Failed to read {}: {}", self.path.display(), e),
        })?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| PlaylistError::Store {
            details: format!("Malformed catalog store {}: {}", self.path.display(), e),
        })
    }
}

impl CatalogStore for FileCatalogStore {
    fn stored_count(&self, device: DeviceClass) -> Result<Option<u32>, PlaylistError> {
        Ok(self.read_all()?.get(store_key(device)).copied())
    }

    fn save_count(&mut self, device: DeviceClass, count: u32) -> Result<(), PlaylistError> {
        let mut counts = self.read_all()?;
        counts.insert(store_key(device).to_string(), count);

        let rendered = serde_json::to_string_pretty(&counts).map_err(|e| PlaylistError::Store {
            details: e.to_string(),
        })?;
        fs::write(&self.path, rendered).map_err(|e| PlaylistError::Store {
            details: format!("Failed to write {}: {}", self.path.display(), e),
        })?;

        info!(
            "Saved {} catalog count: {} (key: {})",
            device.catalog_name(),
            count,
            store_key(device)
        );
        Ok(())
    }
}

/// In-memory store for tests and hosts without persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    counts: HashMap<DeviceClass, u32>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(device: DeviceClass, count: u32) -> Self {
        let mut store = Self::default();
        store.counts.insert(device, count);
        store
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn stored_count(&self, device: DeviceClass) -> Result<Option<u32>, PlaylistError> {
        Ok(self.counts.get(&device).copied())
    }

    fn save_count(&mut self, device: DeviceClass, count: u32) -> Result<(), PlaylistError> {
        debug!("Saved {} catalog count in memory: {}", device.catalog_name(), count);
        self.counts.insert(device, count);
        Ok(())
    }
}
