//! File-backed map store

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::MapOrigin;
use crate::map::{BoundarySegment, MapData, MapObject, MapStore, StoreError, StoreResult};

/// Summary handed to reload listeners
#[derive(Debug, Clone, PartialEq)]
pub struct MapReloaded {
    pub identity: PathBuf,
    pub object_count: usize,
    pub segment_count: usize,
    pub has_origin: bool,
}

/// Callback invoked after every successful reload
pub type ReloadCallback = Box<dyn Fn(&MapReloaded) + Send>;

/// Map store persisting [`MapData`] as JSON
#[derive(Default)]
pub struct JsonMapStore {
    path: Option<PathBuf>,
    data: MapData,
    locked: bool,
    lock_count: u64,
    reload_listeners: Vec<ReloadCallback>,
}

impl JsonMapStore {
    /// Empty store with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the map at `path` and bind the store to it
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let mut store = Self::new();
        store.reload(path.as_ref())?;
        Ok(store)
    }

    pub fn data(&self) -> &MapData {
        &self.data
    }

    /// Number of times the lock has been taken
    pub fn lock_count(&self) -> u64 {
        self.lock_count
    }

    /// Register a listener for reloads, e.g. a map distribution service
    pub fn add_reload_listener(&mut self, callback: ReloadCallback) {
        self.reload_listeners.push(callback);
    }

    fn notify_reloaded(&self, path: &Path) {
        let event = MapReloaded {
            identity: path.to_path_buf(),
            object_count: self.data.objects.len(),
            segment_count: self.data.segments.len(),
            has_origin: self.data.origin.is_some(),
        };
        for listener in &self.reload_listeners {
            listener(&event);
        }
    }
}

impl MapStore for JsonMapStore {
    fn identity(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn origin(&self) -> Option<MapOrigin> {
        self.data.origin
    }

    fn set_origin(&mut self, origin: Option<MapOrigin>) {
        self.data.origin = origin;
    }

    fn objects(&self) -> &[MapObject] {
        &self.data.objects
    }

    fn objects_mut(&mut self) -> &mut Vec<MapObject> {
        &mut self.data.objects
    }

    fn segments(&self) -> &[BoundarySegment] {
        &self.data.segments
    }

    fn segments_mut(&mut self) -> &mut Vec<BoundarySegment> {
        &mut self.data.segments
    }

    fn lock(&mut self) -> StoreResult<()> {
        if self.locked {
            return Err(StoreError::AlreadyLocked);
        }
        self.locked = true;
        self.lock_count += 1;
        Ok(())
    }

    fn unlock(&mut self) {
        self.locked = false;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn persist(&mut self, path: &Path) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&self.data).map_err(|source| {
            StoreError::Serialization {
                path: path.to_path_buf(),
                source,
            }
        })?;

        fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Wrote map {} ({} objects, {} segments)",
            path.display(),
            self.data.objects.len(),
            self.data.segments.len()
        );
        Ok(())
    }

    fn reload(&mut self, path: &Path) -> StoreResult<()> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.data = serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
        self.path = Some(path.to_path_buf());

        info!(
            "Loaded map {} ({} objects, {} segments, origin {})",
            path.display(),
            self.data.objects.len(),
            self.data.segments.len(),
            if self.data.origin.is_some() { "set" } else { "unset" }
        );
        self.notify_reloaded(path);
        Ok(())
    }

    fn clear(&mut self) {
        self.data = MapData::default();
    }
}
