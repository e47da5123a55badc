//! Map store interface and scoped locking

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::core::MapOrigin;
use crate::map::{BoundarySegment, MapObject};

/// Map store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no backing file
    #[error("map has no file name")]
    Unidentified,
    /// Lock requested while already held
    #[error("map is already locked")]
    AlreadyLocked,
    /// Reading or writing the map file failed
    #[error("I/O error on map file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Map file content could not be encoded or decoded
    #[error("invalid map file '{}': {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for map store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Transactional map storage.
///
/// Writers bracket every read-modify-persist sequence with `lock`/`unlock`;
/// [`StoreTransaction`] does this for them.
pub trait MapStore {
    /// Backing file of the map, if any
    fn identity(&self) -> Option<&Path>;

    fn origin(&self) -> Option<MapOrigin>;

    fn set_origin(&mut self, origin: Option<MapOrigin>);

    fn objects(&self) -> &[MapObject];

    fn objects_mut(&mut self) -> &mut Vec<MapObject>;

    fn segments(&self) -> &[BoundarySegment];

    fn segments_mut(&mut self) -> &mut Vec<BoundarySegment>;

    fn lock(&mut self) -> StoreResult<()>;

    fn unlock(&mut self);

    fn is_locked(&self) -> bool;

    /// Write the current content to `path`
    fn persist(&mut self, path: &Path) -> StoreResult<()>;

    /// Replace the content with the file at `path` and bind to it
    fn reload(&mut self, path: &Path) -> StoreResult<()>;

    /// Drop all objects, segments and the origin
    fn clear(&mut self);

    fn has_origin(&self) -> bool {
        self.origin().is_some()
    }

    fn is_identified(&self) -> bool {
        self.identity().is_some_and(|path| !path.as_os_str().is_empty())
    }

    /// Persist to the backing file
    fn save(&mut self) -> StoreResult<()> {
        let path = self.identity().map(Path::to_path_buf).ok_or(StoreError::Unidentified)?;
        self.persist(&path)
    }

    /// Reload from the backing file
    fn refresh(&mut self) -> StoreResult<()> {
        let path = self.identity().map(Path::to_path_buf).ok_or(StoreError::Unidentified)?;
        self.reload(&path)
    }
}

impl<T: MapStore + ?Sized> MapStore for Box<T> {
    fn identity(&self) -> Option<&Path> {
        (**self).identity()
    }

    fn origin(&self) -> Option<MapOrigin> {
        (**self).origin()
    }

    fn set_origin(&mut self, origin: Option<MapOrigin>) {
        (**self).set_origin(origin)
    }

    fn objects(&self) -> &[MapObject] {
        (**self).objects()
    }

    fn objects_mut(&mut self) -> &mut Vec<MapObject> {
        (**self).objects_mut()
    }

    fn segments(&self) -> &[BoundarySegment] {
        (**self).segments()
    }

    fn segments_mut(&mut self) -> &mut Vec<BoundarySegment> {
        (**self).segments_mut()
    }

    fn lock(&mut self) -> StoreResult<()> {
        (**self).lock()
    }

    fn unlock(&mut self) {
        (**self).unlock()
    }

    fn is_locked(&self) -> bool {
        (**self).is_locked()
    }

    fn persist(&mut self, path: &Path) -> StoreResult<()> {
        (**self).persist(path)
    }

    fn reload(&mut self, path: &Path) -> StoreResult<()> {
        (**self).reload(path)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// Holds the store lock until dropped
pub struct StoreTransaction<'a, M: MapStore + ?Sized> {
    store: &'a mut M,
}

impl<'a, M: MapStore + ?Sized> StoreTransaction<'a, M> {
    pub fn begin(store: &'a mut M) -> StoreResult<Self> {
        store.lock()?;
        Ok(Self { store })
    }
}

impl<M: MapStore + ?Sized> Deref for StoreTransaction<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        &*self.store
    }
}

impl<M: MapStore + ?Sized> DerefMut for StoreTransaction<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut *self.store
    }
}

impl<M: MapStore + ?Sized> Drop for StoreTransaction<'_, M> {
    fn drop(&mut self) {
        self.store.unlock();
    }
}

/// Copy of a store's content, used to undo an edit that could not be saved
#[derive(Debug, Clone)]
pub struct MapSnapshot {
    origin: Option<MapOrigin>,
    objects: Vec<MapObject>,
    segments: Vec<BoundarySegment>,
}

impl MapSnapshot {
    pub fn capture<M: MapStore + ?Sized>(store: &M) -> Self {
        Self {
            origin: store.origin(),
            objects: store.objects().to_vec(),
            segments: store.segments().to_vec(),
        }
    }

    pub fn restore<M: MapStore + ?Sized>(self, store: &mut M) {
        store.set_origin(self.origin);
        *store.objects_mut() = self.objects;
        *store.segments_mut() = self.segments;
    }
}

/// Apply `change` and persist it under the store lock.
///
/// If the save fails the store content is put back the way it was, so a
/// failed edit never reaches a later save.
pub fn apply_change<M, F>(store: &mut M, change: F) -> StoreResult<()>
where
    M: MapStore + ?Sized,
    F: FnOnce(&mut M),
{
    let mut transaction = StoreTransaction::begin(store)?;
    let previous = MapSnapshot::capture(&*transaction);
    change(&mut *transaction);

    if let Err(err) = transaction.save() {
        warn!("Map could not be saved, discarding the change: {}", err);
        previous.restore(&mut *transaction);
        return Err(err);
    }
    Ok(())
}

/// [`apply_change`], then reload so observers see the committed map
pub fn commit_change<M, F>(store: &mut M, change: F) -> StoreResult<()>
where
    M: MapStore + ?Sized,
    F: FnOnce(&mut M),
{
    apply_change(store, change)?;
    store.refresh()
}
