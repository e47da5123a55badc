//! Map content, storage and locking

pub mod object;
pub mod store;
pub mod json_store;

pub use object::{BoundarySegment, MapData, MapObject, MapObjectKind};
pub use store::{
    apply_change, commit_change, MapSnapshot, MapStore, StoreError, StoreResult, StoreTransaction,
};
pub use json_store::{JsonMapStore, MapReloaded, ReloadCallback};
