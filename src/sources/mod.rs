//! Snapshot sources: the remote tier and the on-disk cache tier.

mod cache;
#[cfg(feature = "remote")]
mod http;
mod snapshot_source;

pub use cache::{CACHE_DIR_NAME, CACHE_FILE_NAME, CachePersister, default_cache_path};
#[cfg(feature = "remote")]
pub use http::{HttpSource, HttpSourceBuilder};
pub use snapshot_source::{SnapshotSource, decode_snapshot};
