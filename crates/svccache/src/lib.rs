//! # svccache
//!
//! In-memory caching and search for service catalogs.
//!
//! ## Architecture
//! - **BoundedCache**: slab-backed doubly-linked LRU list + AHash map, O(1) get/put/evict
//! - **SharedCache**: `parking_lot` guarded handle with hit/miss statistics
//! - **IndexedSearch**: lowercase substring index with a bounded query cache
//! - **LatencyWindow**: last N search durations for average latency reporting

#![warn(missing_docs)]

mod latency;
mod lru;
mod search;
mod shared;
mod stats;

pub use latency::{LatencyWindow, DEFAULT_WINDOW};
pub use lru::{BoundedCache, DEFAULT_CAPACITY};
pub use search::{IndexedSearch, SearchResults};
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsSnapshot};
