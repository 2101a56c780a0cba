//! # tiered-config
//!
//! Provider/model capability configuration that is always available and
//! refreshes itself opportunistically.
//!
//! ## Overview
//!
//! `tiered-config` arbitrates between three tiers, in strict priority order:
//! - **Remote**: a JSON document fetched over HTTP in the background
//! - **Cached**: the last accepted remote document, persisted per user
//! - **Hardcoded**: defaults compiled into the crate, needing no I/O
//!
//! Startup resolves cache → defaults synchronously, so callers never block on
//! the network. A background refresh replaces the active snapshot atomically,
//! persists it, then notifies subscribers. Every failure along the way is
//! logged and absorbed: the previous snapshot simply stays active.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tiered_config::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let config = ProviderConfig::builder().build()?;
//!
//! // Available immediately, even offline
//! for provider in config.providers() {
//!     println!("{provider}: {:?}", config.endpoint(&provider));
//! }
//!
//! // Refresh in the background if the snapshot is stale
//! config.fetch_async(false);
//!
//! // Live updates for a settings screen
//! let _handle = config.subscribe(|snapshot| {
//!     println!("now using {} providers", snapshot.providers.len());
//! });
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): the HTTP source. Without it, only custom
//!   [`SnapshotSource`](sources::SnapshotSource) implementations can refresh.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod notify;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        CredentialCheck, FetchDispatch, FetchOutcome, Provenance, ProviderConfig,
        ProviderConfigBuilder, RefreshSettings, Snapshot, Validate, VisionHeuristics,
    };
    pub use crate::error::{ConfigError, Result, ValidationError};
    pub use crate::notify::{SubscriptionHandle, SubscriptionId};
    pub use crate::sources::SnapshotSource;
}
