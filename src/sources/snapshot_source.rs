//! Remote snapshot source trait.

use crate::core::{Snapshot, Validate, validate_payload};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Trait for sources the remote tier can refresh from.
///
/// [`HttpSource`](crate::sources::HttpSource) is the production implementation;
/// implement this trait to refresh from somewhere else (or to stub the network
/// in tests).
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch, decode and validate one snapshot.
    ///
    /// The returned snapshot is not yet stamped; the refresher stamps it
    /// [`Provenance::Remote`](crate::core::Provenance::Remote) when it installs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached, answers with a failure
    /// status, or the payload does not decode or validate.
    async fn fetch(&self) -> Result<Snapshot>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;
}

/// Validate a raw JSON payload and decode it into a [`Snapshot`].
///
/// Structural checks run on the raw value first, so a missing key is reported
/// as a validation error rather than a decode error.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`](crate::error::ConfigError::ValidationError)
/// if the payload breaks the schema rules, or
/// [`ConfigError::FormatError`](crate::error::ConfigError::FormatError) if a
/// field has the wrong shape.
pub fn decode_snapshot(payload: JsonValue) -> Result<Snapshot> {
    validate_payload(&payload)?;
    let snapshot: Snapshot = serde_json::from_value(payload)?;
    snapshot.validate()?;
    Ok(snapshot)
}
