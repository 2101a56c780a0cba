//! Core configuration management types.

mod builder;
mod capabilities;
mod config_handle;
pub(crate) mod defaults;
mod pattern;
mod refresh;
mod resolver;
mod settings;
mod snapshot;
mod validation;

pub use builder::ProviderConfigBuilder;
pub use capabilities::{CredentialCheck, VisionHeuristics, check_credential, is_vision_capable};
pub use config_handle::ProviderConfig;
pub use defaults::{HARDCODED_SCHEMA_VERSION, hardcoded_snapshot};
pub use pattern::wildcard_match;
pub use refresh::{FetchDispatch, FetchOutcome};
pub use resolver::TierResolver;
pub use settings::{
    DEFAULT_FRESHNESS_WINDOW, DEFAULT_REMOTE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
    RefreshSettings,
};
pub use snapshot::{Provenance, Snapshot};
pub use validation::{
    MIN_PROVIDERS, REQUIRED_KEYS, SUPPORTED_SCHEMA_VERSIONS, Validate, validate_payload,
};
