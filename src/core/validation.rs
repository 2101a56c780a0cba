//! Snapshot schema validation.

use crate::core::Snapshot;
use crate::error::ValidationError;
use serde_json::Value as JsonValue;

/// Schema versions this build understands.
pub const SUPPORTED_SCHEMA_VERSIONS: &[u32] = &[2];

/// Top-level keys every payload must carry.
pub const REQUIRED_KEYS: [&str; 6] = [
    "providers_list",
    "model_provider_map",
    "api_key_patterns",
    "vision_models",
    "default_models_by_provider",
    "provider_api_urls",
];

/// Minimum number of providers a usable snapshot lists.
pub const MIN_PROVIDERS: usize = 2;

/// Trait for configuration validation.
///
/// Implemented by [`Snapshot`] so that every snapshot, whatever tier produced
/// it, is checked against the same rules before it is installed.
pub trait Validate {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for Snapshot {
    fn validate(&self) -> Result<(), ValidationError> {
        check_version(u64::from(self.schema_version))?;
        if self.providers.len() < MIN_PROVIDERS {
            return Err(ValidationError::invalid_field(
                "providers_list",
                format!("must list at least {} providers", MIN_PROVIDERS),
            ));
        }
        Ok(())
    }
}

/// Validate a raw JSON payload before it is decoded into a [`Snapshot`].
///
/// Checks the schema version, the presence of all [`REQUIRED_KEYS`], the
/// provider count and that the model and endpoint maps are JSON objects.
/// Unknown keys (including cache metadata such as `_cached_at`) are ignored.
pub fn validate_payload(payload: &JsonValue) -> Result<(), ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::custom("payload must be a JSON object"))?;

    let version = object
        .get("version")
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| ValidationError::invalid_field("version", "missing or not an integer"))?;
    check_version(version)?;

    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(ValidationError::invalid_field(*missing, "missing required key"));
    }

    match object.get("providers_list").and_then(JsonValue::as_array) {
        Some(providers) if providers.len() >= MIN_PROVIDERS => {}
        Some(_) => {
            return Err(ValidationError::invalid_field(
                "providers_list",
                format!("must list at least {} providers", MIN_PROVIDERS),
            ));
        }
        None => {
            return Err(ValidationError::invalid_field("providers_list", "must be an array"));
        }
    }

    for key in ["model_provider_map", "provider_api_urls"] {
        if !object.get(key).is_some_and(JsonValue::is_object) {
            return Err(ValidationError::invalid_field(key, "must be an object"));
        }
    }

    Ok(())
}

fn check_version(version: u64) -> Result<(), ValidationError> {
    if SUPPORTED_SCHEMA_VERSIONS
        .iter()
        .any(|supported| u64::from(*supported) == version)
    {
        Ok(())
    } else {
        Err(ValidationError::invalid_field(
            "version",
            format!("unsupported schema version {}", version),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defaults::hardcoded_snapshot;
    use serde_json::json;

    fn valid_payload() -> JsonValue {
        json!({
            "version": 2,
            "updated_at": "2025-01-01T00:00:00Z",
            "providers_list": ["OpenAI", "Groq"],
            "model_provider_map": {"OpenAI": ["gpt-4o"], "Groq": ["llama-3.3-70b"]},
            "api_key_patterns": {"OpenAI": "^sk-"},
            "vision_models": {"openai": ["gpt-4o*"]},
            "default_models_by_provider": {"OpenAI": ["gpt-4o"]},
            "provider_api_urls": {"OpenAI": "https://api.openai.com/v1/chat/completions"}
        })
    }

    #[test]
    fn test_valid_payload() {
        assert!(validate_payload(&valid_payload()).is_ok());
    }

    #[test]
    fn test_each_required_key_is_enforced() {
        for key in REQUIRED_KEYS {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().remove(key);
            let err = validate_payload(&payload).unwrap_err();
            assert_eq!(err, ValidationError::invalid_field(key, "missing required key"));
        }
    }

    #[test]
    fn test_unsupported_version() {
        let mut payload = valid_payload();
        payload["version"] = json!(3);
        assert!(validate_payload(&payload).is_err());

        payload["version"] = json!("2");
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn test_too_few_providers() {
        let mut payload = valid_payload();
        payload["providers_list"] = json!(["OpenAI"]);
        assert!(validate_payload(&payload).is_err());

        payload["providers_list"] = json!("OpenAI,Groq");
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn test_maps_must_be_objects() {
        let mut payload = valid_payload();
        payload["model_provider_map"] = json!([]);
        assert!(validate_payload(&payload).is_err());

        let mut payload = valid_payload();
        payload["provider_api_urls"] = json!("https://example.com");
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn test_non_object_payload() {
        assert!(validate_payload(&json!([1, 2, 3])).is_err());
        assert!(validate_payload(&JsonValue::Null).is_err());
    }

    #[test]
    fn test_cache_metadata_is_tolerated() {
        let mut payload = valid_payload();
        payload["_cached_at"] = json!(1_700_000_000.5);
        payload["_source"] = json!("remote");
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn test_hardcoded_snapshot_validates() {
        let snapshot = hardcoded_snapshot();
        assert!(snapshot.validate().is_ok());
        let payload = serde_json::to_value(&snapshot).unwrap();
        assert!(validate_payload(&payload).is_ok());
    }
}
