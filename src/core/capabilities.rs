//! Capability checks derived from a snapshot: vision support and credential formats.

use crate::core::{Snapshot, wildcard_match};
use regex::Regex;

/// Substring heuristic for image-capable models missing from the explicit list.
///
/// A model whose lowercased name contains any of the configured substrings is
/// treated as vision-capable, provided its provider appears in the snapshot's
/// vision map at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionHeuristics {
    substrings: Vec<String>,
}

impl VisionHeuristics {
    /// Build a heuristic from the given substrings (matched case-insensitively).
    pub fn new<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            substrings: substrings
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
        }
    }

    /// A heuristic that never matches.
    pub fn disabled() -> Self {
        Self {
            substrings: Vec::new(),
        }
    }

    fn matches(&self, model: &str) -> bool {
        self.substrings.iter().any(|s| model.contains(s.as_str()))
    }
}

impl Default for VisionHeuristics {
    fn default() -> Self {
        Self::new(["vision", "pixtral"])
    }
}

/// Whether `model` under `provider` accepts image input.
pub fn is_vision_capable(
    snapshot: &Snapshot,
    heuristics: &VisionHeuristics,
    model: &str,
    provider: &str,
) -> bool {
    let Some(patterns) = snapshot
        .vision_models
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(provider))
        .map(|(_, patterns)| patterns)
    else {
        return false;
    };

    let model = model.to_lowercase();
    let listed = patterns.iter().any(|pattern| {
        let pattern = pattern.to_lowercase();
        if pattern.contains('*') {
            wildcard_match(&pattern, &model)
        } else {
            pattern == model
        }
    });

    listed || heuristics.matches(&model)
}

/// Outcome of checking a credential against its provider's format pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// The credential matches the provider's pattern.
    Valid,
    /// The credential does not match the provider's pattern.
    Invalid,
    /// No usable pattern is known for the provider.
    NoPattern,
}

/// Check `credential` against the pattern configured for `provider`.
pub fn check_credential(snapshot: &Snapshot, provider: &str, credential: &str) -> CredentialCheck {
    let Some(pattern) = snapshot.credential_patterns.get(provider) else {
        return CredentialCheck::NoPattern;
    };

    match Regex::new(pattern) {
        Ok(regex) if regex.is_match(credential.trim()) => CredentialCheck::Valid,
        Ok(_) => CredentialCheck::Invalid,
        Err(err) => {
            tracing::warn!(provider, error = %err, "ignoring malformed credential pattern");
            CredentialCheck::NoPattern
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defaults::hardcoded_snapshot;

    #[test]
    fn test_explicit_wildcard_entry() {
        let snapshot = hardcoded_snapshot();
        let heuristics = VisionHeuristics::disabled();
        assert!(is_vision_capable(&snapshot, &heuristics, "gpt-4-vision-preview", "OpenAI"));
        assert!(is_vision_capable(&snapshot, &heuristics, "GPT-4o-mini", "openai"));
        assert!(!is_vision_capable(&snapshot, &heuristics, "gpt-3.5-turbo", "OpenAI"));
    }

    #[test]
    fn test_heuristic_fallback() {
        let mut snapshot = hardcoded_snapshot();
        snapshot
            .vision_models
            .insert("openai".to_string(), vec!["gpt-4o".to_string()]);

        let heuristics = VisionHeuristics::default();
        assert!(is_vision_capable(&snapshot, &heuristics, "gpt-4-vision-preview", "OpenAI"));
        assert!(!is_vision_capable(&snapshot, &heuristics, "gpt-3.5-turbo", "OpenAI"));
        assert!(!is_vision_capable(
            &snapshot,
            &VisionHeuristics::disabled(),
            "gpt-4-vision-preview",
            "OpenAI"
        ));
    }

    #[test]
    fn test_custom_heuristic() {
        let mut snapshot = hardcoded_snapshot();
        snapshot.vision_models.insert("deepseek".to_string(), Vec::new());
        let heuristics = VisionHeuristics::new(["-VL"]);
        assert!(is_vision_capable(&snapshot, &heuristics, "deepseek-vl2", "DeepSeek"));
        assert!(!is_vision_capable(&snapshot, &heuristics, "deepseek-chat", "DeepSeek"));
    }

    #[test]
    fn test_unknown_provider() {
        let snapshot = hardcoded_snapshot();
        assert!(!is_vision_capable(
            &snapshot,
            &VisionHeuristics::default(),
            "some-vision-model",
            "NoSuchProvider"
        ));
    }

    #[test]
    fn test_credential_check() {
        let snapshot = hardcoded_snapshot();
        assert_eq!(
            check_credential(&snapshot, "Groq", "gsk_abcdefghijklmnopqrstuvwxyz012345"),
            CredentialCheck::Valid
        );
        assert_eq!(
            check_credential(&snapshot, "Groq", "sk-abcdefghijklmnopqrstuvwxyz"),
            CredentialCheck::Invalid
        );
        assert_eq!(
            check_credential(&snapshot, "NoSuchProvider", "anything"),
            CredentialCheck::NoPattern
        );
    }

    #[test]
    fn test_malformed_pattern() {
        let mut snapshot = hardcoded_snapshot();
        snapshot
            .credential_patterns
            .insert("Groq".to_string(), "^gsk_(".to_string());
        assert_eq!(
            check_credential(&snapshot, "Groq", "gsk_abc"),
            CredentialCheck::NoPattern
        );
    }
}
