//! Embedded provider/model defaults: the tier the system can never fall below.

use crate::core::{Provenance, Snapshot};
use std::collections::BTreeMap;

/// Schema version of the embedded defaults.
pub const HARDCODED_SCHEMA_VERSION: u32 = 2;

const PROVIDERS: &[&str] = &[
    "Google",
    "OpenAI",
    "Anthropic",
    "Groq",
    "DeepSeek",
    "Mistral",
    "xAI",
    "Perplexity",
    "Cerebras",
    "SambaNova",
    "Together",
    "SiliconFlow",
    "OpenRouter",
    "HuggingFace",
];

const MODELS: &[(&str, &[&str])] = &[
    ("Google", &["gemini-2.5-flash", "gemini-2.5-pro", "gemini-2.0-flash", "gemini-2.0-flash-lite"]),
    ("OpenAI", &["gpt-4o", "gpt-4o-mini", "gpt-4.1", "gpt-4.1-mini", "gpt-4-turbo", "gpt-3.5-turbo"]),
    ("Anthropic", &["claude-sonnet-4-0", "claude-3-7-sonnet-latest", "claude-3-5-haiku-latest"]),
    ("Groq", &["llama-3.3-70b-versatile", "llama-3.1-8b-instant", "meta-llama/llama-4-scout-17b-16e-instruct"]),
    ("DeepSeek", &["deepseek-chat", "deepseek-reasoner"]),
    ("Mistral", &["mistral-large-latest", "mistral-small-latest", "pixtral-large-latest", "pixtral-12b-2409"]),
    ("xAI", &["grok-3", "grok-3-mini", "grok-2-vision-1212"]),
    ("Perplexity", &["sonar", "sonar-pro"]),
    ("Cerebras", &["llama-3.3-70b", "llama3.1-8b"]),
    ("SambaNova", &["Meta-Llama-3.3-70B-Instruct", "Llama-3.2-90B-Vision-Instruct"]),
    ("Together", &["meta-llama/Llama-3.3-70B-Instruct-Turbo", "meta-llama/Llama-Vision-Free"]),
    ("SiliconFlow", &["Qwen/Qwen2.5-72B-Instruct", "deepseek-ai/DeepSeek-V3", "Qwen/Qwen2.5-VL-72B-Instruct"]),
    ("OpenRouter", &["openai/gpt-4o-mini", "google/gemini-2.0-flash-001", "anthropic/claude-3.5-haiku"]),
    ("HuggingFace", &["meta-llama/Llama-3.3-70B-Instruct", "Qwen/Qwen2.5-72B-Instruct"]),
];

const CREDENTIAL_PATTERNS: &[(&str, &str)] = &[
    ("Google", r"^AIza[0-9A-Za-z_-]{35}$"),
    ("OpenAI", r"^sk-[A-Za-z0-9_-]{20,}$"),
    ("Anthropic", r"^sk-ant-[A-Za-z0-9_-]{20,}$"),
    ("Groq", r"^gsk_[A-Za-z0-9]{20,}$"),
    ("DeepSeek", r"^sk-[A-Za-z0-9]{20,}$"),
    ("xAI", r"^xai-[A-Za-z0-9]{20,}$"),
    ("Perplexity", r"^pplx-[A-Za-z0-9]{20,}$"),
    ("Cerebras", r"^csk-[A-Za-z0-9]{20,}$"),
    ("OpenRouter", r"^sk-or-[A-Za-z0-9_-]{20,}$"),
    ("HuggingFace", r"^hf_[A-Za-z0-9]{20,}$"),
];

// Keys are lowercase provider identifiers; lookups are case-insensitive.
const VISION_MODELS: &[(&str, &[&str])] = &[
    ("google", &["gemini-*"]),
    ("openai", &["gpt-4o*", "gpt-4.1*", "gpt-4-turbo*", "gpt-4-vision*"]),
    ("anthropic", &["claude-3*", "claude-sonnet-4*", "claude-opus-4*"]),
    ("groq", &["meta-llama/llama-4-*"]),
    ("mistral", &["pixtral-*", "mistral-small-latest"]),
    ("xai", &["grok-2-vision*"]),
    ("sambanova", &["*vision*"]),
    ("together", &["*vision*"]),
    ("siliconflow", &["*-vl-*"]),
    ("openrouter", &["openai/gpt-4o*", "google/gemini-*", "anthropic/claude-3*"]),
];

const DEFAULT_MODELS: &[(&str, &[&str])] = &[
    ("Google", &["gemini-2.5-flash", "gemini-2.0-flash"]),
    ("OpenAI", &["gpt-4o-mini", "gpt-4o"]),
    ("Anthropic", &["claude-3-5-haiku-latest"]),
    ("Groq", &["llama-3.3-70b-versatile"]),
    ("DeepSeek", &["deepseek-chat"]),
    ("Mistral", &["mistral-small-latest"]),
    ("xAI", &["grok-3-mini"]),
    ("Perplexity", &["sonar"]),
    ("Cerebras", &["llama-3.3-70b"]),
    ("SambaNova", &["Meta-Llama-3.3-70B-Instruct"]),
    ("Together", &["meta-llama/Llama-3.3-70B-Instruct-Turbo"]),
    ("SiliconFlow", &["Qwen/Qwen2.5-72B-Instruct"]),
    ("OpenRouter", &["openai/gpt-4o-mini"]),
    ("HuggingFace", &["meta-llama/Llama-3.3-70B-Instruct"]),
];

const ENDPOINTS: &[(&str, &str)] = &[
    ("OpenAI", "https://api.openai.com/v1/chat/completions"),
    ("Groq", "https://api.groq.com/openai/v1/chat/completions"),
    ("DeepSeek", "https://api.deepseek.com/chat/completions"),
    ("Mistral", "https://api.mistral.ai/v1/chat/completions"),
    ("xAI", "https://api.x.ai/v1/chat/completions"),
    ("Perplexity", "https://api.perplexity.ai/chat/completions"),
    ("Cerebras", "https://api.cerebras.ai/v1/chat/completions"),
    ("SambaNova", "https://api.sambanova.ai/v1/chat/completions"),
    ("Together", "https://api.together.xyz/v1/chat/completions"),
    ("SiliconFlow", "https://api.siliconflow.cn/v1/chat/completions"),
    ("OpenRouter", "https://openrouter.ai/api/v1/chat/completions"),
    ("HuggingFace", "https://router.huggingface.co/v1/chat/completions"),
];

/// Build the embedded default snapshot.
///
/// Performs no I/O and always passes validation. The result carries
/// [`Provenance::Hardcoded`] and no fetch time.
pub fn hardcoded_snapshot() -> Snapshot {
    Snapshot {
        schema_version: HARDCODED_SCHEMA_VERSION,
        updated_at: None,
        providers: PROVIDERS.iter().map(|p| p.to_string()).collect(),
        models_by_provider: list_map(MODELS),
        credential_patterns: string_map(CREDENTIAL_PATTERNS),
        vision_models: list_map(VISION_MODELS),
        default_models_by_provider: list_map(DEFAULT_MODELS),
        provider_endpoints: string_map(ENDPOINTS),
        provenance: Provenance::Hardcoded,
        fetched_at: None,
    }
}

/// Embedded default models per provider.
pub(crate) fn hardcoded_default_models() -> BTreeMap<String, Vec<String>> {
    list_map(DEFAULT_MODELS)
}

/// Embedded endpoint URLs per provider.
pub(crate) fn hardcoded_endpoints() -> BTreeMap<String, String> {
    string_map(ENDPOINTS)
}

fn list_map(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

fn string_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_endpoint() {
        let snapshot = hardcoded_snapshot();
        assert_eq!(
            snapshot.provider_endpoints.get("OpenAI").map(String::as_str),
            Some("https://api.openai.com/v1/chat/completions")
        );
    }

    #[test]
    fn test_every_provider_has_models_and_defaults() {
        let snapshot = hardcoded_snapshot();
        for provider in &snapshot.providers {
            assert!(
                snapshot.models_by_provider.contains_key(provider),
                "{provider} has no models"
            );
            assert!(
                snapshot.default_models_by_provider.contains_key(provider),
                "{provider} has no default models"
            );
        }
    }

    #[test]
    fn test_display_order_preserved() {
        let snapshot = hardcoded_snapshot();
        assert_eq!(snapshot.providers.first().map(String::as_str), Some("Google"));
        assert_eq!(snapshot.providers.len(), PROVIDERS.len());
    }

    #[test]
    fn test_patterns_compile() {
        for (provider, pattern) in hardcoded_snapshot().credential_patterns {
            assert!(regex::Regex::new(&pattern).is_ok(), "bad pattern for {provider}");
        }
    }
}
