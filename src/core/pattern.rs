//! Single-token wildcard matching for model-name patterns.

/// Match `text` against `pattern`, where `*` matches any run of characters
/// (including none). Every other character matches itself. Comparison is
/// case-sensitive; callers normalise case first if needed.
///
/// # Examples
///
/// ```rust
/// use tiered_config::core::wildcard_match;
///
/// assert!(wildcard_match("gpt-4-vision*", "gpt-4-vision-preview"));
/// assert!(wildcard_match("*vision*", "llama-3.2-90b-vision-instruct"));
/// assert!(!wildcard_match("gpt-4o*", "gpt-3.5-turbo"));
/// ```
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut segments = pattern.split('*');
    // split always yields at least one segment
    let first = segments.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let remaining: Vec<&str> = segments.collect();
    let Some((last, middle)) = remaining.split_last() else {
        // no `*` at all: exact match
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(index) => rest = &rest[index + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact() {
        assert!(wildcard_match("gpt-4o", "gpt-4o"));
        assert!(!wildcard_match("gpt-4o", "gpt-4o-mini"));
        assert!(!wildcard_match("gpt-4o-mini", "gpt-4o"));
    }

    #[test]
    fn test_suffix_prefix_infix() {
        assert!(wildcard_match("gpt-4o*", "gpt-4o-mini"));
        assert!(wildcard_match("*-vl-*", "qwen/qwen2.5-vl-72b-instruct"));
        assert!(wildcard_match("*-latest", "pixtral-large-latest"));
        assert!(wildcard_match("claude-*-haiku", "claude-3-5-haiku"));
        assert!(!wildcard_match("claude-*-haiku", "claude-3-5-sonnet"));
    }

    #[test]
    fn test_star_only() {
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("*", "anything"));
        assert!(wildcard_match("**", "anything"));
    }

    #[test]
    fn test_overlap_between_segments() {
        // "ab" must not be consumed by both the prefix and the suffix
        assert!(!wildcard_match("ab*ab", "ab"));
        assert!(wildcard_match("ab*ab", "abab"));
        assert!(wildcard_match("a*b*c", "a-b-b-c"));
    }

    proptest! {
        #[test]
        fn prop_star_surrounding_literal_matches(prefix in "[a-z0-9-]{0,8}", lit in "[a-z0-9-]{1,8}", suffix in "[a-z0-9-]{0,8}") {
            let text = format!("{prefix}{lit}{suffix}");
            let pattern = format!("*{lit}*");
            prop_assert!(wildcard_match(&pattern, &text));
        }

        #[test]
        fn prop_literal_pattern_is_equality(a in "[a-z0-9.-]{0,12}", b in "[a-z0-9.-]{0,12}") {
            prop_assert_eq!(wildcard_match(&a, &b), a == b);
        }

        #[test]
        fn prop_trailing_star_is_prefix_test(a in "[a-z0-9.-]{0,12}", b in "[a-z0-9.-]{0,12}") {
            let pattern = format!("{a}*");
            prop_assert_eq!(wildcard_match(&pattern, &b), b.starts_with(&a));
        }
    }
}
