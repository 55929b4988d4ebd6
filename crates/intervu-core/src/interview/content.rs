//! Message content limits.

use std::borrow::Cow;

use tracing::warn;

/// Longest message content stored, in characters.
pub const MAX_CONTENT_CHARS: usize = 65_000;

const TRUNCATION_SUFFIX: &str = "...";

/// Cap content at [`MAX_CONTENT_CHARS`] characters, appending `...` when cut.
pub fn cap_content(content: &str) -> Cow<'_, str> {
    let Some((cut, _)) = content.char_indices().nth(MAX_CONTENT_CHARS) else {
        return Cow::Borrowed(content);
    };
    warn!(
        original_chars = content.chars().count(),
        max_chars = MAX_CONTENT_CHARS,
        "Message content truncated"
    );
    let mut capped = String::with_capacity(cut + TRUNCATION_SUFFIX.len());
    capped.push_str(&content[..cut]);
    capped.push_str(TRUNCATION_SUFFIX);
    Cow::Owned(capped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_limit_is_unchanged() {
        let content = "a".repeat(MAX_CONTENT_CHARS);
        assert!(matches!(cap_content(&content), Cow::Borrowed(_)));
    }

    #[test]
    fn test_over_limit_is_cut_with_marker() {
        let content = "b".repeat(MAX_CONTENT_CHARS + 1);
        let capped = cap_content(&content);
        assert_eq!(capped.chars().count(), MAX_CONTENT_CHARS + 3);
        assert!(capped.ends_with("b..."));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let content = "é".repeat(MAX_CONTENT_CHARS);
        assert_eq!(cap_content(&content), content.as_str());

        let longer = "é".repeat(MAX_CONTENT_CHARS + 10);
        let capped = cap_content(&longer);
        assert_eq!(capped.chars().count(), MAX_CONTENT_CHARS + 3);
    }
}
