//! `@throws` tags to exceptional postconditions

use super::{TagTranslator, TranslateContext};
use docguard_core::specs::{Guard, Specification};
use docguard_core::tags::{DocumentationTag, TagKind};

pub struct ThrowsTranslator;

impl TagTranslator for ThrowsTranslator {
    fn translate(&self, tag: &DocumentationTag, ctx: &TranslateContext<'_>) -> Specification {
        let text = tag.comment.text.as_str();
        let condition = if is_always(text) {
            "true".to_string()
        } else {
            ctx.condition(TagKind::Throws, text, &tag.comment, None)
        };
        Specification::exceptional(
            Guard::new(text, condition),
            tag.exception.clone().unwrap_or_default(),
        )
    }
}

/// Comments such as "Always." that make the exception unconditional
fn is_always(text: &str) -> bool {
    let words: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    words.trim().eq_ignore_ascii_case("always")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_ignores_case_and_punctuation() {
        assert!(is_always("always"));
        assert!(is_always(" Always. "));
        assert!(!is_always("always if x is null"));
        assert!(!is_always("if always is set"));
    }
}
