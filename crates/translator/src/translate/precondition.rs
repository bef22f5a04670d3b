//! `@param` tags to preconditions

use super::{TagTranslator, TranslateContext};
use docguard_core::specs::{Guard, Specification};
use docguard_core::tags::{DocumentationTag, TagKind};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// "x is if ..." describes what a value means rather than constraining it
static DESCRIPTIVE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:the|a|an)\s+)?[\w.]+(?:\s+[\w.]+)?\s+(?:is|are)\s+(?:if|when)\b").ok()
});

pub struct ParamTranslator;

impl TagTranslator for ParamTranslator {
    fn translate(&self, tag: &DocumentationTag, ctx: &TranslateContext<'_>) -> Specification {
        let text = tag.comment.text.as_str();
        let condition = if is_descriptive(text) {
            debug!("Skipping descriptive comment of {}: \"{}\"", tag.label(), text);
            String::new()
        } else {
            ctx.condition(TagKind::Param, text, &tag.comment, tag.parameter.as_deref())
        };
        Specification::precondition(Guard::new(text, condition))
    }
}

fn is_descriptive(text: &str) -> bool {
    DESCRIPTIVE
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}
