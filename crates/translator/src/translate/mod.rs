//! Per-tag translators
//!
//! `@param` and `@throws` tags share one pipeline: preprocess the comment,
//! extract one proposition series per sentence, match every proposition and
//! merge the sentence conditions with OR. `@return` tags split the comment into
//! cases first and run the pipeline on the parts.

mod exceptional;
mod postcondition;
mod precondition;

use crate::collector::MethodScope;
use crate::matcher::{MatchContext, Matcher};
use docguard_core::entities::MethodContext;
use docguard_core::notation;
use docguard_core::specs::Specification;
use docguard_core::tags::{Comment, DocumentationTag, TagKind};
use docguard_nlp::{preprocess, PreprocessContext, PropositionExtractor, PropositionSeries};
use tracing::{debug, warn};

pub use exceptional::ThrowsTranslator;
pub use postcondition::ReturnTranslator;
pub use precondition::ParamTranslator;

/// Shared state for translating the tags of one method
pub struct TranslateContext<'a> {
    pub method: &'a MethodContext,
    pub scope: &'a MethodScope,
    pub extractor: &'a PropositionExtractor,
    pub matcher: &'a Matcher,
    pub remove_commas: bool,
}

impl TranslateContext<'_> {
    /// One condition per sentence of `text`, empty ones dropped
    ///
    /// `text` is preprocessed as a `kind` tag; `comment` supplies the code
    /// words used to break matching ties.
    pub fn sentence_conditions(
        &self,
        kind: TagKind,
        text: &str,
        comment: &Comment,
        parameter: Option<&str>,
    ) -> Vec<String> {
        let preprocess_ctx = PreprocessContext {
            parameter,
            remove_commas: self.remove_commas,
            parser: self.extractor.parser(),
            hints: self.scope.hints(),
        };
        let text = preprocess(kind, text, &preprocess_ctx);

        let mut all_series = match self
            .extractor
            .extract(&text, self.scope.signature(), self.scope.hints())
        {
            Ok(series) => series,
            Err(e) => {
                warn!("Could not extract propositions from \"{}\": {}", text, e);
                return Vec::new();
            }
        };

        let match_ctx = MatchContext::new(self.scope, kind, comment);
        all_series
            .iter_mut()
            .filter_map(|series| {
                translate_series(series, self.matcher, &match_ctx);
                let condition = series.translation();
                if condition.is_empty() {
                    debug!("No translation for sentence {}", series);
                    None
                } else {
                    Some(condition)
                }
            })
            .collect()
    }

    /// Sentence conditions of `text` merged with OR
    pub fn condition(
        &self,
        kind: TagKind,
        text: &str,
        comment: &Comment,
        parameter: Option<&str>,
    ) -> String {
        merge_conditions(&self.sentence_conditions(kind, text, comment, parameter))
    }
}

/// Translates one kind of documentation tag
pub trait TagTranslator: Send + Sync {
    fn translate(&self, tag: &DocumentationTag, ctx: &TranslateContext<'_>) -> Specification;
}

/// The translator for tags of `kind`
pub fn translator_for(kind: TagKind) -> &'static dyn TagTranslator {
    match kind {
        TagKind::Param => &ParamTranslator,
        TagKind::Throws => &ThrowsTranslator,
        TagKind::Return => &ReturnTranslator,
    }
}

/// Sets the translation of every proposition of `series`
///
/// A proposition without a confident translation gets an empty one, which the
/// series leaves out of its condition.
pub fn translate_series(series: &mut PropositionSeries, matcher: &Matcher, ctx: &MatchContext<'_>) {
    for proposition in series.propositions_mut() {
        let translation = matcher.translate(proposition, ctx).unwrap_or_default();
        proposition.set_translation(translation);
    }
}

/// Joins conditions with OR, each parenthesized
///
/// Empty conditions are dropped and a single condition is returned unchanged.
/// A condition equal (ignoring spaces) to one already merged, or to one of its
/// top-level disjuncts, is skipped.
pub fn merge_conditions<S: AsRef<str>>(conditions: &[S]) -> String {
    let conditions: Vec<&str> = conditions
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| !c.is_empty())
        .collect();

    match conditions.as_slice() {
        [] => String::new(),
        [single] => single.to_string(),
        [first, rest @ ..] => {
            let mut merged = format!("({first})");
            let mut seen = disjuncts(first);
            for condition in rest {
                if seen.contains(&compact(condition)) {
                    continue;
                }
                seen.extend(disjuncts(condition));
                merged.push_str(notation::OR);
                merged.push_str(&format!("({condition})"));
            }
            merged
        }
    }
}

fn compact(condition: &str) -> String {
    condition.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `condition` and its top-level `||` operands, compacted
fn disjuncts(condition: &str) -> Vec<String> {
    let whole = compact(condition);
    let mut parts = vec![whole.clone()];
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = whole.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 && bytes.get(i + 1) == Some(&b'|') => {
                parts.push(whole[start..i].to_string());
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start > 0 {
        parts.push(whole[start..].to_string());
    }
    parts
}
