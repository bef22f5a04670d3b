//! Proposition to condition matching
//!
//! The subject of a proposition is matched against the code elements in scope
//! by edit distance; the predicate is then read against the type of every
//! matched element and the best translation kept.

use crate::collector::MethodScope;
use crate::elements::{CodeElement, ElementKind};
use crate::predicates::{method_predicate, parse_predicate};
use docguard_core::config::MatcherConfig;
use docguard_core::tags::{Comment, TagKind};
use docguard_nlp::{Conjunction, Proposition, Subject};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static NULL_RECEIVER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\breceiver\s*[!=]=\s*null\b").ok());

/// Predicates relating two referents of one subject
const SYMMETRIC_PREDICATES: &[&str] = &["are equal", "are the same", "are identical"];

/// Everything a proposition is matched against
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub scope: &'a MethodScope,
    pub kind: TagKind,
    pub comment: &'a Comment,
}

impl<'a> MatchContext<'a> {
    pub fn new(scope: &'a MethodScope, kind: TagKind, comment: &'a Comment) -> Self {
        Self {
            scope,
            kind,
            comment,
        }
    }

    fn candidates(&self) -> Vec<&'a CodeElement> {
        self.scope.candidates(self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    distance_threshold: usize,
    word_removal_cost: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(&MatcherConfig::default())
    }
}

impl Matcher {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            distance_threshold: config.distance_threshold,
            word_removal_cost: config.word_removal_cost,
        }
    }

    /// Elements closest to `subject`, all tied at the smallest distance within
    /// the threshold
    pub fn subject_match<'e>(&self, subject: &str, candidates: &[&'e CodeElement]) -> Vec<&'e CodeElement> {
        let subject = strip_preconjunction(subject.trim());
        if subject.is_empty() {
            return Vec::new();
        }

        let scored: Vec<(usize, &'e CodeElement)> = candidates
            .iter()
            .filter_map(|element| {
                element
                    .distance_from(subject, self.word_removal_cost)
                    .filter(|distance| *distance <= self.distance_threshold)
                    .map(|distance| (distance, *element))
            })
            .collect();

        let Some(best) = scored.iter().map(|(distance, _)| *distance).min() else {
            return Vec::new();
        };
        scored
            .into_iter()
            .filter(|(distance, _)| *distance == best)
            .map(|(_, element)| element)
            .collect()
    }

    /// Elements of the array or collection parameter named by `container`
    pub fn container_match(&self, container: &str, candidates: &[&CodeElement]) -> Option<CodeElement> {
        let containers: Vec<&CodeElement> = candidates
            .iter()
            .copied()
            .filter(|e| e.kind() == ElementKind::Parameter && e.ty().is_container())
            .collect();
        let matched = self.subject_match(container, &containers);
        matched.first().and_then(|c| CodeElement::elements_of(c))
    }

    /// The single element a subject stands for when several match
    ///
    /// The greatest kind wins; within it an element whose identifier the
    /// author marked as code is preferred, else the first.
    pub fn pick<'e>(&self, matches: &[&'e CodeElement], comment: &Comment) -> Option<&'e CodeElement> {
        let top = matches.iter().map(|e| e.kind()).max()?;
        let same_kind: Vec<&'e CodeElement> =
            matches.iter().copied().filter(|e| e.kind() == top).collect();
        same_kind
            .iter()
            .copied()
            .find(|e| comment.intersects(e.identifiers()))
            .or_else(|| same_kind.first().copied())
    }

    /// Condition for one proposition, `None` when no confident translation exists
    pub fn translate(&self, proposition: &Proposition, ctx: &MatchContext<'_>) -> Option<String> {
        let subject = proposition.subject();
        let candidates = ctx.candidates();

        let matches: Vec<CodeElement> = if subject.container().is_empty() {
            self.subject_match(subject.text(), &candidates)
                .into_iter()
                .cloned()
                .collect()
        } else {
            self.container_match(subject.container(), &candidates)
                .into_iter()
                .collect()
        };
        if matches.is_empty() {
            debug!("No code element matches the subject of {}", proposition);
            return None;
        }
        let matches: Vec<&CodeElement> = matches.iter().collect();

        let predicate = proposition.predicate().trim().to_lowercase();
        let translation = if SYMMETRIC_PREDICATES.contains(&predicate.as_str()) {
            symmetric(&matches, proposition.is_negative())
        } else {
            self.translate_each(proposition, &matches, ctx)
        };

        let translation = translation?;
        if NULL_RECEIVER
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&translation))
        {
            debug!("Discarding null comparison of the receiver: {}", translation);
            return None;
        }
        debug!("Translated {} as {}", proposition, translation);
        Some(translation)
    }

    fn translate_each(
        &self,
        proposition: &Proposition,
        matches: &[&CodeElement],
        ctx: &MatchContext<'_>,
    ) -> Option<String> {
        let translated: Vec<(&CodeElement, String)> = matches
            .iter()
            .filter_map(|element| {
                self.predicate_match(element, proposition, ctx)
                    .map(|condition| (*element, condition))
            })
            .collect();
        if translated.is_empty() {
            debug!("No predicate translation for {}", proposition);
            return None;
        }

        match conjunction_for(proposition.subject()) {
            Some(conjunction) if translated.len() > 1 => {
                let joined = translated
                    .iter()
                    .map(|(_, condition)| condition.as_str())
                    .collect::<Vec<_>>()
                    .join(conjunction.as_str());
                Some(format!("({joined})"))
            }
            _ => {
                let elements: Vec<&CodeElement> = translated.iter().map(|(e, _)| *e).collect();
                let chosen = self.pick(&elements, ctx.comment)?;
                translated
                    .into_iter()
                    .find(|(e, _)| std::ptr::eq(*e, chosen))
                    .map(|(_, condition)| condition)
            }
        }
    }

    /// Condition stating `proposition`'s predicate of `element`
    pub fn predicate_match(
        &self,
        element: &CodeElement,
        proposition: &Proposition,
        ctx: &MatchContext<'_>,
    ) -> Option<String> {
        let predicate = proposition.predicate();
        let form = parse_predicate(predicate, element.ty()).or_else(|| {
            if element.kind() == ElementKind::Receiver {
                method_predicate(
                    predicate,
                    ctx.scope.boolean_methods(),
                    self.distance_threshold,
                    self.word_removal_cost,
                )
            } else {
                None
            }
        })?;

        let form = match form.unresolved_reference() {
            Some(reference) => {
                let candidates = ctx.candidates();
                let referents = self.subject_match(reference, &candidates);
                let Some(referent) = self.pick(&referents, ctx.comment) else {
                    debug!("Operand \"{}\" of {} matches no code element", reference, proposition);
                    return None;
                };
                let expression = referent.expression().to_string();
                form.resolve(expression)
            }
            None => form,
        };

        let condition = form.render(element.operand(), element.ty(), proposition.is_negative());
        Some(element.enclose(condition))
    }
}

fn strip_preconjunction(subject: &str) -> &str {
    let lower = subject.to_lowercase();
    for prefix in ["either ", "both "] {
        if lower.starts_with(prefix) {
            return subject[prefix.len()..].trim();
        }
    }
    subject
}

/// Connective for a subject that may stand for several elements
fn conjunction_for(subject: &Subject) -> Option<Conjunction> {
    let text = subject.text().to_lowercase();
    if text.starts_with("either ") || text.starts_with("any ") {
        Some(Conjunction::Or)
    } else if text.starts_with("both ") || text.starts_with("all ") {
        Some(Conjunction::And)
    } else if !subject.is_singular() {
        Some(Conjunction::Or)
    } else {
        None
    }
}

/// Equality of the first two referents ("the arrays are equal")
fn symmetric(matches: &[&CodeElement], negative: bool) -> Option<String> {
    let [first, second, ..] = matches else {
        return None;
    };
    let (left, right) = (first.expression(), second.expression());
    let ty = first.ty();
    if ty.is_primitive() {
        let operator = if negative { "!=" } else { "==" };
        return Some(format!("{left}{operator}{right}"));
    }
    let not = if negative { "!" } else { "" };
    if ty.is_array() {
        Some(format!("{not}java.util.Arrays.equals({left}, {right})"))
    } else {
        Some(format!("{not}{left}.equals({right})"))
    }
}
