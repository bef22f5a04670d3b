//! `@return` tags to postconditions
//!
//! A return comment is cut into at most two clauses at its top-level " or ".
//! A clause holding " if " reads as `<predicate> if <condition>[, <false
//! case> otherwise]`; other clauses are literals, arithmetic on two operands,
//! a property of the return value or a plain program element.

use super::{merge_conditions, TagTranslator, TranslateContext};
use crate::elements::{CodeElement, ElementKind};
use docguard_core::entities::{MethodContext, TypeRef};
use docguard_core::notation;
use docguard_core::specs::{Guard, PostconditionCase, Property, Specification};
use docguard_core::tags::{Comment, DocumentationTag, TagKind};
use docguard_nlp::lexicon::tag_word;
use docguard_nlp::{preprocess, PreprocessContext};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static BINARY_OF: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:the\s+)?(sum|difference|product|quotient|remainder|bitwise and|bitwise or|bitwise xor|bitwise exclusive or)\s+(?:of|between)\s+(.+?)\s+and\s+(.+)$",
    )
    .ok()
});

static INFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(plus|minus|times|multiplied by|divided by|modulo)\s+(.+)$").ok()
});

const EMPTY_STRINGS: &[&str] = &["empty string", "\"\""];

pub struct ReturnTranslator;

impl TagTranslator for ReturnTranslator {
    fn translate(&self, tag: &DocumentationTag, ctx: &TranslateContext<'_>) -> Specification {
        let Some(return_type) = ctx
            .method
            .return_type
            .as_ref()
            .filter(|_| ctx.method.returns_value())
        else {
            debug!(
                "{} of {} has no return value to describe",
                tag.label(),
                ctx.method.signature()
            );
            return Specification::postcondition(Vec::new());
        };

        let translator = ReturnClauses {
            ctx,
            comment: &tag.comment,
            return_type,
        };
        Specification::postcondition(translator.translate(&tag.comment.text))
    }
}

struct ReturnClauses<'a, 'c> {
    ctx: &'a TranslateContext<'c>,
    comment: &'a Comment,
    return_type: &'a TypeRef,
}

impl ReturnClauses<'_, '_> {
    fn translate(&self, text: &str) -> Vec<PostconditionCase> {
        let preprocess_ctx = PreprocessContext {
            parameter: None,
            remove_commas: false,
            parser: self.ctx.extractor.parser(),
            hints: self.ctx.scope.hints(),
        };
        let text = preprocess(TagKind::Return, text, &preprocess_ctx);
        let text = text.trim().trim_end_matches('.').trim();

        match split_top_level_or(text) {
            Some((first, second)) => {
                let first_cases = self.clause(first);
                let second_cases = self.clause(second);
                match (first_cases.is_empty(), second_cases.is_empty()) {
                    (false, false) => combine(first_cases, second_cases),
                    (true, true) => Vec::new(),
                    _ if first.contains(" if ") && second.contains(" if ") => {
                        debug!("Only one conditional case of \"{}\" translated", text);
                        Vec::new()
                    }
                    (false, true) => first_cases,
                    (true, false) => second_cases,
                }
            }
            None => self.clause(text),
        }
    }

    fn clause(&self, clause: &str) -> Vec<PostconditionCase> {
        match clause.find(" if ") {
            Some(position) => self.conditional(clause, position),
            None => self.unconditional(clause),
        }
    }

    /// `<predicate> if <condition>[, <false case>]`
    fn conditional(&self, clause: &str, position: usize) -> Vec<PostconditionCase> {
        let predicate = clause[..position].trim();
        let rest = clause[position + " if ".len()..].trim();
        let (condition, false_case) = match rest.rfind(", ") {
            Some(comma) if is_false_case(&rest[comma + 2..]) => {
                (rest[..comma].trim(), Some(rest[comma + 2..].trim()))
            }
            _ => (rest, None),
        };

        let Some(property) = self.predicate_property(predicate) else {
            debug!("No translation for the returned value \"{}\"", predicate);
            return Vec::new();
        };
        let guard = self
            .ctx
            .condition(TagKind::Throws, condition, self.comment, None);
        if guard.is_empty() {
            return Vec::new();
        }

        let mut cases = vec![PostconditionCase {
            guard: Guard::new(condition, guard.clone()),
            property: Property::new(predicate, property),
        }];
        if let Some(false_case) = false_case {
            match self.false_property(false_case) {
                Some(property) => cases.push(PostconditionCase {
                    guard: Guard::new(false_case, format!("!({guard})")),
                    property: Property::new(false_case, property),
                }),
                None => debug!("No translation for the false case \"{}\"", false_case),
            }
        }
        cases
    }

    fn unconditional(&self, clause: &str) -> Vec<PostconditionCase> {
        let property = if let Some(literal) = boolean_literal(strip_always(clause)) {
            Some(literal)
        } else if is_arithmetic(clause) {
            // a noun of the operation must not stand in for its result
            let property = self.arithmetic(clause);
            if property.is_none() {
                debug!("Operands of \"{}\" name no numeric program elements", clause);
            }
            property
        } else {
            self.implicit_result(clause)
                .or_else(|| self.noun_phrase(clause))
        };

        match property {
            Some(property) => vec![PostconditionCase {
                guard: Guard::new("", "true"),
                property: Property::new(clause, property),
            }],
            None => Vec::new(),
        }
    }

    /// Property stated by the words before " if "
    fn predicate_property(&self, predicate: &str) -> Option<String> {
        if let Some(literal) = boolean_literal(predicate).or_else(|| null_literal(predicate)) {
            return Some(literal);
        }
        if let Some(element) = self.element_named(predicate, false) {
            return Some(self.equals_result(element.expression()));
        }
        self.implicit_result(predicate)
    }

    /// Property stated by the words after the last ", " ("false otherwise")
    fn false_property(&self, false_case: &str) -> Option<String> {
        let value = strip_articles(
            false_case
                .trim_end_matches(['.', ';'])
                .trim_end()
                .trim_end_matches("otherwise")
                .trim_end_matches("else")
                .trim()
                .trim_start_matches("and ")
                .trim_start_matches("or "),
            Some(self.ctx.method),
        );
        if let Some(literal) = boolean_literal(value).or_else(|| null_literal(value)) {
            return Some(literal);
        }
        if EMPTY_STRINGS.contains(&value.to_lowercase().as_str()) {
            return Some(format!("{}.equals(\"\")", notation::RESULT));
        }
        self.element_named(value, true)
            .map(|element| self.equals_result(element.expression()))
    }

    /// "the sum of a and b", "a minus b"
    fn arithmetic(&self, clause: &str) -> Option<String> {
        let (operator, left, right) = if let Some(caps) =
            BINARY_OF.as_ref().and_then(|pattern| pattern.captures(clause))
        {
            let operator = match caps[1].to_lowercase().as_str() {
                "sum" => "+",
                "difference" => "-",
                "product" => "*",
                "quotient" => "/",
                "remainder" => "%",
                "bitwise and" => "&",
                "bitwise or" => "|",
                _ => "^",
            };
            (operator, caps[2].to_string(), caps[3].to_string())
        } else if let Some(caps) = INFIX.as_ref().and_then(|pattern| pattern.captures(clause)) {
            let operator = match caps[2].to_lowercase().as_str() {
                "plus" => "+",
                "minus" => "-",
                "times" | "multiplied by" => "*",
                "divided by" => "/",
                _ => "%",
            };
            (operator, caps[1].to_string(), caps[3].to_string())
        } else {
            return None;
        };

        let bitwise = matches!(operator, "&" | "|" | "^");
        let operand = |text: &str| -> Option<String> {
            let element = self.element_named(strip_articles(text, Some(self.ctx.method)), false)?;
            let ty = element.ty();
            let fits = if bitwise {
                ty.is_integral() || ty.is_boolean()
            } else {
                ty.is_numeric() && ty.is_primitive()
            };
            fits.then(|| element.expression().to_string())
        };
        let (left, right) = (operand(&left)?, operand(&right)?);
        Some(format!("{}=={left}{operator}{right}", notation::RESULT))
    }

    /// The clause read as a property of the return value
    fn implicit_result(&self, clause: &str) -> Option<String> {
        let lower = format!(" {} ", clause.to_lowercase());
        let text = if [" is ", " are ", " does ", " do "]
            .iter()
            .any(|verb| lower.contains(verb))
        {
            format!("{clause}.")
        } else {
            format!(
                "{} is {}.",
                notation::RESULT,
                strip_articles(clause, Some(self.ctx.method))
            )
        };
        let condition = self
            .ctx
            .condition(TagKind::Return, &text, self.comment, None);
        (!condition.is_empty()).then_some(condition)
    }

    /// Longest run of adjectives and nouns naming a program element
    fn noun_phrase(&self, clause: &str) -> Option<String> {
        let hints = self.ctx.scope.hints();
        let words: Vec<&str> = clause
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':')))
            .filter(|w| !w.is_empty())
            .collect();
        let tags: Vec<&str> = words.iter().map(|w| tag_word(w, hints)).collect();

        for length in (1..=words.len()).rev() {
            for start in 0..=words.len() - length {
                let window = start..start + length;
                let nominal = tags[window.clone()]
                    .iter()
                    .all(|t| t.starts_with("NN") || t.starts_with("JJ"));
                if !nominal || !tags[start + length - 1].starts_with("NN") {
                    continue;
                }
                let phrase = words[window].join(" ");
                if let Some(element) = self.element_named(&phrase, false) {
                    return Some(self.equals_result(element.expression()));
                }
            }
        }
        None
    }

    /// The program element a phrase names, the return value excluded
    fn element_named(&self, phrase: &str, values_only: bool) -> Option<&CodeElement> {
        let candidates: Vec<&CodeElement> = self
            .ctx
            .scope
            .candidates(TagKind::Return)
            .into_iter()
            .filter(|e| e.kind() != ElementKind::ReturnValue)
            .filter(|e| {
                !values_only || matches!(e.kind(), ElementKind::Parameter | ElementKind::Field)
            })
            .collect();
        let matches = self.ctx.matcher.subject_match(phrase, &candidates);
        self.ctx.matcher.pick(&matches, self.comment)
    }

    fn equals_result(&self, expression: &str) -> String {
        if self.return_type.is_primitive() {
            format!("{}=={expression}", notation::RESULT)
        } else {
            format!("{}.equals({expression})", notation::RESULT)
        }
    }
}

/// Splits at the first " or " that joins two clauses
///
/// An " or " inside a relational phrase ("less than or equal to"), inside a
/// bitwise operator name, after "either" or "whether", or inside the
/// condition of an " if " is not a clause boundary.
fn split_top_level_or(text: &str) -> Option<(&str, &str)> {
    text.match_indices(" or ").map(|(position, _)| position).find_map(|position| {
        let before = &text[..position];
        let after = &text[position + " or ".len()..];
        let lower = before.to_lowercase();
        let relational = after.to_lowercase().starts_with("equal");
        let operator_name = lower.ends_with("bitwise") || lower.ends_with("exclusive");
        let owned = lower.contains("either ") || lower.contains("whether ");
        let in_condition = lower
            .rfind(" if ")
            .is_some_and(|start| !lower[start..].contains(", "));
        (!relational && !operator_name && !owned && !in_condition)
            .then(|| (before.trim(), after.trim()))
    })
}

/// Merges the first cases of two translated clauses with OR
fn combine(first: Vec<PostconditionCase>, second: Vec<PostconditionCase>) -> Vec<PostconditionCase> {
    let (Some(a), Some(b)) = (first.into_iter().next(), second.into_iter().next()) else {
        return Vec::new();
    };
    let guard = if a.guard.condition == b.guard.condition {
        a.guard.condition.clone()
    } else {
        merge_conditions(&[a.guard.condition.as_str(), b.guard.condition.as_str()])
    };
    let property = merge_conditions(&[a.property.condition.as_str(), b.property.condition.as_str()]);
    vec![PostconditionCase {
        guard: Guard::new(join_descriptions(&a.guard.description, &b.guard.description), guard),
        property: Property::new(
            join_descriptions(&a.property.description, &b.property.description),
            property,
        ),
    }]
}

fn join_descriptions(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} or {b}"),
    }
}

fn is_false_case(text: &str) -> bool {
    let text = text.trim().trim_end_matches(['.', ';']).trim_end();
    text.ends_with("otherwise") || text.ends_with("else")
}

fn strip_always(clause: &str) -> &str {
    let trimmed = clause.trim();
    trimmed
        .strip_prefix("always ")
        .or_else(|| trimmed.strip_prefix("Always "))
        .unwrap_or(trimmed)
}

fn boolean_literal(text: &str) -> Option<String> {
    match text.trim().to_lowercase().as_str() {
        "true" => Some(format!("{}==true", notation::RESULT)),
        "false" => Some(format!("{}==false", notation::RESULT)),
        _ => None,
    }
}

fn is_arithmetic(clause: &str) -> bool {
    let matches = |pattern: &Option<Regex>| pattern.as_ref().is_some_and(|p| p.is_match(clause));
    matches(&BINARY_OF) || matches(&INFIX)
}

fn null_literal(text: &str) -> Option<String> {
    match strip_articles(text, None).to_lowercase().as_str() {
        "null" | "null value" | "null reference" => Some(format!("{}==null", notation::RESULT)),
        "!=null" | "non-null" | "nonnull" | "not null" | "non-null value" => {
            Some(format!("{}!=null", notation::RESULT))
        }
        _ => None,
    }
}

/// `text` without its leading articles
///
/// A word naming a parameter of `method` is never an article.
fn strip_articles<'t>(text: &'t str, method: Option<&MethodContext>) -> &'t str {
    let mut rest = text.trim();
    while let Some((first, tail)) = rest.split_once(char::is_whitespace) {
        let article = matches!(first.to_lowercase().as_str(), "a" | "an" | "the");
        let parameter = method.is_some_and(|m| m.param_index(first).is_some());
        if !article || parameter {
            break;
        }
        rest = tail.trim_start();
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use docguard_core::entities::{DeclaringType, Parameter};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_top_level_or() {
        assert_eq!(
            split_top_level_or("null or an empty string"),
            Some(("null", "an empty string"))
        );
        assert_eq!(split_top_level_or("a value greater than or equal to zero"), None);
        assert_eq!(split_top_level_or("the bitwise or of a and b"), None);
        assert_eq!(split_top_level_or("either x or y"), None);
        assert_eq!(
            split_top_level_or("true if x is null or y is null, false otherwise"),
            None
        );
        assert_eq!(
            split_top_level_or("true if x is null, false otherwise or null if y is empty"),
            Some(("true if x is null, false otherwise", "null if y is empty"))
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(boolean_literal(" True ").as_deref(), Some("result==true"));
        assert_eq!(boolean_literal("truth"), None);
        assert_eq!(null_literal("a null value").as_deref(), Some("result==null"));
        assert_eq!(null_literal("!=null").as_deref(), Some("result!=null"));
        assert_eq!(strip_always("always false"), "false");
    }

    #[test]
    fn test_strip_articles_keeps_parameters() {
        let method = MethodContext::builder()
            .name("add")
            .params(vec![
                Parameter::new("a", "int"),
                Parameter::new("b", "int"),
            ])
            .declaring_type(DeclaringType::new("Adder"))
            .build()
            .unwrap();
        assert_eq!(strip_articles("the a", Some(&method)), "a");
        assert_eq!(strip_articles("a", Some(&method)), "a");
        assert_eq!(strip_articles("a b", Some(&method)), "a b");
        assert_eq!(strip_articles("the sum of a and b", None), "sum of a and b");
        assert_eq!(strip_articles("an empty string", None), "empty string");
    }

    #[test]
    fn test_arithmetic_clauses() {
        assert!(is_arithmetic("the sum of a and b"));
        assert!(is_arithmetic("x plus one"));
        assert!(!is_arithmetic("the current size"));
    }

    #[test]
    fn test_false_case_detection() {
        assert!(is_false_case("false otherwise."));
        assert!(is_false_case("null else"));
        assert!(!is_false_case("y is empty"));
    }

    #[test]
    fn test_combine_merges_guards_and_properties() {
        let case = |guard: &str, property: &str| PostconditionCase {
            guard: Guard::new("", guard),
            property: Property::new("", property),
        };
        let combined = combine(
            vec![case("true", "result==null")],
            vec![case("true", "result.equals(\"\")")],
        );
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].guard.condition, "true");
        assert_eq!(
            combined[0].property.condition,
            "(result==null) || (result.equals(\"\"))"
        );
    }
}
