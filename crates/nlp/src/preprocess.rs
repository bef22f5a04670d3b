//! Tag-kind specific rewriting of comment text before normalization
//!
//! Each tag kind runs an ordered list of phases. A phase is a pure function of
//! the text and a [`PreprocessContext`]; phases that need to know which words
//! are adjectives or nouns ask the configured sentence parser.

use crate::graph::DependencyGraph;
use crate::parser::{ParseHints, SentenceParser};
use docguard_core::tags::TagKind;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Inputs shared by the phases of one tag
pub struct PreprocessContext<'a> {
    /// Parameter bound to a `@param` tag
    pub parameter: Option<&'a str>,
    pub remove_commas: bool,
    pub parser: &'a dyn SentenceParser,
    pub hints: &'a ParseHints,
}

impl PreprocessContext<'_> {
    fn graphs(&self, text: &str) -> Vec<DependencyGraph> {
        match self.parser.parse(text, self.hints) {
            Ok(graphs) => graphs,
            Err(e) => {
                debug!("Parsing \"{text}\" during preprocessing failed: {e}");
                Vec::new()
            }
        }
    }
}

pub type Phase = fn(&str, &PreprocessContext<'_>) -> String;

const PARAM_PHASES: &[(&str, Phase)] = &[
    ("end_period", end_period),
    ("trim", trim),
    ("implicit_param_subject", implicit_param_subject),
    ("expand_range", expand_range),
    ("remove_commas", remove_commas),
    ("remove_may_be", remove_may_be),
    ("normalize_non_null_non_empty", normalize_non_null_non_empty),
    ("normalize_it", normalize_it),
    ("trim", trim),
];

const THROWS_PHASES: &[(&str, Phase)] = &[
    ("end_period", end_period),
    ("trim", trim),
    ("expand_range", expand_range),
    ("remove_commas", remove_commas),
    ("normalize_ifs", normalize_ifs),
    ("remove_initial_if", remove_initial_if),
    ("normalize_non_null_non_empty", normalize_non_null_non_empty),
    ("normalize_it", normalize_it),
    ("trim", trim),
];

const RETURN_PHASES: &[(&str, Phase)] = &[
    ("end_period", end_period),
    ("trim", trim),
    ("expand_range", expand_range),
    ("normalize_ifs", normalize_ifs),
    ("normalize_non_null_non_empty", normalize_non_null_non_empty),
    ("normalize_it", normalize_it),
    ("normalize_whether", normalize_whether),
    ("trim", trim),
];

/// Ordered phases run for a tag kind
pub fn phases(kind: TagKind) -> &'static [(&'static str, Phase)] {
    match kind {
        TagKind::Param => PARAM_PHASES,
        TagKind::Throws => THROWS_PHASES,
        TagKind::Return => RETURN_PHASES,
    }
}

/// Runs every phase of `kind` over `text`
pub fn preprocess(kind: TagKind, text: &str, ctx: &PreprocessContext<'_>) -> String {
    phases(kind)
        .iter()
        .fold(text.to_string(), |current, (name, phase)| {
            let next = phase(&current, ctx);
            if next != current {
                trace!("{name}: \"{current}\" -> \"{next}\"");
            }
            next
        })
}

pub fn end_period(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    if text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

pub fn trim(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    text.trim().to_string()
}

const POSITIVE_PATTERNS: &[&str] = &["must be", "Must be", "will be", "Will be"];

const NEGATIVE_PATTERNS: &[&str] = &[
    "must not be",
    "Must not be",
    "must not return",
    "Must not return",
    "must never be",
    "Must never be",
    "must never return",
    "Must never return",
    "will not be",
    "Will not be",
    "will never be",
    "Will never be",
    "can't be",
    "Can't be",
    "cannot be",
    "Cannot be",
    "should not be",
    "Should not be",
    "shouldn't be",
    "Shouldn't be",
    "may not be",
    "May not be",
    "must'nt be",
    "Must'nt be",
];

const ARTICLES: &[&str] = &["the", "a", "an", "any"];

/// Openings of a comma phrase that only describe possible values
const TENTATIVE_OPENINGS: &[&str] = &["default", "may be", "can be", "could be", "possibly"];

/// Makes the parameter the explicit subject of `@param` constraints
///
/// "must not be null" becomes ". x is not null", "the key, not null" becomes
/// "the key. x is not null" and "the non-null key" becomes
/// "x is non-null. non-null key".
pub fn implicit_param_subject(text: &str, ctx: &PreprocessContext<'_>) -> String {
    let Some(parameter) = ctx.parameter else {
        return text.to_string();
    };

    let mut comment = text.to_string();
    let mut replaced = false;
    for (patterns, verb) in [(POSITIVE_PATTERNS, "is"), (NEGATIVE_PATTERNS, "is not")] {
        for pattern in patterns {
            if !comment.contains(pattern) {
                continue;
            }
            let with_pronoun = format!(". It {pattern}");
            let target = if comment.contains(&with_pronoun) {
                with_pronoun
            } else {
                pattern.to_string()
            };
            comment = comment.replace(&target, &format!(". {parameter} {verb} "));
            replaced = true;
        }
    }
    if replaced {
        return comment;
    }

    let comment = comment.replace(';', ",");
    if let Some((head, tail)) = descriptive_comma(&comment) {
        if has_adjective(&ctx.graphs(tail)) {
            let tail = strip_article(tail.trim_start());
            return format!("{head}. {parameter} is {tail}");
        }
    }

    let tokens: Vec<&str> = comment.split(' ').collect();
    let has_article = tokens.first().is_some_and(|t| ARTICLES.contains(t));
    let candidate = if has_article {
        tokens.get(1)
    } else {
        tokens.first()
    }
    .map(|t| t.trim_end_matches(['.', ',']))
    .unwrap_or("");
    if candidate.is_empty() {
        return comment;
    }

    let leads_with_adjective = ctx.graphs(&comment).iter().any(|graph| {
        graph
            .nodes_by_tag_prefix("JJ")
            .iter()
            .any(|w| w.text == candidate)
    });
    if !leads_with_adjective {
        return comment;
    }
    let body = match tokens.first() {
        Some(article) if has_article => comment.strip_prefix(article).unwrap_or(comment.as_str()),
        _ => comment.as_str(),
    };
    format!("{parameter} is {candidate}. {body}")
}

/// Last ", " whose continuation is not a tentative description
fn descriptive_comma(comment: &str) -> Option<(&str, &str)> {
    comment.rmatch_indices(", ").find_map(|(index, _)| {
        let tail = &comment[index + 2..];
        if TENTATIVE_OPENINGS.iter().any(|t| tail.starts_with(t)) {
            None
        } else {
            Some((&comment[..index], tail))
        }
    })
}

fn has_adjective(graphs: &[DependencyGraph]) -> bool {
    graphs
        .iter()
        .any(|graph| !graph.nodes_by_tag_prefix("JJ").is_empty())
}

fn strip_article(text: &str) -> &str {
    ARTICLES
        .iter()
        .find_map(|article| {
            text.strip_prefix(article)
                .and_then(|rest| rest.strip_prefix(' '))
        })
        .unwrap_or(text)
}

static SQUARE_BRACKETS_RANGE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"\b(not )?(lie )?(in|inside|within|out|outside) the ([\w\s]+)?(interval|range) (of )?\[([0-9]+) ?,? ?([0-9]+)\]",
    )
    .ok()
});

/// Rewrites "in the range [a, b]" into ">a and <b" and "outside the range
/// [a, b]" into "<a or >b"
pub fn expand_range(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    let Some(ref pattern) = *SQUARE_BRACKETS_RANGE else {
        return text.to_string();
    };

    let mut comment = text.to_string();
    loop {
        let Some((range, replacement)) = pattern.captures(&comment).and_then(|caps| {
            let min = caps.get(7)?.as_str().parse::<u64>().ok()?;
            let max = caps.get(8)?.as_str().parse::<u64>().ok()?;
            let negated = caps.get(1).is_some();
            let inside = matches!(caps.get(3)?.as_str(), "in" | "inside" | "within");
            let replacement = if inside != negated {
                format!(">{min} and <{max}")
            } else {
                format!("<{min} or >{max}")
            };
            Some((caps.get(0)?.range(), replacement))
        }) else {
            break;
        };
        comment.replace_range(range, &replacement);
    }
    comment
}

pub fn remove_commas(text: &str, ctx: &PreprocessContext<'_>) -> String {
    if ctx.remove_commas {
        text.replace(',', " ")
    } else {
        text.to_string()
    }
}

/// Drops "may be" and "can be": possibilities are not constraints
pub fn remove_may_be(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    text.replace("may be", "").replace("can be", "")
}

pub fn remove_initial_if(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    let mut comment = text;
    while comment
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("if "))
    {
        comment = &comment[3..];
    }
    comment.to_string()
}

/// Turns "if and only if" and "iff" into "if" and makes the implied
/// alternative explicit
pub fn normalize_ifs(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    if !(text.contains("if and only if") || text.starts_with("iff ") || text.contains(" iff ")) {
        return text.to_string();
    }

    let mut comment = text.replace("if and only if", "if").replace(" iff ", " if ");
    if let Some(rest) = comment.strip_prefix("iff ") {
        comment = format!("if {rest}");
    }
    if comment.ends_with('.') {
        comment.pop();
    }
    if comment.contains("true if") {
        comment.push_str(", false otherwise.");
    } else if comment.contains("null if") {
        comment.push_str(", non-null otherwise.");
    }
    comment
}

pub fn normalize_non_null_non_empty(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    text.replace("non-null", "!=null")
        .replace("nonnull", "!=null")
        .replace("non-empty", "not empty")
        .replace("nonempty", "not empty")
}

/// Replaces " it " with the first noun of the text
pub fn normalize_it(text: &str, ctx: &PreprocessContext<'_>) -> String {
    if !text.contains(" it ") {
        return text.to_string();
    }
    let graphs = ctx.graphs(text);
    match graphs.iter().find_map(|graph| graph.first_noun()) {
        Some(noun) => text.replace(" it ", &format!(" {} ", noun.text)),
        None => text.to_string(),
    }
}

/// "whether x is null" becomes "True if x is null, false otherwise."
pub fn normalize_whether(text: &str, _ctx: &PreprocessContext<'_>) -> String {
    let Some(rest) = text
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("whether"))
        .map(|_| &text[7..])
    else {
        return text.to_string();
    };
    let rest = rest.strip_suffix('.').unwrap_or(rest);
    format!("True if{rest}, false otherwise.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RuleBasedParser;
    use pretty_assertions::assert_eq;

    fn run(kind: TagKind, parameter: Option<&str>, text: &str) -> String {
        let parser = RuleBasedParser::new();
        let hints = ParseHints::new(parameter);
        let ctx = PreprocessContext {
            parameter,
            remove_commas: true,
            parser: &parser,
            hints: &hints,
        };
        preprocess(kind, text, &ctx)
    }

    #[test]
    fn test_param_negative_pattern() {
        assert_eq!(
            run(TagKind::Param, Some("x"), "must not be null nor empty"),
            ". x is not  null nor empty."
        );
    }

    #[test]
    fn test_param_positive_pattern_with_pronoun() {
        assert_eq!(
            run(TagKind::Param, Some("count"), "the count. It must be positive"),
            "the count. count is  positive."
        );
    }

    #[test]
    fn test_param_trailing_adjective_phrase() {
        assert_eq!(
            run(TagKind::Param, Some("key"), "the key to look up, not null"),
            "the key to look up. key is not null."
        );
    }

    #[test]
    fn test_param_leading_adjective() {
        assert_eq!(
            run(TagKind::Param, Some("list"), "the non-null list"),
            "list is !=null.  !=null list."
        );
    }

    #[test]
    fn test_throws_phases() {
        assert_eq!(
            run(TagKind::Throws, None, "if x is in the range [1, 5]"),
            "x is >1 and <5."
        );
        assert_eq!(
            run(TagKind::Throws, None, "If if x is outside the valid range [0,10]"),
            "x is <0 or >10."
        );
    }

    #[test]
    fn test_return_iff_adds_false_case() {
        assert_eq!(
            run(TagKind::Return, None, "true iff the list is non-empty"),
            "true if the list is not empty, false otherwise."
        );
        assert_eq!(
            run(TagKind::Return, None, "whether the list is empty"),
            "True if the list is empty, false otherwise."
        );
    }

    #[test]
    fn test_normalize_it_uses_first_noun() {
        let parser = RuleBasedParser::new();
        let hints = ParseHints::default();
        let ctx = PreprocessContext {
            parameter: None,
            remove_commas: false,
            parser: &parser,
            hints: &hints,
        };
        assert_eq!(
            normalize_it("if the buffer is full or it is closed.", &ctx),
            "if the buffer is full or buffer is closed."
        );
    }

    #[test]
    fn test_tentative_comma_phrases_are_kept() {
        let text = run(TagKind::Param, Some("size"), "the size, may be zero");
        assert!(!text.contains("size is"));
    }
}
