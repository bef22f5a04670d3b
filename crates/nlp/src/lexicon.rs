//! Closed word classes and part-of-speech tagging for documentation English
//!
//! Tags follow the Penn Treebank tag set. Documentation comments use a small
//! vocabulary, so closed classes are listed and open classes are guessed from
//! suffixes, with nouns as the fallback.

use crate::graph::Word;
use crate::normalize::is_placeholder;
use crate::parser::ParseHints;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").ok());

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "any", "all", "each", "every", "some", "no", "this", "that", "these",
    "those", "either", "both", "neither", "another",
];

const PRONOUNS: &[&str] = &["it", "they", "them", "its", "their"];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor"];

const PREPOSITIONS: &[&str] = &[
    "in", "of", "to", "than", "for", "with", "if", "when", "whenever", "whether", "unless", "on",
    "at", "by", "from", "within", "into", "as", "because", "since", "while", "inside", "outside",
    "between", "after", "before", "then", "otherwise",
];

const SUBORDINATORS: &[&str] = &[
    "if", "when", "whenever", "whether", "unless", "because", "since", "while", "then",
    "otherwise",
];

const MODALS: &[&str] = &[
    "must", "will", "should", "can", "may", "might", "could", "shall", "would",
];

const NEGATIONS: &[&str] = &["not", "never", "n't"];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

const ADJECTIVES: &[&str] = &[
    "null", "nonnull", "non-null", "empty", "negative", "positive", "true", "false", "equal",
    "greater", "less", "smaller", "larger", "bigger", "valid", "invalid", "same", "different",
    "odd", "even", "open", "closed", "finite", "infinite", "nan", "unique", "sorted", "unsorted",
    "immutable", "mutable", "present", "absent", "legal", "illegal", "full", "blank",
    "consistent", "inconsistent", "inclusive", "exclusive", "nonnegative", "non-negative",
    "nonpositive", "non-positive", "existing", "large", "small", "long", "short", "big",
    "new", "old", "current", "initial", "final", "first", "last", "maximum", "minimum",
    "undefined", "unknown", "identical", "distinct", "ready", "busy", "active", "inactive",
    "alive", "dead", "strict", "lenient", "wrong", "right", "proper", "improper",
];

const SUFFIX_ADJECTIVES: &[&str] = &["able", "ible", "ous", "ful", "less", "ive"];

/// Third person singular verbs seen in documentation predicates
const VERBS_3SG: &[&str] = &[
    "contains", "has", "equals", "exceeds", "matches", "includes", "refers",
    "represents", "returns", "throws", "holds", "overflows", "occurs", "exists", "belongs",
    "lies", "implements", "extends", "supports", "starts", "ends", "consists",
    "specifies", "denotes", "indicates", "satisfies", "differs", "appears", "fits", "fails",
    "overlaps", "intersects", "precedes", "follows", "corresponds", "becomes",
    "remains", "wraps", "accepts", "allows", "permits", "requires",
];

const PLURAL_VERBS: &[&str] = &["have", "contain", "exist", "match", "overlap", "differ"];

const IRREGULAR_PARTICIPLES: &[&str] = &[
    "set", "given", "known", "found", "built", "made", "done", "run", "shown", "taken",
    "written", "read", "held", "kept", "thrown", "chosen", "frozen", "broken", "hidden", "seen",
    "bound", "put", "sent", "spent", "left", "lost", "meant",
];

pub fn is_determiner(lower: &str) -> bool {
    DETERMINERS.contains(&lower)
}

pub fn is_preconjunction(lower: &str) -> bool {
    matches!(lower, "either" | "both" | "neither")
}

pub fn is_copula(lower: &str) -> bool {
    matches!(lower, "is" | "are" | "was" | "were" | "be" | "been" | "being")
}

pub fn is_modal(lower: &str) -> bool {
    MODALS.contains(&lower)
}

pub fn is_do_support(lower: &str) -> bool {
    matches!(lower, "does" | "do" | "did")
}

pub fn is_negation(lower: &str) -> bool {
    NEGATIONS.contains(&lower)
}

pub fn is_subordinator(lower: &str) -> bool {
    SUBORDINATORS.contains(&lower)
}

/// Conjunction kind of a coordinating word (`and`, `or`, `but`, `nor`)
pub fn conjunction(lower: &str) -> Option<&'static str> {
    CONJUNCTIONS.iter().copied().find(|c| *c == lower)
}

/// Whether the word is a nominal used as a generic head after an adjective
/// ("a negative number", "an empty string")
pub fn is_generic_noun(lower: &str) -> bool {
    matches!(
        lower,
        "number" | "value" | "integer" | "string" | "array" | "list" | "collection" | "set"
            | "map" | "object" | "reference" | "one" | "amount" | "quantity" | "index"
    )
}

/// Tags one token; `hints` name program elements, which are always nouns
pub fn tag_word(token: &str, hints: &ParseHints) -> &'static str {
    if is_placeholder(token) {
        return "JJ";
    }
    if matches!(token, "null" | "nonnull" | "non-null") {
        return "JJ";
    }
    if hints.contains(token) {
        return "NN";
    }
    if token == "," {
        return ",";
    }
    if token == "'s" {
        return "POS";
    }

    let lower = token.to_lowercase();
    let lower = lower.as_str();

    if is_negation(lower) {
        return "RB";
    }
    if is_determiner(lower) {
        return "DT";
    }
    if PRONOUNS.contains(&lower) {
        return if lower.ends_with('s') || lower == "their" {
            "PRP$"
        } else {
            "PRP"
        };
    }
    if conjunction(lower).is_some() {
        return "CC";
    }
    if PREPOSITIONS.contains(&lower) {
        return "IN";
    }
    if is_modal(lower) {
        return "MD";
    }
    match lower {
        "is" | "does" => return "VBZ",
        "are" | "do" => return "VBP",
        "was" | "were" | "did" => return "VBD",
        "be" => return "VB",
        "been" => return "VBN",
        "being" => return "VBG",
        _ => {}
    }
    if NUMBER_WORDS.contains(&lower)
        || NUMBER
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(lower))
    {
        return "CD";
    }
    if ADJECTIVES.contains(&lower)
        || lower.starts_with("non-")
        || (lower.starts_with("un") && lower.ends_with("ed"))
    {
        return "JJ";
    }
    if VERBS_3SG.contains(&lower) {
        return "VBZ";
    }
    if PLURAL_VERBS.contains(&lower) {
        return "VBP";
    }
    if IRREGULAR_PARTICIPLES.contains(&lower) || (lower.len() > 4 && lower.ends_with("ed")) {
        return "VBN";
    }
    if lower.len() > 4
        && SUFFIX_ADJECTIVES
            .iter()
            .any(|suffix| lower.ends_with(suffix))
    {
        return "JJ";
    }
    if is_plural_noun(lower) {
        return "NNS";
    }
    "NN"
}

fn is_plural_noun(lower: &str) -> bool {
    lower.len() > 3
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
        && lower.chars().all(|c| c.is_alphabetic())
}

/// Tags a token sequence, producing the words of a sentence graph
pub fn tag_tokens(tokens: &[String], hints: &ParseHints) -> Vec<Word> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| Word::new(index, token.clone(), tag_word(token, hints)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_classes() {
        let hints = ParseHints::default();
        assert_eq!(tag_word("The", &hints), "DT");
        assert_eq!(tag_word("must", &hints), "MD");
        assert_eq!(tag_word("n't", &hints), "RB");
        assert_eq!(tag_word("nor", &hints), "CC");
        assert_eq!(tag_word("is", &hints), "VBZ");
        assert_eq!(tag_word("3", &hints), "CD");
        assert_eq!(tag_word("zero", &hints), "CD");
    }

    #[test]
    fn test_open_classes() {
        let hints = ParseHints::default();
        assert_eq!(tag_word("null", &hints), "JJ");
        assert_eq!(tag_word("INEQUALITY_3", &hints), "JJ");
        assert_eq!(tag_word("modifiable", &hints), "JJ");
        assert_eq!(tag_word("contains", &hints), "VBZ");
        assert_eq!(tag_word("removed", &hints), "VBN");
        assert_eq!(tag_word("elements", &hints), "NNS");
        assert_eq!(tag_word("status", &hints), "NN");
        assert_eq!(tag_word("map", &hints), "NN");
    }

    #[test]
    fn test_hints_force_nouns() {
        let hints = ParseHints::new(["set", "values"]);
        assert_eq!(tag_word("set", &hints), "NN");
        assert_eq!(tag_word("values", &hints), "NN");
        assert_eq!(tag_word("null", &hints), "JJ");
    }
}
