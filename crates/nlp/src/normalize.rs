//! Lexical normalization of relational phrases into placeholders
//!
//! Relational wording ("greater than or equal to 3", "an instance of Foo") is
//! rewritten into operators and then hidden behind `INEQUALITY_<n>` tokens so the
//! sentence parser sees a plain adjective. The literals are kept in a
//! [`PlaceholderTable`] owned by the pass and are put back into subjects and
//! predicates once propositions are built.

use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const PLACEHOLDER_PREFIX: &str = "INEQUALITY_";

/// Relational phrases and their symbols, applied in order
const RELATIONAL_PHRASES: &[(&str, &str)] = &[
    ("greater than or equal to", ">="),
    ("≥", ">="),
    ("less than or equal to", "<="),
    ("lesser than or equal to", "<="),
    ("lesser or equal to", "<="),
    ("≤", "<="),
    ("greater than", ">"),
    ("smaller than or equal to", "<="),
    ("smaller than", "<"),
    ("less than", "<"),
    ("lesser than", "<"),
    ("equal to", "=="),
    ("at most", "<="),
    ("at least", ">="),
];

/// Verbs one of which must directly precede a comparison placeholder
const COMPARISON_VERBS: &[&str] = &["is", "is not", "isn't", "are", "are not", "aren't"];

static INSTANCE_OF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\s*\b(?:an?\s+)?instance of\b").ok());

static INSTANCEOF_TYPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r" instanceof +[^ .]*").ok());

static THIS_REFERENCE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r" this\.").ok());

static NUMBER_COMPARISON: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r" *(?:[<>=]=?|!=) ?-?(?:[0-9]+(?:\.[0-9]+)?|zero|one|two|three|four|five|six|seven|eight|nine)\b",
    )
    .ok()
});

static IDENTIFIER_COMPARISON: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r" *(?:[<>=]=?|!=) ?([A-Za-z][A-Za-z0-9_]*(?:\.[A-Za-z][A-Za-z0-9_]*(?:\(\))?)?)",
    )
    .ok()
});

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"INEQUALITY_([0-9]+)").ok());

/// Whether a token is a placeholder produced by [`normalize`]
pub fn is_placeholder(token: &str) -> bool {
    token
        .strip_prefix(PLACEHOLDER_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Literals hidden behind the placeholders of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PlaceholderTable {
    literals: Vec<String>,
}

impl PlaceholderTable {
    fn push(&mut self, literal: &str) -> usize {
        self.literals.push(literal.trim().to_string());
        self.literals.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.literals.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Replaces every placeholder in `text` with its literal
    ///
    /// Unknown placeholder numbers are left untouched.
    pub fn restore(&self, text: &str) -> String {
        if self.literals.is_empty() {
            return text.to_string();
        }
        match *PLACEHOLDER {
            Some(ref pattern) => pattern
                .replace_all(text, |caps: &Captures| {
                    caps[1]
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| self.get(i))
                        .map(str::to_string)
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// Output of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Normalized {
    pub text: String,
    pub placeholders: PlaceholderTable,
}

/// Rewrites relational phrases and hides comparisons behind placeholders
pub fn normalize(text: &str) -> Normalized {
    let mut text = RELATIONAL_PHRASES
        .iter()
        .fold(text.to_string(), |acc, (phrase, symbol)| {
            acc.replace(phrase, symbol)
        });

    if let Some(ref pattern) = *INSTANCE_OF {
        text = pattern.replace_all(&text, " instanceof").into_owned();
    }

    let mut table = PlaceholderTable::default();

    // instanceof targets never get a copula
    if let Some(ref pattern) = *INSTANCEOF_TYPE {
        loop {
            let Some(range) = pattern.find(&text).map(|m| m.range()) else {
                break;
            };
            let index = table.push(&text[range.clone()]);
            text.replace_range(range, &format!(" {PLACEHOLDER_PREFIX}{index}"));
        }
    }

    // `this.` at the end of a sentence; the period stays so sentences still split
    if let Some(ref pattern) = *THIS_REFERENCE {
        loop {
            let Some(range) = pattern
                .find_iter(&text)
                .find(|m| text[m.end()..].chars().next().is_none_or(char::is_whitespace))
                .map(|m| m.start()..m.end() - 1)
            else {
                break;
            };
            let index = table.push("this");
            text.replace_range(range, &format!(" {PLACEHOLDER_PREFIX}{index}"));
            text = insert_verb(text, index);
        }
    }

    if let Some(ref pattern) = *NUMBER_COMPARISON {
        loop {
            let Some(range) = pattern
                .find_iter(&text)
                .find(|m| !text[m.end()..].starts_with('/'))
                .map(|m| m.range())
            else {
                break;
            };
            let index = table.push(&text[range.clone()]);
            text.replace_range(range, &format!(" {PLACEHOLDER_PREFIX}{index}"));
            text = insert_verb(text, index);
        }
    }

    if let Some(ref pattern) = *IDENTIFIER_COMPARISON {
        loop {
            let found = pattern
                .captures_iter(&text)
                .find(|caps| !caps[1].starts_with("this"))
                .and_then(|caps| caps.get(0))
                .map(|m| (m.range(), m.as_str().to_string()));
            let Some((range, literal)) = found else {
                break;
            };
            let index = table.push(&literal);
            text.replace_range(range, &format!(" {PLACEHOLDER_PREFIX}{index}"));
            text = insert_verb(text, index);
        }
    }

    Normalized {
        text,
        placeholders: table,
    }
}

/// Inserts "is" before placeholder `index` unless a comparison verb precedes it
fn insert_verb(text: String, index: usize) -> String {
    let placeholder = format!(" {PLACEHOLDER_PREFIX}{index}");
    let Some(start) = text.find(&placeholder) else {
        return text;
    };
    let before = text[..start].trim_end();
    let has_verb = COMPARISON_VERBS.iter().any(|verb| {
        before == *verb
            || before
                .strip_suffix(verb)
                .is_some_and(|rest| rest.ends_with(' '))
    });
    if has_verb {
        return text;
    }
    format!("{} is{}", &text[..start], &text[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_number_comparison_gets_placeholder_and_verb() {
        let normalized = normalize("x greater than or equal to 3.");
        assert_eq!(normalized.text, "x is INEQUALITY_0.");
        assert_eq!(normalized.placeholders.get(0), Some(">= 3"));
        assert_eq!(normalized.placeholders.restore("is INEQUALITY_0"), "is >= 3");
    }

    #[test]
    fn test_existing_verb_is_kept() {
        let normalized = normalize("x is not less than zero.");
        assert_eq!(normalized.text, "x is not INEQUALITY_0.");
        assert_eq!(normalized.placeholders.get(0), Some("< zero"));
    }

    #[test]
    fn test_instanceof_has_no_verb_insertion() {
        let normalized = normalize("obj is an instance of Foo.");
        assert_eq!(normalized.text, "obj is INEQUALITY_0.");
        assert_eq!(normalized.placeholders.get(0), Some("instanceof Foo"));
    }

    #[test]
    fn test_identifier_comparison() {
        let normalized = normalize("x is !=null and lo at most hi.");
        assert_eq!(normalized.text, "x is INEQUALITY_0 and lo is INEQUALITY_1.");
        assert_eq!(normalized.placeholders.get(0), Some("!=null"));
        assert_eq!(normalized.placeholders.get(1), Some("<= hi"));
    }

    #[test]
    fn test_fractions_are_not_numbers() {
        let normalized = normalize("ratio < 1/2");
        assert!(normalized.placeholders.is_empty());
    }

    #[test]
    fn test_this_reference_keeps_sentence_end() {
        let normalized = normalize("the result is this. x is null.");
        assert_eq!(normalized.text, "the result is INEQUALITY_0. x is null.");
        assert_eq!(normalized.placeholders.restore("is INEQUALITY_0"), "is this");
    }

    #[test]
    fn test_restore_leaves_unknown_placeholders() {
        let table = normalize("x > 1").placeholders;
        assert_eq!(table.restore("INEQUALITY_0 INEQUALITY_7"), "> 1 INEQUALITY_7");
    }

    #[test]
    fn test_is_placeholder() {
        assert!(is_placeholder("INEQUALITY_12"));
        assert!(!is_placeholder("INEQUALITY_"));
        assert!(!is_placeholder("INEQUALITY_1a"));
    }
}
