//! Sentence parsing into dependency graphs
//!
//! Parsing engines sit behind [`SentenceParser`]. The built-in engine is
//! [`RuleBasedParser`]; other engines plug in through the trait and are selected
//! by [`create_sentence_parser`].

mod rule_based;

use crate::graph::DependencyGraph;
use docguard_core::config::ParserConfig;
use docguard_core::error::{Error, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub use rule_based::RuleBasedParser;

/// Words of the text known to name program elements
///
/// Matching tokens are tagged as nouns regardless of the lexicon. Matching is
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParseHints {
    identifiers: BTreeSet<String>,
}

impl ParseHints {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hints = Self::default();
        hints.extend(identifiers);
        hints
    }

    pub fn insert(&mut self, identifier: &str) {
        let identifier = identifier.trim();
        if !identifier.is_empty() {
            self.identifiers.insert(identifier.to_lowercase());
        }
    }

    pub fn extend<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for identifier in identifiers {
            self.insert(identifier.as_ref());
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.identifiers.contains(&token.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

/// Turns text into one dependency graph per sentence
pub trait SentenceParser: Send + Sync {
    /// Engine name, as used in configuration
    fn name(&self) -> &'static str;

    /// Parses `text`, which may hold several sentences
    ///
    /// Placeholders produced by normalization must be tagged as adjectives and
    /// hinted identifiers as nouns.
    fn parse(&self, text: &str, hints: &ParseHints) -> Result<Vec<DependencyGraph>>;
}

/// Create a sentence parser based on configuration
pub fn create_sentence_parser(config: &ParserConfig) -> Result<Arc<dyn SentenceParser>> {
    match config.engine.as_str() {
        "rule_based" => {
            debug!("Creating rule-based sentence parser");
            Ok(Arc::new(RuleBasedParser::new()))
        }
        other => Err(Error::config(format!(
            "Unknown parser engine: '{other}'. Valid engines: rule_based"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_are_case_insensitive() {
        let hints = ParseHints::new(["myMap", "result"]);
        assert!(hints.contains("mymap"));
        assert!(hints.contains("Result"));
        assert!(!hints.contains("map"));
    }

    #[test]
    fn test_factory_rejects_unknown_engine() {
        let config = ParserConfig {
            engine: "corenlp".to_string(),
            cache_enabled: true,
        };
        let err = create_sentence_parser(&config).err().map(|e| e.to_string());
        assert!(err.is_some_and(|e| e.contains("Unknown parser engine")));

        let parser = create_sentence_parser(&ParserConfig::default()).unwrap();
        assert_eq!(parser.name(), "rule_based");
    }
}
