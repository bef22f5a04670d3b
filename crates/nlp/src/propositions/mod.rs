//! Logical propositions extracted from documentation sentences
//!
//! A sentence becomes a [`PropositionSeries`]: propositions (subject, predicate,
//! negation) linked by conjunctions. The translator fills in each proposition's
//! translation; the series then renders the condition of the sentence.

mod builder;

use crate::graph::Word;
use crate::normalize::PlaceholderTable;
use docguard_core::error::{Error, Result};
use docguard_core::notation;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use builder::build_series;

/// Logical connective between two propositions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    /// Maps the specific part of a `conj` relation; `but` and `nor` are conjunctive
    pub fn from_relation(specific: &str) -> Option<Self> {
        match specific {
            "and" | "but" | "nor" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => notation::AND,
            Self::Or => notation::OR,
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject of a proposition, with the container it ranges over ("any element in
/// `array`")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    words: Vec<Word>,
    text: String,
    container: String,
    singular: bool,
}

impl Subject {
    pub fn new(words: Vec<Word>, container: impl Into<String>, singular: bool) -> Self {
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            words,
            text,
            container: container.into(),
            singular,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Container reference, empty when the subject is not an element of a container
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn is_singular(&self) -> bool {
        self.singular
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.container.is_empty() {
            f.write_str(&self.text)
        } else {
            write!(f, "{} {}", self.text, self.container)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposition {
    subject: Subject,
    predicate: String,
    negative: bool,
    translation: Option<String>,
}

impl Proposition {
    pub fn new(subject: Subject, predicate: impl Into<String>, negative: bool) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            negative,
            translation: None,
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn set_translation(&mut self, translation: impl Into<String>) {
        self.translation = Some(translation.into());
    }

    fn restore(&mut self, table: &PlaceholderTable) {
        self.subject.text = table.restore(&self.subject.text);
        self.subject.container = table.restore(&self.subject.container);
        self.predicate = table.restore(&self.predicate);
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, ", self.subject)?;
        if self.negative {
            f.write_str("not ")?;
        }
        write!(f, "{})", self.predicate)?;
        if let Some(translation) = &self.translation {
            write!(f, " -> {translation}")?;
        }
        Ok(())
    }
}

/// Propositions of one sentence joined by conjunctions
///
/// Always holds one conjunction fewer than propositions (none when empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropositionSeries {
    propositions: Vec<Proposition>,
    conjunctions: Vec<Conjunction>,
}

impl PropositionSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the first proposition of an empty series
    pub fn add_first(&mut self, proposition: Proposition) -> Result<()> {
        if !self.propositions.is_empty() {
            return Err(Error::invalid_input(
                "Proposition series is not empty; a conjunction is required",
            ));
        }
        self.propositions.push(proposition);
        Ok(())
    }

    /// Appends a proposition to a non-empty series
    pub fn add(&mut self, conjunction: Conjunction, proposition: Proposition) -> Result<()> {
        if self.propositions.is_empty() {
            return Err(Error::invalid_input(
                "Proposition series is empty; the first proposition takes no conjunction",
            ));
        }
        self.conjunctions.push(conjunction);
        self.propositions.push(proposition);
        Ok(())
    }

    pub fn contains(&self, proposition: &Proposition) -> bool {
        self.propositions.contains(proposition)
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    pub fn propositions_mut(&mut self) -> &mut [Proposition] {
        &mut self.propositions
    }

    pub fn conjunctions(&self) -> &[Conjunction] {
        &self.conjunctions
    }

    /// Replaces placeholders in every subject and predicate with their literals
    pub fn restore_placeholders(&mut self, table: &PlaceholderTable) {
        for proposition in &mut self.propositions {
            proposition.restore(table);
        }
    }

    /// Condition of the whole series
    ///
    /// Translated propositions are joined with the conjunction preceding each of
    /// them; untranslated ones and repeated translations are skipped. Empty when
    /// nothing was translated.
    pub fn translation(&self) -> String {
        let mut output = String::new();
        let mut seen: Vec<&str> = Vec::new();
        for (i, proposition) in self.propositions.iter().enumerate() {
            let Some(translation) = proposition.translation().filter(|t| !t.is_empty()) else {
                continue;
            };
            if seen.contains(&translation) {
                continue;
            }
            if !seen.is_empty() {
                if let Some(conjunction) = i.checked_sub(1).and_then(|j| self.conjunctions.get(j)) {
                    output.push_str(conjunction.as_str());
                }
            }
            output.push_str(translation);
            seen.push(translation);
        }
        output
    }
}

impl fmt::Display for PropositionSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, proposition) in self.propositions.iter().enumerate() {
            if let Some(conjunction) = i.checked_sub(1).and_then(|j| self.conjunctions.get(j)) {
                write!(f, "{conjunction}")?;
            }
            write!(f, "{proposition}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn proposition(subject: &str, predicate: &str, negative: bool) -> Proposition {
        let words = vec![Word::new(0, subject, "NN")];
        Proposition::new(Subject::new(words, "", true), predicate, negative)
    }

    #[test]
    fn test_series_conjunction_invariant() {
        let mut series = PropositionSeries::new();
        assert!(series.add(Conjunction::Or, proposition("x", "is null", false)).is_err());

        series.add_first(proposition("x", "is null", false)).unwrap();
        assert!(series.add_first(proposition("y", "is null", false)).is_err());
        series
            .add(Conjunction::And, proposition("y", "is null", false))
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.conjunctions().len(), series.len() - 1);
        assert!(series.contains(&proposition("y", "is null", false)));
        assert!(!series.contains(&proposition("y", "is null", true)));
    }

    #[test]
    fn test_translation_skips_failures_and_duplicates() {
        let mut series = PropositionSeries::new();
        series.add_first(proposition("x", "is null", false)).unwrap();
        series.add(Conjunction::Or, proposition("y", "is null", false)).unwrap();
        series.add(Conjunction::And, proposition("z", "is empty", false)).unwrap();
        series.add(Conjunction::Or, proposition("x", "is null", false)).unwrap();
        assert_eq!(series.translation(), "");

        let props = series.propositions_mut();
        props[0].set_translation("args[0]==null");
        props[1].set_translation("");
        props[2].set_translation("args[2].isEmpty()");
        props[3].set_translation("args[0]==null");
        assert_eq!(series.translation(), "args[0]==null && args[2].isEmpty()");
    }

    #[test]
    fn test_restore_placeholders() {
        let table = crate::normalize::normalize("x > 3").placeholders;
        let mut series = PropositionSeries::new();
        series
            .add_first(proposition("x", "is INEQUALITY_0", false))
            .unwrap();
        series.restore_placeholders(&table);
        assert_eq!(series.propositions()[0].predicate(), "is > 3");
        assert_eq!(series.to_string(), "(x, is > 3)");
    }
}
