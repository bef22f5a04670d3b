//! Typed dependency graph of one sentence

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token of a sentence with its part-of-speech tag (Penn Treebank tag set)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    /// Position in the sentence, starting at 0
    pub index: usize,
    pub text: String,
    pub tag: String,
}

impl Word {
    pub fn new(index: usize, text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            tag: tag.into(),
        }
    }

    pub fn is_noun(&self) -> bool {
        self.tag.starts_with("NN")
    }

    pub fn is_adjective(&self) -> bool {
        self.tag.starts_with("JJ")
    }

    pub fn is_verb(&self) -> bool {
        self.tag.starts_with("VB")
    }
}

/// Grammatical relation of an edge (`nsubj`, `conj:or`, `nmod:in`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub specific: Option<String>,
}

impl Relation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specific: None,
        }
    }

    pub fn with_specific(name: impl Into<String>, specific: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specific: Some(specific.into()),
        }
    }

    /// Parses `name` or `name:specific`
    pub fn parse(identifier: &str) -> Self {
        match identifier.split_once(':') {
            Some((name, specific)) => Self::with_specific(name, specific),
            None => Self::new(identifier),
        }
    }

    /// Exact identifier match: `conj` does not match `conj:and`
    pub fn is(&self, identifier: &str) -> bool {
        match (&self.specific, identifier.split_once(':')) {
            (None, None) => self.name == identifier,
            (Some(specific), Some((name, spec))) => self.name == name && specific == spec,
            _ => false,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specific {
            Some(specific) => write!(f, "{}:{}", self.name, specific),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub governor: usize,
    pub relation: Relation,
    pub dependent: usize,
}

/// Words of a sentence and the typed edges between them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    words: Vec<Word>,
    edges: Vec<Edge>,
    root: Option<usize>,
}

impl DependencyGraph {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            edges: Vec::new(),
            root: None,
        }
    }

    /// Adds an edge unless an identical one exists
    pub fn add_edge(&mut self, governor: usize, relation: Relation, dependent: usize) {
        let edge = Edge {
            governor,
            relation,
            dependent,
        };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub fn set_root(&mut self, index: usize) {
        self.root = Some(index);
    }

    /// Overrides the part-of-speech tag of a word
    pub fn set_tag(&mut self, index: usize, tag: &str) {
        if let Some(word) = self.words.get_mut(index) {
            word.tag = tag.to_string();
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Edges whose relation identifier is one of `identifiers`, in insertion order
    pub fn relations(&self, identifiers: &[&str]) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| identifiers.iter().any(|id| e.relation.is(id)))
            .collect()
    }

    /// Outgoing edges of a word, sorted by dependent position
    pub fn out_edges_sorted(&self, governor: usize) -> Vec<&Edge> {
        let mut out: Vec<&Edge> = self
            .edges
            .iter()
            .filter(|e| e.governor == governor)
            .collect();
        out.sort_by_key(|e| e.dependent);
        out
    }

    pub fn nodes_by_tag_prefix(&self, prefix: &str) -> Vec<&Word> {
        self.words
            .iter()
            .filter(|w| w.tag.starts_with(prefix))
            .collect()
    }

    pub fn first_noun(&self) -> Option<&Word> {
        self.words.iter().find(|w| w.is_noun())
    }

    pub fn root(&self) -> Option<&Word> {
        self.root.and_then(|i| self.words.get(i))
    }

    /// The sentence as a space-separated token string
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |i: usize| {
            self.words
                .get(i)
                .map(|w| format!("{}-{}", w.text, i))
                .unwrap_or_else(|| format!("?-{i}"))
        };
        if let Some(root) = self.root {
            writeln!(f, "root({})", label(root))?;
        }
        for edge in &self.edges {
            writeln!(
                f,
                "{}({}, {})",
                edge.relation,
                label(edge.governor),
                label(edge.dependent)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyGraph {
        let mut graph = DependencyGraph::new(vec![
            Word::new(0, "either", "DT"),
            Word::new(1, "x", "NN"),
            Word::new(2, "or", "CC"),
            Word::new(3, "y", "NN"),
            Word::new(4, "is", "VBZ"),
            Word::new(5, "null", "JJ"),
        ]);
        graph.add_edge(5, Relation::new("nsubj"), 1);
        graph.add_edge(5, Relation::new("nsubj"), 3);
        graph.add_edge(5, Relation::new("cop"), 4);
        graph.add_edge(1, Relation::new("det"), 0);
        graph.add_edge(1, Relation::with_specific("conj", "or"), 3);
        graph.set_root(5);
        graph
    }

    #[test]
    fn test_relation_identifiers_match_exactly() {
        let conj_or = Relation::parse("conj:or");
        assert!(conj_or.is("conj:or"));
        assert!(!conj_or.is("conj"));
        assert!(!Relation::new("conj").is("conj:or"));
        assert_eq!(conj_or.to_string(), "conj:or");
    }

    #[test]
    fn test_graph_queries() {
        let graph = sample();
        assert_eq!(graph.relations(&["nsubj", "nsubjpass"]).len(), 2);
        assert_eq!(graph.relations(&["conj:and", "conj:or"]).len(), 1);
        assert_eq!(graph.first_noun().map(|w| w.text.as_str()), Some("x"));
        assert_eq!(graph.root().map(|w| w.text.as_str()), Some("null"));

        let out: Vec<usize> = graph.out_edges_sorted(5).iter().map(|e| e.dependent).collect();
        assert_eq!(out, vec![1, 3, 4]);
    }

    #[test]
    fn test_duplicate_edges_are_ignored() {
        let mut graph = sample();
        let before = graph.edges().len();
        graph.add_edge(5, Relation::new("cop"), 4);
        assert_eq!(graph.edges().len(), before);
    }
}
