//! Dependency graph to proposition series

use super::{Conjunction, Proposition, PropositionSeries, Subject};
use crate::graph::{DependencyGraph, Word};
use crate::parser::ParseHints;
use docguard_core::error::Result;
use std::collections::{BTreeSet, VecDeque};
use tracing::{trace, warn};

const SUBJECT_RELATIONS: &[&str] = &["nsubj", "nsubjpass"];
const COMPLEMENT_RELATIONS: &[&str] = &["acomp", "xcomp", "dobj"];
const CONJUNCTION_RELATIONS: &[&str] = &["conj:and", "conj:or", "conj:but", "conj:nor"];
const SUBJECT_MODIFIERS: &[&str] = &["compound", "advmod", "amod", "det", "nmod:poss", "nmod:of"];
const SKIPPED_SUBJECT_WORDS: &[&str] = &["a", "an", "the"];

/// A proposition with the graph words it was built from
struct Entry {
    key: Vec<usize>,
    proposition: Proposition,
}

/// Builds the proposition series of one sentence graph
pub fn build_series(graph: &DependencyGraph, hints: &ParseHints) -> Result<PropositionSeries> {
    let mut entries: Vec<Entry> = Vec::new();

    for edge in graph.relations(SUBJECT_RELATIONS) {
        let governor = edge.governor;
        let Some(predicate_words) = predicate_of(graph, governor) else {
            warn!(
                "No predicate found for subject \"{}\" in \"{}\"",
                word_text(graph, edge.dependent),
                graph.text()
            );
            continue;
        };

        let (subject_words, subject) = subject_of(graph, edge.dependent, hints);
        let negations = graph
            .out_edges_sorted(governor)
            .iter()
            .filter(|e| e.relation.is("neg"))
            .count();
        let predicate = predicate_words
            .iter()
            .map(|&i| word_text(graph, i))
            .collect::<Vec<_>>()
            .join(" ");

        let mut key = subject_words;
        key.extend(predicate_words);
        let proposition = Proposition::new(subject, predicate, negations % 2 == 1);
        trace!("Proposition {proposition}");

        match entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => existing.proposition = proposition,
            None => entries.push(Entry { key, proposition }),
        }
    }

    let mut series = PropositionSeries::new();
    for edge in graph.relations(CONJUNCTION_RELATIONS) {
        let Some(conjunction) = edge
            .relation
            .specific
            .as_deref()
            .and_then(Conjunction::from_relation)
        else {
            continue;
        };

        let first = entries.iter().position(|e| e.key.contains(&edge.governor));
        let second = entries.iter().position(|e| e.key.contains(&edge.dependent));
        let (Some(first), Some(second)) = (first, second) else {
            continue;
        };
        if first == second {
            continue;
        }

        let p1 = &entries[first].proposition;
        let p2 = &entries[second].proposition;
        if series.is_empty() {
            series.add_first(p1.clone())?;
        } else if !series.contains(p1) {
            series.add(conjunction, p1.clone())?;
        }
        if !series.contains(p2) {
            series.add(conjunction, p2.clone())?;
        }
    }

    // unlinked propositions are alternatives
    for entry in entries {
        if series.contains(&entry.proposition) {
            continue;
        }
        if series.is_empty() {
            series.add_first(entry.proposition)?;
        } else {
            series.add(Conjunction::Or, entry.proposition)?;
        }
    }

    Ok(series)
}

fn word_text(graph: &DependencyGraph, index: usize) -> &str {
    graph.word(index).map(|w| w.text.as_str()).unwrap_or("")
}

fn first_dependent(graph: &DependencyGraph, governor: usize, relations: &[&str]) -> Option<usize> {
    graph
        .out_edges_sorted(governor)
        .iter()
        .find(|e| relations.iter().any(|r| e.relation.is(r)))
        .map(|e| e.dependent)
}

/// Words of the predicate headed by `governor`, in sentence order
fn predicate_of(graph: &DependencyGraph, governor: usize) -> Option<Vec<usize>> {
    let mut words = predicate_words(graph, governor)?;
    words.sort_unstable();
    words.dedup();
    Some(words)
}

fn predicate_words(graph: &DependencyGraph, governor: usize) -> Option<Vec<usize>> {
    if let Some(copula) = first_dependent(graph, governor, &["cop"]) {
        return Some(vec![copula, governor]);
    }
    if let Some(auxpass) = first_dependent(graph, governor, &["auxpass"]) {
        return Some(vec![auxpass, governor]);
    }
    if let Some(complement) = first_dependent(graph, governor, COMPLEMENT_RELATIONS) {
        let mut words = vec![governor, complement];
        words.extend(first_dependent(graph, complement, &["nummod"]));
        return Some(words);
    }

    // shared complement of a conjoined verb: "contains or excludes null"
    for conj in graph.relations(CONJUNCTION_RELATIONS) {
        if conj.governor == governor {
            if let Some(complement) = first_dependent(graph, conj.dependent, COMPLEMENT_RELATIONS)
            {
                return Some(vec![governor, complement]);
            }
        }
    }
    // conjoined complement of a copula: "is null or empty"
    for conj in graph.relations(CONJUNCTION_RELATIONS) {
        if conj.dependent == governor {
            if let Some(copula) = first_dependent(graph, conj.governor, &["cop"]) {
                return Some(vec![copula, governor]);
            }
        }
    }

    if let Some(aux) = first_dependent(graph, governor, &["aux"]) {
        return Some(vec![aux, governor]);
    }
    None
}

/// Subject word indices and the subject they form
fn subject_of(graph: &DependencyGraph, head: usize, hints: &ParseHints) -> (Vec<usize>, Subject) {
    let subject_words = phrase_words(graph, head, hints);
    let container = first_dependent(graph, head, &["nmod:in"])
        .map(|c| {
            phrase_words(graph, c, hints)
                .iter()
                .map(|&i| word_text(graph, i))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let words: Vec<Word> = subject_words
        .iter()
        .filter_map(|&i| graph.word(i).cloned())
        .collect();
    let singular = words
        .last()
        .is_some_and(|w| w.tag == "NN" || hints.contains(&w.text));

    (subject_words, Subject::new(words, container, singular))
}

/// `head` and its modifiers, breadth-first, without articles, in sentence order
///
/// A word spelled like an article is kept when it names a program element.
fn phrase_words(graph: &DependencyGraph, head: usize, hints: &ParseHints) -> Vec<usize> {
    let mut collected = BTreeSet::new();
    let mut visited = BTreeSet::from([head]);
    let mut queue = VecDeque::from([head]);

    while let Some(current) = queue.pop_front() {
        let skipped = graph.word(current).is_some_and(|word| {
            word.tag == "DT"
                && !hints.contains(&word.text)
                && SKIPPED_SUBJECT_WORDS
                    .iter()
                    .any(|a| word.text.eq_ignore_ascii_case(a))
        });
        if !skipped {
            collected.insert(current);
        }
        for edge in graph.out_edges_sorted(current) {
            if SUBJECT_MODIFIERS.iter().any(|r| edge.relation.is(r))
                && visited.insert(edge.dependent)
            {
                queue.push_back(edge.dependent);
            }
        }
    }
    collected.into_iter().collect()
}
