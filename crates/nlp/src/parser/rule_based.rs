//! Built-in shallow dependency parser for documentation sentences
//!
//! Documentation sentences are short and regular: a subject noun phrase
//! (possibly coordinated), then a copular, passive or verbal predicate, with
//! coordination between complements, predicates and whole clauses. The parser
//! recognizes that shape and emits Universal-Dependencies-style edges:
//!
//! - subjects: `nsubj`, `nsubjpass`, propagated to every conjoined predicate
//! - predicates: `cop`, `auxpass`, `aux`, `neg`, `acomp`/`xcomp`/`dobj`, `nummod`
//! - subject modifiers: `det`, `amod`, `compound`, `nmod:poss`, `nmod:of`, `nmod:in`
//! - coordination: `conj:and`, `conj:or`, `conj:but`, `conj:nor` and `cc`
//!
//! Pre-conjunctions ("either", "both", "neither") attach to the first conjunct
//! as `det`.

use super::{ParseHints, SentenceParser};
use crate::graph::{DependencyGraph, Relation};
use crate::lexicon::{self, tag_tokens};
use crate::tokenizer::{split_sentences, tokenize};
use docguard_core::error::Result;
use tracing::trace;

/// Rule-based sentence parser
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a single sentence (no sentence splitting)
    pub fn parse_sentence(&self, sentence: &str, hints: &ParseHints) -> DependencyGraph {
        let tokens = tokenize(sentence);
        let mut parser = ClauseParser::new(DependencyGraph::new(tag_tokens(&tokens, hints)));
        parser.parse();
        parser.graph
    }
}

impl SentenceParser for RuleBasedParser {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn parse(&self, text: &str, hints: &ParseHints) -> Result<Vec<DependencyGraph>> {
        let graphs = split_sentences(text)
            .iter()
            .map(|sentence| self.parse_sentence(sentence, hints))
            .filter(|graph| !graph.is_empty())
            .inspect(|graph| trace!("Parsed \"{}\":\n{}", graph.text(), graph))
            .collect();
        Ok(graphs)
    }
}

/// A scanned noun phrase; nothing is added to the graph until it is emitted
#[derive(Debug, Clone)]
struct NounPhrase {
    head: usize,
    end: usize,
    determiners: Vec<usize>,
    modifiers: Vec<usize>,
    compounds: Vec<usize>,
    possessor: Option<(Box<NounPhrase>, usize)>,
    attachments: Vec<(&'static str, usize, NounPhrase)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PredicateForm {
    Copula,
    Passive,
    Verb,
}

struct ClauseParser {
    graph: DependencyGraph,
    lower: Vec<String>,
    tags: Vec<String>,
    pos: usize,
}

impl ClauseParser {
    fn new(graph: DependencyGraph) -> Self {
        let lower = graph.words().iter().map(|w| w.text.to_lowercase()).collect();
        let tags = graph.words().iter().map(|w| w.tag.clone()).collect();
        Self {
            graph,
            lower,
            tags,
            pos: 0,
        }
    }

    fn len(&self) -> usize {
        self.tags.len()
    }

    fn tag(&self, i: usize) -> &str {
        self.tags.get(i).map(String::as_str).unwrap_or("")
    }

    fn low(&self, i: usize) -> &str {
        self.lower.get(i).map(String::as_str).unwrap_or("")
    }

    fn edge(&mut self, governor: usize, relation: &str, dependent: usize) {
        self.graph
            .add_edge(governor, Relation::parse(relation), dependent);
    }

    fn parse(&mut self) {
        let mut previous: Option<usize> = None;
        let mut pending: Option<(usize, &'static str)> = None;

        while self.pos < self.len() {
            let pos = self.pos;
            if self.tag(pos) == "," {
                self.pos += 1;
                continue;
            }
            if let Some(kind) = lexicon::conjunction(self.low(pos)) {
                pending = Some((pos, kind));
                self.pos += 1;
                continue;
            }
            if lexicon::is_subordinator(self.low(pos)) {
                // subordinate clauses are not coordinated with the main clause
                previous = None;
                pending = None;
                self.pos += 1;
                continue;
            }

            match self.parse_clause() {
                Some(head) => {
                    if self.graph.root().is_none() {
                        self.graph.set_root(head);
                    }
                    if let (Some(prev), Some((cc, kind))) = (previous, pending) {
                        self.edge(prev, &format!("conj:{kind}"), head);
                        self.edge(head, "cc", cc);
                    }
                    previous = Some(head);
                    pending = None;
                }
                None => {
                    if self.pos == pos {
                        self.pos += 1;
                    }
                }
            }
        }
    }

    fn parse_clause(&mut self) -> Option<usize> {
        let start = self.pos;
        let (subjects, preconjunction) = self.parse_subject().unwrap_or_default();
        if subjects.is_empty() && !self.starts_predicate(self.pos) {
            self.pos = start;
            return None;
        }

        let head = self.parse_predicate(&subjects)?;
        if let Some(neither) = preconjunction.filter(|&p| self.low(p) == "neither") {
            self.edge(head, "neg", neither);
        }
        Some(head)
    }

    /// Subject noun phrase, possibly coordinated; returns the conjunct heads
    fn parse_subject(&mut self) -> Option<(Vec<usize>, Option<usize>)> {
        let start = self.pos;
        let mut preconjunction = None;
        let mut at = start;
        if lexicon::is_preconjunction(self.low(at)) && self.scan_np(at + 1).is_some() {
            preconjunction = Some(at);
            at += 1;
        }

        let first = self.scan_np(at)?;
        self.emit_np(&first);
        if let Some(p) = preconjunction {
            self.edge(first.head, "det", p);
        }

        // (head, coordinating word)
        let mut others: Vec<(usize, Option<usize>)> = Vec::new();
        let mut kind = None;
        let mut end = first.end;
        loop {
            let mut j = end;
            let mut separated = false;
            let mut cc = None;
            while self.tag(j) == "," {
                j += 1;
                separated = true;
            }
            if let Some(k) = lexicon::conjunction(self.low(j)) {
                kind = Some(k);
                cc = Some(j);
                j += 1;
                separated = true;
            }
            if !separated {
                break;
            }
            match self.scan_np(j) {
                Some(np) => {
                    self.emit_np(&np);
                    end = np.end;
                    others.push((np.head, cc));
                }
                None => break,
            }
        }

        // a comma list takes the kind of its final conjunction
        let kind = kind.unwrap_or("and");
        for &(other, cc) in &others {
            self.edge(first.head, &format!("conj:{kind}"), other);
            if let Some(cc) = cc {
                self.edge(other, "cc", cc);
            }
        }

        self.pos = end;
        let mut heads = vec![first.head];
        heads.extend(others.iter().map(|&(head, _)| head));
        Some((heads, preconjunction))
    }

    fn starts_predicate(&self, i: usize) -> bool {
        let low = self.low(i);
        let tag = self.tag(i);
        lexicon::is_modal(low)
            || lexicon::is_negation(low)
            || lexicon::is_copula(low)
            || lexicon::is_do_support(low)
            || matches!(tag, "VBZ" | "VBP" | "VBD" | "VB")
    }

    /// A noun phrase at `i` directly followed by a predicate
    fn starts_clause(&self, i: usize) -> bool {
        let at = if lexicon::is_preconjunction(self.low(i)) {
            i + 1
        } else {
            i
        };
        self.scan_np(at)
            .is_some_and(|np| np.end < self.len() && self.starts_predicate(np.end))
    }

    fn parse_predicate(&mut self, subjects: &[usize]) -> Option<usize> {
        let mut auxiliaries = Vec::new();
        let mut negations = Vec::new();
        while self.pos < self.len() {
            let low = self.low(self.pos);
            if lexicon::is_modal(low) || lexicon::is_do_support(low) {
                auxiliaries.push(self.pos);
            } else if lexicon::is_negation(low) {
                negations.push(self.pos);
            } else {
                break;
            }
            self.pos += 1;
        }

        if lexicon::is_copula(self.low(self.pos)) {
            let copula = self.pos;
            self.pos += 1;
            while lexicon::is_negation(self.low(self.pos)) || lexicon::is_copula(self.low(self.pos))
            {
                if lexicon::is_negation(self.low(self.pos)) {
                    negations.push(self.pos);
                }
                self.pos += 1;
            }

            if self.tag(self.pos) == "VBN" {
                let head = self.pos;
                self.pos += 1;
                for &s in subjects {
                    self.edge(head, "nsubjpass", s);
                }
                self.edge(head, "auxpass", copula);
                self.attach_modifiers(head, &auxiliaries, &negations);
                if self.low(self.pos) == "by" {
                    if let Some(agent) = self.scan_np(self.pos + 1) {
                        self.emit_np(&agent);
                        self.edge(head, "nmod:agent", agent.head);
                        self.pos = agent.end;
                    }
                }
                self.coordinate(head, subjects, &negations, PredicateForm::Passive);
                return Some(head);
            }

            let head = self.parse_complement()?;
            for &s in subjects {
                self.edge(head, "nsubj", s);
            }
            self.edge(head, "cop", copula);
            self.attach_modifiers(head, &auxiliaries, &negations);
            self.coordinate(head, subjects, &negations, PredicateForm::Copula);
            return Some(head);
        }

        let verb_expected = !auxiliaries.is_empty() || !negations.is_empty();
        let tag = self.tag(self.pos);
        let is_verb = matches!(tag, "VBZ" | "VBP" | "VBD" | "VB")
            || (verb_expected && !matches!(tag, "" | "," | "CC" | "IN" | "DT" | "MD"));
        if !is_verb {
            return None;
        }

        let head = self.pos;
        self.pos += 1;
        if !self.tag(head).starts_with("VB") {
            self.graph.set_tag(head, "VB");
            self.tags[head] = "VB".to_string();
        }
        for &s in subjects {
            self.edge(head, "nsubj", s);
        }
        self.attach_modifiers(head, &auxiliaries, &negations);

        if let Some(object) = self.scan_np(self.pos) {
            self.emit_np(&object);
            let linking = matches!(
                self.low(head),
                "becomes" | "become" | "remains" | "remain" | "stays" | "stay"
            );
            let relation = if linking && self.tag(object.head).starts_with("JJ") {
                "xcomp"
            } else {
                "dobj"
            };
            self.edge(head, relation, object.head);
            if let Some(&no) = object.determiners.iter().find(|&&d| self.low(d) == "no") {
                self.edge(head, "neg", no);
            }
            self.pos = object.end;
        }

        self.coordinate(head, subjects, &negations, PredicateForm::Verb);
        Some(head)
    }

    fn attach_modifiers(&mut self, head: usize, auxiliaries: &[usize], negations: &[usize]) {
        for &aux in auxiliaries {
            self.edge(head, "aux", aux);
        }
        for &neg in negations {
            self.edge(head, "neg", neg);
        }
    }

    /// Complement of a copula; the head of an "adjective + generic noun" phrase
    /// is the adjective
    fn parse_complement(&mut self) -> Option<usize> {
        let at = self.pos;
        if matches!(self.low(at), "in" | "inside" | "within" | "outside") {
            if let Some(np) = self.scan_np(at + 1) {
                self.emit_np(&np);
                self.edge(np.head, "case", at);
                self.pos = np.end;
                return Some(np.head);
            }
        }

        let np = self.scan_np(at)?;
        self.emit_np(&np);
        self.pos = np.end;

        let adjective = np
            .modifiers
            .iter()
            .rev()
            .find(|&&m| self.tag(m).starts_with("JJ"))
            .copied();
        match adjective {
            Some(adj) if np.compounds.is_empty() && lexicon::is_generic_noun(self.low(np.head)) => {
                self.edge(adj, "dep", np.head);
                Some(adj)
            }
            _ => Some(np.head),
        }
    }

    /// Coordination after a predicate head: conjoined complements, participles
    /// or whole predicates sharing the subjects. Coordinated clauses are left to
    /// the sentence loop.
    fn coordinate(
        &mut self,
        head: usize,
        subjects: &[usize],
        negations: &[usize],
        form: PredicateForm,
    ) {
        loop {
            let save = self.pos;
            let mut j = self.pos;
            while self.tag(j) == "," {
                j += 1;
            }
            let Some(kind) = lexicon::conjunction(self.low(j)) else {
                self.pos = save;
                return;
            };
            let cc = j;
            j += 1;

            if self.starts_clause(j) {
                self.pos = save;
                return;
            }

            if self.starts_predicate(j) && !(form == PredicateForm::Passive && self.tag(j) == "VBN")
            {
                self.pos = j;
                match self.parse_predicate(subjects) {
                    Some(next) => {
                        self.edge(head, &format!("conj:{kind}"), next);
                        self.edge(next, "cc", cc);
                    }
                    None => self.pos = save,
                }
                return;
            }

            let next = match form {
                PredicateForm::Passive if self.tag(j) == "VBN" => {
                    for &s in subjects {
                        self.edge(j, "nsubjpass", s);
                    }
                    self.pos = j + 1;
                    j
                }
                PredicateForm::Copula => {
                    self.pos = j;
                    match self.parse_complement() {
                        Some(next) => {
                            for &s in subjects {
                                self.edge(next, "nsubj", s);
                            }
                            next
                        }
                        None => {
                            self.pos = save;
                            return;
                        }
                    }
                }
                _ => {
                    self.pos = save;
                    return;
                }
            };

            self.edge(head, &format!("conj:{kind}"), next);
            self.edge(next, "cc", cc);
            if kind == "nor" {
                if let Some(&neg) = negations.first() {
                    self.edge(next, "neg", neg);
                }
            }
        }
    }

    fn scan_np(&self, start: usize) -> Option<NounPhrase> {
        let n = self.len();
        let mut i = start;
        let mut determiners = Vec::new();
        let mut modifiers = Vec::new();
        let mut nouns = Vec::new();

        while i < n {
            let tag = self.tag(i);
            if nouns.is_empty() && modifiers.is_empty() && matches!(tag, "DT" | "PRP$") {
                determiners.push(i);
            } else if nouns.is_empty() && (tag.starts_with("JJ") || tag == "CD") {
                modifiers.push(i);
            } else if nouns.is_empty() && tag == "VBN" && self.tag(i + 1).starts_with("NN") {
                modifiers.push(i);
            } else if tag.starts_with("NN") || tag == "PRP" {
                nouns.push(i);
            } else if tag == "POS" && !nouns.is_empty() {
                let possessor =
                    Self::assemble(determiners.clone(), modifiers.clone(), nouns.clone(), i)?;
                let mut owned = self.scan_np(i + 1)?;
                owned.possessor = Some((Box::new(possessor), i));
                return Some(owned);
            } else {
                break;
            }
            i += 1;
        }

        let mut phrase = Self::assemble(determiners, modifiers, nouns, i)?;
        while matches!(self.low(i), "of" | "in" | "inside" | "within") {
            let kind = if self.low(i) == "of" { "of" } else { "in" };
            match self.scan_np(i + 1) {
                Some(attached) => {
                    let next = attached.end;
                    phrase.attachments.push((kind, i, attached));
                    i = next;
                }
                None => break,
            }
        }
        phrase.end = i;
        Some(phrase)
    }

    fn assemble(
        mut determiners: Vec<usize>,
        mut modifiers: Vec<usize>,
        mut nouns: Vec<usize>,
        end: usize,
    ) -> Option<NounPhrase> {
        let head = if let Some(noun) = nouns.pop() {
            noun
        } else if let Some(modifier) = modifiers.pop() {
            modifier
        } else {
            // determiner-only phrases ("this", "all")
            determiners.pop()?
        };
        Some(NounPhrase {
            head,
            end,
            determiners,
            modifiers,
            compounds: nouns,
            possessor: None,
            attachments: Vec::new(),
        })
    }

    fn emit_np(&mut self, np: &NounPhrase) {
        for &d in &np.determiners {
            self.edge(np.head, "det", d);
        }
        for &m in &np.modifiers {
            let relation = if self.tag(m) == "CD" { "nummod" } else { "amod" };
            self.edge(np.head, relation, m);
        }
        for &c in &np.compounds {
            self.edge(np.head, "compound", c);
        }
        if let Some((possessor, marker)) = &np.possessor {
            self.emit_np(possessor);
            self.edge(np.head, "nmod:poss", possessor.head);
            self.edge(possessor.head, "case", *marker);
        }
        for (kind, preposition, attached) in &np.attachments {
            self.emit_np(attached);
            self.edge(np.head, &format!("nmod:{kind}"), attached.head);
            self.edge(attached.head, "case", *preposition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, hints: &[&str]) -> DependencyGraph {
        RuleBasedParser::new().parse_sentence(text, &ParseHints::new(hints))
    }

    fn has(graph: &DependencyGraph, governor: &str, relation: &str, dependent: &str) -> bool {
        graph.relations(&[relation]).iter().any(|e| {
            graph.word(e.governor).is_some_and(|w| w.text == governor)
                && graph.word(e.dependent).is_some_and(|w| w.text == dependent)
        })
    }

    #[test]
    fn test_copula_with_negation() {
        let graph = parse("x is not null", &["x"]);
        assert!(has(&graph, "null", "nsubj", "x"));
        assert!(has(&graph, "null", "cop", "is"));
        assert!(has(&graph, "null", "neg", "not"));
        assert_eq!(graph.root().map(|w| w.text.as_str()), Some("null"));
    }

    #[test]
    fn test_nor_conjunct_inherits_negation() {
        let graph = parse("x is not null nor empty", &["x"]);
        assert!(has(&graph, "null", "conj:nor", "empty"));
        assert!(has(&graph, "empty", "nsubj", "x"));
        assert!(has(&graph, "empty", "neg", "not"));
        assert!(!has(&graph, "empty", "cop", "is"));
    }

    #[test]
    fn test_coordinated_subjects_share_predicate() {
        let graph = parse("either x or y is null", &["x", "y"]);
        assert!(has(&graph, "x", "det", "either"));
        assert!(has(&graph, "x", "conj:or", "y"));
        assert!(has(&graph, "null", "nsubj", "x"));
        assert!(has(&graph, "null", "nsubj", "y"));
    }

    #[test]
    fn test_coordinated_clauses() {
        let graph = parse("x is null or y is empty", &["x", "y"]);
        assert!(has(&graph, "null", "conj:or", "empty"));
        assert!(has(&graph, "empty", "nsubj", "y"));
        assert!(has(&graph, "empty", "cop", "is"));
    }

    #[test]
    fn test_passive_predicate() {
        let graph = parse("the listener is removed", &[]);
        assert!(has(&graph, "removed", "nsubjpass", "listener"));
        assert!(has(&graph, "removed", "auxpass", "is"));
        assert!(has(&graph, "listener", "det", "the"));
    }

    #[test]
    fn test_do_support_and_object() {
        let graph = parse("the map does not contain null", &[]);
        assert!(has(&graph, "contain", "nsubj", "map"));
        assert!(has(&graph, "contain", "aux", "does"));
        assert!(has(&graph, "contain", "neg", "not"));
        assert!(has(&graph, "contain", "dobj", "null"));
        assert!(graph.word(4).is_some_and(|w| w.is_verb()));
    }

    #[test]
    fn test_container_and_modifiers() {
        let graph = parse("any element in the array is null", &[]);
        assert!(has(&graph, "element", "det", "any"));
        assert!(has(&graph, "element", "nmod:in", "array"));
        assert!(has(&graph, "null", "nsubj", "element"));
    }

    #[test]
    fn test_adjective_heads_generic_noun() {
        let graph = parse("x is a negative number", &["x"]);
        assert!(has(&graph, "negative", "nsubj", "x"));
        assert!(has(&graph, "negative", "cop", "is"));
    }

    #[test]
    fn test_verb_phrase_coordination() {
        let graph = parse("the list is null or contains null", &[]);
        assert!(has(&graph, "contains", "nsubj", "list"));
        assert!(has(&graph, "contains", "dobj", "null"));
        assert_eq!(graph.relations(&["conj:or"]).len(), 1);
    }

    #[test]
    fn test_modal_copula() {
        let graph = parse("value must not be negative", &["value"]);
        assert!(has(&graph, "negative", "nsubj", "value"));
        assert!(has(&graph, "negative", "aux", "must"));
        assert!(has(&graph, "negative", "cop", "be"));
        assert!(has(&graph, "negative", "neg", "not"));
    }

    #[test]
    fn test_neither_negates_the_shared_predicate() {
        let graph = parse("neither x nor y is null", &["x", "y"]);
        assert!(has(&graph, "x", "conj:nor", "y"));
        assert!(has(&graph, "null", "neg", "neither"));
    }

    #[test]
    fn test_multiple_sentences() {
        let graphs = RuleBasedParser::new()
            .parse(". x is null. y is empty.", &ParseHints::new(["x", "y"]))
            .unwrap();
        assert_eq!(graphs.len(), 2);
    }
}
