//! Integration tests for comment text to proposition series
//!
//! Covers the full path through preprocessing, normalization, parsing and
//! proposition building, plus a canned-graph parser standing in for an external
//! engine.

use docguard_core::error::Result;
use docguard_core::tags::TagKind;
use docguard_nlp::{
    preprocess, Conjunction, DependencyGraph, ParseHints, PreprocessContext, PropositionExtractor,
    PropositionSeries, Relation, RuleBasedParser, SentenceParser, Word,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Once};

static INIT_LOGGING: Once = Once::new();

fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let log_level = std::env::var("DOCGUARD_TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "error".to_string());

        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn extract(kind: TagKind, parameter: Option<&str>, comment: &str, names: &[&str]) -> Vec<PropositionSeries> {
    init_test_logging();
    let parser: Arc<dyn SentenceParser> = Arc::new(RuleBasedParser::new());
    let hints = ParseHints::new(names);
    let ctx = PreprocessContext {
        parameter,
        remove_commas: true,
        parser: parser.as_ref(),
        hints: &hints,
    };
    let text = preprocess(kind, comment, &ctx);
    PropositionExtractor::new(parser, true)
        .extract(&text, "m", &hints)
        .unwrap()
}

fn rendered(series: &[PropositionSeries]) -> Vec<String> {
    series.iter().map(ToString::to_string).collect()
}

#[test]
fn test_param_constraint_gets_explicit_subject() {
    let series = extract(TagKind::Param, Some("x"), "must not be null nor empty", &["x"]);
    assert_eq!(
        rendered(&series),
        vec!["(x, not is null) && (x, not is empty)".to_string()]
    );
}

#[test]
fn test_throws_condition_with_comparison() {
    let series = extract(
        TagKind::Throws,
        None,
        "if count is less than zero or name is null",
        &["count", "name"],
    );
    assert_eq!(series.len(), 1);
    let propositions = series[0].propositions();
    assert_eq!(propositions[0].predicate(), "is < zero");
    assert_eq!(propositions[1].subject().text(), "name");
    assert_eq!(series[0].conjunctions(), &[Conjunction::Or]);
}

#[test]
fn test_range_expansion_yields_two_bounds() {
    let series = extract(
        TagKind::Throws,
        None,
        "if index is not in the range [0, 10]",
        &["index"],
    );
    let predicates: Vec<&str> = series[0].propositions().iter().map(|p| p.predicate()).collect();
    assert_eq!(predicates, vec!["is <0", "is >10"]);
    assert_eq!(series[0].conjunctions(), &[Conjunction::Or]);
}

/// Returns one fixed graph regardless of the text
struct CannedParser(DependencyGraph);

impl SentenceParser for CannedParser {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn parse(&self, _text: &str, _hints: &ParseHints) -> Result<Vec<DependencyGraph>> {
        Ok(vec![self.0.clone()])
    }
}

#[test]
fn test_conjoined_verbs_share_a_complement() {
    // "the list contains or references null"
    let mut graph = DependencyGraph::new(vec![
        Word::new(0, "the", "DT"),
        Word::new(1, "list", "NN"),
        Word::new(2, "contains", "VBZ"),
        Word::new(3, "or", "CC"),
        Word::new(4, "references", "VBZ"),
        Word::new(5, "null", "JJ"),
    ]);
    graph.add_edge(1, Relation::new("det"), 0);
    graph.add_edge(2, Relation::new("nsubj"), 1);
    graph.add_edge(2, Relation::parse("conj:or"), 4);
    graph.add_edge(4, Relation::new("nsubj"), 1);
    graph.add_edge(4, Relation::new("dobj"), 5);
    graph.set_root(2);

    let extractor = PropositionExtractor::new(Arc::new(CannedParser(graph)), false);
    let series = extractor.extract("ignored", "m", &ParseHints::default()).unwrap();
    assert_eq!(
        rendered(&series),
        vec!["(list, contains null) || (list, references null)".to_string()]
    );
}

#[test]
fn test_subject_without_predicate_is_skipped() {
    let mut graph = DependencyGraph::new(vec![
        Word::new(0, "x", "NN"),
        Word::new(1, "exists", "VBZ"),
    ]);
    graph.add_edge(1, Relation::new("nsubj"), 0);

    let extractor = PropositionExtractor::new(Arc::new(CannedParser(graph)), false);
    let series = extractor.extract("x exists", "m", &ParseHints::default()).unwrap();
    assert!(series[0].is_empty());
}
