//! Natural-language side of the docguard translator
//!
//! Turns documentation comment text into proposition series:
//!
//! - **Preprocessing**: tag-kind specific rewrites ([`preprocess`])
//! - **Normalization**: relational phrases hidden behind placeholders ([`normalize`])
//! - **Parsing**: sentences into dependency graphs behind [`SentenceParser`]
//! - **Propositions**: graphs into [`PropositionSeries`]
//! - **Caching**: parsed comments memoized per method ([`ParseCache`])

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod cache;
pub mod extract;
pub mod graph;
pub mod lexicon;
pub mod normalize;
pub mod parser;
pub mod preprocess;
pub mod propositions;
pub mod tokenizer;

pub use cache::{CacheKey, ParseCache, ParsedComment};
pub use extract::PropositionExtractor;
pub use graph::{DependencyGraph, Edge, Relation, Word};
pub use normalize::{normalize, Normalized, PlaceholderTable};
pub use parser::{create_sentence_parser, ParseHints, RuleBasedParser, SentenceParser};
pub use preprocess::{preprocess, PreprocessContext};
pub use propositions::{Conjunction, Proposition, PropositionSeries, Subject};
