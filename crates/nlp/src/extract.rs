//! Comment text to proposition series
//!
//! Normalizes the preprocessed comment, parses it (through the cache when
//! enabled), builds one series per sentence and puts the placeholder literals
//! back into subjects and predicates.

use crate::cache::{CacheKey, ParseCache, ParsedComment};
use crate::normalize::normalize;
use crate::parser::{ParseHints, SentenceParser};
use crate::propositions::{build_series, PropositionSeries};
use docguard_core::error::Result;
use std::sync::Arc;
use tracing::debug;

pub struct PropositionExtractor {
    parser: Arc<dyn SentenceParser>,
    cache: Option<ParseCache>,
}

impl PropositionExtractor {
    pub fn new(parser: Arc<dyn SentenceParser>, cache_enabled: bool) -> Self {
        Self {
            parser,
            cache: cache_enabled.then(ParseCache::new),
        }
    }

    pub fn parser(&self) -> &dyn SentenceParser {
        self.parser.as_ref()
    }

    pub fn cache(&self) -> Option<&ParseCache> {
        self.cache.as_ref()
    }

    /// Normalizes and parses `text`; `method` identifies the method whose hints apply
    pub fn parse(&self, text: &str, method: &str, hints: &ParseHints) -> Result<Arc<ParsedComment>> {
        let parse = || -> Result<ParsedComment> {
            let normalized = normalize(text);
            let graphs = self.parser.parse(&normalized.text, hints)?;
            debug!(
                "Parsed \"{}\" into {} sentence(s) with {}",
                normalized.text,
                graphs.len(),
                self.parser.name()
            );
            Ok(ParsedComment { normalized, graphs })
        };

        match &self.cache {
            Some(cache) => cache.get_or_parse(CacheKey::new(text, method), parse),
            None => parse().map(Arc::new),
        }
    }

    /// One proposition series per sentence of `text`, placeholders restored
    pub fn extract(
        &self,
        text: &str,
        method: &str,
        hints: &ParseHints,
    ) -> Result<Vec<PropositionSeries>> {
        let parsed = self.parse(text, method, hints)?;
        parsed
            .graphs
            .iter()
            .map(|graph| {
                let mut series = build_series(graph, hints)?;
                series.restore_placeholders(&parsed.normalized.placeholders);
                Ok(series)
            })
            .collect()
    }
}
