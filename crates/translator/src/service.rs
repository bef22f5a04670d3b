//! Translation entry point
//!
//! One [`TranslationService`] serves any number of methods, from any number of
//! threads. Per method it collects the code elements once, then runs the
//! translator of each tag and the compilability gate over the result.

use crate::collector::MethodScope;
use crate::gate::CompilabilityGate;
use crate::matcher::Matcher;
use crate::translate::{translator_for, TranslateContext};
use docguard_core::config::Config;
use docguard_core::entities::MethodContext;
use docguard_core::error::{Error, Result};
use docguard_core::specs::Specification;
use docguard_core::tags::DocumentationTag;
use docguard_nlp::{create_sentence_parser, PropositionExtractor, SentenceParser};
use std::sync::Arc;
use tracing::{debug, info};

pub struct TranslationService {
    extractor: PropositionExtractor,
    matcher: Matcher,
    gate: CompilabilityGate,
    remove_commas: bool,
}

impl TranslationService {
    pub fn new(parser: Arc<dyn SentenceParser>, config: &Config, gate: CompilabilityGate) -> Self {
        Self {
            extractor: PropositionExtractor::new(parser, config.parser.cache_enabled),
            matcher: Matcher::new(&config.matcher),
            gate,
            remove_commas: config.preprocess.remove_commas,
        }
    }

    /// Build the service with the configured parser engine and type checker
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let parser = create_sentence_parser(&config.parser)?;
        let gate = CompilabilityGate::from_config(&config.gate)?;
        info!(
            "Translation service ready (parser: {}, checker: {})",
            parser.name(),
            gate.checker_name()
        );
        Ok(Self::new(parser, config, gate))
    }

    pub fn extractor(&self) -> &PropositionExtractor {
        &self.extractor
    }

    /// Specifications for `tags`, in order, without touching the tags
    ///
    /// Deterministic: translating the same tags of the same method twice gives
    /// the same specifications.
    pub fn translate(&self, method: &MethodContext, tags: &[DocumentationTag]) -> Vec<Specification> {
        let scope = MethodScope::build(method, tags, &self.extractor);
        let ctx = TranslateContext {
            method,
            scope: &scope,
            extractor: &self.extractor,
            matcher: &self.matcher,
            remove_commas: self.remove_commas,
        };

        tags.iter()
            .map(|tag| {
                let spec = translator_for(tag.kind).translate(tag, &ctx);
                let spec = self.gate.admit(method, spec);
                debug!("{} of {}: {}", tag.label(), scope.signature(), spec);
                spec
            })
            .collect()
    }

    /// Translates every tag of `method` and records the result on the tag
    ///
    /// Fails without translating anything when a tag already carries a
    /// translation.
    pub fn translate_method(&self, method: &MethodContext, tags: &mut [DocumentationTag]) -> Result<()> {
        if let Some(tag) = tags.iter().find(|t| t.translation().is_some()) {
            return Err(Error::already_translated(method.signature(), tag.label()));
        }

        let specs = self.translate(method, tags);
        let signature = method.signature();
        for (tag, spec) in tags.iter_mut().zip(specs) {
            tag.set_translation(&signature, spec)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TranslationService>();
    }

    #[test]
    fn test_from_config_rejects_unknown_checker() {
        let mut config = Config::default();
        config.gate.checker = "lint".to_string();
        assert!(TranslationService::from_config(&config).is_err());
    }
}
