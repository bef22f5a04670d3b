//! Library interface for the docguard CLI
//!
//! Batch translation of method records, exposed for integration testing while
//! the argument handling stays in main.rs.

use anyhow::{anyhow, Context, Result};
use docguard_core::entities::MethodContext;
use docguard_core::specs::Specification;
use docguard_core::tags::DocumentationTag;
use docguard_translator::TranslationService;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

// Re-export commonly needed types for tests
pub use docguard_core::config::Config;

/// One method and its documentation tags, as read from the input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodRecord {
    pub method: MethodContext,
    pub tags: Vec<DocumentationTag>,
}

/// Specifications of one method, as written to the output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationRecord {
    /// Signature of the method
    pub method: String,
    pub specifications: Vec<TagSpecification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSpecification {
    /// `@param x`, `@return` or `@throws E`
    pub tag: String,
    pub specification: Specification,
}

/// Translates every record, at most `max_concurrent` methods at a time
///
/// Output order follows input order.
pub async fn translate_records(
    service: Arc<TranslationService>,
    records: Vec<MethodRecord>,
    max_concurrent: usize,
) -> Result<Vec<SpecificationRecord>> {
    let limiter = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for (index, record) in records.into_iter().enumerate() {
        let service = Arc::clone(&service);
        let limiter = Arc::clone(&limiter);
        tasks.spawn(async move {
            let _permit = limiter
                .acquire_owned()
                .await
                .map_err(|e| anyhow!("Concurrency limiter closed: {e}"))?;
            let translated = tokio::task::spawn_blocking(move || translate_record(&service, record))
                .await
                .context("Translation task panicked")?;
            Ok::<_, anyhow::Error>((index, translated))
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("Translation task failed")??);
    }
    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, record)| record).collect())
}

/// A tag that already carries a translation is logged and left out; the
/// other tags of the method are still translated.
fn translate_record(service: &TranslationService, record: MethodRecord) -> SpecificationRecord {
    let MethodRecord { method, tags } = record;
    let signature = method.signature();

    let specifications = tags
        .iter()
        .zip(service.translate(&method, &tags))
        .filter_map(|(tag, specification)| {
            if tag.translation().is_some() {
                warn!("Skipping {} of {}: already translated", tag.label(), signature);
                return None;
            }
            Some(TagSpecification {
                tag: tag.label(),
                specification,
            })
        })
        .collect();
    SpecificationRecord {
        method: signature,
        specifications,
    }
}

/// Reads records from `input`, translates them and writes the result
///
/// Output goes to `output` when given, stdout otherwise. Returns the number of
/// translated methods.
pub async fn translate_file(input: &Path, output: Option<&Path>, config: &Config) -> Result<usize> {
    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let records: Vec<MethodRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse method records from {}", input.display()))?;
    info!("Translating {} methods from {}", records.len(), input.display());

    let service = Arc::new(
        TranslationService::from_config(config).context("Failed to create translation service")?,
    );
    let translated = translate_records(service, records, config.runtime.max_concurrent_methods).await?;

    let json = serde_json::to_string_pretty(&translated).context("Failed to serialize specifications")?;
    match output {
        Some(path) => tokio::fs::write(path, format!("{json}\n"))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(translated.len())
}

/// Loads and validates configuration, returning the effective TOML
pub fn check_config(config_path: Option<&Path>) -> Result<String> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    config
        .to_toml_string()
        .context("Failed to render configuration")
}
