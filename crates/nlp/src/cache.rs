//! Memoization of parsed comments
//!
//! Comments repeat across overloads and across the tags of one method, and
//! parsing is the expensive step. Entries are keyed by the comment text and the
//! method it belongs to, since parse hints depend on the method.

use crate::graph::DependencyGraph;
use crate::normalize::Normalized;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use docguard_core::error::Result;
use std::sync::Arc;
use tracing::trace;

/// A normalized comment with its sentence graphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComment {
    pub normalized: Normalized,
    pub graphs: Vec<DependencyGraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub method: String,
}

impl CacheKey {
    pub fn new(text: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            method: method.into(),
        }
    }
}

/// Concurrency-safe parse memo
#[derive(Debug, Clone, Default)]
pub struct ParseCache {
    entries: Arc<DashMap<CacheKey, Arc<ParsedComment>>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached entry for `key`, computing it with `parse` when absent
    ///
    /// The shard holding `key` stays locked while `parse` runs, so concurrent
    /// callers with the same key all observe the single stored value.
    pub fn get_or_parse<F>(&self, key: CacheKey, parse: F) -> Result<Arc<ParsedComment>>
    where
        F: FnOnce() -> Result<ParsedComment>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                trace!("Parse cache hit for \"{}\"", entry.key().text);
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let parsed = Arc::new(parse()?);
                entry.insert(Arc::clone(&parsed));
                Ok(parsed)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use docguard_core::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn parsed(text: &str) -> ParsedComment {
        ParsedComment {
            normalized: normalize(text),
            graphs: Vec::new(),
        }
    }

    #[test]
    fn test_second_lookup_hits() {
        let cache = ParseCache::new();
        let calls = AtomicUsize::new(0);
        let key = CacheKey::new("x is null.", "m(int)");

        for _ in 0..3 {
            let entry = cache
                .get_or_parse(key.clone(), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(parsed("x is null."))
                })
                .unwrap();
            assert_eq!(entry.normalized.text, "x is null.");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_method_is_part_of_the_key() {
        let cache = ParseCache::new();
        cache
            .get_or_parse(CacheKey::new("x.", "a()"), || Ok(parsed("x.")))
            .unwrap();
        cache
            .get_or_parse(CacheKey::new("x.", "b()"), || Ok(parsed("x.")))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ParseCache::new();
        let key = CacheKey::new("x.", "a()");
        assert!(cache
            .get_or_parse(key.clone(), || Err(Error::parser("boom")))
            .is_err());
        assert!(cache.is_empty());
        assert!(cache.get_or_parse(key, || Ok(parsed("x."))).is_ok());
    }

    #[test]
    fn test_racing_threads_share_one_value() {
        let cache = ParseCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    cache
                        .get_or_parse(CacheKey::new("x > 1.", "m()"), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(parsed("x > 1."))
                        })
                        .unwrap()
                })
            })
            .collect();

        let values: Vec<Arc<ParsedComment>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
