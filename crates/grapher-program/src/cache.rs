//! Parsed programs keyed by slug.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::program::ExplorerProgram;

/// SHA-256 of the program text, hex encoded.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: String,
    program: Arc<ExplorerProgram>,
}

/// Owned cache of parsed programs.
///
/// An entry is reused while its source text is unchanged and lives until
/// it is invalidated or the cache is cleared.
#[derive(Debug, Default)]
pub struct ProgramCache {
    entries: HashMap<String, CacheEntry>,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached program for `slug`, parsing `text` when the slug
    /// is new or its text changed.
    pub fn get_or_parse(&mut self, slug: &str, text: &str) -> Arc<ExplorerProgram> {
        let fingerprint = fingerprint(text);
        if let Some(entry) = self.entries.get(slug)
            && entry.fingerprint == fingerprint
        {
            debug!(slug, "program cache hit");
            return Arc::clone(&entry.program);
        }

        debug!(slug, fingerprint = %fingerprint, "parsing program");
        let program = Arc::new(ExplorerProgram::parse(slug, text));
        self.entries.insert(
            slug.to_string(),
            CacheEntry {
                fingerprint,
                program: Arc::clone(&program),
            },
        );
        program
    }

    pub fn get(&self, slug: &str) -> Option<Arc<ExplorerProgram>> {
        self.entries.get(slug).map(|entry| Arc::clone(&entry.program))
    }

    pub fn fingerprint_of(&self, slug: &str) -> Option<&str> {
        self.entries.get(slug).map(|entry| entry.fingerprint.as_str())
    }

    /// Drops one entry. Returns whether it was cached.
    pub fn invalidate(&mut self, slug: &str) -> bool {
        self.entries.remove(slug).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_reparses_only_on_change() {
        let mut cache = ProgramCache::new();
        let first = cache.get_or_parse("co2", "explorerTitle\tCO₂");
        let again = cache.get_or_parse("co2", "explorerTitle\tCO₂");
        assert!(Arc::ptr_eq(&first, &again));

        let edited = cache.get_or_parse("co2", "explorerTitle\tCO₂ emissions");
        assert!(!Arc::ptr_eq(&first, &edited));
        assert_eq!(edited.explorer_title(), Some("CO₂ emissions"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = ProgramCache::new();
        cache.get_or_parse("a", "");
        cache.get_or_parse("b", "");
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        cache.clear();
        assert!(cache.is_empty());
    }
}
