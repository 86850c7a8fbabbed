/*!
 * Translation caching.
 *
 * Transcripts repeat short lines ("Yes.", "Thank you.") across speakers; the
 * cache makes each distinct text cost one provider call per language pair.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use parking_lot::RwLock;

/// Text plus a case-folded `source>target` language pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    pair: String,
}

impl CacheKey {
    fn new(text: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            text: text.to_string(),
            pair: format!("{}>{}", source_language.to_lowercase(), target_language.to_lowercase()),
        }
    }
}

/// In-memory store of finished segment translations
///
/// Clones share the same storage and counters, so a clone handed to another
/// task sees every entry stored through the original.
#[derive(Clone)]
pub struct TranslationCache {
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
    hits: Arc<AtomicUsize>,
    misses: Arc<AtomicUsize>,
    enabled: bool,
}

impl TranslationCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            enabled,
        }
    }

    /// Look up a translation; a disabled cache always misses without counting
    pub fn get(&self, text: &str, source_language: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let found = self.entries.read()
            .get(&CacheKey::new(text, source_language, target_language))
            .cloned();

        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);

        if found.is_some() {
            debug!("Cache hit for '{}' ({} -> {})", preview(text, 30), source_language, target_language);
        }
        found
    }

    pub fn store(&self, text: &str, source_language: &str, target_language: &str, translation: &str) {
        if self.enabled {
            self.entries.write()
                .insert(CacheKey::new(text, source_language, target_language), translation.to_string());
        }
    }

    /// (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let rate = if lookups == 0 { 0.0 } else { hits as f64 / lookups as f64 };
        (hits, misses, rate)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
