//! Cached classification service.
//!
//! Looks up a persisted record first; on a miss, runs the rule engine and
//! returns the fresh record immediately while persisting it on a spawned
//! task, so classification never blocks the caller on storage.

use bridge_traits::store::KeyValueStore;
use chrono::Utc;
use provider_archive::{CatalogItem, MediaCategory};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ClassifyError, Result};
use crate::record::ClassificationRecord;
use crate::rules::{
    default_content_type, default_genre, evaluate, genre_rules, CONTENT_TYPE_RULES,
    DEFAULT_SOURCE_TYPE, SOURCE_TYPE_RULES,
};

const KEY_PREFIX: &str = "classification/";

/// Classifier with a per-item persisted cache.
pub struct ContentClassifier {
    store: Arc<dyn KeyValueStore>,
}

impl ContentClassifier {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn record_key(identifier: &str) -> String {
        format!("{}{}", KEY_PREFIX, identifier)
    }

    /// Classify an item under a category.
    ///
    /// Returns the cached record when one exists; otherwise infers a fresh
    /// record, schedules its persistence, and returns it without waiting for
    /// the write.
    pub async fn classify(
        &self,
        item: &CatalogItem,
        category: MediaCategory,
    ) -> Result<ClassificationRecord> {
        let key = Self::record_key(&item.identifier);

        if let Some(bytes) = self.store.get(&key).await? {
            match serde_json::from_slice::<ClassificationRecord>(&bytes) {
                Ok(record) => {
                    debug!(identifier = %item.identifier, "Classification cache hit");
                    return Ok(record);
                }
                Err(e) => {
                    // A corrupt record is recomputed and overwritten.
                    warn!(identifier = %item.identifier, error = %e, "Discarding unreadable classification record");
                }
            }
        }

        let record = infer(item, category);

        let bytes = serde_json::to_vec(&record)
            .map_err(|e| ClassifyError::Serialization(e.to_string()))?;
        let store = Arc::clone(&self.store);
        let spawn_key = key.clone();
        tokio::spawn(async move {
            if let Err(e) = store.set(&spawn_key, &bytes).await {
                warn!(key = %spawn_key, error = %e, "Failed to persist classification record");
            }
        });

        Ok(record)
    }
}

/// Pure inference over the rule tables.
fn infer(item: &CatalogItem, category: MediaCategory) -> ClassificationRecord {
    let haystack = [
        Some(item.title.as_str()),
        item.description.as_deref(),
        item.creator.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();

    let genre = genre_rules(category)
        .and_then(|rules| evaluate(rules, &haystack))
        .map(str::to_string)
        .or_else(|| default_genre(category).map(str::to_string));

    let content_type = evaluate(&CONTENT_TYPE_RULES, &haystack)
        .unwrap_or_else(|| default_content_type(category))
        .to_string();

    let source_type = evaluate(&SOURCE_TYPE_RULES, &haystack)
        .unwrap_or(DEFAULT_SOURCE_TYPE)
        .to_string();

    ClassificationRecord {
        identifier: item.identifier.clone(),
        genre,
        source_type,
        content_type,
        custom_tags: Vec::new(),
        classified_at: Utc::now(),
    }
}
