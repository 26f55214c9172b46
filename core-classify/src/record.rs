//! Persisted classification records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inferred tags for one catalog item, cached per identifier.
///
/// Created lazily on the first classification request, persisted through the
/// key-value collaborator, and never invalidated automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Identifier of the classified item.
    pub identifier: String,

    /// Best-guess genre for the category the item was classified under.
    /// `None` when the category has no genre facet.
    pub genre: Option<String>,

    /// Where the content came from (e.g. "librivox", "community").
    pub source_type: String,

    /// What the content is (e.g. "audiobook", "music").
    pub content_type: String,

    /// User-assigned tags; empty on inference.
    #[serde(default)]
    pub custom_tags: Vec<String>,

    /// When the inference ran.
    pub classified_at: DateTime<Utc>,
}
