//! Wire and domain types for the public media archive.
//!
//! The archive's JSON is loosely schematized: several fields arrive either as
//! a single value or as a list, the file manifest is usually an array but
//! occasionally an object-of-objects, and sizes may be numbers or numeric
//! strings. The wire types here absorb those shapes so one odd document never
//! fails an otherwise valid page.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Logical media kind of a catalog item. Closed set; anything the archive
/// reports outside it maps to [`MediaKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Texts,
    Movies,
    Image,
    Other,
}

impl MediaKind {
    /// Parse the archive's `mediatype` field value.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "audio" => MediaKind::Audio,
            "texts" => MediaKind::Texts,
            "movies" => MediaKind::Movies,
            "image" => MediaKind::Image,
            _ => MediaKind::Other,
        }
    }

    /// The value used in `mediatype:` query constraints.
    pub fn as_wire(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Texts => "texts",
            MediaKind::Movies => "movies",
            MediaKind::Image => "image",
            MediaKind::Other => "data",
        }
    }
}

/// Logical browsing category selected in the UI.
///
/// Remote categories drive catalog queries; local-only categories never reach
/// the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Audiobooks,
    Books,
    Music,
    Radio,
    Notes,
    Journal,
    SocialHub,
}

impl MediaCategory {
    /// Local-only categories resolve entirely against on-device content.
    pub fn is_local_only(&self) -> bool {
        matches!(
            self,
            MediaCategory::Notes | MediaCategory::Journal | MediaCategory::SocialHub
        )
    }
}

/// A field that may arrive as a single string or a list of strings.
///
/// Variants are attempted in order; [`StringOrList::normalized`] exposes the
/// one-string view the rest of the core works with.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    /// Normalize to a single string; list form is joined by `", "`.
    pub fn normalized(&self) -> String {
        match self {
            StringOrList::One(s) => s.clone(),
            StringOrList::Many(items) => items.join(", "),
        }
    }
}

/// A numeric field that may arrive as a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Num(u64),
    Str(String),
}

impl NumberOrString {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            NumberOrString::Num(n) => Some(*n),
            NumberOrString::Str(s) => s.trim().parse().ok(),
        }
    }
}

/// One item of the archive catalog.
///
/// Immutable once constructed from a search response; sessions replace items,
/// they never mutate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Unique archive identifier.
    pub identifier: String,
    pub title: String,
    pub creator: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub media_kind: MediaKind,
}

/// One file inside an item's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    /// Declared format label (e.g. "VBR MP3", "Text PDF"). Empty when the
    /// archive omitted it.
    pub format: String,
    /// Whether the archive flags this file as an original upload rather than
    /// a derivative.
    pub is_original: bool,
    pub size: Option<u64>,
}

impl FileDescriptor {
    /// Lower-cased extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        let name = self.name.rsplit('/').next().unwrap_or(&self.name);
        name.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

// ============================================================================
// Wire types: search endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    pub response: SearchBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBody {
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchDoc {
    pub identifier: String,
    pub title: Option<StringOrList>,
    pub creator: Option<StringOrList>,
    pub date: Option<StringOrList>,
    pub description: Option<StringOrList>,
    pub mediatype: Option<String>,
}

impl SearchDoc {
    pub(crate) fn into_item(self) -> CatalogItem {
        CatalogItem {
            title: self
                .title
                .map(|t| t.normalized())
                .unwrap_or_else(|| self.identifier.clone()),
            creator: self.creator.map(|c| c.normalized()),
            date: self.date.map(|d| d.normalized()),
            description: self.description.map(|d| d.normalized()),
            media_kind: self
                .mediatype
                .as_deref()
                .map(MediaKind::from_wire)
                .unwrap_or(MediaKind::Other),
            identifier: self.identifier,
        }
    }
}

// ============================================================================
// Wire types: metadata endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct MetadataEnvelope {
    #[serde(default)]
    pub files: FilesField,
}

/// The `files` collection is usually an array; older items occasionally ship
/// an object keyed by file name. A `BTreeMap` keeps the object form in a
/// stable order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FilesField {
    List(Vec<FileEntry>),
    Map(BTreeMap<String, FileEntry>),
}

impl Default for FilesField {
    fn default() -> Self {
        FilesField::List(Vec::new())
    }
}

impl FilesField {
    pub(crate) fn into_descriptors(self) -> Vec<FileDescriptor> {
        match self {
            FilesField::List(entries) => entries
                .into_iter()
                .filter_map(|e| e.into_descriptor(None))
                .collect(),
            FilesField::Map(entries) => entries
                .into_iter()
                .filter_map(|(key, e)| e.into_descriptor(Some(key)))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileEntry {
    pub name: Option<String>,
    pub format: Option<String>,
    pub source: Option<String>,
    pub size: Option<NumberOrString>,
}

impl FileEntry {
    /// Object-form manifests carry the name in the map key, with a leading
    /// slash.
    fn into_descriptor(self, map_key: Option<String>) -> Option<FileDescriptor> {
        let name = self
            .name
            .or_else(|| map_key.map(|k| k.trim_start_matches('/').to_string()))?;
        if name.is_empty() {
            return None;
        }

        Some(FileDescriptor {
            name,
            format: self.format.unwrap_or_default(),
            is_original: self.source.as_deref() == Some("original"),
            size: self.size.and_then(|s| s.as_u64()),
        })
    }
}
