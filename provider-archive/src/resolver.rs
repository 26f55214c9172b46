//! Asset Resolver
//!
//! Given one catalog item, fetches its file manifest and applies an ordered,
//! multi-tier fallback to pick exactly one file for streaming or one for
//! downloading. Both entry points return a constructed download URL; the
//! transfer itself is a collaborator concern.
//!
//! The manifest is fetched fresh on every call. Resolving the same item twice
//! issues two metadata fetches; that mirrors the freshness behavior of the
//! system this replaces.

use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::config::ArchiveSettings;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{ArchiveError, Result};
use crate::types::{CatalogItem, FileDescriptor, MediaKind, MetadataEnvelope};

/// Preferred codecs for streaming, scanned in order.
const STREAM_PREFERRED_CODECS: [&str; 4] = ["mp3", "ogg", "m4a", "flac"];

/// Extensions the streaming engine accepts. A resolved stream URL always ends
/// in one of these.
const STREAMABLE_EXTENSIONS: [&str; 5] = ["mp3", "ogg", "m4a", "flac", "wav"];

/// Files below this size are implausible as primary content and are skipped
/// by the fallback scan unless their extension already implies the expected
/// content type.
const MIN_PLAUSIBLE_SIZE: u64 = 1_000_000;

/// Format labels that mark archive bookkeeping files, never content.
const BLACKLISTED_FORMAT_MARKERS: [&str; 3] = ["metadata", "log", "item tile"];

/// Name suffixes of archive bookkeeping files.
const BLACKLISTED_NAME_SUFFIXES: [&str; 3] = [".xml", ".sqlite", ".torrent"];

/// The archive's generated thumbnail.
const THUMBNAIL_NAME: &str = "__ia_thumb.jpg";

/// One entry of a per-media-kind download priority list.
struct DownloadFormat {
    /// Substring matched against the declared format label, lower-cased.
    format_marker: &'static str,
    /// File extension matched against the name.
    extension: &'static str,
    /// Known naming idioms that identify this format even when the declared
    /// format label is unhelpful.
    name_idioms: &'static [&'static str],
}

const AUDIO_PRIORITIES: [DownloadFormat; 4] = [
    DownloadFormat { format_marker: "mp3", extension: "mp3", name_idioms: &[] },
    DownloadFormat { format_marker: "flac", extension: "flac", name_idioms: &[] },
    DownloadFormat { format_marker: "ogg", extension: "ogg", name_idioms: &[] },
    DownloadFormat { format_marker: "wav", extension: "wav", name_idioms: &[] },
];

const MOVIE_PRIORITIES: [DownloadFormat; 4] = [
    DownloadFormat { format_marker: "mpeg4", extension: "mp4", name_idioms: &[] },
    DownloadFormat { format_marker: "avi", extension: "avi", name_idioms: &[] },
    DownloadFormat { format_marker: "quicktime", extension: "mov", name_idioms: &[] },
    DownloadFormat { format_marker: "matroska", extension: "mkv", name_idioms: &[] },
];

const IMAGE_PRIORITIES: [DownloadFormat; 4] = [
    DownloadFormat { format_marker: "jpeg", extension: "jpg", name_idioms: &[] },
    DownloadFormat { format_marker: "png", extension: "png", name_idioms: &[] },
    DownloadFormat { format_marker: "gif", extension: "gif", name_idioms: &[] },
    DownloadFormat { format_marker: "tiff", extension: "tiff", name_idioms: &[] },
];

const TEXT_PRIORITIES: [DownloadFormat; 4] = [
    DownloadFormat {
        format_marker: "pdf",
        extension: "pdf",
        name_idioms: &["_text.pdf", "_bw.pdf"],
    },
    DownloadFormat { format_marker: "epub", extension: "epub", name_idioms: &[] },
    DownloadFormat {
        format_marker: "text",
        extension: "txt",
        name_idioms: &["_djvu.txt"],
    },
    DownloadFormat { format_marker: "djvu", extension: "djvu", name_idioms: &[] },
];

fn download_priorities(kind: MediaKind) -> &'static [DownloadFormat] {
    match kind {
        MediaKind::Audio => &AUDIO_PRIORITIES,
        MediaKind::Movies => &MOVIE_PRIORITIES,
        MediaKind::Image => &IMAGE_PRIORITIES,
        // Texts and anything unclassified fall back to document formats.
        MediaKind::Texts | MediaKind::Other => &TEXT_PRIORITIES,
    }
}

/// Extensions that strongly imply primary content for a media kind, letting
/// small files through the size plausibility filter.
fn strong_extensions(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Audio => &["mp3", "flac", "ogg", "wav", "m4a"],
        MediaKind::Movies => &["mp4", "avi", "mov", "mkv", "webm"],
        MediaKind::Image => &["jpg", "jpeg", "png", "gif", "tiff"],
        MediaKind::Texts | MediaKind::Other => &["pdf", "epub", "txt", "djvu", "mobi"],
    }
}

/// Format labels acceptable to the tier-2 fallback scan. Broader than the
/// tier-1 priority lists; tier 1 picks the best format, tier 2 takes anything
/// usable.
fn acceptable_format_markers(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Audio => &["mp3", "flac", "ogg", "wav", "audio", "aiff", "shorten"],
        MediaKind::Movies => &["mpeg4", "avi", "quicktime", "matroska", "video", "ogv"],
        MediaKind::Image => &["jpeg", "png", "gif", "tiff", "image"],
        MediaKind::Texts | MediaKind::Other => {
            &["pdf", "epub", "text", "djvu", "kindle", "daisy"]
        }
    }
}

fn is_blacklisted(file: &FileDescriptor) -> bool {
    let name = file.name.to_ascii_lowercase();
    let format = file.format.to_ascii_lowercase();

    if name == THUMBNAIL_NAME {
        return true;
    }
    if BLACKLISTED_NAME_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return true;
    }
    BLACKLISTED_FORMAT_MARKERS
        .iter()
        .any(|m| format.contains(m))
}

/// Resolves catalog items into concrete asset URLs.
///
/// Calls are independent; many resolutions may run concurrently and a failure
/// in one never affects another.
pub struct AssetResolver {
    http: Arc<dyn HttpClient>,
    settings: ArchiveSettings,
}

impl AssetResolver {
    pub fn new(http: Arc<dyn HttpClient>, settings: ArchiveSettings) -> Self {
        Self { http, settings }
    }

    fn download_url(&self, identifier: &str, file_name: &str) -> String {
        format!(
            "{}/download/{}/{}",
            self.settings.base_url,
            identifier,
            urlencoding::encode(file_name)
        )
    }

    async fn fetch_manifest(&self, identifier: &str) -> Result<Vec<FileDescriptor>> {
        let url = format!("{}/metadata/{}", self.settings.base_url, identifier);
        let request = HttpRequest::get(url).timeout(self.settings.request_timeout);

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(ArchiveError::Network(format!(
                "metadata request for '{}' failed with status {}",
                identifier, response.status
            )));
        }

        let envelope: MetadataEnvelope =
            serde_json::from_slice(&response.body).map_err(|e| {
                ArchiveError::InvalidResponse(format!(
                    "manifest for '{}' could not be decoded: {}",
                    identifier, e
                ))
            })?;

        Ok(envelope.files.into_descriptors())
    }

    /// Pick one file suitable for streaming and return its URL.
    ///
    /// Tier 1 scans original-source files against the preferred codec list in
    /// order; tier 2 repeats the scan allowing derivatives. Either way the
    /// candidate's extension must belong to the streamable set.
    #[instrument(skip(self, item), fields(identifier = %item.identifier))]
    pub async fn resolve_streamable(&self, item: &CatalogItem) -> Result<String> {
        let files = self.fetch_manifest(&item.identifier).await?;

        for require_original in [true, false] {
            if let Some(file) = Self::scan_streamable(&files, require_original) {
                debug!(file = %file.name, original = require_original, "Resolved stream");
                return Ok(self.download_url(&item.identifier, &file.name));
            }
        }

        Err(ArchiveError::NoPlayableFile(item.identifier.clone()))
    }

    fn scan_streamable(files: &[FileDescriptor], require_original: bool) -> Option<&FileDescriptor> {
        for codec in STREAM_PREFERRED_CODECS {
            // A codec match only counts when the engine can actually stream
            // the file, so a playlist or bundle that merely mentions the
            // codec never shadows a real candidate later in the manifest.
            let hit = files.iter().find(|f| {
                (!require_original || f.is_original)
                    && !is_blacklisted(f)
                    && (f.name.to_ascii_lowercase().contains(codec)
                        || f.format.to_ascii_lowercase().contains(codec))
                    && f.extension()
                        .map(|ext| STREAMABLE_EXTENSIONS.contains(&ext.as_str()))
                        .unwrap_or(false)
            });

            if hit.is_some() {
                return hit;
            }
        }
        None
    }

    /// Pick one file suitable for downloading and return its URL.
    ///
    /// Tier 1 walks the per-media-kind format priority list; tier 2 falls
    /// back to any plausibly-sized non-bookkeeping file in an acceptable
    /// format.
    #[instrument(skip(self, item), fields(identifier = %item.identifier))]
    pub async fn resolve_downloadable(&self, item: &CatalogItem) -> Result<String> {
        let files = self.fetch_manifest(&item.identifier).await?;
        let kind = item.media_kind;

        if let Some(file) = Self::scan_priorities(&files, kind) {
            debug!(file = %file.name, "Resolved download via priority list");
            return Ok(self.download_url(&item.identifier, &file.name));
        }

        if let Some(file) = Self::scan_fallback(&files, kind) {
            debug!(file = %file.name, "Resolved download via fallback scan");
            return Ok(self.download_url(&item.identifier, &file.name));
        }

        Err(ArchiveError::NoDownloadableFile(item.identifier.clone()))
    }

    fn scan_priorities(files: &[FileDescriptor], kind: MediaKind) -> Option<&FileDescriptor> {
        for priority in download_priorities(kind) {
            let hit = files.iter().find(|f| {
                if is_blacklisted(f) {
                    return false;
                }
                let name = f.name.to_ascii_lowercase();
                let format = f.format.to_ascii_lowercase();

                format.contains(priority.format_marker)
                    || name.ends_with(&format!(".{}", priority.extension))
                    || priority.name_idioms.iter().any(|idiom| name.contains(idiom))
            });

            // Stop at the first priority format with any match.
            if hit.is_some() {
                return hit;
            }
        }
        None
    }

    fn scan_fallback(files: &[FileDescriptor], kind: MediaKind) -> Option<&FileDescriptor> {
        let strong = strong_extensions(kind);

        files.iter().find(|f| {
            if is_blacklisted(f) {
                return false;
            }

            let extension = f.extension().unwrap_or_default();
            let strongly_typed = strong.contains(&extension.as_str());

            // Size plausibility: tiny files are almost never the content
            // itself unless the extension says otherwise.
            if let Some(size) = f.size {
                if size < MIN_PLAUSIBLE_SIZE && !strongly_typed {
                    return false;
                }
            }

            let format = f.format.to_ascii_lowercase();
            strongly_typed
                || acceptable_format_markers(kind)
                    .iter()
                    .any(|marker| format.contains(marker))
        })
    }
}
