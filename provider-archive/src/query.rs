//! Catalog Query Builder
//!
//! Turns a free-text term plus a logical media category into the archive's
//! boolean query syntax. Empty terms fall back to a curated query per
//! category so "browse by category" is populated without user input. Every
//! emitted query carries a blanket exclusion of access-restricted
//! collections.

use crate::types::{MediaCategory, MediaKind};

/// Collections that hold spoken-word recordings. Audiobook queries require
/// membership, music queries require non-membership.
pub const SPOKEN_WORD_COLLECTIONS: &str =
    "(collection:(librivoxaudio) OR collection:(audio_bookspoetry))";

/// Access-restricted collections removed from every query.
pub const RESTRICTED_EXCLUSION: &str =
    "NOT collection:(printdisabled OR lendinglibrary OR inlibrary)";

/// Curated browse query per category, emitted when the free-text term is
/// empty. A disjunction of representative subjects plus the media-kind
/// constraint.
pub const CURATED_AUDIOBOOKS: &str = "(subject:(adventure) OR subject:(fiction) OR \
     subject:(mystery) OR subject:(poetry)) AND mediatype:(audio) AND \
     (collection:(librivoxaudio) OR collection:(audio_bookspoetry))";

pub const CURATED_BOOKS: &str = "(subject:(fiction) OR subject:(literature) OR \
     subject:(history) OR subject:(science)) AND mediatype:(texts)";

pub const CURATED_MUSIC: &str = "(subject:(rock) OR subject:(jazz) OR \
     subject:(classical) OR subject:(electronic)) AND mediatype:(audio) AND \
     NOT (collection:(librivoxaudio) OR collection:(audio_bookspoetry))";

pub const CURATED_RADIO: &str = "(subject:(radio) OR subject:(broadcast) OR \
     subject:(\"old time radio\")) AND mediatype:(audio)";

fn curated_query(category: MediaCategory) -> Option<&'static str> {
    match category {
        MediaCategory::Audiobooks => Some(CURATED_AUDIOBOOKS),
        MediaCategory::Books => Some(CURATED_BOOKS),
        MediaCategory::Music => Some(CURATED_MUSIC),
        MediaCategory::Radio => Some(CURATED_RADIO),
        _ => None,
    }
}

/// Category-specific refinement clause ANDed onto free-text queries.
fn refinement_clause(category: MediaCategory) -> Option<String> {
    match category {
        MediaCategory::Audiobooks => Some(SPOKEN_WORD_COLLECTIONS.to_string()),
        MediaCategory::Music => Some(format!("NOT {}", SPOKEN_WORD_COLLECTIONS)),
        _ => None,
    }
}

/// Per-category format allow-list clause.
fn format_clause(category: MediaCategory) -> Option<&'static str> {
    match category {
        MediaCategory::Books => Some("format:(pdf OR epub OR text)"),
        MediaCategory::Audiobooks | MediaCategory::Music | MediaCategory::Radio => {
            Some("format:(mp3 OR ogg OR flac OR wav)")
        }
        _ => None,
    }
}

/// Build the archive query for a search.
///
/// Returns `None` for local-only categories; callers must short-circuit
/// before any network call. The free-text term is percent-encoded so user
/// input can never be read as query syntax.
pub fn build_query(term: &str, category: MediaCategory, kind_hint: MediaKind) -> Option<String> {
    if category.is_local_only() {
        return None;
    }

    let term = term.trim();

    if term.is_empty() {
        let curated = curated_query(category)?;
        return Some(format!("{} AND {}", curated, RESTRICTED_EXCLUSION));
    }

    let mut query = format!(
        "({}) AND mediatype:({})",
        urlencoding::encode(term),
        kind_hint.as_wire()
    );

    if let Some(refinement) = refinement_clause(category) {
        query.push_str(" AND ");
        query.push_str(&refinement);
    }

    if let Some(formats) = format_clause(category) {
        query.push_str(" AND ");
        query.push_str(formats);
    }

    query.push_str(" AND ");
    query.push_str(RESTRICTED_EXCLUSION);

    Some(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_term_books_emits_curated_query() {
        let query = build_query("", MediaCategory::Books, MediaKind::Texts).unwrap();
        assert_eq!(query, format!("{} AND {}", CURATED_BOOKS, RESTRICTED_EXCLUSION));
        assert!(query.contains("mediatype:(texts)"));
        assert!(query.contains("subject:(fiction)"));
    }

    #[test]
    fn whitespace_term_counts_as_empty() {
        let blank = build_query("   ", MediaCategory::Music, MediaKind::Audio).unwrap();
        let empty = build_query("", MediaCategory::Music, MediaKind::Audio).unwrap();
        assert_eq!(blank, empty);
    }

    #[test]
    fn free_text_audiobooks_requires_spoken_word_collections() {
        let query = build_query("dracula", MediaCategory::Audiobooks, MediaKind::Audio).unwrap();

        assert!(query.starts_with("(dracula) AND mediatype:(audio)"));
        assert!(query.contains(SPOKEN_WORD_COLLECTIONS));
        assert!(!query.contains(&format!("NOT {}", SPOKEN_WORD_COLLECTIONS)));
        assert!(query.contains("format:(mp3 OR ogg OR flac OR wav)"));
        assert!(query.ends_with(RESTRICTED_EXCLUSION));
    }

    #[test]
    fn free_text_music_excludes_spoken_word_collections() {
        let query = build_query("miles davis", MediaCategory::Music, MediaKind::Audio).unwrap();
        assert!(query.contains(&format!("NOT {}", SPOKEN_WORD_COLLECTIONS)));
    }

    #[test]
    fn free_text_term_is_percent_encoded() {
        let query = build_query("jazz & blues", MediaCategory::Music, MediaKind::Audio).unwrap();
        assert!(query.starts_with("(jazz%20%26%20blues)"));
    }

    #[test]
    fn books_get_text_format_allow_list() {
        let query = build_query("shakespeare", MediaCategory::Books, MediaKind::Texts).unwrap();
        assert!(query.contains("format:(pdf OR epub OR text)"));
    }

    #[test]
    fn local_only_categories_yield_no_query() {
        assert_eq!(build_query("anything", MediaCategory::Notes, MediaKind::Texts), None);
        assert_eq!(build_query("", MediaCategory::Journal, MediaKind::Texts), None);
        assert_eq!(build_query("x", MediaCategory::SocialHub, MediaKind::Other), None);
    }

    #[test]
    fn every_remote_query_carries_the_exclusion_clause() {
        for category in [
            MediaCategory::Audiobooks,
            MediaCategory::Books,
            MediaCategory::Music,
            MediaCategory::Radio,
        ] {
            let curated = build_query("", category, MediaKind::Audio).unwrap();
            let typed = build_query("term", category, MediaKind::Audio).unwrap();
            assert!(curated.contains(RESTRICTED_EXCLUSION), "{:?}", category);
            assert!(typed.contains(RESTRICTED_EXCLUSION), "{:?}", category);
        }
    }
}
