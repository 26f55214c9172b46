//! Classification rule tables.
//!
//! Each facet (genre, content type, source type) has an ordered list of
//! substring rules evaluated top-to-bottom against the lower-cased
//! concatenation of title, description, and creator. First match wins; when
//! nothing matches, a fixed default applies. No facet ever resolves to
//! "unknown".
//!
//! These tables are pure data with no I/O or framework dependency.

use provider_archive::MediaCategory;

/// One substring rule: any pattern hit yields the tag.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub patterns: &'static [&'static str],
    pub tag: &'static str,
}

/// Evaluate an ordered rule list against a pre-lowercased haystack.
pub fn evaluate(rules: &[Rule], haystack: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| haystack.contains(p)))
        .map(|rule| rule.tag)
}

// ============================================================================
// Genre facet (per category)
// ============================================================================

const MUSIC_GENRES: [Rule; 8] = [
    Rule { patterns: &["rock", "punk", "metal"], tag: "rock" },
    Rule { patterns: &["jazz", "swing", "bebop"], tag: "jazz" },
    Rule { patterns: &["symphony", "concerto", "orchestra", "classical"], tag: "classical" },
    Rule { patterns: &["electronic", "synth", "techno", "ambient"], tag: "electronic" },
    Rule { patterns: &["hip hop", "hip-hop", "rap"], tag: "hip-hop" },
    Rule { patterns: &["folk", "bluegrass", "traditional"], tag: "folk" },
    Rule { patterns: &["blues"], tag: "blues" },
    Rule { patterns: &["country", "western"], tag: "country" },
];

const BOOKISH_GENRES: [Rule; 8] = [
    Rule { patterns: &["mystery", "detective", "crime"], tag: "mystery" },
    Rule { patterns: &["science fiction", "sci-fi", "scifi"], tag: "science fiction" },
    Rule { patterns: &["romance", "love story"], tag: "romance" },
    Rule { patterns: &["history", "historical", "war"], tag: "history" },
    Rule { patterns: &["biography", "memoir", "autobiography"], tag: "biography" },
    Rule { patterns: &["poem", "poetry", "verse"], tag: "poetry" },
    Rule { patterns: &["children", "fairy tale", "juvenile"], tag: "children" },
    Rule { patterns: &["adventure", "fiction", "novel"], tag: "fiction" },
];

const RADIO_GENRES: [Rule; 4] = [
    Rule { patterns: &["drama", "theater", "theatre"], tag: "drama" },
    Rule { patterns: &["comedy", "humor"], tag: "comedy" },
    Rule { patterns: &["news", "report"], tag: "news" },
    Rule { patterns: &["mystery", "suspense", "thriller"], tag: "mystery" },
];

/// Genre rules for the active category. Local-only categories have no genre
/// facet.
pub fn genre_rules(category: MediaCategory) -> Option<&'static [Rule]> {
    match category {
        MediaCategory::Music => Some(&MUSIC_GENRES),
        MediaCategory::Audiobooks | MediaCategory::Books => Some(&BOOKISH_GENRES),
        MediaCategory::Radio => Some(&RADIO_GENRES),
        _ => None,
    }
}

/// Default genre per category when no rule matches.
pub fn default_genre(category: MediaCategory) -> Option<&'static str> {
    match category {
        MediaCategory::Music => Some("independent"),
        MediaCategory::Audiobooks | MediaCategory::Books => Some("general"),
        MediaCategory::Radio => Some("variety"),
        _ => None,
    }
}

// ============================================================================
// Content type facet
// ============================================================================

pub const CONTENT_TYPE_RULES: [Rule; 5] = [
    Rule {
        patterns: &["audiobook", "audio book", "librivox", "narrated", "read by"],
        tag: "audiobook",
    },
    Rule { patterns: &["podcast", "episode"], tag: "podcast" },
    Rule { patterns: &["radio", "broadcast", "on the air"], tag: "radio" },
    Rule {
        patterns: &["album", "concert", "live at", "music", "song"],
        tag: "music",
    },
    Rule { patterns: &["novel", "book", "stories", "essays"], tag: "book" },
];

/// Default content type per category when no rule matches.
pub fn default_content_type(category: MediaCategory) -> &'static str {
    match category {
        MediaCategory::Audiobooks => "audiobook",
        MediaCategory::Music => "music",
        MediaCategory::Radio => "radio",
        MediaCategory::Books => "book",
        _ => "document",
    }
}

// ============================================================================
// Source type facet
// ============================================================================

pub const SOURCE_TYPE_RULES: [Rule; 4] = [
    Rule { patterns: &["librivox"], tag: "librivox" },
    Rule { patterns: &["gutenberg"], tag: "gutenberg" },
    Rule { patterns: &["78rpm", "78 rpm", "cylinder"], tag: "archival" },
    Rule { patterns: &["radio", "station", "broadcast"], tag: "broadcast" },
];

pub const DEFAULT_SOURCE_TYPE: &str = "community";
