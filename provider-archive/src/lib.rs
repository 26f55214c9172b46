//! # Archive Provider
//!
//! Resolves abstract content requests against a loosely-schematized public
//! media archive.
//!
//! ## Overview
//!
//! This crate covers the network-facing half of the core:
//!
//! - [`query`] - boolean query construction with curated per-category
//!   defaults, format allow-lists, and a blanket exclusion clause
//! - [`search`] - paginated catalog search with tolerant decoding,
//!   dedupe-on-append, and a staleness guard for superseded requests
//! - [`resolver`] - tiered selection of exactly one streamable or
//!   downloadable file per item
//!
//! All network traffic flows through the `bridge_traits::HttpClient`
//! collaborator; nothing here performs local writes.

pub mod error;
pub mod query;
pub mod resolver;
pub mod search;
pub mod types;

pub use error::{ArchiveError, Result};
pub use resolver::AssetResolver;
pub use search::{ArchiveSearchClient, SearchSnapshot};
pub use types::{CatalogItem, FileDescriptor, MediaCategory, MediaKind};
