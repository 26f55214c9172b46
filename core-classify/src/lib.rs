//! # Content Classifier
//!
//! Heuristic keyword-rule engine that tags a catalog item with a best-guess
//! genre, source type, and content type.
//!
//! ## Overview
//!
//! - [`rules`] - pure, data-driven ordered rule lists, evaluated
//!   top-to-bottom with first-match-wins semantics and fixed defaults
//! - [`service`] - the cached classifier: records persist through the
//!   `KeyValueStore` collaborator and are computed at most once per item
//!
//! Classification is advisory only. Nothing in the core treats these tags as
//! authoritative metadata.

pub mod error;
pub mod record;
pub mod rules;
pub mod service;

pub use error::{ClassifyError, Result};
pub use record::ClassificationRecord;
pub use service::ContentClassifier;
