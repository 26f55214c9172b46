//! # Desktop Bridge Implementations
//!
//! Concrete desktop adapters for the `bridge-traits` collaborator contracts:
//!
//! - [`ReqwestHttpClient`](http::ReqwestHttpClient) - HTTP transport via reqwest
//! - [`FsBlobStore`](store::FsBlobStore) - downloads rooted in a directory
//! - [`FileKeyValueStore`](store::FileKeyValueStore) - one file per key
//!
//! The audio engine is intentionally not provided here; hosts wire in their
//! own platform engine behind `bridge_traits::playback::AudioEngine`.

pub mod http;
pub mod store;

pub use http::ReqwestHttpClient;
pub use store::{FileKeyValueStore, FsBlobStore};
