//! # Host Bridge Traits
//!
//! Collaborator interfaces that the core consumes but never implements.
//!
//! ## Overview
//!
//! This crate defines the contract between the archive media core and its
//! host application. Each trait represents a capability the core requires but
//! that the host provides: HTTP transport, opaque key-value persistence, a
//! local blob store for downloaded assets, and the platform audio engine.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations
//! - [`KeyValueStore`](store::KeyValueStore) - Opaque bytes persistence
//! - [`BlobStore`](store::BlobStore) - Materialized download storage
//! - [`AudioEngine`](playback::AudioEngine) - Engine-handle factory for playback
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared
//! across async tasks behind `Arc<dyn _>` handles.
//!
//! ## Error Handling
//!
//! Every bridge operation returns [`BridgeError`](error::BridgeError). Host
//! implementations should convert platform-specific failures into it with
//! actionable messages.

pub mod error;
pub mod http;
pub mod playback;
pub mod store;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use playback::{AudioEngine, AudioSource, EngineHandle};
pub use store::{BlobStore, KeyValueStore};
