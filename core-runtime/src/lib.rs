//! # Core Runtime
//!
//! Configuration and logging bootstrap for the archive media core.
//!
//! ## Overview
//!
//! This crate holds the two pieces every other core crate relies on:
//!
//! - [`config`] - `CoreConfig` built through a fail-fast builder that
//!   validates all required collaborator bridges up front
//! - [`logging`] - `tracing-subscriber` initialization with env-filter and
//!   selectable output format

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ArchiveSettings, CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
