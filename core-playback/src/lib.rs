//! # Playback Arbitration
//!
//! Owns the process's single shared audio output and arbitrates it across
//! every independent trigger (list rows, grid cards, the mini control
//! surface).
//!
//! ## Overview
//!
//! - [`traits`] - the [`StreamLocator`](traits::StreamLocator) seam between
//!   the arbiter and asset resolution, plus [`PlaybackItem`](traits::PlaybackItem)
//! - [`arbiter`] - the [`PlaybackArbiter`](arbiter::PlaybackArbiter): a
//!   serialized state machine guaranteeing at most one live engine handle,
//!   with queue navigation and a shared observable projection
//!
//! The arbiter is an explicitly constructed object owned by the host's
//! composition root and passed by handle to every consumer; there is no
//! ambient global.

pub mod arbiter;
pub mod error;
pub mod traits;

pub use arbiter::{ArbiterState, PlaybackArbiter, PlaybackSnapshot};
pub use error::{PlaybackError, Result};
pub use traits::{ArchiveStreamLocator, PlaybackItem, StreamLocator};
