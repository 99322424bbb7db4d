//! Logrec Core Library
//!
//! In-memory log capture for test assertions. Entries emitted through a
//! structured logging facade are recorded into a queryable [`RecordStore`]
//! instead of an external sink, so tests can assert on exactly what was
//! logged.
//!
//! ## Overview
//!
//! - [`RecordStore`]: append-only, thread-safe collection of captured
//!   records, queryable by snapshot and by severity.
//! - [`Recorder`]: the capture backend. It implements the [`Sink`]
//!   contract the facade plugs into (`enabled` / `check` / `with` /
//!   `write` / `sync`) and appends every accepted write to the shared
//!   store. `with` derives child backends that add context fields without
//!   touching the parent.
//! - [`CaptureLayer`]: a `tracing` Layer that routes events into a sink,
//!   so ordinary `tracing::info!` call sites are captured.
//!
//! ## Quick Start
//!
//! ```ignore
//! use logrec_core::{capture, Level};
//! use tracing_subscriber::prelude::*;
//!
//! let (layer, store) = capture();
//! let subscriber = tracing_subscriber::registry().with(layer);
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(user = "alice", "logged in");
//! });
//!
//! let records = store.records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].entry.message, "logged in");
//! assert_eq!(store.records_by_level(Level::Info).len(), 1);
//! ```

pub mod entry;
pub mod error;
pub mod layer;
pub mod recorder;
pub mod sink;
pub mod store;

// Re-exports
pub use entry::{Entry, Field, FieldValue, Level, ParseLevelError};
pub use error::{SinkError, SinkResult};
pub use layer::{capture, capture_with, CaptureLayer};
pub use recorder::Recorder;
pub use sink::{LevelEnabler, Sink};
pub use store::{Record, RecordStore};
