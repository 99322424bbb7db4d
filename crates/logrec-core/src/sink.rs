//! Backend capability contract consumed by the logging facade.
//!
//! The facade talks to a destination through two small traits: a
//! [`LevelEnabler`] it consults before constructing a write, and a [`Sink`]
//! it delivers constructed entries to. The capture
//! [`Recorder`](crate::recorder::Recorder) is one `Sink` implementation; a
//! production backend writing to a file or socket would be another.

use std::sync::Arc;

use crate::entry::{Entry, Field, Level};
use crate::error::SinkResult;

/// Level-enablement predicate consulted before a write is constructed.
pub trait LevelEnabler: Send + Sync {
    /// Whether entries at `level` should be recorded.
    fn enabled(&self, level: Level) -> bool;
}

impl<F> LevelEnabler for F
where
    F: Fn(Level) -> bool + Send + Sync,
{
    fn enabled(&self, level: Level) -> bool {
        self(level)
    }
}

/// A bare `Level` acts as a threshold: itself and above.
impl LevelEnabler for Level {
    fn enabled(&self, level: Level) -> bool {
        level >= *self
    }
}

/// Pluggable log backend.
///
/// All methods must be safe to call concurrently. `with` derives a child
/// backend that shares the parent's destination; it never mutates the
/// parent, so concurrent derivation from a shared parent is safe.
pub trait Sink: Send + Sync {
    /// Whether entries at `level` are accepted at all.
    fn enabled(&self, level: Level) -> bool;

    /// Gate consulted before the facade constructs a full write. Decides
    /// solely on the entry's level; no side effects.
    fn check(&self, entry: &Entry) -> bool;

    /// Derive a backend with `fields` appended to the accumulated context.
    fn with(&self, fields: Vec<Field>) -> Arc<dyn Sink>;

    /// Deliver one entry plus its call-site fields.
    fn write(&self, entry: Entry, fields: Vec<Field>) -> SinkResult<()>;

    /// Block until all writes already started on this backend have
    /// completed.
    fn sync(&self) -> SinkResult<()>;
}
