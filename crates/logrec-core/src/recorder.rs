//! Capture adapter: a [`Sink`] that appends every accepted write to a
//! shared [`RecordStore`].
//!
//! All adapters derived from one root via [`Sink::with`] share the same
//! store. Each derived adapter owns its accumulated context fields, fixed
//! at derivation time, so a child's added context never leaks back into
//! the parent or its siblings.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};

use crate::entry::{Entry, Field, Level};
use crate::error::SinkResult;
use crate::sink::{LevelEnabler, Sink};
use crate::store::{Record, RecordStore};

/// Counter of in-flight writes with a blockable wait-for-zero.
struct WriteTracker {
    count: Mutex<usize>,
    zero: Condvar,
}

impl WriteTracker {
    fn new() -> Self {
        Self {
            count: Mutex::new(0),
            zero: Condvar::new(),
        }
    }

    /// Mark one write started; the guard marks it finished on drop.
    fn start(&self) -> WriteGuard<'_> {
        *self.count.lock() += 1;
        WriteGuard { tracker: self }
    }

    /// Block until the in-flight count reaches zero. No timeout: if a
    /// write never finishes, this never returns.
    fn wait(&self) {
        let mut count = self.count.lock();
        self.zero.wait_while(&mut count, |count| *count > 0);
    }
}

struct WriteGuard<'a> {
    tracker: &'a WriteTracker,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        let mut count = self.tracker.count.lock();
        *count -= 1;
        if *count == 0 {
            self.tracker.zero.notify_all();
        }
    }
}

/// A log backend that records every accepted write for later inspection.
///
/// Created with [`Recorder::new`], which hands back both the backend
/// handle and the [`RecordStore`] it appends to. Test code keeps the store
/// handle and queries it once the code under test has logged.
pub struct Recorder {
    /// Shared destination for this adapter and everything derived from it.
    store: Arc<RecordStore>,

    /// Optional enablement predicate; `None` records everything.
    enabler: Option<Arc<dyn LevelEnabler>>,

    /// Accumulated context fields. Never mutated after construction; the
    /// lock synchronizes derivation reads with merged-list construction
    /// in `write`.
    fields: RwLock<Vec<Field>>,

    /// Writes still in flight on this adapter; `sync` drains it.
    writes: WriteTracker,
}

impl Recorder {
    /// Create a recorder with an optional enablement predicate, returning
    /// the backend handle and the store it appends to.
    pub fn new(enabler: Option<Arc<dyn LevelEnabler>>) -> (Arc<Recorder>, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::new());
        let recorder = Arc::new(Recorder {
            store: Arc::clone(&store),
            enabler,
            fields: RwLock::new(Vec::new()),
            writes: WriteTracker::new(),
        });
        (recorder, store)
    }

    /// Child adapter: same store, same enabler, context extended with
    /// `additional`. Gets its own in-flight tracking scope.
    fn derive(&self, additional: Vec<Field>) -> Recorder {
        let context = self.fields.read();
        let mut fields = Vec::with_capacity(context.len() + additional.len());
        fields.extend(context.iter().cloned());
        fields.extend(additional);
        Recorder {
            store: Arc::clone(&self.store),
            enabler: self.enabler.clone(),
            fields: RwLock::new(fields),
            writes: WriteTracker::new(),
        }
    }
}

impl Sink for Recorder {
    fn enabled(&self, level: Level) -> bool {
        match &self.enabler {
            Some(enabler) => enabler.enabled(level),
            None => true,
        }
    }

    fn check(&self, entry: &Entry) -> bool {
        self.enabled(entry.level)
    }

    fn with(&self, fields: Vec<Field>) -> Arc<dyn Sink> {
        Arc::new(self.derive(fields))
    }

    fn write(&self, entry: Entry, fields: Vec<Field>) -> SinkResult<()> {
        let _in_flight = self.writes.start();
        let context = self.fields.read();
        let mut merged = Vec::with_capacity(context.len() + fields.len());
        merged.extend(context.iter().cloned());
        merged.extend(fields);
        self.store.add(Record {
            entry,
            fields: merged,
        });
        Ok(())
    }

    fn sync(&self) -> SinkResult<()> {
        self.writes.wait();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_no_enabler_records_everything() {
        let (recorder, _store) = Recorder::new(None);
        for level in [
            Level::Trace,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
        ] {
            assert!(recorder.enabled(level));
            assert!(recorder.check(&Entry::new(level, "test", "msg")));
        }
    }

    #[test]
    fn test_enabler_delegation() {
        let only_info = Arc::new(|level: Level| level == Level::Info);
        let (recorder, _store) = Recorder::new(Some(only_info));

        assert!(recorder.enabled(Level::Info));
        assert!(!recorder.enabled(Level::Error));
        assert!(!recorder.check(&Entry::new(Level::Debug, "test", "msg")));
    }

    #[test]
    fn test_write_merges_context_before_call_fields() {
        let (recorder, store) = Recorder::new(None);
        let child = recorder.with(vec![Field::new("ctx", "outer")]);

        child
            .write(
                Entry::new(Level::Info, "test", "msg"),
                vec![Field::new("call", "site")],
            )
            .unwrap();

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].fields,
            vec![Field::new("ctx", "outer"), Field::new("call", "site")]
        );
    }

    #[test]
    fn test_derivation_does_not_mutate_parent() {
        let (parent, store) = Recorder::new(None);
        let child = parent.with(vec![Field::new("hello", "world")]);
        let sibling = parent.with(vec![Field::new("other", "branch")]);

        parent
            .write(Entry::new(Level::Info, "test", "from parent"), Vec::new())
            .unwrap();
        child
            .write(Entry::new(Level::Info, "test", "from child"), Vec::new())
            .unwrap();
        sibling
            .write(Entry::new(Level::Info, "test", "from sibling"), Vec::new())
            .unwrap();

        let records = store.records();
        assert_eq!(records.len(), 3);

        let parent_record = records
            .iter()
            .find(|r| r.entry.message == "from parent")
            .unwrap();
        assert!(parent_record.fields.is_empty());

        let child_record = records
            .iter()
            .find(|r| r.entry.message == "from child")
            .unwrap();
        assert_eq!(child_record.fields, vec![Field::new("hello", "world")]);

        let sibling_record = records
            .iter()
            .find(|r| r.entry.message == "from sibling")
            .unwrap();
        assert_eq!(sibling_record.fields, vec![Field::new("other", "branch")]);
    }

    #[test]
    fn test_grandchild_accumulates_in_order() {
        let (root, store) = Recorder::new(None);
        let child = root.with(vec![Field::new("a", 1i64)]);
        let grandchild = child.with(vec![Field::new("b", 2i64)]);

        grandchild
            .write(
                Entry::new(Level::Info, "test", "deep"),
                vec![Field::new("c", 3i64)],
            )
            .unwrap();

        let records = store.records();
        assert_eq!(
            records[0].fields,
            vec![
                Field::new("a", 1i64),
                Field::new("b", 2i64),
                Field::new("c", 3i64)
            ]
        );
    }

    #[test]
    fn test_sync_on_idle_recorder_returns() {
        let (recorder, _store) = Recorder::new(None);
        recorder.sync().unwrap();
    }

    #[test]
    fn test_write_tracker_waits_for_in_flight() {
        let tracker = Arc::new(WriteTracker::new());
        let finished = Arc::new(AtomicBool::new(false));
        let (started_tx, started_rx) = mpsc::channel();

        let handle = {
            let tracker = Arc::clone(&tracker);
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                let _guard = tracker.start();
                started_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(50));
                finished.store(true, Ordering::SeqCst);
            })
        };

        started_rx.recv().unwrap();
        // The guard drops after the flag is set, so wait() returning
        // proves the write ran to completion.
        tracker.wait();
        assert!(finished.load(Ordering::SeqCst));
        handle.join().unwrap();
    }

    #[test]
    fn test_concurrent_writes_from_shared_recorder() {
        let (recorder, store) = Recorder::new(None);
        let threads = 8;
        let per_thread = 16;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let recorder = Arc::clone(&recorder);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        let entry =
                            Entry::new(Level::Info, "test", format!("entry {}:{}", t, i));
                        recorder.write(entry, Vec::new()).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        recorder.sync().unwrap();

        assert_eq!(store.len(), threads * per_thread);
    }
}
