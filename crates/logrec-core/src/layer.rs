//! `tracing` bridge: a Layer that feeds events into a capture [`Sink`].
//!
//! This is what makes the recorder usable from ordinary `tracing::info!`
//! call sites in tests. Compose it onto a registry and scope it with
//! `tracing::subscriber::with_default` so parallel tests stay isolated.

use std::fmt::Write as FmtWrite;
use std::sync::Arc;

use tracing::field::{Field as EventField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::entry::{Entry, Field, FieldValue, Level};
use crate::recorder::Recorder;
use crate::sink::{LevelEnabler, Sink};
use crate::store::RecordStore;

/// A tracing Layer that forwards every accepted event to a [`Sink`].
pub struct CaptureLayer {
    sink: Arc<dyn Sink>,
}

impl CaptureLayer {
    /// Wrap an existing sink.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

/// Capture everything: a layer with no enablement predicate, plus the
/// store it records to.
pub fn capture() -> (CaptureLayer, Arc<RecordStore>) {
    let (recorder, store) = Recorder::new(None);
    (CaptureLayer::new(recorder), store)
}

/// Capture only what `enabler` accepts.
pub fn capture_with(enabler: Arc<dyn LevelEnabler>) -> (CaptureLayer, Arc<RecordStore>) {
    let (recorder, store) = Recorder::new(Some(enabler));
    (CaptureLayer::new(recorder), store)
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.sink.enabled(Level::from(*metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();

        // Extract the message and fields
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut entry = Entry::new(
            Level::from(*metadata.level()),
            metadata.target(),
            visitor.message.unwrap_or_default(),
        );

        // Add span context if available
        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<String> = scope
                .from_root()
                .map(|span| span.name().to_string())
                .collect();
            if !spans.is_empty() {
                entry = entry.with_span(spans.join(" > "));
            }
        }

        if !self.sink.check(&entry) {
            return;
        }

        // Forward the write (ignore errors to avoid panics in logging)
        let _ = self.sink.write(entry, visitor.fields);
    }
}

/// Visitor that extracts the message and structured fields from an event.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<Field>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &EventField, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.fields.push(Field::new(field.name(), buf));
        }
    }

    fn record_str(&mut self, field: &EventField, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(Field::new(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &EventField, value: i64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &EventField, value: u64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &EventField, value: f64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &EventField, value: bool) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_error(&mut self, field: &EventField, value: &(dyn std::error::Error + 'static)) {
        self.fields
            .push(Field::new(field.name(), FieldValue::Error(value.to_string())));
    }
}
