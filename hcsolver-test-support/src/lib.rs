//! Helpers shared by the hcsolver test suites.

pub mod tracing {
    //! In-memory capture of `tracing` output.
    //!
    //! Install a [`RecordingLayer`] on a registry with
    //! `tracing::subscriber::with_default`, run the code under test, then
    //! query the captured spans and events.
    use std::collections::BTreeMap;
    use std::fmt::Debug;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::registry::LookupSpan;

    /// Field values rendered as strings, keyed by field name.
    pub type Fields = BTreeMap<String, String>;

    /// A span captured when it closed.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct SpanRecord {
        /// Name from the span metadata.
        pub name: String,
        /// Fields given at creation plus any recorded afterwards.
        pub fields: Fields,
    }

    /// A captured event.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Emitting target.
        pub target: String,
        /// Event fields, `message` included.
        pub fields: Fields,
    }

    impl EventRecord {
        /// Value of the `message` field.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    #[derive(Default)]
    struct Journal {
        spans: Vec<SpanRecord>,
        events: Vec<EventRecord>,
    }

    /// Layer that appends everything it observes to a shared journal.
    ///
    /// Clones share the journal, so keep one clone for assertions.
    ///
    /// ```
    /// use hcsolver_test_support::tracing::RecordingLayer;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = RecordingLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || {
    ///     tracing::info!(merges = 2, "clustering finished");
    /// });
    /// let finished = layer.events_with_message("clustering finished");
    /// assert_eq!(finished[0].fields.get("merges").map(String::as_str), Some("2"));
    /// ```
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        journal: Arc<Mutex<Journal>>,
    }

    impl RecordingLayer {
        fn journal(&self) -> MutexGuard<'_, Journal> {
            // A panicking assertion elsewhere must not hide what was captured.
            self.journal.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Closed spans, earliest close first.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.journal().spans.clone()
        }

        /// Events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.journal().events.clone()
        }

        /// The first closed span with this name.
        #[must_use]
        pub fn span_named(&self, name: &str) -> Option<SpanRecord> {
            self.journal()
                .spans
                .iter()
                .find(|span| span.name == name)
                .cloned()
        }

        /// Every event whose message is exactly `message`.
        #[must_use]
        pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
            self.journal()
                .events
                .iter()
                .filter(|event| event.message() == Some(message))
                .cloned()
                .collect()
        }
    }

    /// Extension slot holding a span until it closes.
    struct OpenSpan(SpanRecord);

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id) {
                let mut fields = Fields::new();
                attrs.record(&mut Collect(&mut fields));
                let name = attrs.metadata().name().to_owned();
                span.extensions_mut().insert(OpenSpan(SpanRecord { name, fields }));
            }
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id) {
                if let Some(OpenSpan(record)) = span.extensions_mut().get_mut::<OpenSpan>() {
                    values.record(&mut Collect(&mut record.fields));
                }
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let closed = ctx
                .span(&id)
                .and_then(|span| span.extensions_mut().remove::<OpenSpan>());
            if let Some(OpenSpan(record)) = closed {
                self.journal().spans.push(record);
            }
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut Collect(&mut fields));
            let metadata = event.metadata();
            self.journal().events.push(EventRecord {
                level: *metadata.level(),
                target: metadata.target().to_owned(),
                fields,
            });
        }
    }

    /// Visitor writing string fields verbatim and everything else via `Debug`.
    struct Collect<'a>(&'a mut Fields);

    impl Visit for Collect<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

}
