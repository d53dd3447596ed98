//! Subscribers that write accepted events to an output stream.

use super::Subscriber;
use crate::error::Result;
use crate::subscriptions::EventFilter;
use crate::types::{DataEvent, EventType};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which events a stream writer accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamSelector {
    All,
    EventType(EventType),
    TypeAndField(EventType, String),
}

impl StreamSelector {
    fn accepts(&self, event: &DataEvent) -> bool {
        match self {
            StreamSelector::All => true,
            StreamSelector::EventType(t) => event.event_type() == *t,
            StreamSelector::TypeAndField(t, name) => {
                event.event_type() == *t && event.field_name() == name
            }
        }
    }

    fn to_filter(&self) -> EventFilter {
        match self {
            StreamSelector::All => EventFilter::All,
            StreamSelector::EventType(t) => EventFilter::event_type(*t),
            StreamSelector::TypeAndField(t, name) => EventFilter::type_and_field(*t, name.clone()),
        }
    }
}

/// Line format produced by a stream writer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamFormat {
    /// `type<d>field<d>value<d>record\n`
    #[default]
    Delimited,
    /// One JSON object per line.
    JsonLines,
}

/// Configuration for a stream writer.
#[derive(Clone, Debug)]
pub struct StreamWriterConfig {
    /// Column separator for delimited output.
    /// Default: tab
    pub delimiter: String,

    /// Rendered in place of an absent or empty field name/value.
    /// Default: "None"
    pub placeholder: String,

    pub format: StreamFormat,
}

impl Default for StreamWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: "\t".to_string(),
            placeholder: "None".to_string(),
            format: StreamFormat::Delimited,
        }
    }
}

/// Writes each accepted event as one line and flushes immediately.
pub struct StreamWriter<W: Write + Send> {
    sink: Mutex<W>,
    selector: StreamSelector,
    config: StreamWriterConfig,
    write_failures: AtomicU64,
}

impl<W: Write + Send> StreamWriter<W> {
    pub fn new(sink: W, selector: StreamSelector, config: StreamWriterConfig) -> Self {
        Self {
            sink: Mutex::new(sink),
            selector,
            config,
            write_failures: AtomicU64::new(0),
        }
    }

    /// Write every event, tab-delimited.
    pub fn all(sink: W) -> Self {
        Self::new(sink, StreamSelector::All, StreamWriterConfig::default())
    }

    /// Write events of one classification, tab-delimited.
    pub fn by_type(sink: W, event_type: EventType) -> Self {
        Self::new(
            sink,
            StreamSelector::EventType(event_type),
            StreamWriterConfig::default(),
        )
    }

    /// Write events of one classification on one field, tab-delimited.
    pub fn by_type_and_field(sink: W, event_type: EventType, field_name: impl Into<String>) -> Self {
        Self::new(
            sink,
            StreamSelector::TypeAndField(event_type, field_name.into()),
            StreamWriterConfig::default(),
        )
    }

    pub fn selector(&self) -> &StreamSelector {
        &self.selector
    }

    /// Number of events dropped because the sink failed.
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    /// Render one event in the configured format, newline-terminated.
    pub fn format_line(&self, event: &DataEvent) -> Result<String> {
        match self.config.format {
            StreamFormat::Delimited => {
                let placeholder = self.config.placeholder.as_str();
                let name = Some(event.field_name())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(placeholder);
                let value = event
                    .field_value()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(placeholder);
                let d = &self.config.delimiter;
                Ok(format!(
                    "{}{d}{}{d}{}{d}{}\n",
                    event.event_type(),
                    name,
                    value,
                    event.record_number()
                ))
            }
            StreamFormat::JsonLines => {
                let mut line = serde_json::to_string(event)?;
                line.push('\n');
                Ok(line)
            }
        }
    }

    fn write_event(&self, event: &DataEvent) -> Result<()> {
        let line = self.format_line(event)?;
        let mut sink = self.sink.lock();
        sink.write_all(line.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Subscriber for StreamWriter<W> {
    fn notify(&self, event: &DataEvent) {
        if !self.selector.accepts(event) {
            return;
        }

        if let Err(e) = self.write_event(event) {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                field = event.field_name(),
                record = event.record_number(),
                error = %e,
                "stream writer dropped event"
            );
        }
    }

    fn filter(&self) -> EventFilter {
        self.selector.to_filter()
    }
}
