//! Counting subscribers.

use super::Subscriber;
use crate::subscriptions::EventFilter;
use crate::types::{DataEvent, EventType};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts events of one classification.
#[derive(Debug)]
pub struct TypeCounter {
    event_type: EventType,
    count: AtomicU64,
}

impl TypeCounter {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            count: AtomicU64::new(0),
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Subscriber for TypeCounter {
    fn notify(&self, event: &DataEvent) {
        if event.event_type() == self.event_type {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn filter(&self) -> EventFilter {
        EventFilter::event_type(self.event_type)
    }
}

/// Counts events of one classification on one field.
#[derive(Debug)]
pub struct TypeByFieldCounter {
    event_type: EventType,
    field_name: String,
    count: AtomicU64,
}

impl TypeByFieldCounter {
    pub fn new(event_type: EventType, field_name: impl Into<String>) -> Self {
        Self {
            event_type,
            field_name: field_name.into(),
            count: AtomicU64::new(0),
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Subscriber for TypeByFieldCounter {
    fn notify(&self, event: &DataEvent) {
        if event.event_type() == self.event_type && event.field_name() == self.field_name {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn filter(&self) -> EventFilter {
        EventFilter::type_and_field(self.event_type, self.field_name.clone())
    }
}
