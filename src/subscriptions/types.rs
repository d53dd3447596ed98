//! Filter and configuration types for the message board.

use crate::types::{DataEvent, EventType};

/// Default number of recent events retained for replay.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Configuration for a message board.
#[derive(Clone, Debug)]
pub struct BoardConfig {
    /// Max events kept in the replay window.
    /// Default: 50
    pub history_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Predicate selecting which events reach a subscription.
///
/// Filters double as routing keys: equal filters share one subscriber list.
/// `All` and an all-wildcard `Field` filter accept the same events but are
/// different keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// Every event.
    #[default]
    All,
    /// Events matching every set component.
    Field(FieldFilter),
}

impl EventFilter {
    pub fn all() -> Self {
        EventFilter::All
    }

    /// Events for one field, any classification.
    pub fn field_name(name: impl Into<String>) -> Self {
        EventFilter::Field(FieldFilter::new().with_field_name(name))
    }

    /// Events of one classification, any field.
    pub fn event_type(event_type: EventType) -> Self {
        EventFilter::Field(FieldFilter::new().with_event_type(event_type))
    }

    /// Events of one classification on one field.
    pub fn type_and_field(event_type: EventType, name: impl Into<String>) -> Self {
        EventFilter::Field(
            FieldFilter::new()
                .with_event_type(event_type)
                .with_field_name(name),
        )
    }

    /// True for a `Field` filter with no component set.
    pub fn is_wildcard_field(&self) -> bool {
        matches!(self, EventFilter::Field(filter) if filter.is_wildcard())
    }

    /// Check whether an event matches this filter.
    pub fn passes(&self, event: &DataEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Field(filter) => filter.passes(event),
        }
    }
}

impl From<FieldFilter> for EventFilter {
    fn from(filter: FieldFilter) -> Self {
        EventFilter::Field(filter)
    }
}

/// Component-wise filter; `None` components are wildcards.
///
/// `Some("")` is not a wildcard: it matches only an empty name or value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldFilter {
    pub field_name: Option<String>,
    pub field_value: Option<String>,
    pub event_type: Option<EventType>,
}

impl FieldFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn with_field_value(mut self, value: impl Into<String>) -> Self {
        self.field_value = Some(value.into());
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// True when no component is set.
    pub fn is_wildcard(&self) -> bool {
        self.field_name.is_none() && self.field_value.is_none() && self.event_type.is_none()
    }

    pub fn passes(&self, event: &DataEvent) -> bool {
        if let Some(ref name) = self.field_name {
            if name != event.field_name() {
                return false;
            }
        }

        // A value filter never matches an event without a value
        if let Some(ref value) = self.field_value {
            if event.field_value() != Some(value.as_str()) {
                return false;
            }
        }

        if let Some(event_type) = self.event_type {
            if event_type != event.event_type() {
                return false;
            }
        }

        true
    }
}
