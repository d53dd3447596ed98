//! Core types: event classifications and the events themselves.

use crate::error::{ReflectorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification attached to a parsed field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "implicit")]
    Implicit,
    #[serde(rename = "coded value")]
    CodedValue,
    #[serde(rename = "literal value")]
    LiteralValue,
    #[serde(rename = "justified absence")]
    JustifiedAbsence,
    #[serde(rename = "unjustified absence")]
    UnjustifiedAbsence,
    #[serde(rename = "redundant presence")]
    RedundantPresence,
    #[serde(rename = "unjustified presence")]
    UnjustifiedPresence,
    #[serde(rename = "disallowed value")]
    DisallowedValue,
}

impl EventType {
    /// Every classification, in declaration order.
    pub const ALL: [EventType; 8] = [
        EventType::Implicit,
        EventType::CodedValue,
        EventType::LiteralValue,
        EventType::JustifiedAbsence,
        EventType::UnjustifiedAbsence,
        EventType::RedundantPresence,
        EventType::UnjustifiedPresence,
        EventType::DisallowedValue,
    ];

    /// Lower-case textual tag, e.g. `"coded value"`.
    pub fn tag(self) -> &'static str {
        match self {
            EventType::Implicit => "implicit",
            EventType::CodedValue => "coded value",
            EventType::LiteralValue => "literal value",
            EventType::JustifiedAbsence => "justified absence",
            EventType::UnjustifiedAbsence => "unjustified absence",
            EventType::RedundantPresence => "redundant presence",
            EventType::UnjustifiedPresence => "unjustified presence",
            EventType::DisallowedValue => "disallowed value",
        }
    }

    /// Canonical upper-case name, e.g. `"CODED_VALUE"`.
    pub fn name(self) -> &'static str {
        match self {
            EventType::Implicit => "IMPLICIT",
            EventType::CodedValue => "CODED_VALUE",
            EventType::LiteralValue => "LITERAL_VALUE",
            EventType::JustifiedAbsence => "JUSTIFIED_ABSENCE",
            EventType::UnjustifiedAbsence => "UNJUSTIFIED_ABSENCE",
            EventType::RedundantPresence => "REDUNDANT_PRESENCE",
            EventType::UnjustifiedPresence => "UNJUSTIFIED_PRESENCE",
            EventType::DisallowedValue => "DISALLOWED_VALUE",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = ReflectorError;

    /// Accepts either the tag (`"coded value"`) or the name (`"CODED_VALUE"`).
    fn from_str(s: &str) -> Result<Self> {
        EventType::ALL
            .into_iter()
            .find(|kind| kind.tag() == s || kind.name() == s)
            .ok_or_else(|| ReflectorError::InvalidEventType(s.to_string()))
    }
}

/// A classified observation about one field in one record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataEvent {
    field_name: String,
    field_value: Option<String>,
    event_type: EventType,
    record_number: u64,
}

impl DataEvent {
    pub fn new(
        field_name: impl Into<String>,
        field_value: Option<String>,
        event_type: EventType,
        record_number: u64,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            field_value,
            event_type,
            record_number,
        }
    }

    /// Build an event from a textual classification tag.
    pub fn from_tag(
        field_name: impl Into<String>,
        field_value: Option<String>,
        tag: &str,
        record_number: u64,
    ) -> Result<Self> {
        let event_type = tag.parse()?;
        Ok(Self::new(field_name, field_value, event_type, record_number))
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_value(&self) -> Option<&str> {
        self.field_value.as_deref()
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn record_number(&self) -> u64 {
        self.record_number
    }
}
