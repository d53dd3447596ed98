//! Instructions executed against parsed record rows.

use crate::error::{ReflectorError, Result};
use crate::subscriptions::MessageBoard;
use crate::types::{DataEvent, EventType};
use std::collections::HashMap;
use std::sync::Arc;

/// Variable holding the current record number.
pub const RECORD_NUMBER: &str = "RECORD_NUMBER";

/// A named value supplied by the record pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateVariable {
    pub name: String,
    pub value: String,
}

/// Variable context for one row.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    vars: HashMap<String, TemplateVariable>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let var = TemplateVariable {
            name: name.clone(),
            value: value.into(),
        };
        self.vars.insert(name, var);
    }

    pub fn get(&self, name: &str) -> Option<&TemplateVariable> {
        self.vars.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|v| v.value.as_str())
    }

    /// The `RECORD_NUMBER` variable, or 0 when unset.
    pub fn record_number(&self) -> Result<u64> {
        match self.value(RECORD_NUMBER) {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ReflectorError::InvalidVariable {
                    name: RECORD_NUMBER.to_string(),
                    value: raw.to_string(),
                }),
        }
    }
}

/// A step run once per parsed row.
pub trait Instruction {
    fn execute(&self, fields: &[String], variables: &Variables) -> Result<bool>;
}

/// Classifies one column of each row and publishes the result.
pub struct AnnotationInstruction {
    board: Arc<MessageBoard>,
    event_type: EventType,
    field_name: String,
    field_order: usize,
}

impl AnnotationInstruction {
    pub fn new(
        board: Arc<MessageBoard>,
        event_type: EventType,
        field_name: impl Into<String>,
        field_order: usize,
    ) -> Self {
        Self {
            board,
            event_type,
            field_name: field_name.into(),
            field_order,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_order(&self) -> usize {
        self.field_order
    }
}

impl Instruction for AnnotationInstruction {
    /// Publishes one event; returns `Ok(true)` once it has been handed to the board.
    fn execute(&self, fields: &[String], variables: &Variables) -> Result<bool> {
        let record_number = variables.record_number()?;
        let value = fields
            .get(self.field_order)
            .ok_or(ReflectorError::IndexOutOfRange {
                index: self.field_order,
                len: fields.len(),
            })?;

        let event = DataEvent::new(
            self.field_name.clone(),
            Some(value.clone()),
            self.event_type,
            record_number,
        );
        self.board.publish(event);

        Ok(true)
    }
}
