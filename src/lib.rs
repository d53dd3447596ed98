//! # Reflector
//!
//! Classified field events and the message board that routes them.
//!
//! ## Core Concepts
//!
//! - **Events**: One classification ("coded value", "justified absence", ...) of one field in one record
//! - **Filters**: Predicates that select events and key the routing table
//! - **Message board**: Bounded recent history plus filter-routed broadcast with replay
//! - **Subscribers**: Counters, stream writers and channel forwarders
//! - **Instructions**: Producers that turn parsed rows into events
//!
//! ## Example
//!
//! ```ignore
//! use reflector::{AnnotationInstruction, EventType, Instruction, MessageBoard, StreamWriter, Variables};
//!
//! let board = Arc::new(MessageBoard::new());
//! board.subscribe_all(Arc::new(StreamWriter::all(std::io::stdout())));
//!
//! let annotate = AnnotationInstruction::new(board.clone(), EventType::CodedValue, "sex", 2);
//! let mut vars = Variables::new();
//! vars.set("RECORD_NUMBER", "1");
//! annotate.execute(&row, &vars)?;
//! ```

pub mod error;
pub mod instructions;
pub mod subscribers;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{ReflectorError, Result};
pub use instructions::{AnnotationInstruction, Instruction, TemplateVariable, Variables, RECORD_NUMBER};
pub use subscribers::{
    ChannelSubscriber, EventReceiver, StreamFormat, StreamSelector, StreamWriter,
    StreamWriterConfig, Subscriber, TypeByFieldCounter, TypeCounter,
};
pub use subscriptions::{
    start, BoardConfig, EventFilter, FieldFilter, MessageBoard, DEFAULT_HISTORY_CAPACITY,
};
pub use types::{DataEvent, EventType};
