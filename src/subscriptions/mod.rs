//! Message board for field-classification events.
//!
//! The board keeps:
//! - A bounded history of recent events (50 by default)
//! - A routing table from [`EventFilter`] to subscriber lists
//!
//! Publishing appends to the history and delivers the event to every bucket
//! whose filter passes. Subscribing registers under a filter and immediately
//! replays matching history, so late joiners catch up on recent activity.
//!
//! # Example
//!
//! ```ignore
//! let board = Arc::new(MessageBoard::new());
//!
//! let counter = Arc::new(TypeCounter::new(EventType::CodedValue));
//! board.subscribe(counter.clone(), EventFilter::event_type(EventType::CodedValue));
//!
//! board.publish(DataEvent::new("age", Some("42".into()), EventType::CodedValue, 1));
//! assert_eq!(counter.count(), 1);
//! ```

mod board;
mod types;

pub use board::{start, MessageBoard};
pub use types::{BoardConfig, EventFilter, FieldFilter, DEFAULT_HISTORY_CAPACITY};
