//! Observers that receive events from a message board.
//!
//! Every subscriber implements [`Subscriber`]. `notify` may be called from
//! several publishing threads at once, so implementations keep their state
//! behind atomics or locks. A subscriber never reports failure to the board:
//! sink errors are logged and the event is dropped for that subscriber only.
//!
//! # Example
//!
//! ```ignore
//! let board = Arc::new(MessageBoard::new());
//!
//! let coded = Arc::new(TypeCounter::new(EventType::CodedValue));
//! board.subscribe_own(coded.clone());
//!
//! let out = StreamWriter::all(std::io::stdout());
//! board.subscribe_all(Arc::new(out));
//! ```

mod channel;
mod counters;
mod writer;

pub use channel::{ChannelSubscriber, EventReceiver};
pub use counters::{TypeByFieldCounter, TypeCounter};
pub use writer::{StreamFormat, StreamSelector, StreamWriter, StreamWriterConfig};

use crate::subscriptions::EventFilter;
use crate::types::DataEvent;

/// Capability to receive published events.
pub trait Subscriber: Send + Sync {
    /// Handle one event. Must not panic on unexpected input.
    fn notify(&self, event: &DataEvent);

    /// Filter used by [`MessageBoard::subscribe_own`](crate::MessageBoard::subscribe_own).
    fn filter(&self) -> EventFilter {
        EventFilter::All
    }
}
