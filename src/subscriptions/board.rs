//! Message board: bounded event history plus filter-routed broadcast.

use crate::subscribers::Subscriber;
use crate::types::DataEvent;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use super::types::{BoardConfig, EventFilter};

/// Process-wide board behind [`start`].
static GLOBAL_BOARD: OnceLock<Arc<MessageBoard>> = OnceLock::new();

/// Initialize the process-wide board if needed and return it.
///
/// Idempotent: later calls return the same board, they never reset it.
pub fn start() -> Arc<MessageBoard> {
    MessageBoard::global()
}

/// One subscriber registered under one filter.
struct Route {
    subscriber: Arc<dyn Subscriber>,
    /// `Some` while history is being replayed; live events queue here.
    pending: Mutex<Option<Vec<Arc<DataEvent>>>>,
    /// Cleared on unsubscribe so in-flight snapshots skip it.
    active: AtomicBool,
}

impl Route {
    /// A route that starts in replay mode.
    fn replaying(subscriber: Arc<dyn Subscriber>) -> Self {
        Self {
            subscriber,
            pending: Mutex::new(Some(Vec::new())),
            active: AtomicBool::new(true),
        }
    }

    fn is(&self, target: *const ()) -> bool {
        Arc::as_ptr(&self.subscriber).cast::<()>() == target
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Deliver a live event, or queue it behind an unfinished replay.
    ///
    /// No lock is held while `notify` runs.
    fn deliver(&self, event: &Arc<DataEvent>) {
        {
            let mut pending = self.pending.lock();
            if let Some(queue) = pending.as_mut() {
                queue.push(Arc::clone(event));
                return;
            }
        }

        if self.is_active() {
            self.subscriber.notify(event);
        }
    }

    /// Replay `history`, then drain whatever was queued meanwhile and
    /// switch to direct delivery.
    fn finish_replay(&self, history: Vec<Arc<DataEvent>>) {
        let mut batch = history;
        loop {
            for event in &batch {
                if self.is_active() {
                    self.subscriber.notify(event);
                }
            }

            let mut pending = self.pending.lock();
            let queued = pending.as_mut().map(std::mem::take).unwrap_or_default();
            if queued.is_empty() {
                *pending = None;
                return;
            }
            batch = queued;
        }
    }
}

/// Mutable board state; only touched under the board lock.
#[derive(Default)]
struct BoardState {
    history: VecDeque<Arc<DataEvent>>,
    /// Filter buckets; each bucket keeps registration order.
    routes: HashMap<EventFilter, Vec<Arc<Route>>>,
}

/// Routes published events to subscribers by filter and keeps a short
/// replay window for late joiners.
pub struct MessageBoard {
    config: BoardConfig,
    state: Mutex<BoardState>,
}

impl MessageBoard {
    /// Create a board with the default 50-event history.
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        let state = BoardState {
            history: VecDeque::with_capacity(config.history_capacity),
            routes: HashMap::new(),
        };
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// The process-wide board, created on first use.
    pub fn global() -> Arc<MessageBoard> {
        Arc::clone(GLOBAL_BOARD.get_or_init(|| {
            tracing::debug!("message board started");
            Arc::new(MessageBoard::new())
        }))
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Record an event and deliver it to every matching subscription.
    ///
    /// The history append and the route snapshot happen in one critical
    /// section; subscribers are called after the lock is released.
    pub fn publish(&self, event: DataEvent) {
        let event = Arc::new(event);

        let targets: Vec<Arc<Route>> = {
            let mut state = self.state.lock();

            if self.config.history_capacity > 0 {
                if state.history.len() >= self.config.history_capacity {
                    state.history.pop_front();
                }
                state.history.push_back(Arc::clone(&event));
            }

            let matching = state
                .routes
                .iter()
                .filter(|(filter, _)| filter.passes(&event))
                .flat_map(|(_, routes)| routes.iter().cloned())
                .collect();
            matching
        };

        tracing::trace!(
            field = event.field_name(),
            event_type = %event.event_type(),
            record = event.record_number(),
            targets = targets.len(),
            "publish"
        );

        for route in targets {
            route.deliver(&event);
        }
    }

    /// Register `subscriber` under `filter` and replay matching history.
    ///
    /// Replayed events arrive oldest first and always before any live event
    /// published after the registration became visible. Live events that
    /// race with the replay are queued on the route and delivered after it.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>, filter: EventFilter) {
        let route = Arc::new(Route::replaying(subscriber));

        let replay: Vec<Arc<DataEvent>> = {
            let mut state = self.state.lock();
            state
                .routes
                .entry(filter.clone())
                .or_default()
                .push(Arc::clone(&route));

            let matching = state
                .history
                .iter()
                .filter(|event| filter.passes(event))
                .cloned()
                .collect();
            matching
        };

        tracing::debug!(?filter, replayed = replay.len(), "subscription added");

        route.finish_replay(replay);
    }

    /// Subscribe to every event.
    pub fn subscribe_all(&self, subscriber: Arc<dyn Subscriber>) {
        self.subscribe(subscriber, EventFilter::All);
    }

    /// Subscribe using the subscriber's own filter.
    pub fn subscribe_own(&self, subscriber: Arc<dyn Subscriber>) {
        let filter = subscriber.filter();
        self.subscribe(subscriber, filter);
    }

    /// Remove `subscriber` from the bucket of an equal filter.
    ///
    /// Subscribers are matched by `Arc` identity. Returns false when nothing
    /// was registered; that is not an error.
    pub fn unsubscribe<S: Subscriber + ?Sized>(
        &self,
        subscriber: &Arc<S>,
        filter: &EventFilter,
    ) -> bool {
        let target = Arc::as_ptr(subscriber).cast::<()>();
        let mut state = self.state.lock();

        let Some(routes) = state.routes.get_mut(filter) else {
            return false;
        };

        let before = routes.len();
        routes.retain(|route| {
            if route.is(target) {
                route.active.store(false, Ordering::Release);
                false
            } else {
                true
            }
        });
        let removed = before - routes.len();

        if routes.is_empty() {
            state.routes.remove(filter);
        }

        if removed > 0 {
            tracing::debug!(?filter, removed, "subscription removed");
        }
        removed > 0
    }

    /// Buffered events, oldest first.
    pub fn history(&self) -> Vec<DataEvent> {
        self.state
            .lock()
            .history
            .iter()
            .map(|event| DataEvent::clone(event))
            .collect()
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().history.len()
    }

    /// Total registrations across all filters.
    pub fn subscription_count(&self) -> usize {
        self.state.lock().routes.values().map(Vec::len).sum()
    }

    /// Number of distinct filter buckets.
    pub fn filter_count(&self) -> usize {
        self.state.lock().routes.len()
    }
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::TypeCounter;
    use crate::types::EventType;

    /// Records every notification in order.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u64>>,
    }

    impl Recorder {
        fn seen(&self) -> Vec<u64> {
            self.seen.lock().clone()
        }
    }

    impl Subscriber for Recorder {
        fn notify(&self, event: &DataEvent) {
            self.seen.lock().push(event.record_number());
        }
    }

    fn event(name: &str, event_type: EventType, record: u64) -> DataEvent {
        DataEvent::new(name, Some(format!("v{record}")), event_type, record)
    }

    #[test]
    fn test_publish_routes_by_filter() {
        let board = MessageBoard::new();
        let coded = Arc::new(Recorder::default());
        let coded_counter = Arc::new(TypeCounter::new(EventType::CodedValue));

        board.subscribe(coded.clone(), EventFilter::event_type(EventType::CodedValue));
        board.subscribe_own(coded_counter.clone());

        board.publish(event("age", EventType::CodedValue, 1));
        board.publish(event("age", EventType::LiteralValue, 2));
        board.publish(event("age", EventType::CodedValue, 3));

        assert_eq!(coded.seen(), vec![1, 3]);
        assert_eq!(coded_counter.count(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let board = MessageBoard::new();
        for i in 0..60 {
            board.publish(event("f", EventType::Implicit, i));
        }

        let history = board.history();
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].record_number(), 10);
        assert_eq!(history[49].record_number(), 59);
    }

    #[test]
    fn test_replay_then_live() {
        let board = MessageBoard::new();
        board.publish(event("age", EventType::CodedValue, 1));
        board.publish(event("sex", EventType::CodedValue, 2));

        let recorder = Arc::new(Recorder::default());
        board.subscribe(recorder.clone(), EventFilter::field_name("age"));
        assert_eq!(recorder.seen(), vec![1]);

        board.publish(event("age", EventType::LiteralValue, 3));
        assert_eq!(recorder.seen(), vec![1, 3]);
    }

    #[test]
    fn test_equal_filters_share_bucket() {
        let board = MessageBoard::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        board.subscribe(first.clone(), EventFilter::type_and_field(EventType::Implicit, "x"));
        board.subscribe(second.clone(), EventFilter::type_and_field(EventType::Implicit, "x"));

        assert_eq!(board.filter_count(), 1);
        assert_eq!(board.subscription_count(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let board = MessageBoard::new();
        let recorder = Arc::new(Recorder::default());
        let filter = EventFilter::field_name("age");

        board.subscribe(recorder.clone(), filter.clone());
        board.publish(event("age", EventType::CodedValue, 1));

        assert!(board.unsubscribe(&recorder, &filter));
        assert_eq!(board.filter_count(), 0);
        board.publish(event("age", EventType::CodedValue, 2));

        assert_eq!(recorder.seen(), vec![1]);
        assert_eq!(board.history_len(), 2);

        // Second removal is a no-op
        assert!(!board.unsubscribe(&recorder, &filter));
        assert!(!board.unsubscribe(&recorder, &EventFilter::All));
    }

    #[test]
    fn test_zero_capacity_keeps_no_history() {
        let board = MessageBoard::with_config(BoardConfig {
            history_capacity: 0,
        });
        let recorder = Arc::new(Recorder::default());
        board.subscribe_all(recorder.clone());
        board.publish(event("a", EventType::Implicit, 1));

        assert_eq!(board.history_len(), 0);
        assert_eq!(recorder.seen(), vec![1]);
    }

    /// Publishes a follow-up event from inside `notify`.
    struct Echo {
        board: Arc<MessageBoard>,
    }

    impl Subscriber for Echo {
        fn notify(&self, event: &DataEvent) {
            if event.event_type() == EventType::DisallowedValue {
                self.board.publish(DataEvent::new(
                    event.field_name(),
                    None,
                    EventType::Implicit,
                    event.record_number(),
                ));
            }
        }
    }

    #[test]
    fn test_notify_may_publish() {
        let board = Arc::new(MessageBoard::new());
        board.publish(event("x", EventType::DisallowedValue, 1));

        // Replay triggers a nested publish back to the same registration
        board.subscribe_all(Arc::new(Echo {
            board: Arc::clone(&board),
        }));

        let types: Vec<EventType> = board.history().iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec![EventType::DisallowedValue, EventType::Implicit]);
    }

    #[test]
    fn test_start_is_idempotent() {
        let first = start();
        let second = start();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_start_from_many_threads() {
        let barrier = Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    start()
                })
            })
            .collect();

        let boards: Vec<Arc<MessageBoard>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        let global = MessageBoard::global();
        assert!(boards.iter().all(|board| Arc::ptr_eq(board, &global)));
    }

    #[test]
    fn test_publish_during_replay_is_queued() {
        let board = Arc::new(MessageBoard::new());
        board.publish(event("x", EventType::DisallowedValue, 1));
        board.publish(event("x", EventType::CodedValue, 2));

        /// Publishes record 10 while the first replayed event is handled.
        struct Interleave {
            board: Arc<MessageBoard>,
            seen: Mutex<Vec<u64>>,
        }

        impl Subscriber for Interleave {
            fn notify(&self, event: &DataEvent) {
                self.seen.lock().push(event.record_number());
                if event.event_type() == EventType::DisallowedValue {
                    self.board.publish(DataEvent::new("x", None, EventType::Implicit, 10));
                }
            }
        }

        let sub = Arc::new(Interleave {
            board: Arc::clone(&board),
            seen: Mutex::new(Vec::new()),
        });
        board.subscribe_all(sub.clone());

        // The live event waits for the rest of the replay
        assert_eq!(*sub.seen.lock(), vec![1, 2, 10]);
    }
}
