use crate::message::{MessageKind, TraceId};
use crate::runtime::quantize;
use crate::store::TimeKeyedStore;
use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::ops::Deref;

/// A parsed request or response, stamped with its line window key.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Event {
    pub kind: MessageKind,
    pub trace_id: TraceId,
    /// Request path or response result code.
    pub payload: String,
    pub timestamp: i64,
}

#[derive(Debug, Default)]
struct Slots {
    events: HashMap<TraceId, Event, RandomState>,
    // set once the aggregator has drained the window for good
    sealed: bool,
}

/// Events of one kind for one event window, keyed by trace id.
///
/// A later event with the same trace id replaces the earlier one.
#[derive(Debug, Default)]
pub struct EventWindow {
    slots: RwLock<Slots>,
}

impl EventWindow {
    /// Store `event`, or hand it back if the window has been sealed.
    pub fn insert(&self, event: Event) -> Result<(), Event> {
        let mut slots = self.slots.write();
        if slots.sealed {
            return Err(event);
        }
        slots.events.insert(event.trace_id.clone(), event);
        Ok(())
    }

    pub fn get(&self, trace_id: &str) -> Option<Event> {
        self.slots.read().events.get(trace_id).cloned()
    }

    pub fn drain(&self) -> Vec<Event> {
        self.slots.write().events.drain().map(|(_, e)| e).collect()
    }

    /// Seal the window if nothing is left in it.
    ///
    /// A sealed window rejects inserts, so no event can land in it after its
    /// consumer decided it was finished.
    pub fn seal_if_empty(&self) -> bool {
        let mut slots = self.slots.write();
        if slots.events.is_empty() {
            slots.sealed = true;
        }
        slots.sealed
    }

    pub fn is_sealed(&self) -> bool {
        self.slots.read().sealed
    }

    pub fn len(&self) -> usize {
        self.slots.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().events.is_empty()
    }
}

/// Time-keyed event windows of one kind (requests or responses).
#[derive(Debug)]
pub struct EventStore {
    windows: TimeKeyedStore<EventWindow>,
    width: i64,
}

impl Deref for EventStore {
    type Target = TimeKeyedStore<EventWindow>;

    fn deref(&self) -> &Self::Target {
        &self.windows
    }
}

impl EventStore {
    pub fn new(width: i64) -> Self {
        Self {
            windows: TimeKeyedStore::new(),
            width,
        }
    }

    pub fn window_key(&self, timestamp: i64) -> i64 {
        quantize(timestamp, self.width)
    }

    /// Add `event` to the window covering its timestamp.
    pub fn push(&self, mut event: Event) {
        let key = self.window_key(event.timestamp);
        loop {
            let window = self.windows.get_or_create(key);
            match window.insert(event) {
                Ok(()) => return,
                Err(rejected) => {
                    // sealed window is about to leave the store; retry on a fresh one
                    event = rejected;
                    std::thread::yield_now();
                }
            }
        }
    }

    /// Find an event by trace id, newest window first.
    pub fn find_by_trace_id(&self, trace_id: &str) -> Option<Event> {
        self.windows
            .find_newest_first(|_, window| window.get(trace_id))
    }
}
