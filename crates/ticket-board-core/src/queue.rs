//! Ordered ticket queue that broadcasts every mutation to its listeners.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::entry::Entry;

/// Receiver of queue mutations.
///
/// Called synchronously, after the queue has already changed, in
/// registration order.
pub trait QueueListener {
    /// An entry was appended to the queue.
    fn on_add(&mut self, entry: Entry);
    /// An entry equal to `entry` was removed from the queue.
    fn on_remove(&mut self, entry: Entry);
}

/// Handle returned by [`ListenerRegistry::register`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ListenerId(u64);

/// Non-owning, ordered set of queue listeners.
///
/// Registering the same listener twice yields two handles and two
/// notifications per event. Listeners that have been dropped stay registered
/// until explicitly unregistered; they are skipped when notifying.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<(ListenerId, Weak<RefCell<dyn QueueListener>>)>,
    next_id: u64,
}

impl ListenerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener`; the registry only keeps a weak reference.
    pub fn register<L>(&mut self, listener: &Rc<RefCell<L>>) -> ListenerId
    where
        L: QueueListener + 'static,
    {
        let strong: Rc<RefCell<dyn QueueListener>> = listener.clone();
        let weak = Rc::downgrade(&strong);
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, weak));
        id
    }

    /// Unsubscribe a handle. Returns `false` when it was not registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        before != self.listeners.len()
    }

    /// Number of registered handles, including ones whose listener is gone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no handle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn live(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    fn notify(&self, entry: Entry, deliver: impl Fn(&mut dyn QueueListener, Entry)) {
        for (id, weak) in &self.listeners {
            let Some(listener) = weak.upgrade() else {
                trace!(?id, "skipping dropped listener");
                continue;
            };
            let Ok(mut listener) = listener.try_borrow_mut() else {
                warn!(?id, %entry, "listener is busy; notification dropped");
                continue;
            };
            deliver(&mut *listener, entry);
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("registered", &self.listeners.len())
            .field("live", &self.live())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Arrival-ordered collection of entries with synchronous change broadcast.
///
/// Capacity is not limited here; how many entries fit on screen is the
/// display's concern.
#[derive(Debug, Default)]
pub struct ObservableQueue {
    entries: Vec<Entry>,
    registry: ListenerRegistry,
}

impl ObservableQueue {
    /// Empty queue without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty queue broadcasting through an existing registry.
    #[must_use]
    pub const fn with_registry(registry: ListenerRegistry) -> Self {
        Self {
            entries: Vec::new(),
            registry,
        }
    }

    /// Append `entry` and notify every listener. Always succeeds.
    pub fn add(&mut self, entry: Entry) -> bool {
        self.entries.push(entry);
        debug!(%entry, len = self.entries.len(), "queue add");
        self.registry
            .notify(entry, |listener, entry| listener.on_add(entry));
        true
    }

    /// Remove the first entry equal to `entry`.
    ///
    /// Listeners are only notified when something was removed.
    pub fn remove(&mut self, entry: Entry) -> bool {
        let Some(index) = self.entries.iter().position(|e| *e == entry) else {
            debug!(%entry, "queue remove: no such entry");
            return false;
        };
        self.entries.remove(index);
        debug!(%entry, len = self.entries.len(), "queue remove");
        self.registry
            .notify(entry, |listener, entry| listener.on_remove(entry));
        true
    }

    /// Subscribe a listener. See [`ListenerRegistry::register`].
    pub fn add_listener<L>(&mut self, listener: &Rc<RefCell<L>>) -> ListenerId
    where
        L: QueueListener + 'static,
    {
        self.registry.register(listener)
    }

    /// Unsubscribe a listener; a no-op returning `false` when unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.registry.unregister(id)
    }

    /// Entries in arrival order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry equal to `entry` is queued.
    #[must_use]
    pub fn contains(&self, entry: Entry) -> bool {
        self.entries.contains(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Seen {
        Add(&'static str, u32),
        Remove(&'static str, u32),
    }

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<Seen>>>,
    }

    impl QueueListener for Recorder {
        fn on_add(&mut self, entry: Entry) {
            self.log.borrow_mut().push(Seen::Add(self.name, entry.number()));
        }

        fn on_remove(&mut self, entry: Entry) {
            self.log
                .borrow_mut()
                .push(Seen::Remove(self.name, entry.number()));
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<Seen>>>) -> Rc<RefCell<Recorder>> {
        Rc::new(RefCell::new(Recorder {
            name,
            log: Rc::clone(log),
        }))
    }

    #[test]
    fn add_keeps_arrival_order_and_duplicates() {
        let mut queue = ObservableQueue::new();
        queue.add(Entry::new(9));
        queue.add(Entry::new(3));
        queue.add(Entry::new(9));
        assert_eq!(
            queue.entries(),
            &[Entry::new(9), Entry::new(3), Entry::new(9)]
        );
    }

    #[test]
    fn remove_takes_first_match_only() {
        let mut queue = ObservableQueue::new();
        for n in [4, 1, 4] {
            queue.add(Entry::new(n));
        }
        assert!(queue.remove(Entry::new(4)));
        assert_eq!(queue.entries(), &[Entry::new(1), Entry::new(4)]);
    }

    #[test]
    fn listeners_notified_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = recorder("first", &log);
        let second = recorder("second", &log);
        let mut queue = ObservableQueue::new();
        queue.add_listener(&first);
        queue.add_listener(&second);

        queue.add(Entry::new(1));
        queue.remove(Entry::new(1));

        assert_eq!(
            *log.borrow(),
            vec![
                Seen::Add("first", 1),
                Seen::Add("second", 1),
                Seen::Remove("first", 1),
                Seen::Remove("second", 1),
            ]
        );
    }

    #[test]
    fn missing_remove_fires_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder("only", &log);
        let mut queue = ObservableQueue::new();
        queue.add_listener(&listener);
        queue.add(Entry::new(2));
        log.borrow_mut().clear();

        assert!(!queue.remove(Entry::new(3)));
        assert!(log.borrow().is_empty());
        assert_eq!(queue.entries(), &[Entry::new(2)]);
    }

    #[test]
    fn double_registration_doubles_notifications() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder("twice", &log);
        let mut queue = ObservableQueue::new();
        let first = queue.add_listener(&listener);
        queue.add_listener(&listener);

        queue.add(Entry::new(5));
        assert_eq!(log.borrow().len(), 2);

        assert!(queue.remove_listener(first));
        queue.add(Entry::new(6));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn unknown_listener_removal_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder("only", &log);
        let mut queue = ObservableQueue::new();
        let id = queue.add_listener(&listener);
        assert!(queue.remove_listener(id));
        assert!(!queue.remove_listener(id));
    }

    #[test]
    fn dropped_listener_is_skipped_but_stays_registered() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        {
            let listener = recorder("gone", &log);
            registry.register(&listener);
        }
        let mut queue = ObservableQueue::with_registry(registry);
        queue.add(Entry::new(8));
        assert!(log.borrow().is_empty());
        assert_eq!(queue.registry.len(), 1);
    }

    #[test]
    fn debug_reports_entries_and_listener_counts() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let kept = recorder("kept", &log);
        let mut queue = ObservableQueue::new();
        queue.add_listener(&kept);
        {
            let gone = recorder("gone", &log);
            queue.add_listener(&gone);
        }
        queue.add(Entry::new(11));

        let text = format!("{queue:?}");
        assert!(text.contains("entries"), "{text}");
        assert!(text.contains("registered: 2"), "{text}");
        assert!(text.contains("live: 1"), "{text}");
    }
}
