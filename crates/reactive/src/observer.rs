//! Observer pattern for mutation notifications.
//!
//! Tables publish create/delete/save events and the database publishes
//! table create/delete events through `Observer`. Subscribers are plain
//! closures; the engine never depends on their presence.

use std::cell::RefCell;
use std::rc::Rc;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: SubscriptionId,
}

/// An interior-mutable subscriber list for one event.
pub struct Observer<T> {
    inner: RefCell<Inner<T>>,
}

impl<T> Default for Observer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Observer<T> {
    /// Creates an observer with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                subscribers: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Subscribes a callback; returns an id usable with `unsubscribe`.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        id
    }

    /// Removes a subscription. Returns true if it was present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    /// Publishes a payload to every subscriber.
    ///
    /// The subscriber list is snapshotted first, so a callback may
    /// subscribe, unsubscribe, or mutate the table that fired it.
    pub fn emit(&self, payload: &T) {
        let callbacks: Vec<Callback<T>> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(payload);
        }
    }

    /// Returns the number of subscribers.
    pub fn len(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Returns true if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all subscribers.
    pub fn clear(&self) {
        self.inner.borrow_mut().subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_emit() {
        let observer: Observer<i32> = Observer::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        observer.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        observer.emit(&1);
        observer.emit(&2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let observer: Observer<i32> = Observer::new();
        let count = Rc::new(RefCell::new(0));

        let count_clone = count.clone();
        let id = observer.subscribe(move |_| *count_clone.borrow_mut() += 1);

        observer.emit(&0);
        assert!(observer.unsubscribe(id));
        observer.emit(&0);

        assert_eq!(*count.borrow(), 1);
        assert!(!observer.unsubscribe(id));
    }

    #[test]
    fn test_multiple_subscribers() {
        let observer: Observer<()> = Observer::new();
        let count = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            let count_clone = count.clone();
            observer.subscribe(move |_| *count_clone.borrow_mut() += 1);
        }

        observer.emit(&());
        assert_eq!(*count.borrow(), 3);
        assert_eq!(observer.len(), 3);
    }

    #[test]
    fn test_reentrant_subscribe_from_callback() {
        let observer: Rc<Observer<i32>> = Rc::new(Observer::new());
        let count = Rc::new(RefCell::new(0));

        let observer_clone = observer.clone();
        let count_clone = count.clone();
        observer.subscribe(move |_| {
            *count_clone.borrow_mut() += 1;
            let inner_count = count_clone.clone();
            // A callback may subscribe without deadlocking the list.
            observer_clone.subscribe(move |_| *inner_count.borrow_mut() += 1);
        });

        observer.emit(&0);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(observer.len(), 2);
    }

    #[test]
    fn test_clear() {
        let observer: Observer<i32> = Observer::new();
        observer.subscribe(|_| {});
        observer.subscribe(|_| {});
        assert_eq!(observer.len(), 2);
        observer.clear();
        assert!(observer.is_empty());
    }
}
