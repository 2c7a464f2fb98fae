#![forbid(unsafe_code)]

//! Observable single-value cells with RAII subscriptions.
//!
//! # Failure Modes
//!
//! - **Callback panics**: the value and version are already updated; the
//!   remaining subscribers of that notification are not called.
//! - **Cell dropped while subscribed**: the callback is simply never called
//!   again; the [`Subscription`] stays valid and unsubscribing is a no-op.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

type Callback = dyn Fn();

struct CellInner<T> {
    value: Option<T>,
    version: u64,
    /// Registration order. The strong side lives in the [`Subscription`].
    subscribers: Vec<Weak<Callback>>,
}

/// A shared, observable slot holding an optional value.
///
/// Cloning a `ReactiveCell` creates a new handle to the **same** slot.
/// Unlike a memoizing observable, writing an equal value still counts as a
/// write and still notifies.
pub struct ReactiveCell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for ReactiveCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ReactiveCell")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T> ReactiveCell<T> {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellInner {
                value: None,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Create a cell that already holds `value`. Not counted as a write.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        let cell = Self::new();
        cell.inner.borrow_mut().value = Some(value);
        cell
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if `f` writes to this same cell (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.borrow().value.as_ref())
    }

    /// Borrow the current value; used by derived values reading many cells.
    pub(crate) fn value_ref(&self) -> Ref<'_, Option<T>> {
        Ref::map(self.inner.borrow(), |inner| &inner.value)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.borrow().value.is_some()
    }

    /// Store `value` and notify every subscriber.
    pub fn set(&self, value: T) {
        self.write(Some(value));
    }

    /// Reset the cell to "no value" and notify every subscriber.
    pub fn clear(&self) {
        self.write(None);
    }

    /// Store `value` (or its absence) and notify every subscriber.
    pub fn replace(&self, value: Option<T>) {
        self.write(value);
    }

    fn write(&self, value: Option<T>) {
        let (version, pending) = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            (inner.version, inner.subscribers.clone())
        };
        trace!(
            message = "cell.write",
            version,
            subscribers = pending.len()
        );
        for weak in pending {
            // Upgrading per call lets an earlier callback unsubscribe a later one.
            if let Some(callback) = weak.upgrade() {
                callback();
            }
        }
    }

    /// Register `callback` to run after every write.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive and not unsubscribed.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let callback: Rc<Callback> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            callback: Some(callback),
        }
    }

    /// Number of writes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Whether both handles point at the same slot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> ReactiveCell<T> {
    /// Clone of the current value, `None` when the cell was never written or
    /// was cleared.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }
}

/// RAII guard for a [`ReactiveCell::subscribe`] registration.
pub struct Subscription {
    callback: Option<Rc<Callback>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    /// Stop receiving notifications. Calling this again does nothing.
    pub fn unsubscribe(&mut self) {
        self.callback = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn starts_empty() {
        let cell: ReactiveCell<i32> = ReactiveCell::new();
        assert_eq!(cell.get(), None);
        assert!(!cell.is_set());
        assert_eq!(cell.version(), 0);
    }

    #[test]
    fn with_value_is_not_a_write() {
        let cell = ReactiveCell::with_value(7);
        assert_eq!(cell.get(), Some(7));
        assert_eq!(cell.version(), 0);
    }

    #[test]
    fn set_then_get() {
        let cell = ReactiveCell::new();
        cell.set("a".to_string());
        assert_eq!(cell.get().as_deref(), Some("a"));
        cell.clear();
        assert_eq!(cell.get(), None);
        assert_eq!(cell.version(), 2);
    }

    #[test]
    fn equal_writes_still_notify() {
        let cell = ReactiveCell::new();
        let (count, callback) = counter();
        let _sub = cell.subscribe(callback);
        cell.set(1);
        cell.set(1);
        cell.set(1);
        assert_eq!(count.get(), 3);
        assert_eq!(cell.version(), 3);
    }

    #[test]
    fn notifies_in_registration_order() {
        let cell = ReactiveCell::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<_> = (0..3)
            .map(|i| {
                let log = Rc::clone(&log);
                cell.subscribe(move || log.borrow_mut().push(i))
            })
            .collect();
        cell.set(());
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let cell = ReactiveCell::new();
        let (count, callback) = counter();
        let mut sub = cell.subscribe(callback);
        cell.set(1);
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        cell.set(2);
        assert_eq!(count.get(), 1);
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn drop_unsubscribes() {
        let cell = ReactiveCell::new();
        let (count, callback) = counter();
        {
            let _sub = cell.subscribe(callback);
            cell.set(1);
        }
        cell.set(2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn callback_can_read_the_cell() {
        let cell = ReactiveCell::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let reader = cell.clone();
        let sink = Rc::clone(&seen);
        let _sub = cell.subscribe(move || sink.borrow_mut().push(reader.get()));
        cell.set(5);
        cell.clear();
        assert_eq!(*seen.borrow(), vec![Some(5), None]);
    }

    #[test]
    fn callback_can_subscribe_without_deadlock() {
        let cell: ReactiveCell<u8> = ReactiveCell::new();
        let late = Rc::new(RefCell::new(Vec::new()));
        let (late_count, late_callback) = counter();
        let late_callback = Rc::new(late_callback);
        let handle = cell.clone();
        let store = Rc::clone(&late);
        let _sub = cell.subscribe(move || {
            let late_callback = Rc::clone(&late_callback);
            store
                .borrow_mut()
                .push(handle.subscribe(move || late_callback()));
        });
        cell.set(1);
        // Registered during the first notification, so not called by it.
        assert_eq!(late_count.get(), 0);
        cell.set(2);
        assert_eq!(late_count.get(), 1);
    }

    #[test]
    fn earlier_callback_can_unsubscribe_later_one() {
        let cell = ReactiveCell::new();
        let (count, callback) = counter();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let slot = Rc::clone(&victim);
        let _killer = cell.subscribe(move || {
            if let Some(sub) = slot.borrow_mut().as_mut() {
                sub.unsubscribe();
            }
        });
        *victim.borrow_mut() = Some(cell.subscribe(callback));
        cell.set(1);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn callback_can_write_other_cells() {
        let source = ReactiveCell::new();
        let mirror = ReactiveCell::new();
        let reader = source.clone();
        let writer = mirror.clone();
        let _sub = source.subscribe(move || writer.replace(reader.get()));
        source.set(3);
        assert_eq!(mirror.get(), Some(3));
    }

    #[test]
    fn clones_share_state() {
        let a = ReactiveCell::new();
        let b = a.clone();
        let c: ReactiveCell<i32> = ReactiveCell::new();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        b.set(9);
        assert_eq!(a.get(), Some(9));
    }

    #[test]
    fn subscription_outlives_cell() {
        let (count, callback) = counter();
        let mut sub = {
            let cell = ReactiveCell::<i32>::new();
            cell.subscribe(callback)
        };
        assert!(sub.is_active());
        sub.unsubscribe();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn debug_format() {
        let cell = ReactiveCell::with_value(42);
        let dbg = format!("{cell:?}");
        assert!(dbg.contains("ReactiveCell"));
        assert!(dbg.contains("42"));
    }
}
