#![forbid(unsafe_code)]

//! Form sessions: the per-form field store plus the submission aggregator.
//!
//! A [`FormSession`] owns the session state. Fields hold a [`WeakSession`]
//! and fail with [`FormError::NoActiveSession`] once the owning session has
//! been dropped.
//!
//! # Invariants
//!
//! 1. `field(name)` returns handles to the same cell for the same name.
//! 2. `submit()` with no handler does nothing and returns `false`.
//! 3. `submit()` with a handler builds a fresh [`Snapshot`] of every
//!    registered field and calls the handler exactly once, synchronously.
//! 4. No borrow of the session is held while the handler runs, so the handler
//!    may read fields, write fields, or replace itself.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fieldkit_core::FieldValue;
use tracing::debug;

use crate::error::{FormError, Result};
use crate::reactive::{ReactiveCell, Subscription};
use crate::snapshot::Snapshot;
use crate::store::FieldStore;

/// Callback receiving the snapshot on submit.
pub type SubmitHandler = Rc<dyn Fn(Snapshot)>;

#[derive(Default)]
struct SessionInner {
    store: RefCell<FieldStore>,
    handler: RefCell<Option<SubmitHandler>>,
}

/// The owner of one form's state.
#[derive(Default)]
pub struct FormSession {
    inner: Rc<SessionInner>,
}

impl fmt::Debug for FormSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("fields", &self.inner.store.borrow().len())
            .field("has_submit_handler", &self.has_submit_handler())
            .finish()
    }
}

impl FormSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or remove) the submit handler.
    pub fn set_submit_handler(&self, handler: Option<SubmitHandler>) {
        *self.inner.handler.borrow_mut() = handler;
    }

    /// Install `handler` as the submit handler.
    pub fn on_submit(&self, handler: impl Fn(Snapshot) + 'static) {
        self.set_submit_handler(Some(Rc::new(handler)));
    }

    #[must_use]
    pub fn has_submit_handler(&self) -> bool {
        self.inner.handler.borrow().is_some()
    }

    /// Hand a snapshot of every field to the submit handler.
    ///
    /// Returns whether a handler was called. Field validity is not checked.
    pub fn submit(&self) -> bool {
        let Some(handler) = self.inner.handler.borrow().clone() else {
            debug!(message = "form.submit", handled = false);
            return false;
        };
        let snapshot = self.snapshot();
        debug!(message = "form.submit", handled = true, fields = snapshot.len());
        handler(snapshot);
        true
    }

    /// Current values of every registered field.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.store.borrow().snapshot()
    }

    /// Register `name` (if needed) and return its value accessor.
    pub fn field(&self, name: &str) -> FieldAccess {
        FieldAccess {
            name: name.to_owned(),
            cell: self.cell(name),
        }
    }

    /// The cell backing `name`, created on first use.
    pub fn cell(&self, name: &str) -> ReactiveCell<FieldValue> {
        self.inner.store.borrow_mut().get_or_create(name)
    }

    /// Names of every registered field, in registration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.inner
            .store
            .borrow()
            .entries()
            .map(|(name, _)| name.to_owned())
            .collect()
    }

    /// A non-owning handle for fields mounted in this session.
    #[must_use]
    pub fn handle(&self) -> WeakSession {
        WeakSession {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning reference to a [`FormSession`].
#[derive(Clone, Default)]
pub struct WeakSession {
    inner: Weak<SessionInner>,
}

impl fmt::Debug for WeakSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSession")
            .field("active", &self.is_active())
            .finish()
    }
}

impl WeakSession {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// The cell backing `name` in the live session.
    pub fn cell(&self, name: &str) -> Result<ReactiveCell<FieldValue>> {
        let inner = self.inner.upgrade().ok_or(FormError::NoActiveSession)?;
        let cell = inner.store.borrow_mut().get_or_create(name);
        Ok(cell)
    }

    /// Submit the live session.
    pub fn submit(&self) -> Result<bool> {
        let inner = self.inner.upgrade().ok_or(FormError::NoActiveSession)?;
        Ok(FormSession { inner }.submit())
    }
}

/// The `(current value, setter)` pair for one named field.
#[derive(Debug, Clone)]
pub struct FieldAccess {
    name: String,
    cell: ReactiveCell<FieldValue>,
}

impl FieldAccess {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<FieldValue> {
        self.cell.get()
    }

    pub fn set(&self, value: impl Into<FieldValue>) {
        self.cell.set(value.into());
    }

    pub fn clear(&self) {
        self.cell.clear();
    }

    /// Run `callback` after every write to this field.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.cell.subscribe(callback)
    }

    #[must_use]
    pub fn cell(&self) -> &ReactiveCell<FieldValue> {
        &self.cell
    }
}
