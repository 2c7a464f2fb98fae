#![forbid(unsafe_code)]

//! Lazy values that recompute from [`ReactiveCell`] dependencies.
//!
//! # Design
//!
//! [`Derived<U>`] wraps a compute function and its cached result. Any write to
//! a dependency marks it dirty; the next [`get()`](Derived::get) recomputes.
//! Dependencies are never pushed to.
//!
//! # Invariants
//!
//! 1. `get()` is consistent with the current state of every dependency.
//! 2. The compute function runs at most once per dependency write.
//! 3. Version increments by exactly 1 per recomputation.
//!
//! # Failure Modes
//!
//! - **Compute function panics**: the previous cached value survives and the
//!   dirty flag stays set, so the next `get()` retries.
//! - **Dependency dropped**: the subscription goes inert and the derived value
//!   keeps its last result.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::cell::{ReactiveCell, Subscription};

struct DerivedInner<U> {
    compute: Box<dyn Fn() -> U>,
    cached: Option<U>,
    dirty: Cell<bool>,
    version: u64,
    /// Kept alive so dependency writes keep marking this value dirty.
    _subscriptions: Vec<Subscription>,
}

/// A memoized value computed from one or more cells.
///
/// Cloning a `Derived` creates a new handle to the same cached state.
pub struct Derived<U> {
    inner: Rc<RefCell<DerivedInner<U>>>,
}

impl<U> Clone for Derived<U> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<U: fmt::Debug> fmt::Debug for Derived<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Derived")
            .field("cached", &inner.cached)
            .field("dirty", &inner.dirty.get())
            .field("version", &inner.version)
            .finish()
    }
}

impl<U: Clone + 'static> Derived<U> {
    /// Build from a compute function and the cells it reads.
    fn wire<T: 'static>(compute: Box<dyn Fn() -> U>, sources: &[&ReactiveCell<T>]) -> Self {
        let inner = Rc::new(RefCell::new(DerivedInner {
            compute,
            cached: None,
            dirty: Cell::new(true),
            version: 0,
            _subscriptions: Vec::new(),
        }));
        let subs: Vec<Subscription> = sources
            .iter()
            .map(|source| mark_dirty_on_write(source, &inner))
            .collect();
        inner.borrow_mut()._subscriptions = subs;
        Self { inner }
    }

    /// Derive from a single cell.
    pub fn from_cell<T: 'static>(
        source: &ReactiveCell<T>,
        map: impl Fn(Option<&T>) -> U + 'static,
    ) -> Self {
        let reader = source.clone();
        Self::wire(Box::new(move || reader.with(|v| map(v))), &[source])
    }

    /// Derive from two cells of possibly different types.
    pub fn from2<A, B>(
        a: &ReactiveCell<A>,
        b: &ReactiveCell<B>,
        map: impl Fn(Option<&A>, Option<&B>) -> U + 'static,
    ) -> Self
    where
        A: 'static,
        B: 'static,
    {
        let (ra, rb) = (a.clone(), b.clone());
        let derived = Self::wire(
            Box::new(move || ra.with(|va| rb.with(|vb| map(va, vb)))),
            &[a],
        );
        let extra = mark_dirty_on_write(b, &derived.inner);
        derived.inner.borrow_mut()._subscriptions.push(extra);
        derived
    }

    /// Derive from every cell in `sources`, all of the same type.
    pub fn from_all<T: 'static>(
        sources: &[ReactiveCell<T>],
        map: impl Fn(&[Option<&T>]) -> U + 'static,
    ) -> Self {
        let readers: Vec<ReactiveCell<T>> = sources.to_vec();
        let compute = move || {
            let guards: Vec<_> = readers.iter().map(ReactiveCell::value_ref).collect();
            let values: Vec<Option<&T>> = guards.iter().map(|g| Option::as_ref(&**g)).collect();
            map(&values)
        };
        let refs: Vec<&ReactiveCell<T>> = sources.iter().collect();
        Self::wire(Box::new(compute), &refs)
    }

    fn refresh(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.dirty.get() || inner.cached.is_none() {
            let fresh = (inner.compute)();
            inner.cached = Some(fresh);
            inner.dirty.set(false);
            inner.version += 1;
        }
    }

    /// Current value, recomputed first if a dependency changed.
    #[must_use]
    pub fn get(&self) -> U {
        self.with(U::clone)
    }

    /// Access the current value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&U) -> R) -> R {
        self.refresh();
        let inner = self.inner.borrow();
        match inner.cached.as_ref() {
            Some(value) => f(value),
            None => unreachable!("refresh always leaves a cached value"),
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.borrow().dirty.get()
    }

    /// Number of recomputations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }
}

fn mark_dirty_on_write<T, U: 'static>(
    source: &ReactiveCell<T>,
    inner: &Rc<RefCell<DerivedInner<U>>>,
) -> Subscription {
    let weak = Rc::downgrade(inner);
    source.subscribe(move || {
        if let Some(strong) = weak.upgrade() {
            strong.borrow().dirty.set(true);
        }
    })
}
