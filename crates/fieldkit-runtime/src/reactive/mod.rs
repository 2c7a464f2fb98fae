#![forbid(unsafe_code)]

//! Change-tracking primitives that keep field values in sync.
//!
//! - [`ReactiveCell`]: a shared, version-tracked optional value with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop or on an explicit
//!   [`Subscription::unsubscribe`].
//! - [`Derived`]: a lazily-evaluated, memoized value computed from one or more
//!   cells.
//!
//! # Architecture
//!
//! `ReactiveCell<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. The subscription guard owns the callback; the cell only holds a
//! `Weak` to it and prunes dead entries lazily during notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per `set`.
//! 2. Every `set` notifies every live subscriber exactly once, in
//!    registration order, even when the value did not change.
//! 3. Notification runs after the cell's borrow is released: callbacks may
//!    read the cell, write other cells, and subscribe or unsubscribe.
//! 4. Callbacks registered during a notification are not called by that
//!    notification.
//! 5. `Derived::get()` never returns a stale value.

pub mod cell;
pub mod derived;

pub use cell::{ReactiveCell, Subscription};
pub use derived::Derived;
