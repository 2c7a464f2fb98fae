#![forbid(unsafe_code)]

//! Runtime state for fieldkit forms.
//!
//! A [`FormSession`] owns a [`FieldStore`] of [`ReactiveCell`]s, one per field
//! name. Fields validate raw input through a pipeline and write successful
//! values into their cell; [`FormSession::submit`] hands a [`Snapshot`] of
//! every cell to the submit handler.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`).

pub mod config;
pub mod datetime;
pub mod error;
pub mod field;
pub mod lookup;
pub mod reactive;
pub mod session;
pub mod snapshot;
pub mod store;

pub use config::{FieldDef, FieldKind, FormDef, MountedField, MountedForm};
pub use datetime::DateTimeField;
pub use error::{FormError, Result};
pub use field::{CheckField, Field};
pub use lookup::{AutoComplete, AutoCompleteField, Direction, LookupError, LookupReply, SuggestionSource};
pub use reactive::{Derived, ReactiveCell, Subscription};
pub use session::{FieldAccess, FormSession, SubmitHandler, WeakSession};
pub use snapshot::Snapshot;
pub use store::FieldStore;
