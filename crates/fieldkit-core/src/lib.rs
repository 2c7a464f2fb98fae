#![forbid(unsafe_code)]

//! Core: validation outcomes, diagnostics, field values, and calendar types.

pub mod clock;
pub mod diagnostic;
pub mod outcome;
pub mod temporal;
pub mod value;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use diagnostic::Diagnostic;
pub use outcome::{Outcome, UnwrapError};
pub use temporal::{XDate, XTime, days_in_month};
pub use value::FieldValue;
