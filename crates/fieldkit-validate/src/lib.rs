#![forbid(unsafe_code)]

//! Validation pipelines for fieldkit.
//!
//! A [`Step`] turns an input into zero or more [`Diagnostic`]s plus an
//! optional output. A [`Pipeline`] composes a type-producing base step with
//! constraint steps and runs them back-to-front without stopping at the first
//! diagnostic, so the user sees every problem with their input at once.
//!
//! ```
//! use fieldkit_validate::{Pipeline, Pattern, identity};
//!
//! let pipeline = Pipeline::new(identity()).with(Pattern::phone());
//! assert!(pipeline.validate("0499123456".to_string()).is_success());
//! assert!(pipeline.validate("abc".to_string()).is_failure());
//! ```
//!
//! [`Diagnostic`]: fieldkit_core::Diagnostic

pub mod date;
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod spec;
pub mod step;
pub mod time;

pub use date::DateStep;
pub use error::{ConfigError, Result};
pub use pattern::{PHONE_PATTERN, Pattern};
pub use pipeline::Pipeline;
pub use spec::StepSpec;
pub use step::{Bound, Compose, FnStep, Identity, Step, StepOutput, compose, from_fn, identity};
pub use time::TimeStep;
