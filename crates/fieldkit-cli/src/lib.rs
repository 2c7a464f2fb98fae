#![forbid(unsafe_code)]

//! Command-line driver for fieldkit.
//!
//! `validate` mounts a JSON form definition, feeds it `name=value`
//! assignments, submits, and prints the submitted snapshot with every
//! field's diagnostics. `check-steps` runs raw inputs through a pipeline
//! built from constraint specifiers.

pub mod cli;
pub mod error;
pub mod logging;
pub mod steps;
pub mod validate;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};
