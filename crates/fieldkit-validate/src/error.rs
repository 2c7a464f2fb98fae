//! Configuration errors for pipeline construction.
//!
//! Invalid *input* never produces one of these; it produces diagnostics.
//! These errors mean the pipeline itself was described incorrectly.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unrecognized step specifier: {spec}")]
    UnknownStep { spec: String },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid argument for step `{step}`: {value}")]
    InvalidArgument { step: String, value: String },
}
