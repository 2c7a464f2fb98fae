//! Usage and configuration errors for form sessions.
//!
//! Rejected user input is not an error here; it comes back as an
//! `Outcome::Failure` carrying diagnostics.

use fieldkit_validate::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("field used outside of an active form session")]
    NoActiveSession,

    #[error("unknown field: {name}")]
    UnknownField { name: String },

    #[error("field defined twice: {name}")]
    DuplicateField { name: String },

    #[error("field `{field}` of kind {kind} does not take constraint steps")]
    StepsNotSupported { field: String, kind: &'static str },

    #[error("field `{field}` cannot be bounded to both past and future")]
    ConflictingBounds { field: String },

    #[error("field `{field}` expects on/off, got `{value}`")]
    InvalidToggle { field: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_transparent() {
        let err: FormError = ConfigError::UnknownStep {
            spec: "zipcode".into(),
        }
        .into();
        assert_eq!(err.to_string(), "unrecognized step specifier: zipcode");
    }

    #[test]
    fn usage_error_display() {
        assert_eq!(
            FormError::NoActiveSession.to_string(),
            "field used outside of an active form session"
        );
        let err = FormError::UnknownField {
            name: "email".into(),
        };
        assert_eq!(err.to_string(), "unknown field: email");
    }
}
