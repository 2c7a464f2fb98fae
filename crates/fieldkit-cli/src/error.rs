use fieldkit::prelude::{ConfigError, FormError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{fields} field(s) rejected their input")]
    Rejected { fields: usize },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::Rejected { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_variant() {
        assert_eq!(CliError::invalid("x").exit_code(), 2);
        assert_eq!(CliError::Rejected { fields: 2 }.exit_code(), 3);
        assert_eq!(CliError::from(FormError::NoActiveSession).exit_code(), 1);
    }

    #[test]
    fn form_errors_keep_their_message() {
        let err = CliError::from(FormError::UnknownField {
            name: "email".into(),
        });
        assert_eq!(err.to_string(), "unknown field: email");
    }
}
