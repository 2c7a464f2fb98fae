#![forbid(unsafe_code)]

//! User-facing validation messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single validation-failure message.
///
/// Diagnostics are local to the field that produced them. They carry no
/// severity and no field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable message shown next to the field.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&str> for Diagnostic {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Diagnostic {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
