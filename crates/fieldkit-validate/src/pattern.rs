//! Regular-expression constraint step.
//!
//! A pattern step flags a fixed diagnostic when the input does not match, and
//! always forwards the original string unchanged so that steps after it still
//! run.

use std::sync::LazyLock;

use fieldkit_core::Diagnostic;
use regex::Regex;

use crate::error::{ConfigError, Result};
use crate::step::{Step, StepOutput};

pub const PATTERN_MISMATCH: &str = "The text does not match the requested pattern.";

/// Belgian phone numbers, national (`0…`) or international (`+32…`) form.
pub const PHONE_PATTERN: &str = r"^(\+32[1-9][0-9]{7,8}|0?[1-9][0-9]{7,8})$";

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"));

#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    #[must_use]
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }

    /// Compile a pattern from source.
    pub fn parse(source: &str) -> Result<Self> {
        Regex::new(source)
            .map(Self::new)
            .map_err(|source_err| ConfigError::InvalidPattern {
                pattern: source.to_owned(),
                source: source_err,
            })
    }

    #[must_use]
    pub fn phone() -> Self {
        Self::new(PHONE_REGEX.clone())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Step<String, String> for Pattern {
    fn run(&self, input: String) -> StepOutput<String> {
        if self.regex.is_match(&input) {
            StepOutput::pass(input)
        } else {
            StepOutput::flagged(input, vec![Diagnostic::new(PATTERN_MISMATCH)])
        }
    }
}
