//! Textual step specifiers.
//!
//! Form definitions name their constraint steps with short strings:
//!
//! | Specifier | Step |
//! |---|---|
//! | `identity` | pass-through |
//! | `required` | flags empty (or whitespace-only) input |
//! | `phone` | [`Pattern::phone`] |
//! | `pattern:<regex>` | [`Pattern`] with the given regex |
//! | `min-length:<n>` | flags input shorter than `n` characters |
//! | `max-length:<n>` | flags input longer than `n` characters |
//!
//! An unknown specifier is a configuration error, not a diagnostic.

use std::str::FromStr;

use fieldkit_core::Diagnostic;

use crate::error::{ConfigError, Result};
use crate::pattern::Pattern;
use crate::pipeline::Pipeline;
use crate::step::{Identity, Step, StepOutput, from_fn};

pub const REQUIRED: &str = "This field is required.";

#[must_use]
pub fn too_short(min: usize) -> String {
    format!("The text must be at least {min} characters long.")
}

#[must_use]
pub fn too_long(max: usize) -> String {
    format!("The text may be at most {max} characters long.")
}

/// A parsed string-to-string constraint step.
#[derive(Debug, Clone)]
pub enum StepSpec {
    Identity,
    Required,
    Phone,
    Pattern(Pattern),
    MinLength(usize),
    MaxLength(usize),
}

impl FromStr for StepSpec {
    type Err = ConfigError;

    fn from_str(spec: &str) -> Result<Self> {
        let (name, arg) = match spec.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg)),
            None => (spec.trim(), None),
        };
        match (name, arg) {
            ("identity", None) => Ok(Self::Identity),
            ("required", None) => Ok(Self::Required),
            ("phone", None) => Ok(Self::Phone),
            ("pattern", Some(source)) => Pattern::parse(source).map(Self::Pattern),
            ("min-length", Some(n)) => parse_count("min-length", n).map(Self::MinLength),
            ("max-length", Some(n)) => parse_count("max-length", n).map(Self::MaxLength),
            _ => Err(ConfigError::UnknownStep {
                spec: spec.to_owned(),
            }),
        }
    }
}

fn parse_count(step: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidArgument {
            step: step.to_owned(),
            value: raw.to_owned(),
        })
}

impl StepSpec {
    /// Parse a list of specifiers, failing on the first bad one.
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>> {
        specs.iter().map(|s| s.as_ref().parse()).collect()
    }

    /// Instantiate the step.
    #[must_use]
    pub fn build(&self) -> Box<dyn Step<String, String>> {
        match self {
            Self::Identity => Box::new(Identity),
            Self::Required => Box::new(from_fn(|input: String| {
                if input.trim().is_empty() {
                    StepOutput::flagged(input, vec![Diagnostic::new(REQUIRED)])
                } else {
                    StepOutput::pass(input)
                }
            })),
            Self::Phone => Box::new(Pattern::phone()),
            Self::Pattern(pattern) => Box::new(pattern.clone()),
            Self::MinLength(min) => {
                let min = *min;
                Box::new(from_fn(move |input: String| {
                    if input.chars().count() < min {
                        StepOutput::flagged(input, vec![Diagnostic::new(too_short(min))])
                    } else {
                        StepOutput::pass(input)
                    }
                }))
            }
            Self::MaxLength(max) => {
                let max = *max;
                Box::new(from_fn(move |input: String| {
                    if input.chars().count() > max {
                        StepOutput::flagged(input, vec![Diagnostic::new(too_long(max))])
                    } else {
                        StepOutput::pass(input)
                    }
                }))
            }
        }
    }
}

impl<Out> Pipeline<String, Out> {
    /// Wrap `base` with the given constraint specifiers, in declaration order.
    pub fn from_specs<S: AsRef<str>>(
        base: impl Step<String, Out> + 'static,
        specs: &[S],
    ) -> Result<Self> {
        let mut pipeline = Self::new(base);
        for spec in StepSpec::parse_all(specs)? {
            pipeline.push(spec.build());
        }
        Ok(pipeline)
    }
}
