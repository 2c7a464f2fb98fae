#![forbid(unsafe_code)]

//! Two-variant validation outcome.
//!
//! # Invariants
//!
//! 1. Exactly one variant is populated.
//! 2. A `Failure` built from validator output is never empty: an outcome with
//!    no diagnostics is always a `Success`.
//! 3. Outcomes are immutable once constructed; the combinators consume `self`.
//!
//! # Failure Modes
//!
//! - **Unwrapping a failure**: this is a collaborator contract violation.
//!   [`Outcome::unwrap`] panics with the [`UnwrapError`] message and
//!   [`Outcome::try_unwrap`] hands the error back instead. Callers are
//!   expected to branch on [`Outcome::is_success`] first.

use std::fmt;

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Error raised when the value of an outcome is requested but there is none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnwrapError {
    /// The outcome is a `Failure`.
    #[error("called `unwrap` on a failed outcome ({count} diagnostic(s), first: {first})")]
    Failure { count: usize, first: String },

    /// Neither a diagnostic nor a value was produced.
    #[error("validation produced neither a diagnostic nor a value")]
    Absent,
}

/// Result of running a validator over one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V, E = Diagnostic> {
    /// Validation failed with one or more diagnostics, in emission order.
    Failure(Vec<E>),
    /// Validation succeeded with the produced value.
    Success(V),
}

impl<V, E> Outcome<V, E> {
    /// Create a successful outcome.
    #[must_use]
    pub fn success(value: V) -> Self {
        Self::Success(value)
    }

    /// Create a failed outcome.
    ///
    /// The diagnostic sequence must not be empty.
    #[must_use]
    pub fn failure(diagnostics: Vec<E>) -> Self {
        debug_assert!(
            !diagnostics.is_empty(),
            "a failed outcome needs at least one diagnostic"
        );
        Self::Failure(diagnostics)
    }

    /// Decide the outcome from collected diagnostics and an optional value.
    ///
    /// Any diagnostic makes the outcome a `Failure`, even when a value was
    /// produced. With no diagnostics the value must be present.
    pub fn try_from_parts(diagnostics: Vec<E>, value: Option<V>) -> Result<Self, UnwrapError> {
        if !diagnostics.is_empty() {
            return Ok(Self::Failure(diagnostics));
        }
        value.map(Self::Success).ok_or(UnwrapError::Absent)
    }

    /// Like [`Outcome::try_from_parts`], panicking when neither a diagnostic
    /// nor a value is present.
    #[must_use]
    pub fn from_parts(diagnostics: Vec<E>, value: Option<V>) -> Self {
        match Self::try_from_parts(diagnostics, value) {
            Ok(outcome) => outcome,
            Err(err) => panic!("{err}"),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The value, if this is a `Success`.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The diagnostics, empty for a `Success`.
    #[must_use]
    pub fn diagnostics(&self) -> &[E] {
        match self {
            Self::Failure(diagnostics) => diagnostics,
            Self::Success(_) => &[],
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Convert into a standard `Result`, keeping all diagnostics.
    pub fn into_result(self) -> Result<V, Vec<E>> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(diagnostics) => Err(diagnostics),
        }
    }

    /// Transform the success value, leaving failures untouched.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Outcome<U, E> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(diagnostics) => Outcome::Failure(diagnostics),
        }
    }

    /// Borrowing view of this outcome.
    #[must_use]
    pub fn as_ref(&self) -> Outcome<&V, &E> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(diagnostics) => Outcome::Failure(diagnostics.iter().collect()),
        }
    }
}

impl<V, E: fmt::Display> Outcome<V, E> {
    /// Return the value, or an [`UnwrapError`] describing the failure.
    pub fn try_unwrap(self) -> Result<V, UnwrapError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(diagnostics) => Err(UnwrapError::Failure {
                count: diagnostics.len(),
                first: diagnostics
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            }),
        }
    }

    /// Return the value of a `Success`.
    ///
    /// # Panics
    ///
    /// Panics on a `Failure`. Branch on [`is_success`](Self::is_success)
    /// before unwrapping.
    #[track_caller]
    pub fn unwrap(self) -> V {
        match self.try_unwrap() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<V, E> From<Outcome<V, E>> for Result<V, Vec<E>> {
    fn from(outcome: Outcome<V, E>) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diags(messages: &[&str]) -> Vec<Diagnostic> {
        messages.iter().copied().map(Diagnostic::new).collect()
    }

    #[test]
    fn success_predicates_and_value() {
        let outcome: Outcome<i32> = Outcome::success(7);
        assert!(outcome.is_success());
        assert!(!outcome.is_failure());
        assert_eq!(outcome.value(), Some(&7));
        assert!(outcome.diagnostics().is_empty());
        assert_eq!(outcome.unwrap(), 7);
    }

    #[test]
    fn failure_keeps_diagnostics_in_order() {
        let outcome: Outcome<i32> = Outcome::failure(diags(&["first", "second"]));
        assert!(outcome.is_failure());
        assert_eq!(outcome.value(), None);
        let messages: Vec<_> = outcome.diagnostics().iter().map(|d| d.message()).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn try_unwrap_failure_reports_first_diagnostic() {
        let outcome: Outcome<i32> = Outcome::failure(diags(&["Month must be at most 12."]));
        let err = outcome.try_unwrap().unwrap_err();
        assert_eq!(
            err,
            UnwrapError::Failure {
                count: 1,
                first: "Month must be at most 12.".into()
            }
        );
        assert!(err.to_string().contains("Month must be at most 12."));
    }

    #[test]
    #[should_panic(expected = "called `unwrap` on a failed outcome")]
    fn unwrap_failure_panics() {
        let outcome: Outcome<i32> = Outcome::failure(diags(&["nope"]));
        let _ = outcome.unwrap();
    }

    #[test]
    fn from_parts_prefers_failure_when_flagged() {
        let outcome = Outcome::try_from_parts(diags(&["flagged"]), Some(3)).unwrap();
        assert!(outcome.is_failure());

        let outcome: Outcome<i32> = Outcome::try_from_parts(Vec::new(), Some(3)).unwrap();
        assert_eq!(outcome, Outcome::Success(3));

        let err = Outcome::<i32>::try_from_parts(Vec::new(), None).unwrap_err();
        assert_eq!(err, UnwrapError::Absent);
    }

    #[test]
    #[should_panic(expected = "neither a diagnostic nor a value")]
    fn from_parts_panics_on_absence() {
        let _ = Outcome::<i32>::from_parts(Vec::new(), None);
    }

    #[test]
    fn map_only_touches_success() {
        let ok: Outcome<i32> = Outcome::success(2);
        assert_eq!(ok.map(|v| v * 10), Outcome::Success(20));

        let failed: Outcome<i32> = Outcome::failure(diags(&["x"]));
        assert_eq!(failed.map(|v| v * 10), Outcome::Failure(diags(&["x"])));
    }

    #[test]
    fn into_result_round_trip() {
        let failed: Outcome<i32> = Outcome::failure(diags(&["a", "b"]));
        let result: Result<i32, Vec<Diagnostic>> = failed.into();
        assert_eq!(result, Err(diags(&["a", "b"])));
    }
}
