#![forbid(unsafe_code)]

//! Elementary validation steps.
//!
//! A step is the eager form of a generator-style validator: it emits
//! diagnostics in order and then either produces an output or nothing.
//!
//! # Invariants
//!
//! 1. Steps are pure: the same input yields the same [`StepOutput`].
//! 2. A step that produces no value should flag at least one diagnostic. The
//!    type does not enforce this; [`StepOutput::into_outcome`] fills in a
//!    generic diagnostic when it is violated.

use std::marker::PhantomData;

use fieldkit_core::{Diagnostic, Outcome};

/// Message used when a step produced neither a value nor a diagnostic.
pub const NO_VALUE_MESSAGE: &str = "No value could be derived from the input.";

/// Diagnostics emitted by a step, followed by its optional output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput<T> {
    pub diagnostics: Vec<Diagnostic>,
    pub value: Option<T>,
}

impl<T> StepOutput<T> {
    /// A clean pass with no diagnostics.
    #[must_use]
    pub fn pass(value: T) -> Self {
        Self {
            diagnostics: Vec::new(),
            value: Some(value),
        }
    }

    /// A value that is forwarded despite being flagged.
    #[must_use]
    pub fn flagged(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            value: Some(value),
        }
    }

    /// No value could be produced.
    #[must_use]
    pub fn absent(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            value: None,
        }
    }

    /// Build from collected diagnostics, producing a value only when none
    /// were flagged.
    #[must_use]
    pub fn checked(diagnostics: Vec<Diagnostic>, value: impl FnOnce() -> T) -> Self {
        if diagnostics.is_empty() {
            Self::pass(value())
        } else {
            Self::absent(diagnostics)
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.value.is_some()
    }

    /// Field-level decision: any diagnostic is a failure.
    #[must_use]
    pub fn into_outcome(self) -> Outcome<T> {
        let Self {
            mut diagnostics,
            value,
        } = self;
        if diagnostics.is_empty() && value.is_none() {
            diagnostics.push(Diagnostic::new(NO_VALUE_MESSAGE));
        }
        match value {
            Some(value) if diagnostics.is_empty() => Outcome::Success(value),
            _ => Outcome::Failure(diagnostics),
        }
    }
}

/// A validation step from `In` to `Out`.
pub trait Step<In, Out> {
    fn run(&self, input: In) -> StepOutput<Out>;
}

impl<In, Out, S: Step<In, Out> + ?Sized> Step<In, Out> for Box<S> {
    fn run(&self, input: In) -> StepOutput<Out> {
        (**self).run(input)
    }
}

impl<In, Out, S: Step<In, Out> + ?Sized> Step<In, Out> for std::rc::Rc<S> {
    fn run(&self, input: In) -> StepOutput<Out> {
        (**self).run(input)
    }
}

/// Pass-through step that never flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T> Step<T, T> for Identity {
    fn run(&self, input: T) -> StepOutput<T> {
        StepOutput::pass(input)
    }
}

#[must_use]
pub fn identity() -> Identity {
    Identity
}

/// Adapter that turns a closure into a [`Step`].
#[derive(Clone, Copy)]
pub struct FnStep<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnStep<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStep").finish_non_exhaustive()
    }
}

impl<In, Out, F: Fn(In) -> StepOutput<Out>> Step<In, Out> for FnStep<F> {
    fn run(&self, input: In) -> StepOutput<Out> {
        (self.f)(input)
    }
}

/// Wrap a closure as a step.
pub fn from_fn<In, Out, F: Fn(In) -> StepOutput<Out>>(f: F) -> FnStep<F> {
    FnStep { f }
}

/// Two steps of different types joined end to end.
///
/// `inner` runs first; its value feeds `outer`. Diagnostics from both are
/// kept, inner first. If `inner` yields no value, `outer` does not run.
pub struct Compose<O, I, Mid> {
    outer: O,
    inner: I,
    _mid: PhantomData<fn(Mid)>,
}

impl<O, I, Mid, In, Out> Step<In, Out> for Compose<O, I, Mid>
where
    O: Step<Mid, Out>,
    I: Step<In, Mid>,
{
    fn run(&self, input: In) -> StepOutput<Out> {
        let StepOutput {
            mut diagnostics,
            value,
        } = self.inner.run(input);
        let Some(mid) = value else {
            return StepOutput::absent(diagnostics);
        };
        let out = self.outer.run(mid);
        diagnostics.extend(out.diagnostics);
        StepOutput {
            diagnostics,
            value: out.value,
        }
    }
}

/// Compose `outer ∘ inner`: `inner` runs on the input, `outer` on its result.
pub fn compose<O, I, Mid>(outer: O, inner: I) -> Compose<O, I, Mid> {
    Compose {
        outer,
        inner,
        _mid: PhantomData,
    }
}

/// Restriction of a temporal value relative to "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bound {
    #[default]
    Any,
    /// Must not lie after now.
    Past,
    /// Must not lie before now.
    Future,
}
