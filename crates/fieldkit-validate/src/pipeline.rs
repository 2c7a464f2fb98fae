#![forbid(unsafe_code)]

//! Ordered composition of validation steps.
//!
//! # Design
//!
//! A pipeline declared as `[s1, s2, …, sn]` mirrors a base conversion step
//! `s1` wrapped by constraint steps `s2..sn`. Execution order is the reverse
//! of declaration order: `sn` sees the raw input first and `s1` produces the
//! final value. The steps are kept in a flat list and walked back-to-front.
//!
//! # Invariants
//!
//! 1. Every step runs exactly once per invocation while a value is present,
//!    whatever diagnostics earlier-executing steps emitted. There is no
//!    short-circuit on diagnostics.
//! 2. Diagnostics are concatenated in execution order.
//! 3. A constraint step that yields no value ends the run: the remaining steps
//!    are skipped and the collected diagnostics are returned with no value.
//!    If that step flagged nothing, a generic diagnostic is added so the run
//!    still reports a failure.
//! 4. Pipelines are stateless between invocations.

use fieldkit_core::{Diagnostic, Outcome};
use tracing::trace;

use crate::step::{Identity, NO_VALUE_MESSAGE, Step, StepOutput};

/// A base step plus constraint steps, evaluated back-to-front.
pub struct Pipeline<In, Out> {
    base: Box<dyn Step<In, Out>>,
    /// Constraint steps in declaration order (`s2..sn`).
    constraints: Vec<Box<dyn Step<In, In>>>,
}

impl<In, Out> std::fmt::Debug for Pipeline<In, Out> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.len())
            .finish()
    }
}

impl<In: 'static> Pipeline<In, In> {
    /// A pipeline whose base step passes the input through unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Identity)
    }
}

impl<In, Out> Pipeline<In, Out> {
    /// Start a pipeline from its type-producing base step (`s1`).
    #[must_use]
    pub fn new(base: impl Step<In, Out> + 'static) -> Self {
        Self {
            base: Box::new(base),
            constraints: Vec::new(),
        }
    }

    /// Declare the next constraint step. It runs before every step declared
    /// so far.
    #[must_use]
    pub fn with(mut self, step: impl Step<In, In> + 'static) -> Self {
        self.constraints.push(Box::new(step));
        self
    }

    /// Declare a boxed constraint step.
    pub fn push(&mut self, step: Box<dyn Step<In, In>>) {
        self.constraints.push(step);
    }

    /// Total number of steps, base included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len() + 1
    }

    /// A pipeline always has its base step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Run every step and return the merged diagnostics and final value.
    pub fn run(&self, input: In) -> StepOutput<Out> {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut current = input;

        for (index, step) in self.constraints.iter().enumerate().rev() {
            let out = step.run(current);
            diagnostics.extend(out.diagnostics);
            match out.value {
                Some(next) => current = next,
                None => {
                    trace!(
                        message = "pipeline.absent",
                        step = index + 2,
                        diagnostics = diagnostics.len()
                    );
                    if diagnostics.is_empty() {
                        diagnostics.push(Diagnostic::new(NO_VALUE_MESSAGE));
                    }
                    return StepOutput::absent(diagnostics);
                }
            }
        }

        let out = self.base.run(current);
        diagnostics.extend(out.diagnostics);
        trace!(
            message = "pipeline.run",
            steps = self.len(),
            diagnostics = diagnostics.len(),
            produced = out.value.is_some()
        );
        StepOutput {
            diagnostics,
            value: out.value,
        }
    }

    /// Run the pipeline and decide the field-level outcome.
    pub fn validate(&self, input: In) -> Outcome<Out> {
        self.run(input).into_outcome()
    }
}

impl<In, Out> Step<In, Out> for Pipeline<In, Out> {
    fn run(&self, input: In) -> StepOutput<Out> {
        Pipeline::run(self, input)
    }
}
