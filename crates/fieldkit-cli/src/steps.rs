//! `fieldkit check-steps`: try constraint specifiers against raw inputs.

use chrono::NaiveDateTime;
use clap::{Args, ValueEnum};
use fieldkit::prelude::{DateStep, FieldValue, Outcome, Pipeline, SharedClock, TimeStep, identity};
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, Result};
use crate::validate::{clock_for, parse_instant};

/// Base step the constraint specifiers wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BaseKind {
    #[default]
    Text,
    Date,
    Time,
}

#[derive(Debug, Clone, Args)]
pub struct CheckStepsArgs {
    /// Step specifiers in declaration order (`required`, `max-length:10`, ...).
    #[arg(required = true)]
    pub specs: Vec<String>,

    /// Raw input to validate.
    #[arg(long)]
    pub input: Vec<String>,

    #[arg(long, value_enum, default_value_t = BaseKind::Text)]
    pub kind: BaseKind,

    /// Pin "now" for date and time checks (`YYYY-MM-DD HH:MM`).
    #[arg(long, value_parser = parse_instant)]
    pub now: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputReport {
    pub input: String,
    pub valid: bool,
    pub value: Option<serde_json::Value>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepsReport {
    pub steps: usize,
    pub results: Vec<InputReport>,
}

fn check_all<Out: Into<FieldValue>>(
    pipeline: &Pipeline<String, Out>,
    inputs: &[String],
) -> Vec<InputReport> {
    inputs
        .iter()
        .map(|input| match pipeline.validate(input.clone()) {
            Outcome::Success(value) => InputReport {
                input: input.clone(),
                valid: true,
                value: Some(Into::<FieldValue>::into(value).to_json()),
                diagnostics: Vec::new(),
            },
            Outcome::Failure(diagnostics) => InputReport {
                input: input.clone(),
                valid: false,
                value: None,
                diagnostics: diagnostics
                    .iter()
                    .map(|diagnostic| diagnostic.message().to_owned())
                    .collect(),
            },
        })
        .collect()
}

/// Build the pipeline and validate every input.
pub fn execute(args: &CheckStepsArgs) -> Result<StepsReport> {
    let clock: SharedClock = clock_for(args.now);
    let results = match args.kind {
        BaseKind::Text => check_all(&Pipeline::from_specs(identity(), &args.specs)?, &args.input),
        BaseKind::Date => check_all(
            &Pipeline::from_specs(DateStep::new().with_clock(clock), &args.specs)?,
            &args.input,
        ),
        BaseKind::Time => check_all(
            &Pipeline::from_specs(TimeStep::new().with_clock(clock), &args.specs)?,
            &args.input,
        ),
    };
    debug!(
        message = "cli.check_steps",
        steps = args.specs.len(),
        inputs = results.len()
    );
    Ok(StepsReport {
        steps: args.specs.len(),
        results,
    })
}

pub fn run_check_steps(args: CheckStepsArgs) -> Result<()> {
    let report = execute(&args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    let rejected = report.results.iter().filter(|result| !result.valid).count();
    if rejected > 0 {
        return Err(CliError::Rejected { fields: rejected });
    }
    Ok(())
}
