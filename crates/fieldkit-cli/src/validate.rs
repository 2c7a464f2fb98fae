//! `fieldkit validate`: mount a definition, apply inputs, submit.
//!
//! Every `--set` assignment is applied in order; a later assignment to the
//! same field replaces that field's diagnostics. The form is always
//! submitted, so the report carries the snapshot the submit handler saw,
//! rejected fields included (as `null`, or their last accepted value).

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::NaiveDateTime;
use clap::Args;
use fieldkit::prelude::{FixedClock, FormDef, FormSession, SharedClock, Snapshot, SystemClock};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CliError, Result};

const INSTANT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// JSON form definition.
    #[arg(long)]
    pub form: PathBuf,

    /// Field input as `name=value`, applied in order.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Pin "now" for past/future checks (`YYYY-MM-DD HH:MM`).
    #[arg(long, value_parser = parse_instant)]
    pub now: Option<NaiveDateTime>,

    /// Also write the report to this path.
    #[arg(long = "output-json")]
    pub output_json: Option<PathBuf>,

    /// Exit 0 even when a field rejected its input.
    #[arg(long = "allow-rejected")]
    pub allow_rejected: bool,
}

/// Latest diagnostics of one mounted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub field: String,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateReport {
    pub form: Option<String>,
    pub valid: bool,
    pub fields: Vec<FieldReport>,
    pub snapshot: Snapshot,
}

impl ValidateReport {
    /// Number of fields whose latest input was rejected.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| !field.diagnostics.is_empty())
            .count()
    }
}

pub fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected name=value, got `{raw}`")),
    }
}

pub fn parse_instant(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    INSTANT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DD HH:MM, got `{raw}`"))
}

pub(crate) fn clock_for(now: Option<NaiveDateTime>) -> SharedClock {
    match now {
        Some(instant) => FixedClock::shared(instant),
        None => SystemClock::shared(),
    }
}

/// Run the whole mount/input/submit cycle and build the report.
pub fn execute(args: &ValidateArgs) -> Result<ValidateReport> {
    let def = FormDef::from_path(&args.form)?;
    let session = FormSession::new();
    let submitted: Rc<RefCell<Option<Snapshot>>> = Rc::default();
    let sink = Rc::clone(&submitted);
    session.on_submit(move |snapshot| *sink.borrow_mut() = Some(snapshot));

    let mut form = def.mount(&session, &clock_for(args.now))?;
    let mut fields: Vec<FieldReport> = form
        .names()
        .map(|name| FieldReport {
            field: name.to_owned(),
            diagnostics: Vec::new(),
        })
        .collect();

    for (name, raw) in &args.set {
        let diagnostics = form.input(name, raw)?;
        debug!(
            message = "cli.input",
            field = %name,
            diagnostics = diagnostics.len()
        );
        if let Some(report) = fields.iter_mut().find(|report| report.field == *name) {
            report.diagnostics = diagnostics
                .iter()
                .map(|diagnostic| diagnostic.message().to_owned())
                .collect();
        }
    }

    session.submit();
    let snapshot = submitted
        .borrow_mut()
        .take()
        .unwrap_or_else(|| session.snapshot());
    let valid = fields.iter().all(|field| field.diagnostics.is_empty());
    info!(
        message = "cli.validate",
        form = def.name.as_deref().unwrap_or(""),
        fields = fields.len(),
        inputs = args.set.len(),
        valid
    );

    Ok(ValidateReport {
        form: def.name.clone(),
        valid,
        fields,
        snapshot,
    })
}

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let report = execute(&args)?;
    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = &args.output_json {
        std::fs::write(path, format!("{json}\n"))?;
    }
    println!("{json}");

    if !report.valid && !args.allow_rejected {
        return Err(CliError::Rejected {
            fields: report.rejected(),
        });
    }
    Ok(())
}
