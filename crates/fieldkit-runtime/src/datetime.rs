//! Composite date + time field.
//!
//! The date and time parts are validated independently as the user edits
//! them. The combined result is derived lazily from both parts:
//!
//! - while either part has never been entered, there is no result;
//! - if either part failed, the result is a Failure carrying the date
//!   diagnostics followed by the time diagnostics;
//! - otherwise the parts are joined into a [`NaiveDateTime`], checked against
//!   the past/future bound at minute resolution, and passed through the
//!   handler step, with all diagnostics merged.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use fieldkit_core::{Diagnostic, FieldValue, Outcome, SharedClock, SystemClock, XDate, XTime};
use fieldkit_validate::date::INVALID_DATE;
use fieldkit_validate::{Bound, DateStep, Identity, Pipeline, Step, StepOutput, TimeStep};
use tracing::debug;

use crate::error::Result;
use crate::reactive::{Derived, ReactiveCell};
use crate::session::{FormSession, WeakSession};

pub const DATETIME_NOT_PAST: &str = "The moment must lie in the past.";
pub const DATETIME_NOT_FUTURE: &str = "The moment must lie in the future.";

/// A field assembled from a `dd/mm/yyyy` part and an `hh:mm` part.
pub struct DateTimeField<T = NaiveDateTime> {
    name: String,
    label: Option<String>,
    session: WeakSession,
    date: Pipeline<String, XDate>,
    time: Pipeline<String, XTime>,
    date_part: ReactiveCell<Outcome<XDate>>,
    time_part: ReactiveCell<Outcome<XTime>>,
    combined: Derived<Option<Outcome<T>>>,
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for DateTimeField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeField")
            .field("name", &self.name)
            .field("date_part", &self.date_part.get())
            .field("time_part", &self.time_part.get())
            .finish_non_exhaustive()
    }
}

impl DateTimeField<NaiveDateTime> {
    /// Unbounded field on the system clock that stores the joined instant.
    pub fn new(session: &FormSession, name: impl Into<String>) -> Self {
        Self::mount(session, name, Bound::Any, SystemClock::shared(), Identity)
    }
}

impl<T: Clone + Into<FieldValue> + 'static> DateTimeField<T> {
    /// Mount a field whose joined instant is checked against `bound` on
    /// `clock` and then mapped through `handler`.
    pub fn mount(
        session: &FormSession,
        name: impl Into<String>,
        bound: Bound,
        clock: SharedClock,
        handler: impl Step<NaiveDateTime, T> + 'static,
    ) -> Self {
        let name = name.into();
        let _ = session.cell(&name);
        let date_part = ReactiveCell::new();
        let time_part = ReactiveCell::new();
        let part_clock = clock.clone();
        let combined = Derived::from2(&date_part, &time_part, move |date, time| {
            match (date, time) {
                (Some(date), Some(time)) => Some(combine(date, time, bound, &clock, &handler)),
                _ => None,
            }
        });
        Self {
            name,
            label: None,
            session: session.handle(),
            date: Pipeline::new(DateStep::new().with_clock(part_clock.clone())),
            time: Pipeline::new(TimeStep::new().with_clock(part_clock)),
            date_part,
            time_part,
            combined,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Validate the date part and publish the combined result.
    pub fn input_date(&mut self, raw: impl Into<String>) -> Result<Option<Outcome<T>>> {
        let cell = self.session.cell(&self.name)?;
        self.date_part.set(self.date.validate(raw.into()));
        Ok(self.publish(&cell, "date"))
    }

    /// Validate the time part and publish the combined result.
    pub fn input_time(&mut self, raw: impl Into<String>) -> Result<Option<Outcome<T>>> {
        let cell = self.session.cell(&self.name)?;
        self.time_part.set(self.time.validate(raw.into()));
        Ok(self.publish(&cell, "time"))
    }

    /// Validate both parts, then publish the combined result once.
    ///
    /// A new date is never written alongside a stale time.
    pub fn input(
        &mut self,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Result<Option<Outcome<T>>> {
        let cell = self.session.cell(&self.name)?;
        self.date_part.set(self.date.validate(date.into()));
        self.time_part.set(self.time.validate(time.into()));
        Ok(self.publish(&cell, "both"))
    }

    fn publish(&self, cell: &ReactiveCell<FieldValue>, part: &'static str) -> Option<Outcome<T>> {
        let result = self.combined.get();
        if let Some(Outcome::Success(value)) = &result {
            cell.set(value.clone().into());
        }
        debug!(
            message = "field.input",
            field = %self.name,
            part,
            complete = result.is_some(),
            ok = result.as_ref().is_some_and(Outcome::is_success)
        );
        result
    }

    /// The combined result, `None` until both parts were entered.
    #[must_use]
    pub fn result(&self) -> Option<Outcome<T>> {
        self.combined.get()
    }

    /// Diagnostics of the combined result.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.combined
            .with(|result| result.as_ref().map(|o| o.diagnostics().to_vec()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

fn combine<T>(
    date: &Outcome<XDate>,
    time: &Outcome<XTime>,
    bound: Bound,
    clock: &SharedClock,
    handler: &impl Step<NaiveDateTime, T>,
) -> Outcome<T> {
    let (Outcome::Success(date), Outcome::Success(time)) = (date, time) else {
        let mut diagnostics = date.diagnostics().to_vec();
        diagnostics.extend_from_slice(time.diagnostics());
        return Outcome::Failure(diagnostics);
    };
    let Some(instant) = date
        .to_naive()
        .zip(time.to_naive())
        .map(|(d, t)| d.and_time(t))
    else {
        return Outcome::Failure(vec![Diagnostic::new(INVALID_DATE)]);
    };

    let now = clock.now();
    let now = now
        .with_second(0)
        .and_then(|n| n.with_nanosecond(0))
        .unwrap_or(now);
    let mut diagnostics = Vec::new();
    match bound {
        Bound::Past if instant > now => diagnostics.push(Diagnostic::new(DATETIME_NOT_PAST)),
        Bound::Future if instant < now => diagnostics.push(Diagnostic::new(DATETIME_NOT_FUTURE)),
        _ => {}
    }

    let StepOutput {
        diagnostics: handled,
        value,
    } = handler.run(instant);
    diagnostics.extend(handled);
    StepOutput { diagnostics, value }.into_outcome()
}
