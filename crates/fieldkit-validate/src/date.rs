//! `dd/mm/yyyy` date parser step.
//!
//! Range checks are collected together: an input with both a bad month and
//! a bad day reports both. The date is produced only when every check passes.

use std::sync::LazyLock;

use fieldkit_core::{Diagnostic, SharedClock, SystemClock, XDate, days_in_month};
use regex::Regex;

use crate::step::{Bound, Step, StepOutput};

pub const INVALID_DATE: &str = "This is not a valid date. A date looks like 19/03/2025.";
pub const MONTH_TOO_SMALL: &str = "Month must be at least 1.";
pub const MONTH_TOO_LARGE: &str = "Month must be at most 12.";
pub const DAY_TOO_SMALL: &str = "Day must be at least 1.";
pub const DATE_NOT_PAST: &str = "Only dates in the past can be selected.";
pub const DATE_NOT_FUTURE: &str = "Only dates in the future can be selected.";

/// Longest day number any month can have.
const MAX_DAY: u32 = 31;

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{1,4})$").expect("date pattern is a valid regex")
});

/// Diagnostic for a day beyond the end of its month.
#[must_use]
pub fn day_too_large(max: u32) -> String {
    format!("Day cannot be greater than {max}.")
}

/// Parses `d/m/y` text into an [`XDate`] with a zero-indexed month.
#[derive(Clone)]
pub struct DateStep {
    bound: Bound,
    clock: SharedClock,
}

impl std::fmt::Debug for DateStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateStep")
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

impl Default for DateStep {
    fn default() -> Self {
        Self::new()
    }
}

impl DateStep {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bound: Bound::Any,
            clock: SystemClock::shared(),
        }
    }

    /// Only accept dates up to and including today.
    #[must_use]
    pub fn past(mut self) -> Self {
        self.bound = Bound::Past;
        self
    }

    /// Only accept dates after today.
    #[must_use]
    pub fn future(mut self) -> Self {
        self.bound = Bound::Future;
        self
    }

    #[must_use]
    pub fn bound(mut self, bound: Bound) -> Self {
        self.bound = bound;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }
}

impl Step<String, XDate> for DateStep {
    fn run(&self, input: String) -> StepOutput<XDate> {
        let Some(caps) = DATE_REGEX.captures(&input) else {
            return StepOutput::absent(vec![Diagnostic::new(INVALID_DATE)]);
        };
        let (Ok(day), Ok(month), Ok(year)) = (
            caps[1].parse::<u32>(),
            caps[2].parse::<u32>(),
            caps[3].parse::<i32>(),
        ) else {
            return StepOutput::absent(vec![Diagnostic::new(INVALID_DATE)]);
        };

        let mut diagnostics = Vec::new();
        let month_ok = if month < 1 {
            diagnostics.push(Diagnostic::new(MONTH_TOO_SMALL));
            false
        } else if month > 12 {
            diagnostics.push(Diagnostic::new(MONTH_TOO_LARGE));
            false
        } else {
            true
        };

        let max_day = if month_ok {
            days_in_month(year, month - 1).unwrap_or(MAX_DAY)
        } else {
            MAX_DAY
        };
        if day < 1 {
            diagnostics.push(Diagnostic::new(DAY_TOO_SMALL));
        } else if day > max_day {
            diagnostics.push(Diagnostic::new(day_too_large(max_day)));
        }

        if !diagnostics.is_empty() {
            return StepOutput::absent(diagnostics);
        }

        let date = XDate::new(year, month - 1, day);
        let Some(naive) = date.to_naive() else {
            return StepOutput::absent(vec![Diagnostic::new(INVALID_DATE)]);
        };
        let today = self.clock.now().date();
        match self.bound {
            Bound::Past if naive > today => {
                StepOutput::absent(vec![Diagnostic::new(DATE_NOT_PAST)])
            }
            Bound::Future if naive <= today => {
                StepOutput::absent(vec![Diagnostic::new(DATE_NOT_FUTURE)])
            }
            _ => StepOutput::pass(date),
        }
    }
}
