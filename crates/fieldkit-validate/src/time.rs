//! `hh:mm` time parser step.

use std::sync::LazyLock;

use chrono::Timelike;
use fieldkit_core::{Diagnostic, SharedClock, SystemClock, XTime};
use regex::Regex;

use crate::step::{Bound, Step, StepOutput};

pub const INVALID_TIME: &str = "Invalid time format. Enter a time such as 12:30 or 22:41.";
pub const HOUR_TOO_LARGE: &str = "Hour must be at most 23.";
pub const MINUTE_TOO_LARGE: &str = "Minutes must be at most 59.";
pub const TIME_NOT_PAST: &str = "The time must lie in the past.";
pub const TIME_NOT_FUTURE: &str = "The time must lie in the future.";

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2}):([0-9]{2})$").expect("time pattern is a valid regex"));

/// Parses two-digit `hh:mm` text into an [`XTime`].
///
/// Hours are bounded to `0..=23` and minutes to `0..=59`; `24:00` is
/// rejected. Past/future bounds compare against the clock's time of day at
/// minute resolution, and the current minute satisfies both.
#[derive(Clone)]
pub struct TimeStep {
    bound: Bound,
    clock: SharedClock,
}

impl std::fmt::Debug for TimeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeStep")
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

impl Default for TimeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeStep {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bound: Bound::Any,
            clock: SystemClock::shared(),
        }
    }

    #[must_use]
    pub fn past(mut self) -> Self {
        self.bound = Bound::Past;
        self
    }

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

impl Step<String, XTime> for TimeStep {
    fn run(&self, input: String) -> StepOutput<XTime> {
        let Some(caps) = TIME_REGEX.captures(&input) else {
            return StepOutput::absent(vec![Diagnostic::new(INVALID_TIME)]);
        };
        let (Ok(hours), Ok(minutes)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            return StepOutput::absent(vec![Diagnostic::new(INVALID_TIME)]);
        };

        let mut diagnostics = Vec::new();
        if hours > 23 {
            diagnostics.push(Diagnostic::new(HOUR_TOO_LARGE));
        }
        if minutes > 59 {
            diagnostics.push(Diagnostic::new(MINUTE_TOO_LARGE));
        }
        if !diagnostics.is_empty() {
            return StepOutput::absent(diagnostics);
        }

        let now = self.clock.now().time();
        let entered = (hours, minutes);
        let current = (now.hour(), now.minute());
        match self.bound {
            Bound::Past if entered > current => {
                StepOutput::absent(vec![Diagnostic::new(TIME_NOT_PAST)])
            }
            Bound::Future if entered < current => {
                StepOutput::absent(vec![Diagnostic::new(TIME_NOT_FUTURE)])
            }
            _ => StepOutput::pass(XTime::new(hours, minutes)),
        }
    }
}
