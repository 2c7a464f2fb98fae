#![forbid(unsafe_code)]

//! Auto-complete: a text box backed by an external suggestion source.
//!
//! The source is asked for suggestions on every text change and answers
//! through a [`LookupReply`], immediately or later. Nothing here performs
//! I/O, caches, or retries.
//!
//! # Invariants
//!
//! 1. Every `input` issues exactly one query with a fresh request number.
//! 2. The most recent *completion* wins. There is no cancellation: a slow
//!    reply for old text overwrites a faster reply for newer text. Such
//!    out-of-order completions are logged at `warn` as `lookup.stale`.
//! 3. A failed lookup clears `loading` and keeps the current suggestions.
//! 4. Navigation cycles through every suggestion and then through "nothing
//!    highlighted": `Down` from the last item, or `Up` from the first,
//!    clears the highlight.
//!
//! # Failure Modes
//!
//! - **Widget dropped before the reply**: completing the reply does nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fieldkit_core::{FieldValue, Outcome};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::Result;
use crate::session::{FormSession, WeakSession};

/// A lookup the suggestion source could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lookup failed: {message}")]
pub struct LookupError {
    pub message: String,
}

impl LookupError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Supplies suggestions for a search text.
pub trait SuggestionSource<T> {
    /// Start a lookup for `text`. Complete `reply` now or later.
    fn query(&self, text: &str, reply: LookupReply<T>);
}

impl<T, F: Fn(&str, LookupReply<T>)> SuggestionSource<T> for F {
    fn query(&self, text: &str, reply: LookupReply<T>) {
        self(text, reply);
    }
}

/// Keyboard navigation through the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

struct LookupState<T> {
    text: String,
    loading: bool,
    suggestions: Vec<T>,
    highlighted: Option<usize>,
    selected: Option<T>,
    issued: u64,
    last_applied: u64,
}

impl<T> Default for LookupState<T> {
    fn default() -> Self {
        Self {
            text: String::new(),
            loading: false,
            suggestions: Vec::new(),
            highlighted: None,
            selected: None,
            issued: 0,
            last_applied: 0,
        }
    }
}

/// One-shot completion handle for a single query.
pub struct LookupReply<T> {
    request: u64,
    state: Weak<RefCell<LookupState<T>>>,
}

impl<T> fmt::Debug for LookupReply<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupReply")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl<T> LookupReply<T> {
    /// Sequence number of the query this reply answers, starting at 1.
    #[must_use]
    pub fn request(&self) -> u64 {
        self.request
    }

    /// Deliver the lookup result.
    pub fn complete(self, result: std::result::Result<Vec<T>, LookupError>) {
        let Some(state) = self.state.upgrade() else {
            debug!(message = "lookup.orphaned", request = self.request);
            return;
        };
        let mut state = state.borrow_mut();
        state.loading = false;
        match result {
            Ok(items) => {
                if self.request < state.last_applied {
                    warn!(
                        message = "lookup.stale",
                        request = self.request,
                        last_applied = state.last_applied,
                        issued = state.issued
                    );
                }
                debug!(message = "lookup.complete", request = self.request, items = items.len());
                state.suggestions = items;
                state.highlighted = None;
                state.last_applied = state.last_applied.max(self.request);
            }
            Err(err) => {
                debug!(message = "lookup.failed", request = self.request, error = %err);
            }
        }
    }
}

/// Suggestion list state around an external [`SuggestionSource`].
pub struct AutoComplete<T> {
    state: Rc<RefCell<LookupState<T>>>,
    source: Box<dyn SuggestionSource<T>>,
}

impl<T: fmt::Debug> fmt::Debug for AutoComplete<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("AutoComplete")
            .field("text", &state.text)
            .field("loading", &state.loading)
            .field("suggestions", &state.suggestions)
            .field("highlighted", &state.highlighted)
            .field("selected", &state.selected)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> AutoComplete<T> {
    pub fn new(source: impl SuggestionSource<T> + 'static) -> Self {
        Self {
            state: Rc::default(),
            source: Box::new(source),
        }
    }

    /// Record new search text and query the source.
    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        let request = {
            let mut state = self.state.borrow_mut();
            state.issued += 1;
            state.loading = true;
            state.highlighted = None;
            state.text.clone_from(&text);
            state.issued
        };
        debug!(message = "lookup.query", request, len = text.len());
        // No borrow is held here: the source may complete synchronously.
        self.source.query(
            &text,
            LookupReply {
                request,
                state: Rc::downgrade(&self.state),
            },
        );
    }

    /// Move the highlight and return the new highlighted index.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let mut state = self.state.borrow_mut();
        let len = state.suggestions.len();
        state.highlighted = match (direction, state.highlighted) {
            _ if len == 0 => None,
            (Direction::Down, None) => Some(0),
            (Direction::Down, Some(i)) if i + 1 < len => Some(i + 1),
            (Direction::Down, Some(_)) => None,
            (Direction::Up, None) => Some(len - 1),
            (Direction::Up, Some(0)) => None,
            (Direction::Up, Some(i)) => Some(i.min(len) - 1),
        };
        state.highlighted
    }

    /// Pick suggestion `index`. `None` when there is no such suggestion.
    pub fn select(&mut self, index: usize) -> Option<Outcome<Option<T>>> {
        let mut state = self.state.borrow_mut();
        let item = state.suggestions.get(index)?.clone();
        state.selected = Some(item.clone());
        state.suggestions.clear();
        state.highlighted = None;
        Some(Outcome::Success(Some(item)))
    }

    /// Pick the highlighted suggestion, if any.
    pub fn confirm(&mut self) -> Option<Outcome<Option<T>>> {
        let index = self.state.borrow().highlighted?;
        self.select(index)
    }

    /// Reset text, suggestions, and selection.
    pub fn clear(&mut self) -> Outcome<Option<T>> {
        let mut state = self.state.borrow_mut();
        state.text.clear();
        state.suggestions.clear();
        state.highlighted = None;
        state.selected = None;
        state.loading = false;
        Outcome::Success(None)
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn suggestions(&self) -> Vec<T> {
        self.state.borrow().suggestions.clone()
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.state.borrow().highlighted
    }

    #[must_use]
    pub fn selected(&self) -> Option<T> {
        self.state.borrow().selected.clone()
    }
}

/// An [`AutoComplete`] whose selection is stored in a session field.
///
/// Selecting writes the item; clearing writes [`FieldValue::Null`].
pub struct AutoCompleteField<T> {
    name: String,
    session: WeakSession,
    lookup: AutoComplete<T>,
}

impl<T: fmt::Debug> fmt::Debug for AutoCompleteField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoCompleteField")
            .field("name", &self.name)
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Into<FieldValue> + 'static> AutoCompleteField<T> {
    pub fn new(
        session: &FormSession,
        name: impl Into<String>,
        source: impl SuggestionSource<T> + 'static,
    ) -> Self {
        let name = name.into();
        let _ = session.cell(&name);
        Self {
            name,
            session: session.handle(),
            lookup: AutoComplete::new(source),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn lookup(&self) -> &AutoComplete<T> {
        &self.lookup
    }

    pub fn input(&mut self, text: impl Into<String>) -> Result<()> {
        self.session.cell(&self.name)?;
        self.lookup.input(text);
        Ok(())
    }

    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        self.lookup.navigate(direction)
    }

    pub fn select(&mut self, index: usize) -> Result<Option<Outcome<Option<T>>>> {
        let cell = self.session.cell(&self.name)?;
        let outcome = self.lookup.select(index);
        if let Some(Outcome::Success(Some(item))) = &outcome {
            cell.set(item.clone().into());
        }
        Ok(outcome)
    }

    pub fn confirm(&mut self) -> Result<Option<Outcome<Option<T>>>> {
        match self.lookup.highlighted() {
            Some(index) => self.select(index),
            None => Ok(None),
        }
    }

    pub fn clear(&mut self) -> Result<Outcome<Option<T>>> {
        let cell = self.session.cell(&self.name)?;
        let outcome = self.lookup.clear();
        cell.set(FieldValue::Null);
        Ok(outcome)
    }
}
