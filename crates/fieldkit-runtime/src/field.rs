//! Field wrappers: raw input → pipeline → outcome → session cell.

use std::fmt;

use fieldkit_core::{Diagnostic, FieldValue, Outcome};
use fieldkit_validate::Pipeline;
use tracing::debug;

use crate::error::Result;
use crate::session::{FormSession, WeakSession};

type ChangeObserver<T> = Box<dyn FnMut(&Outcome<T>)>;

/// A validated field bound to one cell of a [`FormSession`].
///
/// Successful input writes the produced value to the cell and clears the
/// field's diagnostics. Rejected input keeps the previous cell value and
/// records the diagnostics for display next to the field.
pub struct Field<T> {
    name: String,
    label: Option<String>,
    hint: Option<String>,
    pipeline: Pipeline<String, T>,
    session: WeakSession,
    diagnostics: Vec<Diagnostic>,
    on_change: Option<ChangeObserver<T>>,
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("diagnostics", &self.diagnostics)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Into<FieldValue>> Field<T> {
    /// Mount a field named `name` in `session`, registering its cell.
    pub fn new(session: &FormSession, name: impl Into<String>, pipeline: Pipeline<String, T>) -> Self {
        let name = name.into();
        let _ = session.cell(&name);
        Self {
            name,
            label: None,
            hint: None,
            pipeline,
            session: session.handle(),
            diagnostics: Vec::new(),
            on_change: None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Observe every outcome this field produces.
    #[must_use]
    pub fn on_change(mut self, observer: impl FnMut(&Outcome<T>) + 'static) -> Self {
        self.on_change = Some(Box::new(observer));
        self
    }

    /// Validate `raw` and, on success, store the value.
    pub fn input(&mut self, raw: impl Into<String>) -> Result<Outcome<T>> {
        let cell = self.session.cell(&self.name)?;
        let outcome = self.pipeline.validate(raw.into());
        match &outcome {
            Outcome::Success(value) => {
                self.diagnostics.clear();
                cell.set(value.clone().into());
            }
            Outcome::Failure(diagnostics) => self.diagnostics.clone_from(diagnostics),
        }
        debug!(
            message = "field.input",
            field = %self.name,
            ok = outcome.is_success(),
            diagnostics = self.diagnostics.len()
        );
        if let Some(observer) = self.on_change.as_mut() {
            observer(&outcome);
        }
        Ok(outcome)
    }

    /// Value currently stored for this field.
    pub fn value(&self) -> Result<Option<FieldValue>> {
        Ok(self.session.cell(&self.name)?.get())
    }
}

impl<T> Field<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Diagnostics from the latest rejected input.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// A boolean field. Every toggle writes straight to the cell.
#[derive(Debug)]
pub struct CheckField {
    name: String,
    label: Option<String>,
    session: WeakSession,
    checked: bool,
}

impl CheckField {
    /// Mount an unchecked box; the cell stays empty until the first write.
    pub fn new(session: &FormSession, name: impl Into<String>) -> Self {
        let name = name.into();
        let _ = session.cell(&name);
        Self {
            name,
            label: None,
            session: session.handle(),
            checked: false,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) -> Result<()> {
        let cell = self.session.cell(&self.name)?;
        self.checked = checked;
        cell.set(FieldValue::Bool(checked));
        debug!(message = "field.toggle", field = %self.name, checked);
        Ok(())
    }

    /// Flip the box and return the new state.
    pub fn toggle(&mut self) -> Result<bool> {
        self.set_checked(!self.checked)?;
        Ok(self.checked)
    }
}
