//! JSON form definitions and mounting them into a session.
//!
//! ```json
//! {
//!   "name": "contact",
//!   "fields": [
//!     { "name": "phone", "kind": "phone", "steps": ["required"] },
//!     { "name": "born", "kind": "date", "past": true },
//!     { "name": "nick", "steps": ["min-length:2", "max-length:12"] },
//!     { "name": "agree", "kind": "check" }
//!   ]
//! }
//! ```

use std::path::Path;

use ahash::AHashSet;
use chrono::NaiveDateTime;
use fieldkit_core::{Diagnostic, FieldValue, SharedClock, XDate, XTime};
use fieldkit_validate::{Bound, DateStep, Identity, Pattern, Pipeline, Step, StepSpec, TimeStep};
use serde::{Deserialize, Serialize};

use crate::datetime::DateTimeField;
use crate::error::{FormError, Result};
use crate::field::{CheckField, Field};
use crate::session::FormSession;

/// What a field holds and which base step parses it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Phone,
    Date,
    Time,
    DateTime,
    Check,
}

impl FieldKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Check => "check",
        }
    }

    fn takes_steps(self) -> bool {
        !matches!(self, Self::DateTime | Self::Check)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDef {
    pub name: String,
    pub label: Option<String>,
    pub hint: Option<String>,
    pub kind: FieldKind,
    /// Constraint step specifiers, in declaration order.
    pub steps: Vec<String>,
    pub past: bool,
    pub future: bool,
}

impl FieldDef {
    fn bound(&self) -> Result<Bound> {
        match (self.past, self.future) {
            (true, true) => Err(FormError::ConflictingBounds {
                field: self.name.clone(),
            }),
            (true, false) => Ok(Bound::Past),
            (false, true) => Ok(Bound::Future),
            (false, false) => Ok(Bound::Any),
        }
    }

    fn pipeline<Out>(&self, base: impl Step<String, Out> + 'static) -> Result<Pipeline<String, Out>> {
        let mut pipeline = Pipeline::new(base);
        if self.kind == FieldKind::Phone {
            pipeline.push(Box::new(Pattern::phone()));
        }
        for spec in StepSpec::parse_all(&self.steps)? {
            pipeline.push(spec.build());
        }
        Ok(pipeline)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDef {
    pub name: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl FormDef {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build every field and register it in `session`, in definition order.
    ///
    /// Temporal fields compare against `clock`. Every definition is checked
    /// before the first cell is registered, so a failed mount leaves the
    /// session untouched.
    pub fn mount(&self, session: &FormSession, clock: &SharedClock) -> Result<MountedForm> {
        let plans = self.plan(clock)?;
        let fields = self
            .fields
            .iter()
            .zip(plans)
            .map(|(def, plan)| (def.name.clone(), plan.mount(session, def, clock)))
            .collect();
        Ok(MountedForm { fields })
    }

    fn plan(&self, clock: &SharedClock) -> Result<Vec<Plan>> {
        let mut seen = AHashSet::new();
        let mut plans = Vec::with_capacity(self.fields.len());
        for def in &self.fields {
            if !seen.insert(def.name.as_str()) {
                return Err(FormError::DuplicateField {
                    name: def.name.clone(),
                });
            }
            if !def.kind.takes_steps() && !def.steps.is_empty() {
                return Err(FormError::StepsNotSupported {
                    field: def.name.clone(),
                    kind: def.kind.name(),
                });
            }
            let bound = def.bound()?;
            plans.push(match def.kind {
                FieldKind::Text => Plan::Text(def.pipeline(Identity)?),
                FieldKind::Phone => Plan::Phone(def.pipeline(Identity)?),
                FieldKind::Date => {
                    let step = DateStep::new().bound(bound).with_clock(clock.clone());
                    Plan::Date(def.pipeline(step)?)
                }
                FieldKind::Time => {
                    let step = TimeStep::new().bound(bound).with_clock(clock.clone());
                    Plan::Time(def.pipeline(step)?)
                }
                FieldKind::DateTime => Plan::DateTime(bound),
                FieldKind::Check => Plan::Check,
            });
        }
        Ok(plans)
    }
}

/// A checked field definition that has not touched the session yet.
enum Plan {
    Text(Pipeline<String, String>),
    Phone(Pipeline<String, String>),
    Date(Pipeline<String, XDate>),
    Time(Pipeline<String, XTime>),
    DateTime(Bound),
    Check,
}

impl Plan {
    fn mount(self, session: &FormSession, def: &FieldDef, clock: &SharedClock) -> MountedField {
        match self {
            Self::Text(pipeline) => MountedField::Text(labelled(Field::new(session, &def.name, pipeline), def)),
            Self::Phone(pipeline) => MountedField::Phone(labelled(Field::new(session, &def.name, pipeline), def)),
            Self::Date(pipeline) => MountedField::Date(labelled(Field::new(session, &def.name, pipeline), def)),
            Self::Time(pipeline) => MountedField::Time(labelled(Field::new(session, &def.name, pipeline), def)),
            Self::DateTime(bound) => {
                let mut field = DateTimeField::mount(session, &def.name, bound, clock.clone(), Identity);
                if let Some(label) = &def.label {
                    field = field.label(label);
                }
                MountedField::DateTime(field)
            }
            Self::Check => {
                let mut field = CheckField::new(session, &def.name);
                if let Some(label) = &def.label {
                    field = field.label(label);
                }
                MountedField::Check(field)
            }
        }
    }
}

fn labelled<T: Clone + Into<FieldValue>>(mut field: Field<T>, def: &FieldDef) -> Field<T> {
    if let Some(label) = &def.label {
        field = field.label(label);
    }
    if let Some(hint) = &def.hint {
        field = field.hint(hint);
    }
    field
}

/// A field built from a [`FieldDef`].
#[derive(Debug)]
pub enum MountedField {
    Text(Field<String>),
    Phone(Field<String>),
    Date(Field<XDate>),
    Time(Field<XTime>),
    DateTime(DateTimeField<NaiveDateTime>),
    Check(CheckField),
}

impl MountedField {
    /// Feed raw text to the field and return the resulting diagnostics.
    ///
    /// Date-time fields take `"<date> <time>"`. Check fields take
    /// `true`/`false`, `on`/`off`, `yes`/`no` or `1`/`0`.
    pub fn input(&mut self, name: &str, raw: &str) -> Result<Vec<Diagnostic>> {
        match self {
            Self::Text(field) | Self::Phone(field) => Ok(field.input(raw)?.diagnostics().to_vec()),
            Self::Date(field) => Ok(field.input(raw)?.diagnostics().to_vec()),
            Self::Time(field) => Ok(field.input(raw)?.diagnostics().to_vec()),
            Self::DateTime(field) => {
                let (date, time) = raw.trim().split_once(char::is_whitespace).unwrap_or((raw, ""));
                let result = field.input(date.trim(), time.trim())?;
                Ok(result.map(|o| o.diagnostics().to_vec()).unwrap_or_default())
            }
            Self::Check(field) => {
                let checked = parse_toggle(raw).ok_or_else(|| FormError::InvalidToggle {
                    field: name.to_owned(),
                    value: raw.to_owned(),
                })?;
                field.set_checked(checked)?;
                Ok(Vec::new())
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Phone(_) => FieldKind::Phone,
            Self::Date(_) => FieldKind::Date,
            Self::Time(_) => FieldKind::Time,
            Self::DateTime(_) => FieldKind::DateTime,
            Self::Check(_) => FieldKind::Check,
        }
    }
}

fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Every field of a mounted [`FormDef`], addressable by name.
#[derive(Debug)]
pub struct MountedForm {
    fields: Vec<(String, MountedField)>,
}

impl MountedForm {
    /// Feed raw text to the field called `name`.
    pub fn input(&mut self, name: &str, raw: &str) -> Result<Vec<Diagnostic>> {
        let field = self
            .fields
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
            .ok_or_else(|| FormError::UnknownField {
                name: name.to_owned(),
            })?;
        field.input(name, raw)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&MountedField> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fieldkit_core::FixedClock;
    use fieldkit_validate::ConfigError;
    use fieldkit_validate::date::{DATE_NOT_PAST, day_too_large};
    use fieldkit_validate::pattern::PATTERN_MISMATCH;
    use fieldkit_validate::spec::{REQUIRED, too_short};
    use fieldkit_validate::time::{HOUR_TOO_LARGE, MINUTE_TOO_LARGE};

    const CONTACT: &str = r#"{
        "name": "contact",
        "fields": [
            { "name": "phone", "label": "Phone", "kind": "phone", "steps": ["required"] },
            { "name": "born", "kind": "date", "past": true },
            { "name": "nick", "steps": ["min-length:2", "max-length:12"] },
            { "name": "meeting", "kind": "datetime", "future": true },
            { "name": "agree", "kind": "check" }
        ]
    }"#;

    fn clock() -> SharedClock {
        FixedClock::shared(
            NaiveDate::from_ymd_opt(2025, 3, 19)
                .and_then(|d| d.and_hms_opt(10, 15, 0))
                .expect("valid instant"),
        )
    }

    fn messages(diags: &[Diagnostic]) -> Vec<String> {
        diags.iter().map(|d| d.message().to_owned()).collect()
    }

    #[test]
    fn parses_definition_with_defaults() {
        let def = FormDef::from_json(CONTACT).expect("valid definition");
        assert_eq!(def.name.as_deref(), Some("contact"));
        assert_eq!(def.fields.len(), 5);
        assert_eq!(def.fields[2].kind, FieldKind::Text);
        assert!(def.fields[1].past);
        assert!(!def.fields[1].future);
        assert_eq!(def.fields[4].kind, FieldKind::Check);
    }

    #[test]
    fn mount_registers_in_order() {
        let session = FormSession::new();
        let def = FormDef::from_json(CONTACT).expect("valid definition");
        let form = def.mount(&session, &clock()).expect("mountable");
        assert_eq!(session.field_names(), ["phone", "born", "nick", "meeting", "agree"]);
        assert_eq!(form.names().collect::<Vec<_>>(), session.field_names());
        assert_eq!(form.field("meeting").map(MountedField::kind), Some(FieldKind::DateTime));
        assert_eq!(form.field("phone").map(MountedField::kind), Some(FieldKind::Phone));
        assert_eq!(form.field("nick").map(MountedField::kind), Some(FieldKind::Text));
    }

    #[test]
    fn input_routes_to_each_kind() {
        let session = FormSession::new();
        let def = FormDef::from_json(CONTACT).expect("valid definition");
        let mut form = def.mount(&session, &clock()).expect("mountable");

        assert_eq!(
            messages(&form.input("phone", "").expect("known field")),
            [REQUIRED, PATTERN_MISMATCH]
        );
        assert!(form.input("phone", "0499123456").expect("known field").is_empty());
        assert_eq!(
            messages(&form.input("born", "31/02/2024").expect("known field")),
            [day_too_large(29)]
        );
        assert_eq!(
            messages(&form.input("born", "01/01/2030").expect("known field")),
            [DATE_NOT_PAST]
        );
        assert_eq!(
            messages(&form.input("nick", "a").expect("known field")),
            [too_short(2)]
        );
        assert!(form.input("meeting", "20/03/2025 09:00").expect("known field").is_empty());
        assert!(form.input("agree", "on").expect("known field").is_empty());

        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.value("phone").and_then(FieldValue::as_text),
            Some("0499123456")
        );
        assert_eq!(snapshot.value("born"), None);
        assert_eq!(snapshot.value("agree"), Some(&FieldValue::Bool(true)));
        assert!(snapshot.value("meeting").and_then(FieldValue::as_datetime).is_some());
    }

    #[test]
    fn rejected_datetime_keeps_the_last_accepted_moment() {
        let session = FormSession::new();
        let def = FormDef::from_json(r#"{"fields":[{"name":"meeting","kind":"datetime"}]}"#)
            .expect("valid definition");
        let mut form = def.mount(&session, &clock()).expect("mountable");
        let writes = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&writes);
        let _sub = session.field("meeting").subscribe(move || counter.set(counter.get() + 1));

        assert!(form.input("meeting", "20/03/2025 09:00").expect("known field").is_empty());
        assert_eq!(writes.get(), 1);
        assert_eq!(
            messages(&form.input("meeting", "21/03/2025 99:99").expect("known field")),
            [HOUR_TOO_LARGE, MINUTE_TOO_LARGE]
        );
        assert_eq!(writes.get(), 1);

        let accepted = NaiveDate::from_ymd_opt(2025, 3, 20).and_then(|d| d.and_hms_opt(9, 0, 0));
        assert_eq!(
            session.snapshot().value("meeting").and_then(FieldValue::as_datetime),
            accepted
        );
    }

    #[test]
    fn failed_mount_registers_nothing() {
        let session = FormSession::new();
        let clock = clock();
        for json in [
            r#"{"fields":[{"name":"a"},{"name":"b","kind":"date"},{"name":"c","steps":["zipcode"]}]}"#,
            r#"{"fields":[{"name":"a"},{"name":"b","kind":"time","past":true,"future":true}]}"#,
            r#"{"fields":[{"name":"a"},{"name":"b","kind":"check"},{"name":"a"}]}"#,
        ] {
            let def = FormDef::from_json(json).expect("valid JSON");
            assert!(def.mount(&session, &clock).is_err(), "{json}");
            assert!(session.field_names().is_empty(), "{json}");
        }
    }

    #[test]
    fn invalid_toggle_and_unknown_field() {
        let session = FormSession::new();
        let def = FormDef::from_json(CONTACT).expect("valid definition");
        let mut form = def.mount(&session, &clock()).expect("mountable");
        assert!(matches!(
            form.input("agree", "maybe"),
            Err(FormError::InvalidToggle { .. })
        ));
        assert!(matches!(
            form.input("missing", "x"),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn configuration_errors() {
        let session = FormSession::new();
        let clock = clock();
        let mount = |json: &str| {
            FormDef::from_json(json)
                .and_then(|def| def.mount(&session, &clock))
                .map(|_| ())
        };
        assert!(matches!(
            mount(r#"{"fields":[{"name":"a"},{"name":"a"}]}"#),
            Err(FormError::DuplicateField { .. })
        ));
        assert!(matches!(
            mount(r#"{"fields":[{"name":"a","kind":"check","steps":["required"]}]}"#),
            Err(FormError::StepsNotSupported { kind: "check", .. })
        ));
        assert!(matches!(
            mount(r#"{"fields":[{"name":"a","kind":"date","past":true,"future":true}]}"#),
            Err(FormError::ConflictingBounds { .. })
        ));
        assert!(matches!(
            mount(r#"{"fields":[{"name":"a","steps":["zipcode"]}]}"#),
            Err(FormError::Config(ConfigError::UnknownStep { .. }))
        ));
        assert!(matches!(
            mount(r#"{"fields":[{"name":"a","kind":"colour"}]}"#),
            Err(FormError::Json(_))
        ));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("form.json");
        std::fs::write(&path, CONTACT).expect("write definition");
        let def = FormDef::from_path(&path).expect("valid definition");
        assert_eq!(def.fields.len(), 5);
        assert!(matches!(
            FormDef::from_path(dir.path().join("missing.json")),
            Err(FormError::Io(_))
        ));
    }
}
