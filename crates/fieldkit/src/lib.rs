#![forbid(unsafe_code)]

//! fieldkit public facade crate.
//!
//! ```
//! use fieldkit::prelude::*;
//!
//! let session = FormSession::new();
//! let mut phone = Field::new(&session, "phone", Pipeline::new(identity()).with(Pattern::phone()));
//! assert!(phone.input("0499123456").unwrap().is_success());
//! assert_eq!(session.snapshot().names(), ["phone"]);
//! ```

pub mod prelude {
    pub use fieldkit_core as core;
    #[cfg(feature = "runtime")]
    pub use fieldkit_runtime as runtime;
    pub use fieldkit_validate as validate;

    pub use fieldkit_core::{
        Clock, Diagnostic, FieldValue, FixedClock, Outcome, SharedClock, SystemClock, XDate, XTime,
    };
    #[cfg(feature = "runtime")]
    pub use fieldkit_runtime::{
        AutoComplete, AutoCompleteField, CheckField, DateTimeField, Derived, Direction, Field,
        FieldAccess, FormDef, FormError, FormSession, LookupError, LookupReply, ReactiveCell,
        Snapshot, Subscription, SuggestionSource,
    };
    pub use fieldkit_validate::{
        Bound, ConfigError, DateStep, Pattern, Pipeline, Step, StepOutput, StepSpec, TimeStep,
        compose, from_fn, identity,
    };
}
