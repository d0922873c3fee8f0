//! The capability a rendered input uses to reach the form's values.
//!
//! A [`FieldRegistration`] is handed out by the form once per field and
//! shared with the [`FieldBinding`](crate::binding::FieldBinding) that
//! renders it. Every value the input produces flows back through
//! [`Registration::report_change`], which updates the form's values and
//! fires the form's change signal.

use std::sync::{Arc, RwLock};

use regform_signals::Signal;

use crate::fields::{Field, FieldValue};
use crate::values::{RawValues, REDACTED};

/// Field identity, current value, and change reporting for one input.
pub trait Registration: Send + Sync {
    /// Returns the field this registration controls.
    fn field(&self) -> Field;

    /// Returns the field's current value, if one has been reported.
    fn current_value(&self) -> Option<FieldValue>;

    /// Records a new value for the field.
    fn report_change(&self, value: FieldValue);
}

/// Payload of the form's value-change signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// The field whose value changed.
    pub field: Field,
    /// The new value.
    pub value: FieldValue,
}

/// Values and change signal shared by a form and its registrations.
#[derive(Debug, Default)]
pub(crate) struct FormStore {
    values: RwLock<RawValues>,
    pub(crate) changed: Signal<FieldChange>,
}

impl FormStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current values.
    pub(crate) fn snapshot(&self) -> RawValues {
        self.values.read().expect("form values lock poisoned").clone()
    }

    pub(crate) fn get(&self, field: Field) -> Option<FieldValue> {
        self.values
            .read()
            .expect("form values lock poisoned")
            .get(field)
            .cloned()
    }

    pub(crate) fn clear(&self) {
        self.values.write().expect("form values lock poisoned").clear();
    }

    /// Stores `value` and notifies watchers. The lock is released before
    /// receivers run, so they may read the form.
    pub(crate) fn set(&self, field: Field, value: FieldValue) {
        {
            let mut values = self.values.write().expect("form values lock poisoned");
            values.set(field, value.clone());
        }

        if field.is_secret() {
            tracing::trace!(field = %field, value = REDACTED, "Field changed");
        } else {
            tracing::trace!(field = %field, value = ?value, "Field changed");
        }

        let change = FieldChange { field, value };
        self.changed.send(&change);
    }
}

/// The registration the form hands out for one field.
///
/// Cloning is cheap; every clone reports into the same form.
#[derive(Debug, Clone)]
pub struct FieldRegistration {
    field: Field,
    store: Arc<FormStore>,
}

impl FieldRegistration {
    pub(crate) fn new(field: Field, store: Arc<FormStore>) -> Self {
        Self { field, store }
    }

    /// Returns the field name, which doubles as the input's `name` attribute.
    pub const fn name(&self) -> &'static str {
        self.field.name()
    }
}

impl Registration for FieldRegistration {
    fn field(&self) -> Field {
        self.field
    }

    fn current_value(&self) -> Option<FieldValue> {
        self.store.get(self.field)
    }

    fn report_change(&self, value: FieldValue) {
        self.store.set(self.field, value);
    }
}
