//! Form state shared by every screen that submits data.
//!
//! A form moves `Idle -> Submitting -> Succeeded | Failed`. While it is
//! submitting a second submit is refused, so a double click sends one request.

use std::collections::BTreeSet;

use crate::core::error::ApiResult;
use crate::utils::validation::FormErrors;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Carries the message for the form-level alert.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FormState<T> {
    initial: T,
    pub values: T,
    pub errors: FormErrors,
    pub touched: BTreeSet<String>,
    pub phase: FormPhase,
}

impl<T: Clone> FormState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            values: initial.clone(),
            initial,
            errors: FormErrors::new(),
            touched: BTreeSet::new(),
            phase: FormPhase::Idle,
        }
    }

    /// Edit one field. Its previous error is cleared.
    pub fn change(&mut self, field: &str, edit: impl FnOnce(&mut T)) {
        edit(&mut self.values);
        self.errors.remove(field);
    }

    /// Mark a field as visited and show its current error, if any.
    pub fn touch(&mut self, field: &str, validate: impl Fn(&T) -> FormErrors) {
        self.touched.insert(field.to_string());
        match validate(&self.values).remove(field) {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    /// Validate and enter `Submitting`. Returns the values to send, or
    /// `None` when the form is invalid or already submitting.
    pub fn begin_submit(&mut self, validate: impl Fn(&T) -> FormErrors) -> Option<T> {
        if self.is_submitting() {
            tracing::debug!("Ignoring submit while a request is in flight");
            return None;
        }
        let errors = validate(&self.values);
        self.touched.extend(errors.keys().cloned());
        self.errors = errors;
        if !self.errors.is_empty() {
            self.phase = FormPhase::Idle;
            return None;
        }
        self.phase = FormPhase::Submitting;
        Some(self.values.clone())
    }

    /// Record the outcome of the request started by [`Self::begin_submit`].
    /// Server-side field messages are shown next to their fields.
    pub fn finish<R>(&mut self, outcome: &ApiResult<R>) {
        match outcome {
            Ok(_) => self.phase = FormPhase::Succeeded,
            Err(err) => {
                for (field, message) in err.field_errors() {
                    self.touched.insert(field.clone());
                    self.errors.insert(field.clone(), message.clone());
                }
                self.phase = FormPhase::Failed(err.user_message());
            }
        }
    }

    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
        self.phase = FormPhase::Idle;
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error to render under `field`; hidden until the field is touched.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.touched.contains(field) {
            self.errors.get(field).map(String::as_str)
        } else {
            None
        }
    }
}
