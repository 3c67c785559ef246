//! Step validation contract.
//!
//! The wizard never interprets form fields.  It hands the form to a
//! caller-supplied [`StepValidator`] and treats an empty [`ErrorMap`] as
//! "step valid".

use crate::category::StudentRecipient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Accumulated answers of a wizard.
///
/// `Patch` is the partial update accepted by
/// [`WizardStore::set_form_data`](crate::store::WizardStore::set_form_data);
/// [`merge`](FormData::merge) applies it shallowly, patch values winning.
pub trait FormData: Clone + fmt::Debug + Send + 'static {
    type Patch: Clone + fmt::Debug + Send + 'static;

    fn merge(&mut self, patch: Self::Patch);

    /// Recipients currently folded into the form, if any.
    fn students(&self) -> Option<&[StudentRecipient]>;

    fn set_students(&mut self, students: Vec<StudentRecipient>);
}

/// Per-step validation output.
pub trait ErrorMap: Default + Clone + fmt::Debug + Send + 'static {
    /// `true` means "valid".
    fn is_empty(&self) -> bool;

    /// Fold `other` into `self`; on key collisions `other` wins.
    fn union(&mut self, other: Self);
}

/// Validates one step of a form.
///
/// Must be pure.  A panicking validator is a caller bug and is not caught.
pub trait StepValidator<F, E> {
    fn validate(&self, step: usize, form: &F) -> E;
}

impl<F, E, T> StepValidator<F, E> for T
where
    T: Fn(usize, &F) -> E,
{
    fn validate(&self, step: usize, form: &F) -> E {
        self(step, form)
    }
}

/// Field name to message map, the stock [`ErrorMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](FieldErrors::insert).
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(field, message);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ErrorMap for FieldErrors {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn union(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl<K, V> FromIterator<(K, V)> for FieldErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
