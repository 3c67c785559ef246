//! Ready-made form and validator for the "send activity" dialog.
//!
//! Three steps: pick recipients, describe the activity, set the deadline.

use crate::category::StudentRecipient;
use crate::options::{WizardError, WizardOptions};
use crate::store::{create_send_modal_store, WizardStore};
use crate::validation::{FieldErrors, FormData};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RECIPIENT_STEP: usize = 1;
pub const DETAILS_STEP: usize = 2;
pub const DEADLINE_STEP: usize = 3;
pub const MAX_STEPS: usize = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Answers of the send-activity dialog.  Every field is optional until
/// validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendActivityForm {
    pub title: Option<String>,
    pub notification: Option<String>,
    pub students: Option<Vec<StudentRecipient>>,
    pub start_date: Option<String>,
    pub final_date: Option<String>,
}

impl SendActivityForm {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.final_date = Some(end.into());
        self
    }
}

impl FormData for SendActivityForm {
    /// Same shape; `Some` fields overwrite.
    type Patch = SendActivityForm;

    fn merge(&mut self, patch: Self::Patch) {
        let SendActivityForm {
            title,
            notification,
            students,
            start_date,
            final_date,
        } = patch;
        if title.is_some() {
            self.title = title;
        }
        if notification.is_some() {
            self.notification = notification;
        }
        if students.is_some() {
            self.students = students;
        }
        if start_date.is_some() {
            self.start_date = start_date;
        }
        if final_date.is_some() {
            self.final_date = final_date;
        }
    }

    fn students(&self) -> Option<&[StudentRecipient]> {
        self.students.as_deref()
    }

    fn set_students(&mut self, students: Vec<StudentRecipient>) {
        self.students = Some(students);
    }
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?.trim(), DATE_FORMAT).ok()
}

/// Recipients present.
pub fn validate_recipients(form: &SendActivityForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.students().is_none_or(<[StudentRecipient]>::is_empty) {
        errors.insert("students", "Select at least one student");
    }
    errors
}

/// Non-blank title.
pub fn validate_details(form: &SendActivityForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if blank(form.title.as_deref()) {
        errors.insert("title", "Title is required");
    }
    errors
}

/// Both dates present, well formed, and in order.
pub fn validate_deadline(form: &SendActivityForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let start = form.start_date.as_deref();
    let end = form.final_date.as_deref();

    if blank(start) {
        errors.insert("startDate", "Start date is required");
    } else if parse_date(start).is_none() {
        errors.insert("startDate", "Use the YYYY-MM-DD format");
    }
    if blank(end) {
        errors.insert("finalDate", "Final date is required");
    } else if parse_date(end).is_none() {
        errors.insert("finalDate", "Use the YYYY-MM-DD format");
    }

    if let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) {
        if end < start {
            errors.insert("finalDate", "Final date must not be before the start date");
        }
    }
    errors
}

/// Step validator for the three-step dialog.
pub fn validate_send_activity_step(step: usize, form: &SendActivityForm) -> FieldErrors {
    match step {
        RECIPIENT_STEP => validate_recipients(form),
        DETAILS_STEP => validate_details(form),
        DEADLINE_STEP => validate_deadline(form),
        _ => FieldErrors::new(),
    }
}

pub fn send_activity_options() -> WizardOptions {
    WizardOptions {
        max_steps: MAX_STEPS,
        recipient_step: RECIPIENT_STEP,
        ..WizardOptions::default()
    }
}

/// Store for the send-activity dialog with the stock filter and extractor.
pub fn create_send_activity_store() -> Result<WizardStore<SendActivityForm>, WizardError> {
    create_send_modal_store(
        send_activity_options(),
        SendActivityForm::default(),
        validate_send_activity_step,
    )
}
