//! Multi-step "send" wizard engine for the **sendwise** workspace.
//!
//! A send dialog (send a lesson, send an activity) walks the user through a
//! fixed number of steps, one of which picks recipients through a cascade of
//! categories.  This crate provides the pieces behind such a dialog:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`category`] | Items, categories, eligibility filters and student extraction |
//! | [`auto_select`] | Chained auto-selection of single-option categories |
//! | [`validation`] | Step validation contract and the stock [`FieldErrors`] map |
//! | [`options`] | [`WizardOptions`] and construction errors |
//! | [`store`] | [`WizardStore`], the navigation / validation / recipient-sync state machine |
//! | [`activity`] | Ready-made form and validator for the send-activity dialog |
//!
//! The store implements [`sendwise_core::Component`], so a UI layer can drive
//! it with [`store::Message`]s and observe the notifications it returns.

pub mod activity;
pub mod auto_select;
pub mod category;
pub mod options;
pub mod store;
pub mod validation;

pub use auto_select::{apply_chained_auto_selection, apply_chained_auto_selection_with};
pub use category::{
    CategoryConfig, CategoryFilter, EligibilityFilter, FieldExtractor, Item, StudentExtractor,
    StudentRecipient, UpstreamFilter,
};
pub use options::{WizardError, WizardOptions};
pub use store::{create_send_modal_store, Message, WizardState, WizardStore};
pub use validation::{ErrorMap, FieldErrors, FormData, StepValidator};
