//! Multi-step send wizard store.
//!
//! The store owns the form answers, the current step, the set of completed
//! steps, the errors of the latest validation and the recipient categories
//! last reported by the picker.  Steps are 1-indexed.  Forward navigation is
//! gated by the caller's [`StepValidator`]; on the recipient step the
//! students derived from the categories are folded into the form before it is
//! validated, so a step is never validated against a stale recipient list.
//!
//! # Example
//!
//! ```rust,ignore
//! use sendwise_wizard::{create_send_modal_store, FieldErrors, WizardOptions};
//!
//! let mut store = create_send_modal_store(
//!     WizardOptions { max_steps: 2, recipient_step: 1, ..WizardOptions::default() },
//!     MyForm::default(),
//!     |step: usize, form: &MyForm| validate(step, form),
//! )?;
//!
//! store.set_categories(picker_categories);
//! if store.next_step() {
//!     // now on step 2
//! }
//! ```

use crate::auto_select::apply_chained_auto_selection_with;
use crate::category::{
    CategoryConfig, EligibilityFilter, FieldExtractor, StudentExtractor, UpstreamFilter,
};
use crate::options::{WizardError, WizardOptions};
use crate::validation::{ErrorMap, FieldErrors, FormData, StepValidator};
use sendwise_core::{Command, Component};
use std::collections::BTreeSet;
use tracing::debug;

/// Snapshot of everything the store tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState<F, E> {
    pub form_data: F,
    /// `1 <= current_step <= max_steps`.
    pub current_step: usize,
    /// Steps left through a successful [`WizardStore::next_step`].
    pub completed_steps: BTreeSet<usize>,
    /// Errors of the latest validation only.
    pub errors: E,
    pub categories: Vec<CategoryConfig>,
}

impl<F, E: Default> WizardState<F, E> {
    fn new(form_data: F) -> Self {
        Self {
            form_data,
            current_step: 1,
            completed_steps: BTreeSet::new(),
            errors: E::default(),
            categories: Vec::new(),
        }
    }
}

/// Messages for the wizard store.
///
/// The first group are requests, one per store operation.  The second group
/// are notifications returned from [`Component::update`] for the owner to
/// observe; fed back into `update` they do nothing.
#[derive(Debug, Clone)]
pub enum Message<F: FormData, E: ErrorMap> {
    GoToStep(usize),
    NextStep,
    PreviousStep,
    SetErrors(E),
    SetFormData(F::Patch),
    SetCategories(Vec<CategoryConfig>),
    /// Run chained auto-selection, then behave like `SetCategories`.
    AutoSelectCategories(Vec<CategoryConfig>),
    ValidateCurrentStep,
    ValidateAllSteps,
    Reset,

    /// The current step moved.
    StepChanged { from: usize, to: usize },
    /// A single step was validated.
    Validated { step: usize, valid: bool },
    /// Every step was validated.
    AllValidated(bool),
    ErrorsChanged,
    FormDataChanged,
    /// Categories were replaced and students re-derived.
    CategoriesChanged,
    WasReset,
}

/// Build a wizard store.
///
/// Uses [`FieldExtractor`] to derive students and [`UpstreamFilter`] for
/// auto-selection; swap them with [`WizardStore::with_extractor`] and
/// [`WizardStore::with_filter`].
pub fn create_send_modal_store<F, E, V>(
    options: WizardOptions,
    initial_form_data: F,
    validate_step: V,
) -> Result<WizardStore<F, E>, WizardError>
where
    F: FormData,
    E: ErrorMap,
    V: StepValidator<F, E> + 'static,
{
    WizardStore::new(options, initial_form_data, validate_step)
}

/// Navigation / validation / recipient-sync state machine behind a send
/// dialog.  One store per open dialog; stores share nothing.
pub struct WizardStore<F: FormData, E: ErrorMap = FieldErrors> {
    options: WizardOptions,
    validator: Box<dyn StepValidator<F, E>>,
    extractor: Box<dyn StudentExtractor>,
    filter: Box<dyn EligibilityFilter>,
    initial: WizardState<F, E>,
    state: WizardState<F, E>,
}

impl<F: FormData, E: ErrorMap> WizardStore<F, E> {
    /// Create a store on step 1 with no categories.
    pub fn new<V>(
        options: WizardOptions,
        initial_form_data: F,
        validate_step: V,
    ) -> Result<Self, WizardError>
    where
        V: StepValidator<F, E> + 'static,
    {
        options.validate()?;
        let initial = WizardState::new(initial_form_data);
        Ok(Self {
            options,
            validator: Box::new(validate_step),
            extractor: Box::new(FieldExtractor::default()),
            filter: Box::new(UpstreamFilter),
            state: initial.clone(),
            initial,
        })
    }

    /// Replace the student extractor.  Re-derives the initial students when
    /// initial categories are set.
    pub fn with_extractor(mut self, extractor: impl StudentExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self.rebuild_initial();
        self
    }

    /// Replace the eligibility filter used by
    /// [`auto_select_categories`](WizardStore::auto_select_categories).
    pub fn with_filter(mut self, filter: impl EligibilityFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Start from pre-populated categories.  [`reset`](WizardStore::reset)
    /// returns to them.
    pub fn with_categories(mut self, categories: Vec<CategoryConfig>) -> Self {
        self.initial.categories = categories;
        self.rebuild_initial();
        self
    }

    fn rebuild_initial(&mut self) {
        if !self.initial.categories.is_empty() {
            let students = self.extractor.extract(&self.initial.categories);
            self.initial.form_data.set_students(students);
        }
        self.state = self.initial.clone();
    }

    // --- Accessors ---

    /// Full current state.
    pub fn state(&self) -> &WizardState<F, E> {
        &self.state
    }

    /// Form answers collected so far.
    pub fn form_data(&self) -> &F {
        &self.state.form_data
    }

    /// Active step, 1-indexed.
    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    /// Number of steps in the wizard.
    pub fn max_steps(&self) -> usize {
        self.options.max_steps
    }

    /// Step on which category selections are folded into the form.
    pub fn recipient_step(&self) -> usize {
        self.options.recipient_step
    }

    /// Steps left through a successful [`next_step`](WizardStore::next_step).
    pub fn completed_steps(&self) -> &BTreeSet<usize> {
        &self.state.completed_steps
    }

    /// Whether `step` is in [`completed_steps`](WizardStore::completed_steps).
    pub fn is_step_completed(&self, step: usize) -> bool {
        self.state.completed_steps.contains(&step)
    }

    /// Errors from the latest validation.
    pub fn errors(&self) -> &E {
        &self.state.errors
    }

    /// Categories last handed to the store.
    pub fn categories(&self) -> &[CategoryConfig] {
        &self.state.categories
    }

    /// Whether the current step is step 1.
    pub fn is_first_step(&self) -> bool {
        self.state.current_step == 1
    }

    /// Whether the current step is `max_steps`.
    pub fn is_last_step(&self) -> bool {
        self.state.current_step == self.options.max_steps
    }

    // --- Navigation ---

    /// Jump to `step`.  Out-of-range steps are ignored.  Never marks steps
    /// completed.
    pub fn go_to_step(&mut self, step: usize) {
        if !(1..=self.options.max_steps).contains(&step) {
            debug!(step, max_steps = self.options.max_steps, "ignoring out-of-range step");
            return;
        }
        debug!(from = self.state.current_step, to = step, "go to step");
        self.state.current_step = step;
        self.state.errors = E::default();
    }

    /// Validate the current step and, when valid and not on the last step,
    /// mark it completed and advance.  Returns the validity, also on the last
    /// step.
    pub fn next_step(&mut self) -> bool {
        let valid = self.validate_current_step();
        let step = self.state.current_step;
        if valid && step < self.options.max_steps {
            self.state.completed_steps.insert(step);
            self.state.current_step = step + 1;
            self.state.errors = E::default();
            debug!(from = step, to = step + 1, "next step");
        }
        valid
    }

    /// Step back and clear the errors.  No-op on step 1.
    pub fn previous_step(&mut self) {
        let step = self.state.current_step;
        if step > 1 {
            self.state.current_step = step - 1;
            self.state.errors = E::default();
            debug!(from = step, to = step - 1, "previous step");
        }
    }

    // --- Data ---

    /// Replace the errors wholesale.
    pub fn set_errors(&mut self, errors: E) {
        self.state.errors = errors;
    }

    /// Shallow-merge `patch` into the form.
    pub fn set_form_data(&mut self, patch: F::Patch) {
        self.state.form_data.merge(patch);
    }

    /// Store the picker's categories and re-derive the students from them.
    pub fn set_categories(&mut self, categories: Vec<CategoryConfig>) {
        let students = self.extractor.extract(&categories);
        debug!(categories = categories.len(), students = students.len(), "categories set");
        self.state.categories = categories;
        self.state.form_data.set_students(students);
    }

    /// Apply chained auto-selection to `categories`, then
    /// [`set_categories`](WizardStore::set_categories).
    ///
    /// The pass bound is `categories.len()` plus the configured extra passes,
    /// saturating at `usize::MAX`.
    pub fn auto_select_categories(&mut self, categories: Vec<CategoryConfig>) {
        let max_passes = categories
            .len()
            .saturating_add(self.options.auto_select_extra_passes);
        let resolved = apply_chained_auto_selection_with(&categories, &*self.filter, max_passes);
        self.set_categories(resolved);
    }

    // --- Validation ---

    fn is_recipient_sync_due(&self, step: usize) -> bool {
        step == self.options.recipient_step && !self.state.categories.is_empty()
    }

    /// Validate the current step and store its errors.
    pub fn validate_current_step(&mut self) -> bool {
        let step = self.state.current_step;
        if self.is_recipient_sync_due(step) {
            let students = self.extractor.extract(&self.state.categories);
            self.state.form_data.set_students(students);
        }
        let errors = self.validator.validate(step, &self.state.form_data);
        let valid = errors.is_empty();
        self.state.errors = errors;
        debug!(step, valid, "validated step");
        valid
    }

    /// Validate every step and store the union of their errors.
    ///
    /// The recipient step sees the form with students re-derived from the
    /// categories; that form is kept afterwards.
    pub fn validate_all_steps(&mut self) -> bool {
        let recipient_step = self.options.recipient_step;
        let mut augmented = self.state.form_data.clone();
        if self.is_recipient_sync_due(recipient_step) {
            augmented.set_students(self.extractor.extract(&self.state.categories));
        }

        let mut errors = E::default();
        for step in 1..=self.options.max_steps {
            let form = if step == recipient_step {
                &augmented
            } else {
                &self.state.form_data
            };
            errors.union(self.validator.validate(step, form));
        }

        let valid = errors.is_empty();
        self.state.form_data = augmented;
        self.state.errors = errors;
        debug!(valid, max_steps = self.options.max_steps, "validated all steps");
        valid
    }

    /// Back to the construction-time state.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        debug!("wizard reset");
    }
}

impl<F: FormData, E: ErrorMap> Component for WizardStore<F, E> {
    type Message = Message<F, E>;

    fn update(&mut self, msg: Message<F, E>) -> Command<Message<F, E>> {
        let from = self.state.current_step;
        match msg {
            Message::GoToStep(step) => {
                self.go_to_step(step);
                self.step_changed(from)
            }
            Message::NextStep => {
                let valid = self.next_step();
                Command::sequence([
                    Command::message(Message::Validated { step: from, valid }),
                    self.step_changed(from),
                ])
            }
            Message::PreviousStep => {
                self.previous_step();
                self.step_changed(from)
            }
            Message::SetErrors(errors) => {
                self.set_errors(errors);
                Command::message(Message::ErrorsChanged)
            }
            Message::SetFormData(patch) => {
                self.set_form_data(patch);
                Command::message(Message::FormDataChanged)
            }
            Message::SetCategories(categories) => {
                self.set_categories(categories);
                Command::message(Message::CategoriesChanged)
            }
            Message::AutoSelectCategories(categories) => {
                self.auto_select_categories(categories);
                Command::message(Message::CategoriesChanged)
            }
            Message::ValidateCurrentStep => {
                let valid = self.validate_current_step();
                Command::message(Message::Validated { step: from, valid })
            }
            Message::ValidateAllSteps => {
                let valid = self.validate_all_steps();
                Command::message(Message::AllValidated(valid))
            }
            Message::Reset => {
                self.reset();
                Command::message(Message::WasReset)
            }
            Message::StepChanged { .. }
            | Message::Validated { .. }
            | Message::AllValidated(_)
            | Message::ErrorsChanged
            | Message::FormDataChanged
            | Message::CategoriesChanged
            | Message::WasReset => Command::none(),
        }
    }
}

impl<F: FormData, E: ErrorMap> WizardStore<F, E> {
    fn step_changed(&self, from: usize) -> Command<Message<F, E>> {
        let to = self.state.current_step;
        if from == to {
            Command::none()
        } else {
            Command::message(Message::StepChanged { from, to })
        }
    }
}
