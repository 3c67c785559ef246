use crate::auto_select::EXTRA_PASSES;
use serde::{Deserialize, Serialize};

/// Errors raised while building a [`WizardStore`](crate::store::WizardStore).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    /// A wizard needs at least one step.
    #[error("max_steps must be at least 1")]
    NoSteps,
    /// The recipient step is not one of the wizard's steps.
    #[error("recipient step {step} is outside 1..={max_steps}")]
    RecipientStepOutOfRange { step: usize, max_steps: usize },
}

/// Configuration for a [`WizardStore`](crate::store::WizardStore).
///
/// All fields have defaults; override only what you need with struct update
/// syntax:
///
/// ```rust,ignore
/// use sendwise_wizard::WizardOptions;
///
/// let options = WizardOptions {
///     max_steps: 2,
///     ..WizardOptions::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WizardOptions {
    /// Number of steps (default: 3).
    pub max_steps: usize,
    /// Step that folds category selections into the form (default: 1).
    pub recipient_step: usize,
    /// Auto-selection passes allowed on top of one per category (default: 2).
    pub auto_select_extra_passes: usize,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            max_steps: 3,
            recipient_step: 1,
            auto_select_extra_passes: EXTRA_PASSES,
        }
    }
}

impl WizardOptions {
    pub fn validate(&self) -> Result<(), WizardError> {
        if self.max_steps == 0 {
            return Err(WizardError::NoSteps);
        }
        if !(1..=self.max_steps).contains(&self.recipient_step) {
            return Err(WizardError::RecipientStepOutOfRange {
                step: self.recipient_step,
                max_steps: self.max_steps,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(WizardOptions::default().validate(), Ok(()));
    }

    #[test]
    fn zero_steps_rejected() {
        let options = WizardOptions {
            max_steps: 0,
            ..WizardOptions::default()
        };
        assert_eq!(options.validate(), Err(WizardError::NoSteps));
    }

    #[test]
    fn recipient_step_must_exist() {
        let options = WizardOptions {
            max_steps: 2,
            recipient_step: 3,
            ..WizardOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert_eq!(err.to_string(), "recipient step 3 is outside 1..=2");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let options: WizardOptions = serde_json::from_str(r#"{ "maxSteps": 2 }"#).unwrap();
        assert_eq!(options.max_steps, 2);
        assert_eq!(options.recipient_step, 1);
        assert_eq!(options.auto_select_extra_passes, EXTRA_PASSES);
    }
}
