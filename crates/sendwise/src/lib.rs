//! **sendwise** -- a generic multi-step send wizard engine.
//!
//! Umbrella crate re-exporting everything from a single dependency:
//!
//! * [`sendwise_core`] items ([`Command`], [`Component`], [`testing`]) are
//!   available at the crate root.
//! * The [`wizard`] module re-exports [`sendwise_wizard`] (categories,
//!   auto-selection, validation, the wizard store, the send-activity form).
//!
//! # Quick start
//!
//! ```ignore
//! use sendwise::wizard::activity::create_send_activity_store;
//!
//! let mut store = create_send_activity_store()?;
//! store.auto_select_categories(categories_from_picker);
//! if store.next_step() {
//!     // recipients accepted, now on the details step
//! }
//! ```

pub use sendwise_core::*;
pub mod wizard {
    pub use sendwise_wizard::*;
}
