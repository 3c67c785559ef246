//! Core plumbing for **sendwise**.
//!
//! Stores in sendwise follow the [Elm Architecture]: state changes only in
//! response to a message, and every change is reported back as a
//! [`Command`] so the owning UI layer can observe it without a global,
//! implicitly reactive store.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Component`] | Message-driven state container (`update(msg) -> Command`) |
//! | [`Command`] | Notification(s) the owner should observe after an update |
//! | [`TestHarness`](testing::TestHarness) | Headless driver for unit-testing a [`Component`] |
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod testing;

pub use command::Command;
pub use component::Component;
