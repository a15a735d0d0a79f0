//! UI components: the PIN entry screen and its acknowledgment dialog.

pub mod common;
pub mod component;
pub mod pin_entry;

pub use common::ConfirmationModal;
pub(crate) use component::Component;
pub use pin_entry::PinEntryComponent;
