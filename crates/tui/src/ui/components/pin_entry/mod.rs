pub mod controller;
pub mod digit_row;
pub mod keypad;
pub mod pin_entry_component;
pub mod state;

pub use controller::{EntryOutcome, PIN_LENGTH, ResetSettings};
pub use pin_entry_component::PinEntryComponent;
pub use state::PinEntryState;
