//! Component system for the Pinpad TUI.
//!
//! Components are self-contained UI elements that translate input into
//! application messages and render themselves from application state. They
//! never mutate the PIN buffer directly: every change goes through
//! `App::update`, which returns the `Effect`s the runtime must execute.

use crossterm::event::{KeyEvent, MouseEvent};
use pinpad_types::Effect;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::App;

/// A trait representing a UI component with its own view-local state.
///
/// # Component Lifecycle
///
/// 1. **Event Handling**: the runtime routes key and mouse events to the
///    focused component (the open modal, otherwise the screen).
/// 2. **State Updates**: handlers forward `Msg`s to `App::update` and return
///    the resulting effects.
/// 3. **Rendering**: `render()` draws the component into the provided area
///    and records any hit areas needed for mouse handling.
pub(crate) trait Component: std::fmt::Debug {
    /// Handle key events when this component has focus.
    ///
    /// # Arguments
    ///
    /// * `app` - The application state
    /// * `key` - The key event to handle
    ///
    /// # Returns
    ///
    /// Vector of effects that the application should process
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events. Hit-testing uses the areas recorded by the most
    /// recent `render`.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing
    /// and remembering hit areas. Any state changes happen in event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown at the bottom of the component.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Areas the component lays itself out into, in render order.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}
