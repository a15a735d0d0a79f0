//! Layout helpers shared by the UI components.

use ratatui::prelude::*;

/// Centers a rectangle of `width` x `height` inside `r`, shrinking it to fit.
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(r.x + (r.width - width) / 2, r.y + (r.height - height) / 2, width, height)
}
