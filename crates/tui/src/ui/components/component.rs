//! Component system for the Chromapick TUI.
//!
//! Components are self-contained UI elements. They handle the input routed
//! to them, render into the `Rect` they are given, and report side effects
//! back to the runtime as [`Effect`]s instead of performing them.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::{App, Effect};

/// A UI component with its own local state and behavior.
///
/// # Component Lifecycle
///
/// 1. **Event Handling**: key and mouse events arrive through
///    `handle_key_events` and `handle_mouse_events`
/// 2. **Rendering**: `render` draws the component and records any hit areas
///    the mouse handler needs on the next event
pub(crate) trait Component {
    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events that land while this component is active.
    ///
    /// Hit testing uses the areas captured during the last `render`.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free apart from drawing, cursor
    /// placement and remembering their own hit areas.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hint bar while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Sub-areas this component would split `area` into.
    fn get_preferred_layout(&self, _app: &App, _area: Rect) -> Vec<Rect> {
        Vec::new()
    }
}
