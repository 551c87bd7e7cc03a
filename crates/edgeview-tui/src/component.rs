//! Component trait: the building block for every UI element.

use color_eyre::eyre::Result;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// Lifecycle: (`update` | `render`)*. Keys are mapped by the app, so
/// components only see the resulting actions.
pub trait Component: Send {
    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);
}
