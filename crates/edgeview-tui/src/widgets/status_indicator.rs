//! Node status indicator: ●/◐/○/· with color mapping.

use ratatui::style::Style;
use ratatui::text::Span;

use edgeview_core::NodeStatus;

use crate::theme;

/// Returns a styled `Span` with the status dot for `status`.
pub fn status_span(status: NodeStatus) -> Span<'static> {
    Span::styled(status_char(status), Style::default().fg(theme::status_color(status)))
}

/// The status dot without styling.
pub fn status_char(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Healthy => "●",
        NodeStatus::Warning => "◐",
        NodeStatus::Error => "○",
        NodeStatus::Offline => "·",
    }
}
