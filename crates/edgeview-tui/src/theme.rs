//! Neon palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use edgeview_core::NodeStatus;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd

/// Region bar colors, cycled.
pub const CHART_SERIES: &[Color] = &[
    NEON_CYAN,
    CORAL,
    ELECTRIC_PURPLE,
    SUCCESS_GREEN,
    ELECTRIC_YELLOW,
    LIGHT_BLUE,
];

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Border for panels that demand attention (error banner, help overlay).
pub fn border_alert() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint description text in the status bar.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// The key itself in a hint.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

// ── Status Colors ─────────────────────────────────────────────────────

pub fn status_color(status: NodeStatus) -> Color {
    match status {
        NodeStatus::Healthy => SUCCESS_GREEN,
        NodeStatus::Warning => ELECTRIC_YELLOW,
        NodeStatus::Error => ERROR_RED,
        NodeStatus::Offline => BORDER_GRAY,
    }
}

/// Response-time color: green under 100 ms, yellow under 150 ms, red above.
pub fn latency_color(ms: u32) -> Color {
    match ms {
        0..100 => SUCCESS_GREEN,
        100..150 => ELECTRIC_YELLOW,
        _ => ERROR_RED,
    }
}
