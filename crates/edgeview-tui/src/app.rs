//! Application core: event loop, key mapping, and top-level rendering.
//!
//! The [`App`] owns the store handle and the dashboard screen. Terminal
//! events become [`Action`]s on an unbounded channel; each pass drains the
//! channel, routes store intents to [`Store::dispatch`], and draws on
//! [`Action::Render`].

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use edgeview_core::{Action as StoreAction, DataSource, MockDataSource, Store, TimeRange};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge;
use crate::event::{Event, EventReader};
use crate::screens::DashboardScreen;
use crate::theme;
use crate::tui::Tui;

const HELP: [(&str, &str); 8] = [
    ("r", "Refresh all data"),
    ("a", "Toggle auto-refresh"),
    ("1-5", "Time range: 1h 6h 24h 7d 30d"),
    ("c", "Dismiss error"),
    ("x", "Reset dashboard"),
    ("?", "Toggle this help"),
    ("Esc", "Close help"),
    ("q", "Quit"),
];

pub struct App<S: DataSource = MockDataSource> {
    store: Store<S>,
    initial_range: TimeRange,
    running: bool,
    help_visible: bool,
    last_applied: Option<&'static str>,
    dashboard: DashboardScreen,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl<S: DataSource> App<S> {
    /// `initial_range` is the window of the first load; later loads follow
    /// the store's selected range.
    pub fn new(store: Store<S>, initial_range: TimeRange) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            store,
            initial_range,
            running: true,
            help_visible: false,
            last_applied: None,
            dashboard: DashboardScreen::new(),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.store.start().await;
        self.store.load_all(self.initial_range)?;

        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(data_bridge::spawn_data_bridge(
            self.store.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(range = %self.initial_range, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            if let Some(action) = self.handle_event(event) {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        cancel.cancel();
        let _ = bridge.await;
        self.store.shutdown().await;
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    fn handle_event(&self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => map_key(key, self.help_visible),
            Event::Resize(w, h) => Some(Action::Resize(w, h)),
            Event::Tick => Some(Action::Tick),
            Event::Render => Some(Action::Render),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.running = false;
            }
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::CloseOverlay => self.help_visible = false,
            Action::Dispatch(intent) => {
                debug!(action = intent.tag(), "user intent");
                if let Err(e) = self.store.dispatch(intent.clone()) {
                    warn!(error = %e, "dispatch failed");
                }
            }
            Action::ActionApplied(tag) => self.last_applied = Some(*tag),
            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),
            Action::StateChanged(_) | Action::Tick | Action::Render => {}
        }

        if let Some(follow_up) = self.dashboard.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let [body, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        self.dashboard.render(frame, body);
        self.render_status_bar(frame, status);

        if self.help_visible {
            render_help_overlay(frame, body);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        let hints = [
            ("r", "refresh"),
            ("a", "auto"),
            ("1-5", "range"),
            ("?", "help"),
            ("q", "quit"),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(key, theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label}  "), theme::key_hint()));
        }
        if let Some(tag) = self.last_applied {
            spans.push(Span::styled("│ ", theme::key_hint()));
            spans.push(Span::styled(tag, Style::default().fg(theme::DIM_WHITE)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Map a key press to a UI action. While the help overlay is open only the
/// keys that close it (and Ctrl-C) do anything.
pub fn map_key(key: KeyEvent, help_visible: bool) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }

    if help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseOverlay),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    let intent = match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('?') => return Some(Action::ToggleHelp),
        KeyCode::Char('r') => StoreAction::RefreshAllData,
        KeyCode::Char('a') => StoreAction::ToggleAutoRefresh,
        KeyCode::Char('c') => StoreAction::ClearError,
        KeyCode::Char('x') => StoreAction::ResetDashboard,
        KeyCode::Char(digit @ '1'..='5') => {
            let index = usize::try_from(digit.to_digit(10)?).ok()?.checked_sub(1)?;
            StoreAction::SetTimeRange(*TimeRange::ALL.get(index)?)
        }
        _ => return None,
    };
    Some(Action::Dispatch(intent))
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 46u16.min(area.width.saturating_sub(4));
    let height = u16::try_from(HELP.len() + 2)
        .unwrap_or(u16::MAX)
        .min(area.height.saturating_sub(2));
    let help_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ELECTRIC_PURPLE));

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!("  {key:<6}"), theme::key_hint_key()),
                Span::styled(*label, theme::table_row()),
            ])
        })
        .collect();

    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(lines).block(block), help_area);
}
