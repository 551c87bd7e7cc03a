//! Dashboard screen: every panel of the edge-network overview.
//!
//! Layout:
//! ┌─ Range tabs ──────────────────────────── auto · loading · updated ─┐
//! ├─ Error banner (only while an error is recorded) ───────────────────┤
//! │ Requests │ Cache Hit │ Error Rate │ Uptime │ Healthy │ Avg Resp   │
//! │ ┌─ Edge Nodes (table) ───────────────┐ ┌─ Response Time (bars) ─┐ │
//! │ └────────────────────────────────────┘ └────────────────────────┘ │
//! │ ┌─ Traffic (Braille line) ───────────┐ ┌─ Top Regions (bars) ───┐ │
//! └────────────────────────────────────────────────────────────────────┘

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
    Tabs,
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use edgeview_core::selectors::{self, DashboardSummary, Memoized, StatusCounts};
use edgeview_core::{DashboardState, GeographicStats, NodeStatus, TimeRange};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{fmt, status_indicator};

pub struct DashboardScreen {
    state: Arc<DashboardState>,
    summary: Memoized<DashboardSummary>,
    counts: Memoized<StatusCounts>,
    regions: Memoized<Vec<GeographicStats>>,
    /// `(sample index, requests)` for the recent-traffic chart.
    traffic: Vec<(f64, f64)>,
    throbber_state: ThrobberState,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            state: Arc::new(DashboardState::initial()),
            summary: Memoized::new(selectors::dashboard_summary),
            counts: Memoized::new(selectors::node_status_counts),
            regions: Memoized::new(selectors::top_regions),
            traffic: Vec::new(),
            throbber_state: ThrobberState::default(),
        }
    }

    #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
    fn apply_state(&mut self, state: &Arc<DashboardState>) {
        if Arc::ptr_eq(&self.state, state) {
            return;
        }
        self.state = Arc::clone(state);
        self.summary.get(state);
        self.counts.get(state);
        self.regions.get(state);
        self.traffic = selectors::recent_traffic(state)
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.requests as f64))
            .collect();
    }

    // ── Header ──────────────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default())
            .title(Span::styled(" edgeview ", theme::title_style()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs_area, throbber_area, status_area] = Layout::horizontal([
            Constraint::Min(30),
            Constraint::Length(12),
            Constraint::Length(30),
        ])
        .areas(inner);

        let titles: Vec<Line> = TimeRange::ALL
            .iter()
            .enumerate()
            .map(|(i, range)| Line::from(format!(" {} {range} ", i + 1)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.state.selected_time_range.index())
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active())
            .divider(Span::styled("│", theme::tab_inactive()));
        frame.render_widget(tabs, tabs_area);

        if self.state.loading {
            let throbber = Throbber::default()
                .label("loading")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, throbber_area, &mut self.throbber_state.clone());
        }

        let auto = if self.state.auto_refresh {
            Span::styled("● auto", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            Span::styled("○ paused", Style::default().fg(theme::BORDER_GRAY))
        };
        let refreshed = self.state.last_refresh.map_or_else(
            || "never refreshed".to_owned(),
            |at| format!("updated {}", fmt::fmt_age(at, Utc::now())),
        );
        let status = Line::from(vec![
            auto,
            Span::styled("  ", theme::key_hint()),
            Span::styled(refreshed, theme::key_hint()),
        ])
        .alignment(Alignment::Right);
        frame.render_widget(Paragraph::new(status), status_area);
    }

    fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_alert());
        let line = Line::from(vec![
            Span::styled(
                format!(" ✗ {message}"),
                Style::default()
                    .fg(theme::ERROR_RED)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("   c ", theme::key_hint_key()),
            Span::styled("dismiss", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    // ── Summary cards ───────────────────────────────────────────────

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let summary = self.summary.cached().cloned().unwrap_or_default();
        let cards = [
            ("Requests", fmt::fmt_count(summary.total_requests), theme::NEON_CYAN),
            ("Cache Hit", format!("{:.1}%", summary.cache_hit_rate), theme::SUCCESS_GREEN),
            ("Error Rate", format!("{:.2}%", summary.error_rate), theme::CORAL),
            ("Uptime", format!("{:.2}%", summary.uptime), theme::LIGHT_BLUE),
            (
                "Healthy",
                format!("{}/{}", summary.healthy_nodes, summary.total_nodes),
                theme::SUCCESS_GREEN,
            ),
            (
                "Avg Response",
                format!("{} ms", summary.avg_response_time),
                theme::latency_color(summary.avg_response_time),
            ),
        ];

        let areas = Layout::horizontal([Constraint::Ratio(1, 6); 6]).split(area);
        for ((title, value, color), card_area) in cards.into_iter().zip(areas.iter()) {
            let block = Block::default()
                .title(Span::styled(format!(" {title} "), theme::key_hint()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default());
            let value = Paragraph::new(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(value, *card_area);
        }
    }

    // ── Node table ──────────────────────────────────────────────────

    fn render_nodes(&self, frame: &mut Frame, area: Rect) {
        let counts = self.counts.cached().copied().unwrap_or_default();
        let mut title = vec![Span::styled(
            format!(" Edge Nodes ({}) ", counts.total),
            theme::title_style(),
        )];
        for status in NodeStatus::ALL {
            let n = counts.get(status);
            if n > 0 {
                title.push(status_indicator::status_span(status));
                title.push(Span::styled(format!(" {n}  "), theme::table_row()));
            }
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if self.state.edge_nodes.is_empty() {
            let message = if self.state.loading {
                "  Loading edge nodes…"
            } else {
                "  No edge nodes"
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(theme::BORDER_GRAY))
                    .block(block),
                area,
            );
            return;
        }

        let header = Row::new(["", "Location", "Country", "Status", "Resp", "Requests", "Bandwidth"])
            .style(theme::table_header());
        let rows = self.state.edge_nodes.iter().map(|node| {
            Row::new(vec![
                Cell::from(status_indicator::status_span(node.status)),
                Cell::from(node.location.clone()),
                Cell::from(node.country.clone()),
                Cell::from(Span::styled(
                    node.status.to_string(),
                    Style::default().fg(theme::status_color(node.status)),
                )),
                Cell::from(Span::styled(
                    format!("{} ms", node.response_time_ms),
                    Style::default().fg(theme::latency_color(node.response_time_ms)),
                )),
                Cell::from(fmt::fmt_count(node.request_count)),
                Cell::from(fmt::fmt_megabytes(node.bandwidth_usage)),
            ])
            .style(theme::table_row())
        });

        let widths = [
            Constraint::Length(2),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(10),
        ];
        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    /// Per-node response time, bars scaled relative to the slowest node.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn render_latency(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Response Time ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let nodes = &self.state.edge_nodes;
        let bar_budget = usize::from(inner.width.saturating_sub(22));
        let slowest = nodes
            .iter()
            .map(|n| n.response_time_ms)
            .max()
            .unwrap_or(1)
            .max(1);

        let lines: Vec<Line> = nodes
            .iter()
            .take(usize::from(inner.height))
            .map(|node| {
                let fraction = f64::from(node.response_time_ms) / f64::from(slowest);
                let width = (fraction * bar_budget as f64).round().max(1.0) as usize;
                let name: String = node.location.chars().take(10).collect();
                Line::from(vec![
                    Span::styled(format!(" {name:<10} "), theme::table_row()),
                    Span::styled(
                        "█".repeat(width.min(bar_budget)),
                        Style::default().fg(theme::latency_color(node.response_time_ms)),
                    ),
                    Span::styled(format!(" {:>4} ms", node.response_time_ms), theme::table_row()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    // ── Traffic chart ───────────────────────────────────────────────

    #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
    fn render_traffic(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(
                " Traffic · last {} samples ",
                self.traffic.len()
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if self.traffic.is_empty() {
            frame.render_widget(
                Paragraph::new("  No traffic data")
                    .style(Style::default().fg(theme::BORDER_GRAY))
                    .block(block),
                area,
            );
            return;
        }

        let x_max = (self.traffic.len().saturating_sub(1) as f64).max(1.0);
        let y_max = self
            .traffic
            .iter()
            .map(|&(_, y)| y)
            .fold(0.0_f64, f64::max)
            .max(1.0)
            * 1.1;

        let requests = Dataset::default()
            .name("requests")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::NEON_CYAN))
            .data(&self.traffic);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let y_labels = vec![
            Span::styled("0", Style::default().fg(theme::BORDER_GRAY)),
            Span::styled(
                fmt::fmt_count((y_max / 2.0) as u64),
                Style::default().fg(theme::BORDER_GRAY),
            ),
            Span::styled(fmt::fmt_count(y_max as u64), Style::default().fg(theme::BORDER_GRAY)),
        ];

        let chart = Chart::new(vec![requests])
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(y_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            );
        frame.render_widget(chart, area);
    }

    // ── Regions ─────────────────────────────────────────────────────

    /// Top regions by request volume, bars scaled to the largest share.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn render_regions(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Top Regions ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let regions = self.regions.cached().map_or(&[][..], Vec::as_slice);
        if regions.is_empty() {
            frame.render_widget(
                Paragraph::new("  No regional data").style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        let bar_budget = usize::from(inner.width.saturating_sub(26));
        let largest = regions
            .iter()
            .map(|r| r.percentage)
            .fold(0.0_f64, f64::max)
            .max(f64::EPSILON);
        let colors = theme::CHART_SERIES;

        let lines: Vec<Line> = regions
            .iter()
            .enumerate()
            .take(usize::from(inner.height))
            .map(|(i, region)| {
                let width = (region.percentage / largest * bar_budget as f64)
                    .round()
                    .max(1.0) as usize;
                let name: String = region.region.chars().take(14).collect();
                Line::from(vec![
                    Span::styled(format!(" {name:<14} "), theme::table_row()),
                    Span::styled(
                        "█".repeat(width.min(bar_budget)),
                        Style::default().fg(colors[i % colors.len()]),
                    ),
                    Span::styled(format!(" {:>5.1}%", region.percentage), theme::table_row()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DashboardScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StateChanged(state) => self.apply_state(state),
            Action::Tick if self.state.loading => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let banner_height = if self.state.error.is_some() { 3 } else { 0 };
        let [header, banner, cards, middle, bottom] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(10),
        ])
        .areas(area);

        self.render_header(frame, header);
        if let Some(message) = &self.state.error {
            Self::render_error_banner(frame, banner, message);
        }
        self.render_cards(frame, cards);

        let [nodes, latency] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .areas(middle);
        self.render_nodes(frame, nodes);
        self.render_latency(frame, latency);

        let [traffic, regions] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .areas(bottom);
        self.render_traffic(frame, traffic);
        self.render_regions(frame, regions);
    }
}

#[cfg(test)]
mod tests {
    use edgeview_core::{MockDataSource, Store};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn screen_text(screen: &DashboardScreen, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    async fn loaded_state() -> Arc<DashboardState> {
        Store::oneshot(
            edgeview_core::StoreConfig::default(),
            MockDataSource::new(edgeview_core::MockConfig::instant(7)),
            DashboardState::initial(),
            |store| async move {
                store
                    .fetch(&edgeview_core::LoadKind::ALL, TimeRange::TwentyFourHours)
                    .await
            },
        )
        .await
        .expect("load")
    }

    #[test]
    fn empty_state_renders_placeholders() {
        let screen = DashboardScreen::new();
        let text = screen_text(&screen, 140, 40);
        assert!(text.contains("No edge nodes"));
        assert!(text.contains("No traffic data"));
        assert!(text.contains("never refreshed"));
        assert!(text.contains("● auto"));
    }

    #[tokio::test]
    async fn loaded_state_renders_nodes_regions_and_cards() {
        let mut screen = DashboardScreen::new();
        let state = loaded_state().await;
        screen
            .update(&Action::StateChanged(Arc::clone(&state)))
            .expect("update");

        let text = screen_text(&screen, 160, 44);
        assert!(text.contains("Edge Nodes (6)"));
        assert!(text.contains("Frankfurt"));
        assert!(text.contains("North America"));
        assert!(text.contains("355.0K"));
        assert!(text.contains("4/6"));
        assert!(!text.contains("No traffic data"));
    }

    #[test]
    fn error_banner_appears_only_with_an_error() {
        let mut screen = DashboardScreen::new();
        let failed = Arc::new(DashboardState {
            error: Some("Failed to load metrics".into()),
            ..DashboardState::initial()
        });
        screen
            .update(&Action::StateChanged(failed))
            .expect("update");
        assert!(screen_text(&screen, 140, 40).contains("✗ Failed to load metrics"));

        screen
            .update(&Action::StateChanged(Arc::new(DashboardState::initial())))
            .expect("update");
        assert!(!screen_text(&screen, 140, 40).contains("Failed to load metrics"));
    }

    #[test]
    fn unchanged_snapshot_keeps_cached_views() {
        let mut screen = DashboardScreen::new();
        let state = Arc::new(DashboardState::initial());
        screen
            .update(&Action::StateChanged(Arc::clone(&state)))
            .expect("update");
        let before = screen.summary.cached().cloned();
        screen
            .update(&Action::StateChanged(state))
            .expect("update");
        assert_eq!(screen.summary.cached().cloned(), before);
    }
}
