//! Ratatui panels for the dashboard: status bar, market, token, log

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::chart::ChartView;
use super::classify::Category;
use super::connection::ConnectionState;
use super::log::{LogLevel, LogLine};
use super::state::{Badge, Dashboard};

const C_SAFE: Color = Color::Rgb(100, 220, 100);
const C_BAD: Color = Color::Rgb(220, 100, 100);
const C_WARN: Color = Color::Rgb(220, 180, 80);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);

/// Input field with keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    MarketId,
    TokenCa,
}

fn category_color(category: Category) -> Color {
    match category {
        Category::Safe => C_SAFE,
        Category::Warn => C_WARN,
        Category::Bad => C_BAD,
        Category::Neutral => C_BRIGHT,
    }
}

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Ok => C_SAFE,
        LogLevel::Warn => C_WARN,
        LogLevel::Bad => C_BAD,
        LogLevel::Info => C_ACCENT,
    }
}

/// Status dot and label for the stream indicator
pub fn connection_indicator(state: ConnectionState) -> (Color, &'static str) {
    match state {
        ConnectionState::Connected => (C_SAFE, "● connected"),
        ConnectionState::Disconnected => (C_BAD, "● disconnected"),
        ConnectionState::Connecting => (C_WARN, "● connecting"),
    }
}

/// Render the whole dashboard
pub fn render_dashboard(f: &mut Frame, dashboard: &Dashboard, focus: Option<Focus>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(10),
        ])
        .split(f.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    render_status_bar(f, rows[0], dashboard, focus);
    render_market_panel(f, panels[0], dashboard);
    render_token_panel(f, panels[1], dashboard);
    render_log_panel(f, rows[2], dashboard.logs.iter());
}

fn input_span(value: &str, focused: bool) -> Span<'_> {
    let style = if focused {
        Style::default().fg(C_BRIGHT).add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(C_BRIGHT)
    };
    let shown = if value.is_empty() { " " } else { value };
    Span::styled(shown, style)
}

fn render_status_bar(f: &mut Frame, area: Rect, dashboard: &Dashboard, focus: Option<Focus>) {
    let (dot_color, status) = connection_indicator(dashboard.connection);

    let line = Line::from(vec![
        Span::styled(status, Style::default().fg(dot_color).add_modifier(Modifier::BOLD)),
        Span::styled("   market ", Style::default().fg(C_DIM)),
        input_span(&dashboard.market_id, focus == Some(Focus::MarketId)),
        Span::styled("   CA ", Style::default().fg(C_DIM)),
        input_span(&dashboard.token_ca, focus == Some(Focus::TokenCa)),
        Span::styled(
            "   [Tab] edit  [r] refresh  [m] market  [t] token  [c] clear  [q] quit",
            Style::default().fg(C_DIM),
        ),
    ]);

    let block = Block::default()
        .title(" SIGNAL DASHBOARD ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn badge_span(badge: &Badge) -> Span<'_> {
    Span::styled(
        format!(" {} ", badge.text),
        Style::default()
            .fg(category_color(badge.category))
            .add_modifier(Modifier::BOLD),
    )
}

fn field<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<8}", label), Style::default().fg(C_DIM)),
        Span::styled(value, Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD)),
    ])
}

fn render_market_panel(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let market = &dashboard.market;
    let block = Block::default()
        .title(format!(" MARKET ({}) ", dashboard.market_id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(category_color(market.badge.category)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let lines = vec![
        Line::from(badge_span(&market.badge)),
        field("Last", &market.last),
        field("Signal", &market.signal),
        field("Conf", &market.confidence),
        field("Updated", &market.updated),
        Line::from(Span::styled(market.reason.as_str(), Style::default().fg(C_DIM))),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), parts[0]);

    f.render_widget(ChartView::new(&market.chart), parts[1]);

    let min_max = market.min_max.as_deref().unwrap_or("");
    f.render_widget(
        Paragraph::new(Span::styled(min_max, Style::default().fg(C_DIM))),
        parts[2],
    );
}

fn render_token_panel(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let token = &dashboard.token;
    let block = Block::default()
        .title(" TOKEN SCAN ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(category_color(token.badge.category)));

    let mut lines = vec![
        Line::from(badge_span(&token.badge)),
        field("Token", &token.name),
        field("Price", &token.price),
        field("Liq", &token.liquidity),
        field("24h", &token.change_24h),
        Line::from(""),
        Line::from(Span::styled(token.reason.as_str(), Style::default().fg(C_BRIGHT))),
    ];
    if let Some(link) = &token.link {
        lines.push(Line::from(Span::styled(link.as_str(), Style::default().fg(C_ACCENT))));
    }
    lines.push(Line::from(Span::styled(token.meta.as_str(), Style::default().fg(C_DIM))));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_log_panel<'a>(f: &mut Frame, area: Rect, logs: impl Iterator<Item = &'a LogLine>) {
    let block = Block::default()
        .title(" LOG ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = logs
        .take(visible)
        .map(|line| {
            Line::from(vec![
                Span::styled(line.timestamp(), Style::default().fg(C_DIM)),
                Span::styled(
                    format!(" [{}] ", line.level),
                    Style::default().fg(level_color(line.level)),
                ),
                Span::styled(line.message.as_str(), Style::default().fg(C_BRIGHT)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::state::DashboardEvent;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_connection_indicator() {
        assert_eq!(connection_indicator(ConnectionState::Connected).1, "● connected");
        assert_eq!(connection_indicator(ConnectionState::Connecting).1, "● connecting");
        assert_eq!(connection_indicator(ConnectionState::Disconnected).0, C_BAD);
    }

    #[test]
    fn test_render_dashboard_shows_panels() {
        let mut dashboard = Dashboard::new("bitcoin", (300.0, 136.0), 50);
        dashboard.handle(DashboardEvent::Log(LogLine::info("UI ready.")));
        dashboard.handle(DashboardEvent::Connection(ConnectionState::Connected));

        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal
            .draw(|f| render_dashboard(f, &dashboard, Some(Focus::MarketId)))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("MARKET (bitcoin)"));
        assert!(text.contains("TOKEN SCAN"));
        assert!(text.contains("UI ready."));
        assert!(text.contains("connected"));
    }
}
