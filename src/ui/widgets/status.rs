//! Status widget - connection, power, crossfade, traffic and transition gauge

use crate::connection::ConnectionState;
use crate::session::SessionState;
use crate::stats::StatsSnapshot;
use crate::transition::TransitionState;
use crate::ui::theme::*;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

pub struct StatusWidget<'a> {
    url: &'a str,
    state: &'a SessionState,
    stats: &'a StatsSnapshot,
}

impl<'a> StatusWidget<'a> {
    /// Borders, four text lines and the gauge
    pub const HEIGHT: u16 = 7;

    pub fn new(url: &'a str, state: &'a SessionState, stats: &'a StatsSnapshot) -> Self {
        Self { url, state, stats }
    }
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(COLOR_LABEL))
}

/// Gauge fill (0.0 ..= 1.0) and caption
fn gauge_parts(transition: &TransitionState) -> (f64, String) {
    if transition.is_busy {
        let percent = transition.progress_percent.clamp(0.0, 100.0);
        (percent / 100.0, format!("{:.0}%", percent))
    } else {
        (0.0, "idle".to_string())
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (symbol, color) = match self.state.connection {
            ConnectionState::Connected => (SYMBOL_CONNECTED, COLOR_CONNECTED),
            ConnectionState::Connecting => (SYMBOL_CONNECTING, COLOR_CONNECTING),
            ConnectionState::Disconnected => (SYMBOL_DISCONNECTED, COLOR_DISCONNECTED),
        };

        let params = &self.state.params;
        let (power, power_color) = if params.power_on() {
            ("on", COLOR_CONNECTED)
        } else {
            ("off", COLOR_DISCONNECTED)
        };
        let fix_mode = params
            .fix_mode()
            .map(|mode| mode.as_str())
            .unwrap_or("?");

        let traffic = format!(
            "{} {}   {} {}   {} {} dropped   {} malformed",
            SYMBOL_OUT,
            self.stats.sent,
            SYMBOL_IN,
            self.stats.received,
            SYMBOL_DROPPED,
            self.stats.dropped,
            self.stats.malformed
        );

        let lines = vec![
            Line::from(vec![
                label("  Device     "),
                Span::styled(format!("{} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:<14}", self.state.connection.as_str()),
                    Style::default().fg(COLOR_VALUE),
                ),
                Span::styled(self.url.to_string(), Style::default().fg(COLOR_LABEL)),
            ]),
            Line::from(vec![
                label("  Power      "),
                Span::styled(format!("{:<16}", power), Style::default().fg(power_color)),
                label("Mode  "),
                Span::styled(fix_mode, Style::default().fg(COLOR_VALUE)),
            ]),
            Line::from(vec![
                label("  Crossfade  "),
                Span::styled(
                    format!("{} ms", params.blend_time_ms()),
                    Style::default().fg(COLOR_VALUE),
                ),
            ]),
            Line::from(vec![
                label("  Traffic    "),
                Span::styled(traffic, Style::default().fg(COLOR_VALUE)),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER))
            .title(Span::styled(
                " LUMIFERA REMOTE ",
                Style::default()
                    .fg(COLOR_TITLE)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        Paragraph::new(lines).render(rows[0], buf);

        let cols = Layout::horizontal([Constraint::Length(13), Constraint::Min(1)]).split(rows[1]);
        Paragraph::new(Line::from(label("  Transition"))).render(cols[0], buf);

        let (ratio, caption) = gauge_parts(&self.state.transition);
        Gauge::default()
            .gauge_style(Style::default().fg(COLOR_ACCENT).bg(COLOR_DIM))
            .ratio(ratio)
            .label(caption)
            .render(cols[1], buf);
    }
}
