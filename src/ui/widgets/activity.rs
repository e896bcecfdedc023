//! Activity widget - session traffic, connection changes and command output
//!
//! Shows the newest lines that fit; older ones scroll off the top.

use crate::app::Activity;
use crate::logging::{Direction, LogEntry, LogKind};
use crate::ui::theme::*;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::collections::VecDeque;

pub struct ActivityWidget<'a> {
    lines: &'a VecDeque<Activity>,
}

impl<'a> ActivityWidget<'a> {
    pub fn new(lines: &'a VecDeque<Activity>) -> Self {
        Self { lines }
    }
}

impl Widget for ActivityWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.lines.len().saturating_sub(visible);

        let lines: Vec<Line> = self.lines.iter().skip(skip).map(format_activity).collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER))
            .title(Span::styled(" Activity ", Style::default().fg(COLOR_LABEL)));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

fn format_activity(line: &Activity) -> Line<'static> {
    match line {
        Activity::Session(entry) => format_entry(entry),
        Activity::Output(text) => Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(COLOR_TEXT),
        )),
    }
}

fn format_entry(entry: &LogEntry) -> Line<'static> {
    let time = Span::styled(
        format!(" {} ", entry.at.format("%H:%M:%S%.3f")),
        Style::default().fg(COLOR_MUTED),
    );

    let (symbol, color, text) = match &entry.kind {
        LogKind::Traffic {
            direction,
            keys,
            size,
        } => {
            let (symbol, color) = match direction {
                Direction::In => (SYMBOL_IN, COLOR_LOG_RX),
                Direction::Out => (SYMBOL_OUT, COLOR_LOG_TX),
            };
            (symbol, color, format!("{} ({} B)", keys, size))
        }
        LogKind::Dropped { keys } => (
            SYMBOL_DROPPED,
            COLOR_WARNING,
            format!("{} (not connected)", keys),
        ),
        LogKind::Discarded { reason } => (SYMBOL_DROPPED, COLOR_ERROR, reason.clone()),
        LogKind::Connection(state) => (" ", COLOR_LOG_SYSTEM, state.to_string()),
    };

    Line::from(vec![
        time,
        Span::styled(format!("{} ", symbol), Style::default().fg(color)),
        Span::styled(text, Style::default().fg(color)),
    ])
}
