//! Actions widget - keyboard shortcuts, or the command line while typing

use crate::input::InputMode;
use crate::ui::theme::*;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct ActionsWidget<'a> {
    mode: InputMode,
    input: &'a str,
}

impl<'a> ActionsWidget<'a> {
    pub fn new(mode: InputMode, input: &'a str) -> Self {
        Self { mode, input }
    }
}

fn shortcut(key: &'static str, action: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(COLOR_KEY)),
        Span::styled(action, Style::default().fg(COLOR_ACTION)),
    ]
}

impl Widget for ActionsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line1 = match self.mode {
            InputMode::CommandLine => Line::from(vec![
                Span::styled("  : ", Style::default().fg(COLOR_KEY)),
                Span::styled(self.input.to_string(), Style::default().fg(COLOR_BRIGHT)),
                Span::styled("_", Style::default().fg(COLOR_KEY)),
            ]),
            InputMode::Keys => {
                let mut spans = vec![Span::raw("  ")];
                for (key, action) in [
                    ("↑↓", " Select  "),
                    ("←→", " Adjust  "),
                    ("PgUp/PgDn", " ×10  "),
                    ("P", " Power  "),
                    ("N", " Next palette  "),
                    ("X", " Crossfade  "),
                    ("1-7", " System preset"),
                ] {
                    spans.extend(shortcut(key, action));
                }
                Line::from(spans)
            }
        };

        let line2 = match self.mode {
            InputMode::CommandLine => Line::from(vec![
                Span::raw("  "),
                Span::styled("Enter", Style::default().fg(COLOR_KEY)),
                Span::styled(" Run  ", Style::default().fg(COLOR_ACTION)),
                Span::styled("Esc", Style::default().fg(COLOR_KEY)),
                Span::styled(" Cancel", Style::default().fg(COLOR_ACTION)),
            ]),
            InputMode::Keys => {
                let mut spans = vec![Span::raw("  ")];
                for (key, action) in [
                    ("C", " Connect  "),
                    ("D", " Disconnect  "),
                    (":", " Command  "),
                    ("Q", " Quit"),
                ] {
                    spans.extend(shortcut(key, action));
                }
                Line::from(spans)
            }
        };

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(COLOR_DIM));

        Paragraph::new(vec![line1, line2])
            .block(block)
            .render(area, buf);
    }
}
