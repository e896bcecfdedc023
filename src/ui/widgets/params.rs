//! Parameter list with the selected row highlighted

use crate::console::range_label;
use crate::params::{ParamKey, ParameterSet};
use crate::ui::theme::*;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct ParamsWidget<'a> {
    params: &'a ParameterSet,
    selected: ParamKey,
}

impl<'a> ParamsWidget<'a> {
    pub fn new(params: &'a ParameterSet, selected: ParamKey) -> Self {
        Self { params, selected }
    }

    fn row(&self, key: ParamKey) -> Line<'static> {
        let range = key
            .range()
            .map(|(min, max)| range_label(min, max))
            .unwrap_or_default();
        let value = self.params.get(key).to_string();

        if key == self.selected {
            let style = Style::default()
                .fg(COLOR_SELECTED)
                .add_modifier(Modifier::BOLD);
            Line::from(vec![
                Span::styled(format!(" {} ", SYMBOL_SELECTED), Style::default().fg(COLOR_KEY)),
                Span::styled(format!("{:<20}", key.as_str()), style),
                Span::styled(format!("{:>8}", value), style),
                Span::styled(format!("  {}", range), Style::default().fg(COLOR_LABEL)),
            ])
        } else {
            Line::from(vec![
                Span::raw("   "),
                Span::styled(format!("{:<20}", key.as_str()), Style::default().fg(COLOR_LABEL)),
                Span::styled(format!("{:>8}", value), Style::default().fg(COLOR_VALUE)),
                Span::styled(format!("  {}", range), Style::default().fg(COLOR_DIM)),
            ])
        }
    }
}

/// First visible row so that `selected` stays on screen
fn scroll_offset(selected: usize, visible: usize) -> usize {
    (selected + 1).saturating_sub(visible)
}

impl Widget for ParamsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let selected = ParamKey::ALL
            .iter()
            .position(|k| *k == self.selected)
            .unwrap_or(0);

        let lines: Vec<Line> = ParamKey::ALL
            .iter()
            .skip(scroll_offset(selected, visible))
            .take(visible)
            .map(|key| self.row(*key))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER))
            .title(Span::styled(" Parameters ", Style::default().fg(COLOR_LABEL)));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
