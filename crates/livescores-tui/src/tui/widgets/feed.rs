// Updates pane: running log of applied envelopes, newest first.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Updates ({})", state.feed.len()));

    if state.feed.is_empty() {
        let paragraph = Paragraph::new("  No updates yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Only as many lines as fit; the newest is on top.
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = state
        .feed
        .iter()
        .take(visible)
        .enumerate()
        .map(|(i, line)| {
            let color = if i == 0 { Color::White } else { Color::Gray };
            ListItem::new(Line::styled(line.clone(), Style::default().fg(color)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
