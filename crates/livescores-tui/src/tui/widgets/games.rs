// Game list widget: one card per game in the order the app loop published.
//
// Each card: "{home} {h} - {a} {away}", status label (plus "● LIVE" for
// active games), last update time, then one line per goal scorer.
// Color: green for active, yellow for pending, gray for finished.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use livescores_core::presentation::{render_list, GameSummary};
use livescores_core::protocol::{ConnectionStatus, GameStatus};

use crate::tui::ViewState;

/// Render the game list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Games ({})", state.games.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if state.games.is_empty() {
        let paragraph = Paragraph::new(format!("  {}", empty_message(state.connection_status)))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = render_list(&state.games)
        .into_iter()
        .skip(state.scroll_offset)
        .map(|summary| ListItem::new(game_card(&summary)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Text shown while there are no games.
pub fn empty_message(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "No active games currently. Waiting for updates...",
        _ => "Waiting for connection...",
    }
}

pub fn status_color(status: GameStatus) -> Color {
    match status {
        GameStatus::Active => Color::Green,
        GameStatus::Pending => Color::Yellow,
        GameStatus::Finished => Color::Gray,
    }
}

/// Build the multi-line card for one game, followed by a blank spacer line.
pub fn game_card(summary: &GameSummary) -> Text<'static> {
    let color = status_color(summary.status);

    let mut header = vec![
        Span::styled(
            summary.scoreline.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", summary.status_label), Style::default().fg(color)),
    ];
    if summary.is_live {
        header.push(Span::raw(" "));
        header.push(Span::styled(
            "● LIVE",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if !summary.updated.is_empty() {
        header.push(Span::styled(
            format!("  updated {}", summary.updated),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(header)];
    for scorer in &summary.scorer_lines {
        lines.push(Line::from(Span::styled(
            format!("    {}", scorer),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::default());
    Text::from(lines)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
