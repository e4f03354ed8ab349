// Header widget: dashboard title and connection status line.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use livescores_core::presentation::status_label;
use livescores_core::protocol::ConnectionStatus;

use crate::tui::ViewState;

/// Render the header into the given area.
///
/// Layout: bordered block titled with the dashboard title, containing
/// `● Status: {label}`.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color) = connection_indicator(state.connection_status);
    let label = status_label(state.connection_status, state.retry_delay);

    let line = Line::from(vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)),
        Span::styled("Status: ", Style::default().fg(Color::Gray)),
        Span::styled(label, Style::default().fg(Color::White)),
    ]);

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        format!(" {} ", state.title),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Return the connection dot character and its color.
pub fn connection_indicator(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Idle => ("○", Color::DarkGray),
        ConnectionStatus::Connecting => ("●", Color::Yellow),
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Disconnected => ("●", Color::Red),
        ConnectionStatus::Error => ("●", Color::LightRed),
        ConnectionStatus::GaveUp => ("○", Color::Red),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
