// Help bar: keyboard shortcut hints for the current mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn help_text(state: &ViewState) -> &'static str {
    if state.event_form.is_some() {
        " Tab:Next field | Enter:Send | Esc:Cancel"
    } else if state.connection_status.is_stopped() {
        " q:Quit | d:Connect | r:Reconnect | e:Send event | u:Updates | j/k:Scroll"
    } else {
        " q:Quit | d:Disconnect | r:Reconnect | e:Send event | u:Updates | j/k:Scroll"
    }
}
