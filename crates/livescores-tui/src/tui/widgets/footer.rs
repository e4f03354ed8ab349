// Footer widget: copyright line, or the current notification.

use chrono::Datelike;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.notification {
        Some(shown) => {
            let color = if shown.notification.is_error {
                Color::Red
            } else {
                Color::Green
            };
            Line::from(Span::styled(
                shown.notification.text.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(
            copyright(chrono::Local::now().year(), &state.footer),
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

pub fn copyright(year: i32, footer: &str) -> String {
    format!("© {} {}", year, footer)
}
