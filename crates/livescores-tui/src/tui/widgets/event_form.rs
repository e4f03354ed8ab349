// Match-event form overlay.
//
// Renders a centered modal with one row per field. The focused field is
// highlighted; required fields are marked with `*`.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::{EventForm, FormField};

/// Width and height of the dialog.
const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 9;

/// Width of the label column.
const LABEL_WIDTH: usize = 20;

/// Render the event form centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, form: &EventForm) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Send Match Event ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let mut lines: Vec<Line> = FormField::ALL
        .into_iter()
        .map(|field| field_line(form, field))
        .collect();

    lines.push(Line::default());
    lines.push(match &form.error {
        Some(error) => Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            " * required",
            Style::default().fg(Color::DarkGray),
        )),
    });

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

/// One `label: value` row; the focused row shows a cursor.
fn field_line(form: &EventForm, field: FormField) -> Line<'static> {
    let focused = form.focus == field;
    let marker = if field.required() { "*" } else { " " };
    let label = format!(" {}{}:", field.label(), marker);

    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut value = form.value(field).to_string();
    if focused {
        value.push('_');
    }

    Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH + 2), label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the dialog is clamped to the available space.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
