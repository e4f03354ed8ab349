// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the app
// loop, or into local ViewState mutations (scrolling, the event form).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{EventForm, ViewState};
use crate::messages::UserCommand;

/// Games moved per PageUp/PageDown.
const PAGE_SIZE: usize = 5;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app loop. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Crossterm reports Release/Repeat on some platforms.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits, even with the form open.
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.event_form.is_some() {
        return handle_form_key(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('r') => Some(UserCommand::Reconnect),
        KeyCode::Char('d') => {
            if view_state.connection_status.is_stopped() {
                Some(UserCommand::Connect)
            } else {
                Some(UserCommand::Disconnect)
            }
        }
        KeyCode::Char('e') => {
            view_state.event_form = Some(EventForm::default());
            None
        }
        KeyCode::Char('u') => {
            view_state.show_feed = !view_state.show_feed;
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }
        KeyCode::Home => {
            view_state.scroll_offset = 0;
            None
        }

        KeyCode::Esc => {
            view_state.notification = None;
            None
        }

        _ => None,
    }
}

/// Handle key events while the event form is open.
///
/// - Tab / Down move to the next field, BackTab / Up to the previous one
/// - Enter submits when the required fields are filled
/// - Esc closes the form without sending
fn handle_form_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = view_state.event_form.as_mut()?;

    match key_event.code {
        KeyCode::Esc => {
            view_state.event_form = None;
            None
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus = form.focus.next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = form.focus.prev();
            None
        }
        KeyCode::Enter => match form.event.validate() {
            Ok(()) => {
                let event = form.event.clone();
                view_state.event_form = None;
                Some(UserCommand::SubmitEvent(event))
            }
            Err(e) => {
                form.error = Some(e.to_string());
                None
            }
        },
        KeyCode::Backspace => {
            form.focused_value_mut().pop();
            None
        }
        KeyCode::Char(c) => {
            form.focused_value_mut().push(c);
            form.error = None;
            None
        }
        _ => None,
    }
}

fn scroll_up(view_state: &mut ViewState, lines: usize) {
    view_state.scroll_offset = view_state.scroll_offset.saturating_sub(lines);
}

/// Scroll down, never past the last game.
fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let max = view_state.games.len().saturating_sub(1);
    view_state.scroll_offset = view_state.scroll_offset.saturating_add(lines).min(max);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
