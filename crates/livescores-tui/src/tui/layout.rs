// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Header: title + connection status (3 rows)        |
// +-------------------------------+------------------+
// | Game list (fill)              | Updates (opt.)   |
// +-------------------------------+------------------+
// | Footer / notification (1 row)                     |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub header: Rect,
    pub games: Rect,
    /// Updates pane to the right of the game list, when shown.
    pub feed: Option<Rect>,
    /// Copyright line, replaced by notifications while one is shown.
    pub footer: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect, show_feed: bool) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(3),    // game list (+ updates)
            Constraint::Length(1), // footer
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let (games, feed) = if show_feed {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(vertical[1]);
        (columns[0], Some(columns[1]))
    } else {
        (vertical[1], None)
    };

    AppLayout {
        header: vertical[0],
        games,
        feed,
        footer: vertical[2],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
