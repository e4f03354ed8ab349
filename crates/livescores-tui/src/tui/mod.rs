// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the app loop publishes. The
// app loop pushes `UiUpdate` messages over an mpsc channel; the TUI applies
// them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use livescores_core::config::DisplayConfig;
use livescores_core::protocol::{ConnectionStatus, Game};
use livescores_core::submit::MatchEvent;

use crate::messages::{Notification, UiUpdate, UserCommand};
use layout::build_layout;

/// How long a notification stays in the footer.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Lines kept in the updates feed; older lines are dropped.
pub const FEED_CAPACITY: usize = 100;

// ---------------------------------------------------------------------------
// EventForm
// ---------------------------------------------------------------------------

/// Fields of the match-event form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    EventType,
    Scorer,
    Time,
    Score,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::EventType,
        FormField::Scorer,
        FormField::Time,
        FormField::Score,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::EventType => "Event Type",
            FormField::Scorer => "Scorer (for goals)",
            FormField::Time => "Time",
            FormField::Score => "Score",
        }
    }

    pub fn required(self) -> bool {
        matches!(self, FormField::EventType | FormField::Time)
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::EventType => FormField::Scorer,
            FormField::Scorer => FormField::Time,
            FormField::Time => FormField::Score,
            FormField::Score => FormField::EventType,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::EventType => FormField::Score,
            FormField::Scorer => FormField::EventType,
            FormField::Time => FormField::Scorer,
            FormField::Score => FormField::Time,
        }
    }
}

/// Modal form for sending one match event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub event: MatchEvent,
    pub focus: FormField,
    /// Validation message from the last submit attempt.
    pub error: Option<String>,
}

impl Default for EventForm {
    fn default() -> Self {
        EventForm {
            event: MatchEvent::default(),
            focus: FormField::EventType,
            error: None,
        }
    }
}

impl EventForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::EventType => &self.event.event_type,
            FormField::Scorer => &self.event.scorer,
            FormField::Time => &self.event.time,
            FormField::Score => &self.event.score,
        }
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::EventType => &mut self.event.event_type,
            FormField::Scorer => &mut self.event.scorer,
            FormField::Time => &mut self.event.time,
            FormField::Score => &mut self.event.score,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A notification and when it was first shown.
#[derive(Debug, Clone)]
pub struct ShownNotification {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app loop.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub title: String,
    pub footer: String,
    /// Used to render "Retrying in {n} seconds...".
    pub retry_delay: Duration,
    /// Games in display order, exactly as published.
    pub games: Vec<Game>,
    pub connection_status: ConnectionStatus,
    pub notification: Option<ShownNotification>,
    /// Open while the user is filling in a match event.
    pub event_form: Option<EventForm>,
    /// First visible game in the list.
    pub scroll_offset: usize,
    /// Updates feed, newest first, at most `FEED_CAPACITY` lines.
    pub feed: VecDeque<String>,
    /// Whether the updates pane is shown beside the game list.
    pub show_feed: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(&DisplayConfig::default(), livescores_core::connection::DEFAULT_RETRY_DELAY)
    }
}

impl ViewState {
    pub fn new(display: &DisplayConfig, retry_delay: Duration) -> Self {
        ViewState {
            title: display.title.clone(),
            footer: display.footer.clone(),
            retry_delay,
            games: Vec::new(),
            connection_status: ConnectionStatus::Idle,
            notification: None,
            event_form: None,
            scroll_offset: 0,
            feed: VecDeque::with_capacity(FEED_CAPACITY),
            show_feed: false,
        }
    }

    fn push_feed_line(&mut self, line: String) {
        self.feed.push_front(line);
        self.feed.truncate(FEED_CAPACITY);
    }

    /// Drop the notification once it has been visible for the TTL.
    pub fn expire_notification(&mut self, now: Instant) {
        if let Some(shown) = &self.notification {
            if now.duration_since(shown.shown_at) >= NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Games(games) => {
            state.scroll_offset = state.scroll_offset.min(games.len().saturating_sub(1));
            state.games = games;
        }
        UiUpdate::ConnectionStatus(status) => {
            state.connection_status = status;
        }
        UiUpdate::Notification(notification) => {
            state.notification = Some(ShownNotification {
                notification,
                shown_at: Instant::now(),
            });
        }
        UiUpdate::Feed(line) => state.push_feed_line(line),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.show_feed);

    widgets::status_bar::render(frame, layout.header, state);
    widgets::games::render(frame, layout.games, state);
    if let Some(area) = layout.feed {
        widgets::feed::render(frame, area, state);
    }
    widgets::footer::render(frame, layout.footer, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if let Some(form) = &state.event_form {
        widgets::event_form::render(frame, frame.area(), form);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        info!("UI channel closed, leaving TUI");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws.
                    }
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        let _ = cmd_tx.send(UserCommand::Quit).await;
                        break Err(e.into());
                    }
                    None => {
                        let _ = cmd_tx.send(UserCommand::Quit).await;
                        break Ok(());
                    }
                }
            }

            _ = render_tick.tick() => {
                view_state.expire_notification(Instant::now());
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use livescores_core::protocol::GameStatus;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn game(id: &str, status: GameStatus) -> Game {
        Game {
            id: id.into(),
            home_team: "Nyasa Big Bullets".into(),
            away_team: "Mighty Wanderers".into(),
            home_score: 1,
            away_score: 1,
            scorers: vec![],
            status,
            last_update: "2024-06-01T15:04:05Z".into(),
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.games.is_empty());
        assert_eq!(state.connection_status, ConnectionStatus::Idle);
        assert_eq!(state.retry_delay, Duration::from_secs(5));
        assert!(state.notification.is_none());
        assert!(state.event_form.is_none());
        assert_eq!(state.title, "Live Scores");
        assert!(state.feed.is_empty());
        assert!(!state.show_feed);
    }

    #[test]
    fn view_state_uses_display_config() {
        let display = DisplayConfig {
            title: "Malawian Football Live Scores".into(),
            footer: "Malawian Football Updates".into(),
        };
        let state = ViewState::new(&display, Duration::from_secs(9));
        assert_eq!(state.title, "Malawian Football Live Scores");
        assert_eq!(state.footer, "Malawian Football Updates");
        assert_eq!(state.retry_delay, Duration::from_secs(9));
    }

    #[test]
    fn apply_ui_update_games_replaces_list() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Games(vec![game("g1", GameStatus::Active), game("g2", GameStatus::Pending)]),
        );
        assert_eq!(state.games.len(), 2);

        apply_ui_update(&mut state, UiUpdate::Games(vec![game("g3", GameStatus::Finished)]));
        assert_eq!(state.games.len(), 1);
        assert_eq!(state.games[0].id, "g3");
    }

    #[test]
    fn apply_ui_update_games_clamps_scroll() {
        let mut state = ViewState::default();
        state.scroll_offset = 10;
        apply_ui_update(&mut state, UiUpdate::Games(vec![game("g1", GameStatus::Active)]));
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn apply_ui_update_connection_status() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::ConnectionStatus(ConnectionStatus::Connected));
        assert_eq!(state.connection_status, ConnectionStatus::Connected);
        apply_ui_update(&mut state, UiUpdate::ConnectionStatus(ConnectionStatus::Disconnected));
        assert_eq!(state.connection_status, ConnectionStatus::Disconnected);
    }

    #[test]
    fn apply_ui_update_feed_keeps_newest_first() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Feed("Snapshot: 1 game".into()));
        apply_ui_update(&mut state, UiUpdate::Feed("g1 update".into()));
        assert_eq!(state.feed, ["g1 update", "Snapshot: 1 game"]);
    }

    #[test]
    fn feed_is_bounded() {
        let mut state = ViewState::default();
        for i in 0..FEED_CAPACITY + 25 {
            apply_ui_update(&mut state, UiUpdate::Feed(format!("line {i}")));
        }
        assert_eq!(state.feed.len(), FEED_CAPACITY);
        assert_eq!(state.feed.front().unwrap(), &format!("line {}", FEED_CAPACITY + 24));
        assert_eq!(state.feed.back().unwrap(), "line 25");
    }

    #[test]
    fn notification_expires_after_ttl() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Notification(Notification::info("Event sent successfully!")),
        );
        let shown_at = state.notification.as_ref().unwrap().shown_at;

        state.expire_notification(shown_at + Duration::from_secs(1));
        assert!(state.notification.is_some());

        state.expire_notification(shown_at + NOTIFICATION_TTL);
        assert!(state.notification.is_none());
    }

    #[test]
    fn form_field_cycle_wraps() {
        let mut field = FormField::EventType;
        for _ in 0..FormField::ALL.len() {
            field = field.next();
        }
        assert_eq!(field, FormField::EventType);
        assert_eq!(FormField::EventType.prev(), FormField::Score);
    }

    #[test]
    fn form_required_fields() {
        let required: Vec<FormField> = FormField::ALL
            .into_iter()
            .filter(|f| f.required())
            .collect();
        assert_eq!(required, vec![FormField::EventType, FormField::Time]);
    }

    #[test]
    fn render_frame_shows_status_and_games() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::ConnectionStatus(ConnectionStatus::Connected));
        apply_ui_update(&mut state, UiUpdate::Games(vec![game("g1", GameStatus::Active)]));

        terminal.draw(|frame| render_frame(frame, &state)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Live Scores"));
        assert!(text.contains("Connected"));
        assert!(text.contains("Nyasa Big Bullets 1 - 1 Mighty Wanderers"));
    }

    #[test]
    fn render_frame_shows_updates_pane_only_when_toggled() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Games(vec![game("g1", GameStatus::Active)]));
        apply_ui_update(&mut state, UiUpdate::Feed("Snapshot: 1 game".into()));

        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        assert!(!buffer_text(&terminal).contains("Snapshot: 1 game"));

        state.show_feed = true;
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Updates (1)"));
        assert!(text.contains("Snapshot: 1 game"));
        assert!(text.contains("Games (1)"));
    }

    #[test]
    fn render_frame_with_form_open_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.event_form = Some(EventForm::default());
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Send Match Event"));
    }

    #[test]
    fn render_frame_tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(10, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.event_form = Some(EventForm::default());
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
