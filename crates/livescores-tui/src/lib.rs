pub mod app;
pub mod messages;
pub mod tui;
