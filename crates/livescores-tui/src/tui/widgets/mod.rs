// TUI widget modules for each dashboard zone.

pub mod event_form;
pub mod feed;
pub mod footer;
pub mod games;
pub mod help_bar;
pub mod status_bar;
