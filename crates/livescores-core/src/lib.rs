// Live scores client core: wire protocol, game reconciliation, push
// connection management, display summaries, and event submission.

pub mod config;
pub mod connection;
pub mod presentation;
pub mod protocol;
pub mod reconcile;
pub mod submit;
