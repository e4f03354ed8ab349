// Match-event submission: POSTs a single event as JSON to the score server.
//
// Independent of the push connection; a failed submission never affects it.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::EventsConfig;

/// A match event as entered by the user. All fields are free text; the
/// server interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// Goal scorer, for goal events.
    pub scorer: String,
    pub time: String,
    pub score: String,
}

impl MatchEvent {
    /// `type` and `time` are required; `scorer` and `score` may be empty.
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.event_type.trim().is_empty() {
            return Err(SubmitError::MissingField { field: "type" });
        }
        if self.time.trim().is_empty() {
            return Err(SubmitError::MissingField { field: "time" });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("required field `{field}` is empty")]
    MissingField { field: &'static str },

    #[error("event request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected event with status {status}")]
    Status { status: u16 },
}

/// HTTP client for the event-submission endpoint.
#[derive(Debug, Clone)]
pub struct EventClient {
    http: reqwest::Client,
    url: String,
}

impl EventClient {
    pub fn from_config(config: &EventsConfig) -> Result<Self, SubmitError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(EventClient {
            http,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `event`. The response body is ignored; any non-2xx status is an
    /// error.
    pub async fn submit(&self, event: &MatchEvent) -> Result<(), SubmitError> {
        event.validate()?;

        let response = self.http.post(&self.url).json(event).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Event submission to {} rejected: {}", self.url, status);
            return Err(SubmitError::Status {
                status: status.as_u16(),
            });
        }

        info!("Submitted {} event at {}", event.event_type, event.time);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
