// Push connection manager: one supervised WebSocket client with fixed-delay
// reconnection.
//
// `start` spawns a supervisor task that connects, pumps text frames through
// `decode_frame`, and on loss waits `RetryPolicy::delay` before trying again.
// Everything the task observes is reported as a `ConnectionEvent` tagged with
// the session generation; `stop` aborts the task and bumps the generation so
// the consumer can discard anything still queued from the old session.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::protocol::{decode_frame, ConnectionStatus, Envelope};

/// Delay between losing the connection and the next attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Upper bound on a single connection attempt, handshakes included.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Inbound frames of one open connection.
pub type FrameStream = BoxStream<'static, Result<Message, WsError>>;

/// Opens push connections. The production implementation is
/// [`TungsteniteConnector`]; tests substitute scripted streams.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<FrameStream, WsError>;
}

/// Connects with `tokio_tungstenite::connect_async` (ws:// and wss://).
///
/// The TCP connect, TLS and WebSocket handshakes together must finish within
/// `connect_timeout`, otherwise the attempt fails with `ErrorKind::TimedOut`.
#[derive(Debug, Clone, Copy)]
pub struct TungsteniteConnector {
    connect_timeout: Duration,
}

impl TungsteniteConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        TungsteniteConnector { connect_timeout }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for TungsteniteConnector {
    fn default() -> Self {
        TungsteniteConnector::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<FrameStream, WsError> {
        let handshake = tokio_tungstenite::connect_async(url);
        let (stream, response) = match tokio::time::timeout(self.connect_timeout, handshake).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(WsError::Io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("handshake did not complete within {:?}", self.connect_timeout),
                )))
            }
        };
        debug!("WebSocket handshake completed with status {}", response.status());
        Ok(stream.boxed())
    }
}

// ---------------------------------------------------------------------------
// Events and policy
// ---------------------------------------------------------------------------

/// How the supervisor retries after a lost or refused connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// Consecutive failed connection attempts tolerated before giving up.
    /// `None` retries forever. A successful open resets the count.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            delay: DEFAULT_RETRY_DELAY,
            max_attempts: None,
        }
    }
}

/// Something the supervisor observed, tagged with the session that saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEvent {
    pub generation: u64,
    pub kind: ConnectionEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEventKind {
    Status(ConnectionStatus),
    Envelope(Envelope),
}

/// The event channel receiver has been dropped; the supervisor stops.
#[derive(Debug)]
struct ChannelClosed;

// ---------------------------------------------------------------------------
// ConnectionManager
// ---------------------------------------------------------------------------

/// Owns at most one live push connection and its reconnect loop.
pub struct ConnectionManager {
    url: String,
    policy: RetryPolicy,
    connector: Arc<dyn Connector>,
    events: mpsc::Sender<ConnectionEvent>,
    status: Arc<watch::Sender<ConnectionStatus>>,
    /// Generation of the current session. Shared with the supervisor so a
    /// task that outlives `stop` cannot overwrite the status.
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    pub fn new(
        url: impl Into<String>,
        policy: RetryPolicy,
        connector: Arc<dyn Connector>,
        events: mpsc::Sender<ConnectionEvent>,
    ) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Idle);
        ConnectionManager {
            url: url.into(),
            policy,
            connector,
            events,
            status: Arc::new(status),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    /// Start the supervisor. Does nothing while one is already running.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("Push connection already running, ignoring start");
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.send_replace(ConnectionStatus::Connecting);
        info!("Starting push connection to {} (session {})", self.url, generation);

        let supervisor = Supervisor {
            url: self.url.clone(),
            policy: self.policy,
            connector: Arc::clone(&self.connector),
            events: self.events.clone(),
            status: Arc::clone(&self.status),
            live_generation: Arc::clone(&self.generation),
            generation,
        };
        self.task = Some(tokio::spawn(supervisor.run()));
    }

    /// Close the connection (if open) and cancel any pending reconnect.
    ///
    /// Safe to call repeatedly and before `start`.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Push connection to {} stopped", self.url);
        }
        self.status.send_replace(ConnectionStatus::Idle);
    }

    /// Whether the supervisor task is alive (connected, connecting, or
    /// waiting to reconnect).
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Watch status transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether an event from `generation` belongs to the running session.
    pub fn is_current(&self, generation: u64) -> bool {
        self.task.is_some() && generation == self.generation()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Supervisor task
// ---------------------------------------------------------------------------

struct Supervisor {
    url: String,
    policy: RetryPolicy,
    connector: Arc<dyn Connector>,
    events: mpsc::Sender<ConnectionEvent>,
    status: Arc<watch::Sender<ConnectionStatus>>,
    live_generation: Arc<AtomicU64>,
    generation: u64,
}

impl Supervisor {
    /// Connect, pump, wait, repeat. Returns when the event receiver is
    /// dropped or the retry budget is exhausted.
    async fn run(self) {
        let mut failures: u32 = 0;

        loop {
            if self.publish(ConnectionStatus::Connecting).await.is_err() {
                return;
            }

            match self.connector.connect(&self.url).await {
                Ok(stream) => {
                    info!("Connected to {}", self.url);
                    failures = 0;
                    if self.publish(ConnectionStatus::Connected).await.is_err() {
                        return;
                    }
                    if self.pump(stream).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!("Failed to connect to {}: {}", self.url, e);
                    if self.publish(ConnectionStatus::Error).await.is_err() {
                        return;
                    }
                }
            }

            if let Some(max) = self.policy.max_attempts {
                if failures >= max {
                    error!(
                        "Giving up on {} after {} consecutive failed attempt(s)",
                        self.url, failures
                    );
                    let _ = self.publish(ConnectionStatus::GaveUp).await;
                    return;
                }
            }

            if self.publish(ConnectionStatus::Disconnected).await.is_err() {
                return;
            }
            info!("Disconnected from {}, retrying in {:?}", self.url, self.policy.delay);
            tokio::time::sleep(self.policy.delay).await;
        }
    }

    /// Read frames until the connection closes. Malformed frames are logged
    /// and dropped without closing the connection.
    async fn pump(&self, mut stream: FrameStream) -> Result<(), ChannelClosed> {
        while let Some(item) = stream.next().await {
            match item {
                Ok(Message::Text(text)) => match decode_frame(&text) {
                    Ok(envelope) => {
                        debug!("Received {} envelope", envelope.kind());
                        self.emit(ConnectionEventKind::Envelope(envelope)).await?;
                    }
                    Err(e) => {
                        warn!("Dropping frame from {}: {}", self.url, e);
                    }
                },
                Ok(Message::Close(frame)) => {
                    info!("Server closed connection {}: {:?}", self.url, frame);
                    break;
                }
                Err(e) => {
                    warn!("Push connection error from {}: {}", self.url, e);
                    self.publish(ConnectionStatus::Error).await?;
                    break;
                }
                _ => {
                    // Ignore Binary, Ping, Pong, Frame variants.
                }
            }
        }
        Ok(())
    }

    /// Record a status transition and report it.
    async fn publish(&self, status: ConnectionStatus) -> Result<(), ChannelClosed> {
        self.status.send_if_modified(|current| {
            if self.live_generation.load(Ordering::SeqCst) != self.generation {
                return false;
            }
            *current = status;
            true
        });
        self.emit(ConnectionEventKind::Status(status)).await
    }

    async fn emit(&self, kind: ConnectionEventKind) -> Result<(), ChannelClosed> {
        self.events
            .send(ConnectionEvent {
                generation: self.generation,
                kind,
            })
            .await
            .map_err(|_| ChannelClosed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
