// Live scores dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Create mpsc channels
// 4. Build the push connection manager and event client
// 5. Spawn app logic task (starts the connection)
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use livescores_core::config;
use livescores_core::connection::{ConnectionManager, TungsteniteConnector};
use livescores_core::submit::EventClient;
use livescores_tui::app;
use livescores_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Live scores starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: push stream {}, retry every {}s",
        config.connection.url,
        config.connection.retry_delay.as_secs()
    );

    let (conn_tx, conn_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let connection = ConnectionManager::new(
        config.connection.url.clone(),
        config.retry_policy(),
        Arc::new(TungsteniteConnector::new(config.connection.connect_timeout)),
        conn_tx,
    );
    let event_client =
        EventClient::from_config(&config.events).context("failed to build event client")?;
    info!("Match events will be sent to {}", event_client.url());

    let view_state = tui::ViewState::new(&config.display, config.connection.retry_delay);
    let app_state = app::AppState::new(config, connection, event_client);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(conn_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Blocks until the user presses 'q' or Ctrl+C.
    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state).await {
        error!("TUI error: {}", e);
    }

    // The app loop stops the connection on its way out.
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Live scores shut down cleanly");
    Ok(())
}

/// Directory for log files: the platform data dir, or `./logs` when the
/// platform has none.
fn log_dir() -> anyhow::Result<PathBuf> {
    match directories::ProjectDirs::from("", "", "livescores") {
        Some(dirs) => Ok(dirs.data_local_dir().join("logs")),
        None => Ok(std::env::current_dir()?.join("logs")),
    }
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("livescores.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("livescores=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
