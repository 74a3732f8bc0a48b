//! Gesture Arcade host driver
//!
//! Reads landmark frames and control messages as JSON lines on stdin and
//! writes render frames and game-over notices as JSON lines on stdout.
//! Logs go to stderr.

use std::io;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gesture_arcade::app::{Driver, GameSession};
use gesture_arcade::config::Config;
use gesture_arcade::feed::{self, HostMsg};
use gesture_arcade::store::{JsonlScoreLog, LogOnlyRecorder, ScoreRecorder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Gesture Arcade");
    info!(
        game = config.game.as_str(),
        mode = config.hand_mode.as_str(),
        realtime = config.realtime,
        "Configuration loaded"
    );

    let recorder: Box<dyn ScoreRecorder> = match &config.score_log {
        Some(path) => Box::new(JsonlScoreLog::open(path)?),
        None => Box::new(LogOnlyRecorder::new()),
    };

    let (tx, inbox) = feed::channel();
    tokio::spawn(read_host(tx));

    let session = GameSession::new(&config);
    let driver = Driver::new(session, inbox, io::stdout(), recorder, config.realtime);

    tokio::select! {
        result = driver.run() => {
            let summary = result?;
            info!(ticks = summary.ticks, games_over = summary.games_over, faults = summary.faults, "Session finished");
        }
        _ = shutdown_signal() => {}
    }

    info!("Shutdown complete");
    Ok(())
}

/// Forward stdin lines to the driver until EOF
async fn read_host(tx: mpsc::Sender<HostMsg>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(msg) = feed::decode_line(&line) else {
                    continue;
                };
                if tx.send(msg).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read host input");
                break;
            }
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
