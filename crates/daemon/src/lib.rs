//! Runtime for the quickspace strip.
//!
//! Owns the display coordinator on a single-threaded Tokio runtime and wires
//! together all background producers:
//! - minute ticker aligned to the wall clock
//! - weather snapshot poller
//! - broadcast socket (clock broadcasts, song matches, lifecycle, clicks)
//! - settings and song-history file watchers
//!
//! Producers only send messages; the coordinator handles them one at a time in
//! arrival order.

use chrono::{Local, Timelike};
use quickspace_config::{
    default_path, load as load_config, settings_path, socket_path, FileWatcher, QuickspaceConfig,
};
use quickspace_core::{ClickTarget, Result, SystemClock, Trigger, WeatherService};
use quickspace_ipc::{Broadcast, BroadcastSocket, ClickEvent};
use quickspace_providers::{
    spawn_weather_monitor, CommandLauncher, FileAmbientHistory, FileSettingsStore,
    FileWeatherClient,
};
use quickspace_renderer::TextRenderer;
use quickspace_widget::{Collaborators, DisplayCoordinator, LayoutRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

const MINUTE: Duration = Duration::from_secs(60);

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the strip.  Returns after Ctrl+C.
pub fn run() -> Result<()> {
    let config = load_config(default_path()).unwrap_or_else(|e| {
        warn!("{e}; using defaults.");
        QuickspaceConfig::default()
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config))
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Everything producers can send to the control loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Forward to the coordinator.
    Trigger(Trigger),
    /// Host became visible: attach (registers clock broadcasts).
    Resume,
    /// Host went to the background: detach.
    Pause,
}

// ── Control loop ──────────────────────────────────────────────────────────────

async fn serve(config: QuickspaceConfig) -> Result<()> {
    let settings_file = settings_path(&config);
    let settings = Arc::new(FileSettingsStore::open_or_empty(&settings_file));
    let weather = FileWeatherClient::new(
        config.weather.snapshot_path.clone(),
        config.weather.enabled,
    );
    let history = FileAmbientHistory::new(config.ambient.history_path.clone());

    let collaborators = Collaborators {
        settings: settings.clone(),
        history: Arc::new(history.clone()),
        weather: Arc::new(weather.clone()),
        launcher: Arc::new(CommandLauncher::new(config.launcher.clone())),
        clock: Arc::new(SystemClock),
    };
    let mut strip = DisplayCoordinator::new(
        &config,
        collaborators,
        TextRenderer::new(std::io::stdout()),
    );

    let (tx, mut rx) = mpsc::channel::<Message>(64);

    tokio::spawn(minute_ticker(tx.clone()));

    if weather.is_available() {
        tokio::spawn(weather_forwarder(
            weather,
            config.weather.poll_interval_ms,
            tx.clone(),
        ));
    } else {
        info!("Weather provider unavailable; weather stays hidden");
    }

    let socket = socket_path(&config);
    match BroadcastSocket::bind(&socket) {
        Ok(listener) => {
            tokio::spawn(broadcast_forwarder(listener, tx.clone()));
        }
        Err(e) => warn!("Broadcasts disabled: {e}"),
    }

    tokio::spawn(settings_forwarder(settings_file, settings, tx.clone()));

    if let Some(path) = history.path() {
        tokio::spawn(file_change_forwarder(
            path.to_path_buf(),
            Message::Trigger(Trigger::AmbientBroadcast),
            tx.clone(),
        ));
    }
    drop(tx);

    strip.attach();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else { break };
                dispatch(&mut strip, message);
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    strip.detach();
    let _ = std::fs::remove_file(&socket);
    Ok(())
}

/// Apply one message to the coordinator.
pub fn dispatch<R: LayoutRenderer>(strip: &mut DisplayCoordinator<R>, message: Message) {
    match message {
        Message::Trigger(trigger) => strip.on_trigger(trigger),
        Message::Resume => strip.attach(),
        Message::Pause => strip.detach(),
    }
}

// ── Producers ─────────────────────────────────────────────────────────────────

/// Fires `TimeTick` on every wall-clock minute boundary.
async fn minute_ticker(tx: mpsc::Sender<Message>) {
    let now = Local::now();
    let into_minute = Duration::from_secs(u64::from(now.second()))
        + Duration::from_nanos(u64::from(now.nanosecond() % 1_000_000_000));
    let first = Instant::now() + MINUTE.saturating_sub(into_minute);

    let mut ticker = time::interval_at(first, MINUTE);
    loop {
        ticker.tick().await;
        if tx.send(Message::Trigger(Trigger::TimeTick)).await.is_err() {
            break; // control loop gone
        }
    }
}

async fn weather_forwarder(client: FileWeatherClient, interval_ms: u64, tx: mpsc::Sender<Message>) {
    let mut rx = spawn_weather_monitor(client, interval_ms);
    while let Some(snapshot) = rx.recv().await {
        if tx
            .send(Message::Trigger(Trigger::WeatherUpdated(snapshot)))
            .await
            .is_err()
        {
            break;
        }
    }
}

async fn broadcast_forwarder(socket: BroadcastSocket, tx: mpsc::Sender<Message>) {
    let mut rx = socket.spawn_listener();
    while let Some(broadcast) = rx.recv().await {
        let Some(message) = convert_broadcast(broadcast) else {
            continue;
        };
        if tx.send(message).await.is_err() {
            break;
        }
    }
}

/// Re-reads the settings file on change before notifying the coordinator.
async fn settings_forwarder(
    path: PathBuf,
    settings: Arc<FileSettingsStore>,
    tx: mpsc::Sender<Message>,
) {
    let (_watcher, mut rx) = match FileWatcher::spawn(&path) {
        Ok(watch) => watch,
        Err(e) => {
            warn!("Settings changes won't be picked up: {e}");
            return;
        }
    };
    while rx.recv().await.is_some() {
        settings.reload();
        if tx.send(Message::Trigger(Trigger::SettingsChanged)).await.is_err() {
            break;
        }
    }
}

async fn file_change_forwarder(path: PathBuf, message: Message, tx: mpsc::Sender<Message>) {
    let (_watcher, mut rx) = match FileWatcher::spawn(&path) {
        Ok(watch) => watch,
        Err(e) => {
            warn!("Not watching {}: {e}", path.display());
            return;
        }
    };
    while rx.recv().await.is_some() {
        debug!("{} changed", path.display());
        if tx.send(message.clone()).await.is_err() {
            break;
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Map a socket broadcast to a control-loop message, filtering out unknown lines.
pub fn convert_broadcast(broadcast: Broadcast) -> Option<Message> {
    let message = match broadcast {
        Broadcast::TimeTick => Message::Trigger(Trigger::TimeTick),
        Broadcast::TimeChanged => Message::Trigger(Trigger::TimeChanged),
        Broadcast::TimezoneChanged => Message::Trigger(Trigger::TimezoneChanged),
        Broadcast::SongMatch => Message::Trigger(Trigger::AmbientBroadcast),
        Broadcast::Resume => Message::Resume,
        Broadcast::Pause => Message::Pause,
        Broadcast::Click(target) => Message::Trigger(Trigger::UserClick(match target {
            ClickEvent::QuickEvent => ClickTarget::QuickEvent,
            ClickEvent::Clock => ClickTarget::Clock,
            ClickEvent::Weather => ClickTarget::Weather,
        })),
        Broadcast::Unknown(line) => {
            debug!("Ignoring unknown broadcast '{line}'");
            return None;
        }
    };
    Some(message)
}
