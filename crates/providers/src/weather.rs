use quickspace_core::{WeatherService, WeatherSnapshot};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, warn};

/// Weather provider reading the JSON snapshot another process keeps up to date:
///
/// ```json
/// { "status": "success", "temperature_celsius": 21,
///   "temperature_fahrenheit": 70, "condition_icon": "sunny" }
/// ```
#[derive(Debug, Clone)]
pub struct FileWeatherClient {
    path: Option<PathBuf>,
    enabled: bool,
}

impl FileWeatherClient {
    pub fn new(path: Option<PathBuf>, enabled: bool) -> Self {
        Self { path, enabled }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the snapshot once.  Unreadable or malformed files report `Failure`.
    pub fn read(&self) -> WeatherSnapshot {
        let Some(path) = &self.path else {
            return WeatherSnapshot::failed();
        };
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Malformed weather snapshot '{}': {e}", path.display());
                WeatherSnapshot::failed()
            }),
            Err(e) => {
                debug!("Cannot read weather snapshot '{}': {e}", path.display());
                WeatherSnapshot::failed()
            }
        }
    }
}

impl WeatherService for FileWeatherClient {
    fn is_available(&self) -> bool {
        self.enabled && self.path.is_some()
    }
}

/// Spawn a background Tokio task that polls the weather snapshot every
/// `interval_ms` milliseconds and forwards it whenever it changed.
///
/// The task stops automatically when the receiver is dropped.
pub fn spawn_weather_monitor(
    client: FileWeatherClient,
    interval_ms: u64,
) -> mpsc::Receiver<WeatherSnapshot> {
    let (tx, rx) = mpsc::channel(4);
    let interval = Duration::from_millis(interval_ms.max(1));

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        let mut last: Option<WeatherSnapshot> = None;

        loop {
            ticker.tick().await;
            let snapshot = client.read();
            if last.as_ref() == Some(&snapshot) {
                continue;
            }
            last = Some(snapshot.clone());

            if tx.send(snapshot).await.is_err() {
                break; // all receivers dropped
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickspace_core::WeatherStatus;

    #[test]
    fn unconfigured_client_is_unavailable() {
        let client = FileWeatherClient::new(None, true);
        assert!(!client.is_available());
        assert_eq!(client.read().status, WeatherStatus::Failure);
    }

    #[test]
    fn disabled_client_is_unavailable() {
        let client = FileWeatherClient::new(Some(PathBuf::from("/tmp/w.json")), false);
        assert!(!client.is_available());
    }

    #[test]
    fn reads_snapshot_file() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(
            file.path(),
            r#"{"status":"success","temperature_celsius":21,"temperature_fahrenheit":70,"condition_icon":"sunny"}"#,
        )
        .expect("write");
        let snap = FileWeatherClient::new(Some(file.path().to_path_buf()), true).read();

        assert!(snap.is_success());
        assert_eq!(snap.temperature_celsius, 21);
        assert_eq!(snap.condition_icon, "sunny");
    }

    #[tokio::test]
    async fn monitor_pushes_first_snapshot() {
        let client = FileWeatherClient::new(None, true);
        let mut rx = spawn_weather_monitor(client, 10);
        let snap = rx.recv().await.expect("first snapshot");
        assert_eq!(snap.status, WeatherStatus::Failure);
    }
}
