use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use quickspace_core::{QuickspaceError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Watches a single file for changes and sends a notification on every write.
///
/// Used for the shared settings file (unit / intro flags) and the ambient
/// song history written by the recogniser. Watching stops when the handle is
/// dropped.
///
/// # Example
/// ```no_run
/// # async fn demo() -> quickspace_core::Result<()> {
/// use quickspace_config::FileWatcher;
/// let (_watcher, mut rx) = FileWatcher::spawn("/home/user/.config/quickspace/settings.toml")?;
/// while rx.recv().await.is_some() {
///     println!("settings changed, re-reading");
/// }
/// # Ok(())
/// # }
/// ```
pub struct FileWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    pub fn spawn(path: impl AsRef<Path>) -> Result<(Self, mpsc::Receiver<()>)> {
        let path = path.as_ref().to_path_buf();
        let (event_tx, event_rx) = mpsc::channel::<notify::Result<Event>>(16);

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = event_tx.blocking_send(res);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )
        .map_err(|e| QuickspaceError::Config(format!("filesystem watcher: {e}")))?;

        // Watch the parent so the file may be created or atomically replaced later.
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| QuickspaceError::Config(format!("watch '{}': {e}", dir.display())))?;
        info!("Watching file: {}", path.display());

        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(forward_changes(path.clone(), event_rx, tx));

        Ok((
            Self {
                path,
                _watcher: watcher,
            },
            rx,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ends once the watcher is dropped or the receiver goes away.
async fn forward_changes(
    path: PathBuf,
    mut events: mpsc::Receiver<notify::Result<Event>>,
    tx: mpsc::Sender<()>,
) {
    while let Some(event) = events.recv().await {
        match event {
            Ok(e) => {
                use notify::EventKind::*;
                let ours = e.paths.iter().any(|p| p.file_name() == path.file_name());
                if ours && matches!(e.kind, Modify(_) | Create(_)) {
                    // A full channel already carries a pending notification.
                    if let Err(mpsc::error::TrySendError::Closed(())) = tx.try_send(()) {
                        break;
                    }
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn notifies_on_write_and_stops_when_dropped() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.toml");
        let (watcher, mut rx) = FileWatcher::spawn(&path).expect("watch");
        assert_eq!(watcher.path(), path.as_path());

        std::fs::write(&path, "weather_lockscreen_unit = 0\n").expect("write");
        let changed = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(changed.expect("change within timeout"), Some(()));

        drop(watcher);
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok(), "channel should close after the watcher is dropped");
    }
}
