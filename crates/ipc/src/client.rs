use crate::events::{parse_broadcast, Broadcast};
use quickspace_core::{QuickspaceError, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Unix socket on which other processes deliver [`Broadcast`]s, one per line.
pub struct BroadcastSocket {
    path: PathBuf,
    listener: UnixListener,
}

impl BroadcastSocket {
    /// Bind the socket at `path`, replacing a stale socket file.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| QuickspaceError::Ipc(format!("remove stale socket: {e}")))?;
        }
        let listener = UnixListener::bind(&path)
            .map_err(|e| QuickspaceError::Ipc(format!("bind '{}': {e}", path.display())))?;
        info!("Listening for broadcasts on {}", path.display());
        Ok(Self { path, listener })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Spawn a background task accepting connections and forwarding parsed
    /// broadcasts on the returned channel.
    ///
    /// The task stops when the receiver is dropped.
    pub fn spawn_listener(self) -> mpsc::Receiver<Broadcast> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            loop {
                let stream = match self.listener.accept().await {
                    Ok((stream, _)) => stream,
                    Err(e) => {
                        error!("Broadcast socket accept failed: {e}");
                        tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
                        continue;
                    }
                };
                if tx.is_closed() {
                    return;
                }

                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(stream).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let broadcast = parse_broadcast(&line);
                        debug!("Broadcast received: {broadcast:?}");
                        if tx.send(broadcast).await.is_err() {
                            return; // all receivers dropped
                        }
                    }
                });
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ClickEvent;
    use tokio::io::AsyncWriteExt;
    use tokio::net::UnixStream;

    /// Deliver one raw line the way an external sender would.
    async fn send_line(path: &Path, line: &str) {
        let mut stream = UnixStream::connect(path).await.expect("connect");
        stream
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write");
    }

    #[tokio::test]
    async fn delivers_broadcasts_in_order() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("quickspace.sock");
        let socket = BroadcastSocket::bind(&path).expect("bind");
        let mut rx = socket.spawn_listener();

        send_line(&path, "songmatch").await;
        assert_eq!(rx.recv().await, Some(Broadcast::SongMatch));

        send_line(&path, "click>>clock").await;
        assert_eq!(rx.recv().await, Some(Broadcast::Click(ClickEvent::Clock)));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("quickspace.sock");
        let mut rx = BroadcastSocket::bind(&path).expect("bind").spawn_listener();

        send_line(&path, "\n  \npause").await;
        assert_eq!(rx.recv().await, Some(Broadcast::Pause));
    }

    #[test]
    fn bind_in_missing_directory_is_an_ipc_error() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let _guard = runtime.enter();
        let err = BroadcastSocket::bind("/nonexistent/quickspace.sock").err();
        assert!(matches!(err, Some(QuickspaceError::Ipc(_))));
    }
}
