use quickspace_core::{AmbientHistory, SongEntry};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Song history written by the ambient recogniser as a JSON array,
/// most recent first:
///
/// ```json
/// [{ "song_title": "Song A", "artist_title": "Artist B" }]
/// ```
#[derive(Debug, Clone)]
pub struct FileAmbientHistory {
    path: Option<PathBuf>,
}

impl FileAmbientHistory {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl AmbientHistory for FileAmbientHistory {
    fn recent_songs(&self) -> Vec<SongEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Malformed song history '{}': {e}", path.display());
            Vec::new()
        })
    }
}
