use quickspace_core::{QuickspaceError, Result, SettingsStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

type Table = BTreeMap<String, i64>;

/// Settings backed by a flat TOML file of integers:
///
/// ```toml
/// device_introduction_completed = 1
/// weather_lockscreen_unit = 0
/// ```
///
/// Values are cached in memory; call [`FileSettingsStore::reload`] whenever the
/// file changes on disk.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: RwLock<Table>,
}

impl FileSettingsStore {
    /// Open the store at `path`.  A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = read_table(&path)?;
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Like [`FileSettingsStore::open`], but an unreadable file starts as an
    /// empty store; later reloads can still pick up a repaired file.
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = read_table(&path).unwrap_or_else(|e| {
            warn!("{e}; starting with default settings.");
            Table::new()
        });
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file; on failure the previous values are kept.
    pub fn reload(&self) {
        match read_table(&self.path) {
            Ok(values) => {
                debug!("Reloaded {} settings from {}", values.len(), self.path.display());
                if let Ok(mut guard) = self.values.write() {
                    *guard = values;
                }
            }
            Err(e) => warn!("Keeping previous settings: {e}"),
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values
            .read()
            .ok()
            .and_then(|v| v.get(key).copied())
            .unwrap_or(default)
    }

    fn put_int(&self, key: &str, value: i64) -> Result<()> {
        let mut guard = self
            .values
            .write()
            .map_err(|_| QuickspaceError::Settings("settings lock poisoned".into()))?;
        guard.insert(key.to_string(), value);

        let raw = toml::to_string(&*guard)
            .map_err(|e| QuickspaceError::Settings(format!("serialize: {e}")))?;
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Ok(Table::new());
    }
    let raw = std::fs::read_to_string(path).map_err(|e| {
        QuickspaceError::Settings(format!("cannot read '{}': {e}", path.display()))
    })?;
    toml::from_str(&raw).map_err(|e| {
        QuickspaceError::Settings(format!("cannot parse '{}': {e}", path.display()))
    })
}

/// In-process settings, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<Table>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style initial value.
    #[must_use]
    pub fn with(self, key: &str, value: i64) -> Self {
        if let Ok(mut guard) = self.values.write() {
            guard.insert(key.to_string(), value);
        }
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values
            .read()
            .ok()
            .and_then(|v| v.get(key).copied())
            .unwrap_or(default)
    }

    fn put_int(&self, key: &str, value: i64) -> Result<()> {
        self.values
            .write()
            .map_err(|_| QuickspaceError::Settings("settings lock poisoned".into()))?
            .insert(key.to_string(), value);
        Ok(())
    }
}
