use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum QuickspaceError {
    #[error("config error: {0}")]
    Config(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = QuickspaceError> = std::result::Result<T, E>;
