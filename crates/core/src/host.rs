//! Interfaces to everything the strip does not own.
//!
//! The engine and the coordinator only ever see these traits; concrete
//! implementations live in `quickspace-providers` (and in test doubles).

use crate::{error::Result, state::SongEntry};
use chrono::{DateTime, Utc};

// ── Settings ──────────────────────────────────────────────────────────────────

/// Integer key/value settings shared with the rest of the host.
///
/// Values can change behind our back, so callers re-read instead of caching.
pub trait SettingsStore: Send + Sync {
    /// Current value of `key`, or `default` when unset.
    fn get_int(&self, key: &str, default: i64) -> i64;

    fn put_int(&self, key: &str, value: i64) -> Result<()>;

    /// Boolean view over an integer setting (non-zero = `true`).
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_int(key, i64::from(default)) != 0
    }
}

// ── Weather ───────────────────────────────────────────────────────────────────

/// Capability check for the weather provider.
///
/// Snapshots themselves are pushed as `Trigger::WeatherUpdated`.
pub trait WeatherService: Send + Sync {
    fn is_available(&self) -> bool;
}

// ── Ambient song history ──────────────────────────────────────────────────────

pub trait AmbientHistory: Send + Sync {
    /// Recently recognised songs, most recent first.  Empty when unknown.
    fn recent_songs(&self) -> Vec<SongEntry>;
}

// ── Host launcher ─────────────────────────────────────────────────────────────

/// External applications the strip can hand off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum App {
    Calendar,
    Assistant,
}

/// Something the host is asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// First-run device introduction flow.
    DeviceIntroduction,
    /// Web search for `query`.
    WebSearch { query: String },
    /// Calendar app at the given instant.
    Calendar { at: DateTime<Utc> },
    /// Assistant weather deep link.
    WeatherDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched,
    /// No handler for the intent is installed.
    NotFound,
}

pub trait Launcher: Send + Sync {
    /// Open `intent`, reporting rather than raising a missing handler.
    fn open_intent_safely(&self, intent: &Intent) -> LaunchOutcome;

    /// Show the details / install page of `app`.
    fn show_app_details(&self, _app: App) {}

    fn is_app_installed(&self, _app: App) -> bool {
        true
    }
}

// ── Time ──────────────────────────────────────────────────────────────────────

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
