use crate::state::WeatherSnapshot;

/// Everything that can make the quickspace strip re-evaluate and re-render.
///
/// Sources:
/// - Host lifecycle          → `Resume`
/// - Minute ticker           → `TimeTick`
/// - Broadcast socket        → `TimeChanged`, `TimezoneChanged`, `AmbientBroadcast`, `UserClick`
/// - History file watcher    → `AmbientBroadcast`
/// - Weather poller          → `WeatherUpdated`
/// - Settings file watcher   → `SettingsChanged`
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    // ── Lifecycle ─────────────────────────────────────────────────────────────
    /// The host became visible again; reloads persisted flags and the date format.
    Resume,

    // ── Clock ─────────────────────────────────────────────────────────────────
    /// Minute boundary passed.
    TimeTick,
    /// Wall clock was set manually.
    TimeChanged,
    /// Time zone changed.
    TimezoneChanged,

    // ── Collaborators ─────────────────────────────────────────────────────────
    /// The ambient recognizer matched a new song.
    AmbientBroadcast,
    /// Fresh snapshot pushed by the weather provider.
    WeatherUpdated(WeatherSnapshot),
    /// A watched setting (unit flag, intro flag) changed on disk.
    SettingsChanged,

    // ── User actions ──────────────────────────────────────────────────────────
    /// The user tapped one of the rendered elements.
    UserClick(ClickTarget),
}

impl Trigger {
    /// Periodic and system triggers are only delivered while the strip is attached.
    pub fn requires_attached(&self) -> bool {
        matches!(
            self,
            Trigger::TimeTick | Trigger::TimeChanged | Trigger::TimezoneChanged
        )
    }

    /// Whether this trigger warrants reloading the date format, not just the text.
    pub fn reloads_date_format(&self) -> bool {
        matches!(
            self,
            Trigger::Resume | Trigger::TimeChanged | Trigger::TimezoneChanged
        )
    }
}

/// Element of the strip a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Double-line headline / subtitle.
    QuickEvent,
    /// Single-line date text.
    Clock,
    /// Single-line weather readout, only while it is shown.
    Weather,
}
