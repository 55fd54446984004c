//! Quick-event prioritisation.
//!
//! At most one quick event is active at a time; that is a property of the
//! `Option<QuickEvent>` the engine keeps, not a convention between flags.
//! Candidates are evaluated in priority order: the device introduction first,
//! then the ambient now-playing notice.

use crate::layout::Icon;
use chrono::{DateTime, Utc};
use quickspace_config::{QuickspaceConfig, StringsConfig};
use quickspace_core::{AmbientHistory, Clock, Intent, LaunchOutcome, Launcher, SettingsStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Persisted flag set by the host once the device introduction was completed.
pub const DEVICE_INTRO_COMPLETED: &str = "device_introduction_completed";

/// The quick event currently occupying the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickEvent {
    /// First-run prompt pointing at the device introduction flow.
    DeviceIntro,
    /// A song recognised by the ambient recogniser.
    AmbientSong(AmbientSong),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbientSong {
    pub song: String,
    pub artist: String,
    pub captured_at: DateTime<Utc>,
}

/// Decides which quick event, if any, is shown.
pub struct EventPriorityEngine {
    settings: Arc<dyn SettingsStore>,
    history: Arc<dyn AmbientHistory>,
    clock: Arc<dyn Clock>,
    strings: StringsConfig,
    ambient_ttl_ms: i64,

    /// Mirrors [`DEVICE_INTRO_COMPLETED`] as of the last `initialize()`.
    intro_completed: bool,
    /// The user clicked through the intro; never shown again in this process.
    intro_dismissed: bool,
    active: Option<QuickEvent>,
}

impl EventPriorityEngine {
    /// Build the engine and run a first evaluation.
    pub fn new(
        config: &QuickspaceConfig,
        settings: Arc<dyn SettingsStore>,
        history: Arc<dyn AmbientHistory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut engine = Self {
            settings,
            history,
            clock,
            strings: config.strings.clone(),
            ambient_ttl_ms: i64::try_from(config.global.ambient_ttl_ms).unwrap_or(i64::MAX),
            intro_completed: false,
            intro_dismissed: false,
            active: None,
        };
        engine.initialize();
        engine
    }

    /// Re-read the persisted intro flag and re-evaluate every candidate.
    ///
    /// An active ambient notice is only checked for expiry; it is never
    /// re-derived from the history here.
    pub fn initialize(&mut self) {
        self.intro_completed = self.settings.get_bool(DEVICE_INTRO_COMPLETED, false);
        self.evaluate_intro();
        self.check_expiry();
    }

    fn intro_eligible(&self) -> bool {
        !self.intro_completed && !self.intro_dismissed
    }

    fn evaluate_intro(&mut self) {
        if self.intro_eligible() {
            if self.active != Some(QuickEvent::DeviceIntro) {
                debug!("Device intro quick event active");
            }
            self.active = Some(QuickEvent::DeviceIntro);
        } else if self.active == Some(QuickEvent::DeviceIntro) {
            self.active = None;
        }
    }

    /// The recogniser matched a song: show the newest history entry.
    ///
    /// Ignored while the intro is showing.  Replaces any earlier song notice.
    pub fn note_ambient_song_detected(&mut self) {
        if self.active == Some(QuickEvent::DeviceIntro) {
            debug!("Ignoring song match while the device intro is shown");
            return;
        }
        let Some(entry) = self.history.recent_songs().into_iter().next() else {
            return;
        };
        info!("Now playing: {} by {}", entry.song_title, entry.artist_title);
        self.active = Some(QuickEvent::AmbientSong(AmbientSong {
            song: entry.song_title,
            artist: entry.artist_title,
            captured_at: self.clock.now(),
        }));
    }

    /// Drop the song notice once it is older than the TTL.
    pub fn check_expiry(&mut self) {
        let Some(QuickEvent::AmbientSong(song)) = &self.active else {
            return;
        };
        let age_ms = (self.clock.now() - song.captured_at).num_milliseconds();
        if age_ms > self.ambient_ttl_ms {
            debug!("Now-playing notice expired after {age_ms} ms");
            self.active = None;
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn active(&self) -> Option<&QuickEvent> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn is_quick_event(&self) -> bool {
        self.active.is_some()
    }

    /// Headline of the active event; empty when none.
    pub fn active_title(&self) -> String {
        match &self.active {
            Some(QuickEvent::DeviceIntro) => self.strings.intro_welcome.clone(),
            Some(QuickEvent::AmbientSong(_)) => self.strings.now_playing.clone(),
            None => String::new(),
        }
    }

    /// Second line of the active event; empty when none.
    pub fn active_subtitle(&self) -> String {
        match &self.active {
            Some(QuickEvent::DeviceIntro) => self.strings.intro_learn_more.clone(),
            Some(QuickEvent::AmbientSong(s)) => self.strings.format_song(&s.song, &s.artist),
            None => String::new(),
        }
    }

    /// Glyph next to the subtitle.  `None` lets the renderer use its default.
    pub fn active_icon(&self) -> Option<Icon> {
        match &self.active {
            Some(QuickEvent::AmbientSong(_)) => Some(Icon::MusicNote),
            Some(QuickEvent::DeviceIntro) | None => None,
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// React to a tap on the active event.
    ///
    /// Clicking the intro opens the introduction flow and dismisses the intro
    /// for the rest of the process, whether or not the flow could be opened.
    /// Clicking a song notice searches for it and leaves the notice up.
    pub fn handle_click(&mut self, launcher: &dyn Launcher) {
        match &self.active {
            Some(QuickEvent::DeviceIntro) => {
                if launcher.open_intent_safely(&Intent::DeviceIntroduction)
                    == LaunchOutcome::NotFound
                {
                    debug!("Device introduction flow is not installed");
                }
                self.intro_dismissed = true;
                self.active = None;
            }
            Some(QuickEvent::AmbientSong(s)) => {
                let query = self.strings.format_song(&s.song, &s.artist);
                if launcher.open_intent_safely(&Intent::WebSearch { query })
                    == LaunchOutcome::NotFound
                {
                    debug!("No web search handler installed");
                }
            }
            None => {}
        }
    }
}
