//! Test doubles for the host collaborators.

use crate::layout::{LayoutContent, LayoutKind, LayoutRenderer};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use quickspace_core::{
    AmbientHistory, App, Clock, Intent, LaunchOutcome, Launcher, SongEntry, WeatherService,
};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl Default for ManualClock {
    fn default() -> Self {
        let t0 = Utc
            .timestamp_millis_opt(1_700_000_000_000)
            .single()
            .expect("valid instant");
        Self(Mutex::new(t0))
    }
}

impl ManualClock {
    pub fn advance_ms(&self, ms: i64) {
        *self.0.lock().expect("clock lock") += ChronoDuration::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

#[derive(Debug, Default)]
pub struct StaticHistory(Mutex<Vec<SongEntry>>);

impl StaticHistory {
    pub fn set(&self, songs: Vec<SongEntry>) {
        *self.0.lock().expect("history lock") = songs;
    }
}

impl AmbientHistory for StaticHistory {
    fn recent_songs(&self) -> Vec<SongEntry> {
        self.0.lock().expect("history lock").clone()
    }
}

#[derive(Debug)]
pub struct StaticWeather(pub bool);

impl WeatherService for StaticWeather {
    fn is_available(&self) -> bool {
        self.0
    }
}

#[derive(Debug)]
pub struct RecordingLauncher {
    outcome: LaunchOutcome,
    installed: bool,
    opened: Mutex<Vec<Intent>>,
    details: Mutex<Vec<App>>,
}

impl RecordingLauncher {
    fn with(outcome: LaunchOutcome, installed: bool) -> Self {
        Self {
            outcome,
            installed,
            opened: Mutex::new(Vec::new()),
            details: Mutex::new(Vec::new()),
        }
    }

    pub fn launched() -> Self {
        Self::with(LaunchOutcome::Launched, true)
    }

    pub fn not_found() -> Self {
        Self::with(LaunchOutcome::NotFound, true)
    }

    pub fn nothing_installed() -> Self {
        Self::with(LaunchOutcome::NotFound, false)
    }

    pub fn opened(&self) -> Vec<Intent> {
        self.opened.lock().expect("launcher lock").clone()
    }

    pub fn details(&self) -> Vec<App> {
        self.details.lock().expect("launcher lock").clone()
    }
}

impl Launcher for RecordingLauncher {
    fn open_intent_safely(&self, intent: &Intent) -> LaunchOutcome {
        self.opened.lock().expect("launcher lock").push(intent.clone());
        self.outcome
    }

    fn show_app_details(&self, app: App) {
        self.details.lock().expect("launcher lock").push(app);
    }

    fn is_app_installed(&self, _app: App) -> bool {
        self.installed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Inflate(LayoutKind),
    Bind(LayoutContent),
    FadeIn(Duration),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn inflations(&self) -> Vec<LayoutKind> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Inflate(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn last_bound(&self) -> Option<&LayoutContent> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::Bind(content) => Some(content),
            _ => None,
        })
    }

    pub fn fades(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::FadeIn(_)))
            .count()
    }
}

impl LayoutRenderer for RecordingRenderer {
    fn inflate(&mut self, kind: LayoutKind) {
        self.calls.push(RenderCall::Inflate(kind));
    }

    fn bind(&mut self, content: &LayoutContent) {
        self.calls.push(RenderCall::Bind(content.clone()));
    }

    fn fade_in(&mut self, duration: Duration) {
        self.calls.push(RenderCall::FadeIn(duration));
    }
}
