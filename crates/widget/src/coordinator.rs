//! Drives the strip: re-evaluates the engine on every trigger, swaps layouts
//! only when the quick-event state flips and re-binds content every time.

use crate::clock::{ClockFace, ClockRefresh};
use crate::engine::EventPriorityEngine;
use crate::layout::{
    DoubleLine, Icon, LayoutContent, LayoutKind, LayoutRenderer, SingleLine, WeatherReadout,
};
use quickspace_config::QuickspaceConfig;
use quickspace_core::{
    AmbientHistory, App, ClickTarget, Clock, Intent, LaunchOutcome, Launcher, SettingsStore,
    TemperatureUnit, Trigger, WeatherService, WeatherSnapshot,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Persisted lockscreen temperature unit flag (non-zero = imperial).
pub const WEATHER_LOCKSCREEN_UNIT: &str = "weather_lockscreen_unit";

/// Host-provided collaborators shared by the engine and the coordinator.
#[derive(Clone)]
pub struct Collaborators {
    pub settings: Arc<dyn SettingsStore>,
    pub history: Arc<dyn AmbientHistory>,
    pub weather: Arc<dyn WeatherService>,
    pub launcher: Arc<dyn Launcher>,
    pub clock: Arc<dyn Clock>,
}

/// What the coordinator last rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayState {
    /// Mirrors `is_quick_event()` as of the last render.
    pub is_double_line: bool,
    /// The content container has been faded in.
    pub content_visible: bool,
}

pub struct DisplayCoordinator<R: LayoutRenderer> {
    engine: EventPriorityEngine,
    renderer: R,
    settings: Arc<dyn SettingsStore>,
    weather: Arc<dyn WeatherService>,
    launcher: Arc<dyn Launcher>,
    clock: Arc<dyn Clock>,

    display: DisplayState,
    clock_face: ClockFace,
    snapshot: Option<WeatherSnapshot>,
    unit: TemperatureUnit,
    fade_in: Duration,
    attached: bool,
}

impl<R: LayoutRenderer> DisplayCoordinator<R> {
    /// Create the coordinator and inflate the initial single-line layout.
    ///
    /// Nothing is bound until the first trigger (normally via [`attach`](Self::attach)).
    pub fn new(config: &QuickspaceConfig, collaborators: Collaborators, mut renderer: R) -> Self {
        let engine = EventPriorityEngine::new(
            config,
            collaborators.settings.clone(),
            collaborators.history,
            collaborators.clock.clone(),
        );
        renderer.inflate(LayoutKind::SingleLine);

        let mut coordinator = Self {
            engine,
            renderer,
            settings: collaborators.settings,
            weather: collaborators.weather,
            launcher: collaborators.launcher,
            clock: collaborators.clock,
            display: DisplayState::default(),
            clock_face: ClockFace::new(config.clock.date_format.clone()),
            snapshot: None,
            unit: TemperatureUnit::default(),
            fade_in: Duration::from_millis(config.global.fade_in_ms),
            attached: false,
        };
        coordinator.read_unit();
        coordinator
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// The host resumed: accept clock broadcasts again and refresh everything.
    pub fn attach(&mut self) {
        info!("Quickspace attached");
        self.attached = true;
        self.on_trigger(Trigger::Resume);
    }

    /// The host paused: clock broadcasts are dropped until the next `attach`.
    pub fn detach(&mut self) {
        info!("Quickspace detached");
        self.attached = false;
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // ── Triggers ──────────────────────────────────────────────────────────────

    /// Re-evaluate the engine for `trigger`, then render.
    pub fn on_trigger(&mut self, trigger: Trigger) {
        if trigger.requires_attached() && !self.attached {
            trace!("Dropping {trigger:?} while detached");
            return;
        }
        debug!("Handling {trigger:?}");

        let clock_refresh = match &trigger {
            t if t.reloads_date_format() => ClockRefresh::Reload,
            Trigger::TimeTick => ClockRefresh::Recompute,
            _ => ClockRefresh::Reuse,
        };
        self.clock_face.request(clock_refresh);

        match trigger {
            Trigger::Resume => {
                self.read_unit();
                self.engine.initialize();
            }
            Trigger::TimeTick | Trigger::TimeChanged | Trigger::TimezoneChanged => {
                self.engine.check_expiry();
            }
            Trigger::AmbientBroadcast => self.engine.note_ambient_song_detected(),
            Trigger::WeatherUpdated(snapshot) => {
                self.snapshot = Some(snapshot);
                self.engine.check_expiry();
            }
            Trigger::SettingsChanged => {
                self.read_unit();
                self.engine.initialize();
            }
            Trigger::UserClick(target) => self.handle_click(target),
        }

        self.render();
    }

    fn read_unit(&mut self) {
        self.unit = TemperatureUnit::from_flag(self.settings.get_int(WEATHER_LOCKSCREEN_UNIT, 1));
    }

    fn handle_click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::QuickEvent => self.engine.handle_click(self.launcher.as_ref()),
            ClickTarget::Clock => {
                if self.display.is_double_line || !self.launcher.is_app_installed(App::Calendar) {
                    return;
                }
                let intent = Intent::Calendar { at: self.clock.now() };
                self.open_with_fallback(&intent, App::Calendar);
            }
            ClickTarget::Weather => {
                // A hidden readout cannot be tapped.
                if self.display.is_double_line
                    || self.weather_readout().is_none()
                    || !self.launcher.is_app_installed(App::Assistant)
                {
                    return;
                }
                self.open_with_fallback(&Intent::WeatherDetails, App::Assistant);
            }
        }
    }

    fn open_with_fallback(&self, intent: &Intent, app: App) {
        if self.launcher.open_intent_safely(intent) == LaunchOutcome::NotFound {
            debug!("No handler for {intent:?}; showing {app:?} details");
            self.launcher.show_app_details(app);
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Swap layouts if the quick-event state changed, then bind content.
    pub fn render(&mut self) {
        let is_quick_event = self.engine.is_quick_event();
        if is_quick_event != self.display.is_double_line {
            self.display.is_double_line = is_quick_event;
            let kind = if is_quick_event {
                LayoutKind::DoubleLine
            } else {
                LayoutKind::SingleLine
            };
            info!("Switching to {kind:?} layout");
            self.renderer.inflate(kind);
            if kind == LayoutKind::SingleLine {
                self.clock_face.request(ClockRefresh::Reload);
            }
        }

        let content = if self.display.is_double_line {
            LayoutContent::DoubleLine(self.double_line())
        } else {
            LayoutContent::SingleLine(self.single_line())
        };
        self.renderer.bind(&content);

        if !self.display.content_visible {
            self.display.content_visible = true;
            self.renderer.fade_in(self.fade_in);
        }
    }

    fn single_line(&mut self) -> SingleLine {
        let clock = self.clock_face.text(self.clock.now()).to_string();
        let weather = self.weather_readout();
        SingleLine {
            clock,
            weather_clickable: weather.is_some() && self.launcher.is_app_installed(App::Assistant),
            weather,
            clock_clickable: self.launcher.is_app_installed(App::Calendar),
        }
    }

    fn double_line(&self) -> DoubleLine {
        DoubleLine {
            title: self.engine.active_title(),
            subtitle: self.engine.active_subtitle(),
            icon: self.engine.active_icon().unwrap_or(Icon::Info),
            weather: self.weather_readout(),
        }
    }

    fn weather_readout(&self) -> Option<WeatherReadout> {
        if !self.weather.is_available() {
            debug!("Weather provider is unavailable");
            return None;
        }
        let Some(snapshot) = &self.snapshot else {
            debug!("No weather snapshot yet");
            return None;
        };
        if !snapshot.is_success() {
            debug!("Could not update weather");
            return None;
        }
        Some(WeatherReadout {
            temperature: snapshot.temperature(self.unit),
            icon: snapshot.condition_icon.clone(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn engine(&self) -> &EventPriorityEngine {
        &self.engine
    }

    pub fn display_state(&self) -> DisplayState {
        self.display
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DEVICE_INTRO_COMPLETED;
    use crate::testing::{
        ManualClock, RecordingLauncher, RecordingRenderer, RenderCall, StaticHistory,
        StaticWeather,
    };
    use quickspace_core::{SongEntry, WeatherStatus};
    use quickspace_providers::MemorySettings;

    struct Fixture {
        settings: Arc<MemorySettings>,
        history: Arc<StaticHistory>,
        launcher: Arc<RecordingLauncher>,
        clock: Arc<ManualClock>,
        weather_available: bool,
    }

    impl Fixture {
        fn new(intro_completed: i64) -> Self {
            Self {
                settings: Arc::new(
                    MemorySettings::new().with(DEVICE_INTRO_COMPLETED, intro_completed),
                ),
                history: Arc::new(StaticHistory::default()),
                launcher: Arc::new(RecordingLauncher::launched()),
                clock: Arc::new(ManualClock::default()),
                weather_available: true,
            }
        }

        fn coordinator(&self) -> DisplayCoordinator<RecordingRenderer> {
            let collaborators = Collaborators {
                settings: self.settings.clone(),
                history: self.history.clone(),
                weather: Arc::new(StaticWeather(self.weather_available)),
                launcher: self.launcher.clone(),
                clock: self.clock.clone(),
            };
            let mut config = QuickspaceConfig::default();
            config.clock.date_format = "%s".to_string();
            DisplayCoordinator::new(&config, collaborators, RecordingRenderer::default())
        }
    }

    fn sunny() -> WeatherSnapshot {
        WeatherSnapshot {
            status: WeatherStatus::Success,
            temperature_celsius: 21,
            temperature_fahrenheit: 70,
            condition_icon: "sunny".into(),
        }
    }

    fn single(c: &DisplayCoordinator<RecordingRenderer>) -> SingleLine {
        match c.renderer().last_bound() {
            Some(LayoutContent::SingleLine(l)) => l.clone(),
            other => panic!("expected single line, got {other:?}"),
        }
    }

    fn double(c: &DisplayCoordinator<RecordingRenderer>) -> DoubleLine {
        match c.renderer().last_bound() {
            Some(LayoutContent::DoubleLine(l)) => l.clone(),
            other => panic!("expected double line, got {other:?}"),
        }
    }

    #[test]
    fn fresh_install_renders_intro_double_line() {
        let fx = Fixture::new(0);
        let mut c = fx.coordinator();
        c.attach();

        assert!(c.display_state().is_double_line);
        let line = double(&c);
        assert_eq!(line.title, "Welcome to your new device");
        assert_eq!(line.subtitle, "Tap to learn more");
        assert_eq!(line.icon, Icon::Info);
        assert_eq!(
            c.renderer().inflations(),
            vec![LayoutKind::SingleLine, LayoutKind::DoubleLine]
        );
    }

    #[test]
    fn first_render_fades_in_once() {
        let fx = Fixture::new(1);
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::TimeTick);
        c.on_trigger(Trigger::WeatherUpdated(sunny()));

        assert_eq!(c.renderer().fades(), 1);
        assert!(c
            .renderer()
            .calls
            .contains(&RenderCall::FadeIn(Duration::from_millis(200))));
    }

    #[test]
    fn content_refreshes_without_layout_swap() {
        let fx = Fixture::new(1);
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));
        c.on_trigger(Trigger::TimeTick);

        assert_eq!(c.renderer().inflations(), vec![LayoutKind::SingleLine]);
        let binds = c
            .renderer()
            .calls
            .iter()
            .filter(|call| matches!(call, RenderCall::Bind(_)))
            .count();
        assert_eq!(binds, 3);
    }

    #[test]
    fn song_match_swaps_to_double_line_and_back_after_ttl() {
        let fx = Fixture::new(1);
        fx.history.set(vec![SongEntry::new("Song A", "Artist B")]);
        let mut c = fx.coordinator();
        c.attach();

        c.on_trigger(Trigger::AmbientBroadcast);
        let line = double(&c);
        assert_eq!(line.title, "Now playing");
        assert_eq!(line.subtitle, "Song A — Artist B");
        assert_eq!(line.icon, Icon::MusicNote);

        fx.clock.advance_ms(130_000);
        c.on_trigger(Trigger::TimeTick);
        assert!(!c.display_state().is_double_line);
        assert!(matches!(c.renderer().last_bound(), Some(LayoutContent::SingleLine(_))));
        assert_eq!(
            c.renderer().inflations(),
            vec![LayoutKind::SingleLine, LayoutKind::DoubleLine, LayoutKind::SingleLine]
        );
    }

    #[test]
    fn metric_unit_shows_celsius() {
        let fx = Fixture::new(1);
        fx.settings.put_int(WEATHER_LOCKSCREEN_UNIT, 0).expect("put");
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));

        let weather = single(&c).weather.expect("weather shown");
        assert_eq!(weather.temperature, "21°C");
        assert_eq!(weather.icon, "sunny");
    }

    #[test]
    fn imperial_unit_shows_fahrenheit() {
        let fx = Fixture::new(1);
        fx.settings.put_int(WEATHER_LOCKSCREEN_UNIT, 1).expect("put");
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));

        assert_eq!(single(&c).weather.expect("weather shown").temperature, "70°F");
    }

    #[test]
    fn unit_change_is_picked_up_on_settings_notification() {
        let fx = Fixture::new(1);
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));
        assert_eq!(single(&c).weather.expect("weather").temperature, "70°F");

        fx.settings.put_int(WEATHER_LOCKSCREEN_UNIT, 0).expect("put");
        c.on_trigger(Trigger::SettingsChanged);
        assert_eq!(single(&c).weather.expect("weather").temperature, "21°C");
    }

    #[test]
    fn failed_weather_is_hidden_in_both_layouts() {
        let fx = Fixture::new(1);
        fx.history.set(vec![SongEntry::new("Song A", "Artist B")]);
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(WeatherSnapshot::failed()));
        let line = single(&c);
        assert_eq!(line.weather, None);
        assert!(!line.weather_clickable);

        c.on_trigger(Trigger::AmbientBroadcast);
        assert_eq!(double(&c).weather, None);
    }

    #[test]
    fn unavailable_provider_hides_weather() {
        let mut fx = Fixture::new(1);
        fx.weather_available = false;
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));
        assert_eq!(single(&c).weather, None);
    }

    #[test]
    fn secondary_weather_in_double_line() {
        let fx = Fixture::new(0);
        fx.settings.put_int(WEATHER_LOCKSCREEN_UNIT, 0).expect("put");
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));
        assert_eq!(double(&c).weather.expect("weather").temperature, "21°C");
    }

    #[test]
    fn clock_ticks_are_dropped_while_detached() {
        let fx = Fixture::new(1);
        let mut c = fx.coordinator();
        c.attach();
        c.detach();
        let calls = c.renderer().calls.len();

        c.on_trigger(Trigger::TimeTick);
        c.on_trigger(Trigger::TimezoneChanged);
        assert_eq!(c.renderer().calls.len(), calls);

        c.on_trigger(Trigger::AmbientBroadcast);
        assert_eq!(c.renderer().calls.len(), calls + 1);
    }

    #[test]
    fn tick_recomputes_clock_but_weather_update_reuses_it() {
        let fx = Fixture::new(1);
        let mut c = fx.coordinator();
        c.attach();
        let start = single(&c).clock;

        fx.clock.advance_ms(60_000);
        c.on_trigger(Trigger::WeatherUpdated(sunny()));
        assert_eq!(single(&c).clock, start);

        c.on_trigger(Trigger::TimeTick);
        assert_ne!(single(&c).clock, start);
    }

    #[test]
    fn intro_click_opens_flow_and_returns_to_single_line() {
        let fx = Fixture::new(0);
        let mut c = fx.coordinator();
        c.attach();

        c.on_trigger(Trigger::UserClick(ClickTarget::QuickEvent));

        assert_eq!(fx.launcher.opened(), vec![Intent::DeviceIntroduction]);
        assert!(!c.display_state().is_double_line);

        c.on_trigger(Trigger::Resume);
        assert!(!c.engine().is_quick_event());
    }

    #[test]
    fn song_click_keeps_double_line() {
        let fx = Fixture::new(1);
        fx.history.set(vec![SongEntry::new("Song A", "Artist B")]);
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::AmbientBroadcast);

        c.on_trigger(Trigger::UserClick(ClickTarget::QuickEvent));

        assert!(c.display_state().is_double_line);
        assert!(c.engine().is_quick_event());
    }

    #[test]
    fn clock_click_falls_back_to_app_details() {
        let mut fx = Fixture::new(1);
        fx.launcher = Arc::new(RecordingLauncher::not_found());
        let mut c = fx.coordinator();
        c.attach();

        c.on_trigger(Trigger::UserClick(ClickTarget::Clock));

        assert!(matches!(fx.launcher.opened()[..], [Intent::Calendar { .. }]));
        assert_eq!(fx.launcher.details(), vec![App::Calendar]);
    }

    #[test]
    fn clicks_on_missing_apps_are_disabled() {
        let mut fx = Fixture::new(1);
        fx.launcher = Arc::new(RecordingLauncher::nothing_installed());
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));

        let line = single(&c);
        assert!(!line.clock_clickable);
        assert!(!line.weather_clickable);

        c.on_trigger(Trigger::UserClick(ClickTarget::Clock));
        c.on_trigger(Trigger::UserClick(ClickTarget::Weather));
        assert!(fx.launcher.opened().is_empty());
    }

    #[test]
    fn weather_click_opens_details() {
        let fx = Fixture::new(1);
        let mut c = fx.coordinator();
        c.attach();
        c.on_trigger(Trigger::WeatherUpdated(sunny()));
        c.on_trigger(Trigger::UserClick(ClickTarget::Weather));
        assert_eq!(fx.launcher.opened(), vec![Intent::WeatherDetails]);
        assert!(fx.launcher.details().is_empty());
    }

    #[test]
    fn weather_click_is_ignored_while_readout_is_hidden() {
        let fx = Fixture::new(1);
        let mut c = fx.coordinator();
        c.attach();

        // No snapshot yet.
        c.on_trigger(Trigger::UserClick(ClickTarget::Weather));

        let mut failed = sunny();
        failed.status = WeatherStatus::Failure;
        c.on_trigger(Trigger::WeatherUpdated(failed));
        assert!(single(&c).weather.is_none());
        c.on_trigger(Trigger::UserClick(ClickTarget::Weather));

        assert!(fx.launcher.opened().is_empty());
        assert!(fx.launcher.details().is_empty());
    }
}
