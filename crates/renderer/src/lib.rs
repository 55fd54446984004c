//! Plain-text rendering of the quickspace strip.
//!
//! Every bind writes one status line (two for the double-line layout) to the
//! wrapped writer, which makes the strip usable as a status-bar command or in
//! a terminal.

use quickspace_widget::{
    DoubleLine, Icon, LayoutContent, LayoutKind, LayoutRenderer, SingleLine, WeatherReadout,
};
use std::io::Write;
use std::time::Duration;
use tracing::{trace, warn};

/// Maximum width of the double-line subtitle before it is ellipsized.
const SUBTITLE_MAX_CHARS: usize = 40;

#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    layout: LayoutKind,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            layout: LayoutKind::SingleLine,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LayoutRenderer for TextRenderer<W> {
    fn inflate(&mut self, kind: LayoutKind) {
        trace!("Inflating {kind:?}");
        self.layout = kind;
    }

    fn bind(&mut self, content: &LayoutContent) {
        if content.kind() != self.layout {
            warn!("Content {:?} bound into {:?} layout", content.kind(), self.layout);
        }
        let text = match content {
            LayoutContent::SingleLine(line) => single_line(line),
            LayoutContent::DoubleLine(line) => double_line(line),
        };
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!("Cannot write strip: {e}");
        }
    }

    fn fade_in(&mut self, duration: Duration) {
        trace!("Content visible (fade {} ms)", duration.as_millis());
    }
}

fn single_line(line: &SingleLine) -> String {
    match &line.weather {
        Some(weather) => format!("{}  |  {}", line.clock, weather_text(weather)),
        None => line.clock.clone(),
    }
}

fn double_line(line: &DoubleLine) -> String {
    let subtitle = format!("{} {}", icon_glyph(line.icon), ellipsize(&line.subtitle));
    match &line.weather {
        Some(weather) => format!("{}\n{subtitle}  |  {}", line.title, weather_text(weather)),
        None => format!("{}\n{subtitle}", line.title),
    }
}

fn weather_text(weather: &WeatherReadout) -> String {
    format!("{} {}", condition_glyph(&weather.icon), weather.temperature)
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::MusicNote => "♪",
        Icon::Info => "ⓘ",
    }
}

fn condition_glyph(name: &str) -> &str {
    match name {
        "sunny" | "clear" => "☀",
        "partly-cloudy" => "⛅",
        "cloudy" => "☁",
        "rain" | "showers" => "☂",
        "snow" => "❄",
        "thunderstorm" => "⚡",
        other => other,
    }
}

/// Truncate with a trailing ellipsis, keeping the result within the limit.
fn ellipsize(text: &str) -> String {
    if text.chars().count() <= SUBTITLE_MAX_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(SUBTITLE_MAX_CHARS - 1).collect();
    format!("{truncated}…")
}
