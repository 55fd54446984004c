use std::time::Duration;

/// The two mutually exclusive layouts of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Date + optional weather.
    SingleLine,
    /// Quick-event headline over subtitle, optional weather.
    DoubleLine,
}

/// Glyph shown next to a quick-event subtitle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    MusicNote,
    /// Default when the event carries no icon of its own.
    Info,
}

/// Temperature plus condition glyph name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReadout {
    pub temperature: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleLine {
    pub clock: String,
    /// `None` hides the weather block and its separator.
    pub weather: Option<WeatherReadout>,
    /// Clicking the date opens the calendar.
    pub clock_clickable: bool,
    /// Clicking the weather opens the weather details.
    pub weather_clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleLine {
    pub title: String,
    pub subtitle: String,
    pub icon: Icon,
    pub weather: Option<WeatherReadout>,
}

/// Content bound into whichever layout is inflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutContent {
    SingleLine(SingleLine),
    DoubleLine(DoubleLine),
}

impl LayoutContent {
    pub fn kind(&self) -> LayoutKind {
        match self {
            LayoutContent::SingleLine(_) => LayoutKind::SingleLine,
            LayoutContent::DoubleLine(_) => LayoutKind::DoubleLine,
        }
    }

    pub fn weather(&self) -> Option<&WeatherReadout> {
        match self {
            LayoutContent::SingleLine(l) => l.weather.as_ref(),
            LayoutContent::DoubleLine(l) => l.weather.as_ref(),
        }
    }
}

/// Surface that actually draws the strip.
///
/// `inflate` replaces the current layout subtree; `bind` is called after every
/// trigger with content matching the last inflated kind.
pub trait LayoutRenderer {
    fn inflate(&mut self, kind: LayoutKind);

    fn bind(&mut self, content: &LayoutContent);

    /// The content container becomes visible for the first time.
    fn fade_in(&mut self, _duration: Duration) {}
}
