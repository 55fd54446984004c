/// Broadcasts accepted on the quickspace socket.
///
/// Each line has the format `name>>data`; most broadcasts carry no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Broadcast {
    TimeTick,
    TimeChanged,
    TimezoneChanged,
    /// The ambient recogniser matched a song.
    SongMatch,
    /// Host lifecycle.
    Resume,
    Pause,
    /// User tapped an element of the strip.
    Click(ClickEvent),
    /// A broadcast we don't handle; carries the raw line for debugging.
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickEvent {
    QuickEvent,
    Clock,
    Weather,
}

/// Parse a raw socket line into a typed [`Broadcast`].
pub fn parse_broadcast(line: &str) -> Broadcast {
    let line = line.trim();
    let (name, data) = line.split_once(">>").unwrap_or((line, ""));

    match name {
        "timetick" => Broadcast::TimeTick,
        "timechanged" => Broadcast::TimeChanged,
        "timezonechanged" => Broadcast::TimezoneChanged,
        "songmatch" => Broadcast::SongMatch,
        "resume" => Broadcast::Resume,
        "pause" => Broadcast::Pause,
        "click" => match data.trim() {
            "quickevent" => Broadcast::Click(ClickEvent::QuickEvent),
            "clock" => Broadcast::Click(ClickEvent::Clock),
            "weather" => Broadcast::Click(ClickEvent::Weather),
            _ => Broadcast::Unknown(line.to_string()),
        },
        _ => Broadcast::Unknown(line.to_string()),
    }
}
