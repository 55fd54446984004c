use chrono::{DateTime, Local, Utc};
use std::fmt::Write;
use tracing::warn;

/// How much of the date display a trigger invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClockRefresh {
    /// Keep the current text.
    Reuse,
    /// Re-render the text with the cached format.
    Recompute,
    /// Re-read the format (and time zone), then re-render.
    Reload,
}

/// The single-line date text.
///
/// Refresh requests accumulate while the double-line layout is up and are
/// applied the next time the date is visible.
#[derive(Debug)]
pub struct ClockFace {
    configured_format: String,
    format: Option<String>,
    text: String,
    pending: ClockRefresh,
}

impl ClockFace {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            configured_format: format.into(),
            format: None,
            text: String::new(),
            pending: ClockRefresh::Reload,
        }
    }

    /// Record a refresh request; the strongest pending request wins.
    pub fn request(&mut self, refresh: ClockRefresh) {
        self.pending = self.pending.max(refresh);
    }

    /// Apply the pending request and return the date text.
    pub fn text(&mut self, now: DateTime<Utc>) -> &str {
        let refresh = std::mem::replace(&mut self.pending, ClockRefresh::Reuse);
        if refresh == ClockRefresh::Reload || self.format.is_none() {
            self.format = Some(self.configured_format.clone());
        }
        if refresh != ClockRefresh::Reuse || self.text.is_empty() {
            self.text = self.render_text(now);
        }
        &self.text
    }

    fn render_text(&self, now: DateTime<Utc>) -> String {
        let format = self.format.as_deref().unwrap_or(&self.configured_format);
        let mut out = String::new();
        // chrono reports an invalid specifier as a formatting error.
        if write!(out, "{}", now.with_timezone(&Local).format(format)).is_err() {
            warn!("Invalid date format '{format}'; falling back to ISO date");
            out = now.with_timezone(&Local).format("%Y-%m-%d").to_string();
        }
        out
    }
}
