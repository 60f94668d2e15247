use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub tone: Tone,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Error }
    }
}

/// Single-slot message area that clears itself after a fixed delay.
///
/// Showing a new notice replaces the current one and restarts the delay.
#[derive(Debug)]
pub struct StatusLine {
    current: Option<(Notice, Instant)>,
    ttl: Duration,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show_at(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now));
    }

    pub fn show(&mut self, notice: Notice) {
        self.show_at(notice, Instant::now());
    }

    /// The notice still visible at `now`, if any.
    pub fn visible_at(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|(_, shown)| now.saturating_duration_since(*shown) < self.ttl)
            .map(|(notice, _)| notice)
    }

    pub fn visible(&self) -> Option<&Notice> {
        self.visible_at(Instant::now())
    }

    /// Drops an expired notice. Called once per event loop tick.
    pub fn tick_at(&mut self, now: Instant) {
        if self.visible_at(now).is_none() {
            self.current = None;
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Last notice regardless of expiry.
    pub fn last(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(notice, _)| notice)
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
