//! Transient user notices
//!
//! Short messages shown in the status bar for a fixed time, then cleared.
//! A new notice replaces the one currently shown.

use std::time::{Duration, Instant};

/// How long a notice stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLength {
    Short,
    Long,
}

impl NoticeLength {
    pub fn duration(self) -> Duration {
        match self {
            Self::Short => Duration::from_millis(2000),
            Self::Long => Duration::from_millis(3500),
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveNotice {
    message: String,
    expires_at: Instant,
}

/// Currently visible notice, if any
#[derive(Debug, Default, Clone)]
pub struct Notices {
    active: Option<ActiveNotice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, length: NoticeLength) {
        self.show_at(message, length, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, length: NoticeLength, now: Instant) {
        let message = message.into();
        log::info!("Notice: {}", message);
        self.active = Some(ActiveNotice {
            message,
            expires_at: now + length.duration(),
        });
    }

    /// Drop the notice if it has expired. Returns true if one was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.active {
            Some(ref notice) if now >= notice.expires_at => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.active.as_ref().map(|n| n.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_duration() {
        let start = Instant::now();
        let mut notices = Notices::new();
        notices.show_at("Conversion failed", NoticeLength::Short, start);

        assert!(!notices.expire(start + Duration::from_millis(1999)));
        assert_eq!(notices.current(), Some("Conversion failed"));

        assert!(notices.expire(start + Duration::from_millis(2000)));
        assert!(notices.current().is_none());
    }

    #[test]
    fn test_long_outlasts_short() {
        assert!(NoticeLength::Long.duration() > NoticeLength::Short.duration());
    }

    #[test]
    fn test_new_notice_replaces_current() {
        let start = Instant::now();
        let mut notices = Notices::new();
        notices.show_at("first", NoticeLength::Long, start);
        notices.show_at("second", NoticeLength::Short, start);
        assert_eq!(notices.current(), Some("second"));
    }

    #[test]
    fn test_expire_with_nothing_shown() {
        let mut notices = Notices::new();
        assert!(!notices.expire(Instant::now()));
    }
}
