use std::sync::Mutex;
use std::time::{Duration, Instant};

use eframe::egui::Color32;

use crate::config::config::NOTICE_TTL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    /// Fixed (background, foreground) pairing per kind.
    pub fn colors(self) -> (Color32, Color32) {
        match self {
            NoticeKind::Success => (
                Color32::from_rgb(0xd4, 0xed, 0xda),
                Color32::from_rgb(0x15, 0x57, 0x24),
            ),
            NoticeKind::Error => (
                Color32::from_rgb(0xf8, 0xd7, 0xda),
                Color32::from_rgb(0x72, 0x1c, 0x24),
            ),
            NoticeKind::Info => (
                Color32::from_rgb(0xe7, 0xf3, 0xff),
                Color32::from_rgb(0x66, 0x7e, 0xea),
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    shown_at: Instant,
}

/// Single transient message cell, shared between the driver task and the
/// UI. One message at a time: a newer `show` overwrites the text and
/// restarts the expiry window, with no queueing. Last write wins.
pub struct Notifier {
    current: Mutex<Option<Notice>>,
    ttl: Duration,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            current: Mutex::new(None),
            ttl,
        }
    }

    pub fn show(&self, text: impl Into<String>, kind: NoticeKind) {
        self.show_at(text, kind, Instant::now());
    }

    /// The message to display, if any; expiry is applied lazily on read.
    pub fn current(&self) -> Option<Notice> {
        self.current_at(Instant::now())
    }

    fn show_at(&self, text: impl Into<String>, kind: NoticeKind, now: Instant) {
        let mut current = self.current.lock().unwrap();
        *current = Some(Notice {
            text: text.into(),
            kind,
            shown_at: now,
        });
    }

    fn current_at(&self, now: Instant) -> Option<Notice> {
        let mut current = self.current.lock().unwrap();
        if let Some(notice) = current.as_ref() {
            if now.duration_since(notice.shown_at) >= self.ttl {
                *current = None;
            }
        }
        current.clone()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3);

    #[test]
    fn message_is_visible_until_expiry() {
        let notifier = Notifier::with_ttl(TTL);
        let t0 = Instant::now();
        notifier.show_at("Photo captured", NoticeKind::Success, t0);

        let shown = notifier.current_at(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(shown.text, "Photo captured");
        assert_eq!(shown.kind, NoticeKind::Success);
    }

    #[test]
    fn message_auto_clears_after_ttl() {
        let notifier = Notifier::with_ttl(TTL);
        let t0 = Instant::now();
        notifier.show_at("Photo captured", NoticeKind::Success, t0);

        assert!(notifier.current_at(t0 + TTL).is_none());
        // stays cleared
        assert!(notifier.current_at(t0 + TTL).is_none());
    }

    #[test]
    fn newer_message_replaces_and_restarts_the_window() {
        let notifier = Notifier::with_ttl(TTL);
        let t0 = Instant::now();
        notifier.show_at("first", NoticeKind::Info, t0);
        notifier.show_at("second", NoticeKind::Error, t0 + Duration::from_secs(2));

        // 4s after t0 the first would have expired; the second has not
        let shown = notifier.current_at(t0 + Duration::from_secs(4)).unwrap();
        assert_eq!(shown.text, "second");
        assert_eq!(shown.kind, NoticeKind::Error);

        assert!(notifier.current_at(t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn each_kind_has_a_distinct_color_pair() {
        let pairs = [
            NoticeKind::Success.colors(),
            NoticeKind::Error.colors(),
            NoticeKind::Info.colors(),
        ];
        assert_ne!(pairs[0], pairs[1]);
        assert_ne!(pairs[1], pairs[2]);
        assert_ne!(pairs[0], pairs[2]);
    }
}
