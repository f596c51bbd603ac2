//! Transient banners shown after an action completes.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long an error banner stays up.
pub const ERROR_TTL: Duration = Duration::from_secs(5);

/// How long a success toast stays up.
pub const SUCCESS_TTL: Duration = Duration::from_secs(3);

const MAX_QUEUED: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NoticeKind,
    pub message: String,
    pub created: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= self.ttl
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message.into(), SUCCESS_TTL);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message.into(), ERROR_TTL);
    }

    fn push(&mut self, kind: NoticeKind, message: String, ttl: Duration) {
        self.items.push_back(Notification {
            kind,
            message,
            created: Instant::now(),
            ttl,
        });
        while self.items.len() > MAX_QUEUED {
            self.items.pop_front();
        }
    }

    /// Drops every banner whose time is up.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired(now));
    }

    /// Dismisses the newest banner.
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.items.pop_back()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Notification> + '_ {
        self.items.drain(..)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_banner_expires_after_five_seconds() {
        let mut notes = Notifications::new();
        notes.error("Failed to load data from server");
        let created = notes.latest().unwrap().created;

        notes.prune(created + Duration::from_millis(4_900));
        assert_eq!(notes.len(), 1);

        notes.prune(created + ERROR_TTL);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_success_toast_expires_before_error() {
        let mut notes = Notifications::new();
        notes.error("boom");
        notes.success("saved");
        let created = notes.iter().next().unwrap().created;

        notes.prune(created + SUCCESS_TTL + Duration::from_millis(50));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.latest().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut notes = Notifications::new();
        for i in 0..20 {
            notes.success(format!("note {}", i));
        }
        assert_eq!(notes.len(), MAX_QUEUED);
        assert_eq!(notes.dismiss().unwrap().message, "note 19");
    }
}
