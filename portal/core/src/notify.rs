//! Transient success toasts.
//!
//! Each toast is a message with an expiry time. The queue is pruned against a
//! clock supplied by the caller so rendering stays deterministic.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::VecDeque;

/// How long a toast stays on screen.
pub const TOAST_LIFETIME_SECS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    /// Queues a toast, dropping any that expired by `now`.
    pub fn push(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.prune(now);
        self.queue.push_back(Notification {
            message: message.into(),
            expires_at: now + TimeDelta::seconds(TOAST_LIFETIME_SECS),
        });
    }

    /// Drops every toast that has expired by `now`.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.queue.retain(|notification| notification.expires_at > now);
    }

    /// Toasts still visible at `now`, oldest first.
    pub fn visible(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Notification> {
        self.queue
            .iter()
            .filter(move |notification| notification.expires_at > now)
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let start = Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap();
        let mut toasts = Notifications::default();

        toasts.push("Volunteer added successfully!", start);
        toasts.push("Event created successfully!", start + TimeDelta::seconds(2));

        let later = start + TimeDelta::seconds(TOAST_LIFETIME_SECS);
        let visible: Vec<_> = toasts.visible(later).map(|n| n.message.as_str()).collect();
        assert_eq!(visible, vec!["Event created successfully!"]);

        toasts.prune(later);
        assert_eq!(toasts.len(), 1);

        toasts.prune(later + TimeDelta::seconds(10));
        assert!(toasts.is_empty());
    }

    #[test]
    fn pushing_drops_expired_toasts() {
        let start = Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap();
        let mut toasts = Notifications::default();

        for second in 0..5 {
            toasts.push("Task assigned successfully!", start + TimeDelta::seconds(second * 10));
        }

        assert_eq!(toasts.len(), 1);
    }
}
