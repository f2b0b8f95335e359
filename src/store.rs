//! The canonical in-memory collection of notifications.
//!
//! Records are kept in insertion order (oldest first). Newest-first is
//! produced when reading, never by reordering storage.

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::types::{
    Notification, NotificationId, NotificationInput, NotificationSummary, Timestamp,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Ordered notification storage with an incrementally maintained unread count.
pub struct NotificationStore {
    /// Insertion order, oldest at the front.
    entries: VecDeque<Notification>,

    /// Next id to hand out. Only ever grows.
    next_id: u64,

    /// Number of entries with `read == false`.
    unread: usize,

    clock: Arc<dyn Clock>,
}

impl NotificationStore {
    /// Create an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store stamped by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
            unread: 0,
            clock,
        }
    }

    // --- Mutations ---

    /// Insert a new unread notification as the logically newest entry.
    ///
    /// Fails only if the title or message is blank.
    pub fn add(&mut self, input: NotificationInput) -> Result<Notification> {
        self.insert(input, Duration::ZERO, false)
    }

    /// Insert as the newest entry, stamped `age` before now and optionally
    /// already read. Used for preloading history.
    pub fn add_seeded(
        &mut self,
        input: NotificationInput,
        age: Duration,
        read: bool,
    ) -> Result<Notification> {
        self.insert(input, age, read)
    }

    fn insert(
        &mut self,
        input: NotificationInput,
        age: Duration,
        read: bool,
    ) -> Result<Notification> {
        input.validate()?;

        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let now = self.clock.now();
        let notification = Notification {
            id,
            kind: input.kind,
            title: input.title,
            message: input.message,
            created_at: Timestamp(now.0.saturating_sub(age.as_micros() as i64)),
            read,
            action_url: input.action_url,
        };

        self.entries.push_back(notification.clone());
        if !read {
            self.unread += 1;
        }

        debug!(id = %id, kind = %notification.kind, read, "notification added");
        Ok(notification)
    }

    /// Mark one notification read. Returns true if it was unread before.
    ///
    /// Unknown ids and already-read entries are no-ops.
    pub fn mark_as_read(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.read => {
                n.read = true;
                self.unread -= 1;
                true
            }
            _ => false,
        }
    }

    /// Mark every notification read. Returns how many changed.
    pub fn mark_all_as_read(&mut self) -> usize {
        let marked = self.unread;
        if marked > 0 {
            for n in self.entries.iter_mut() {
                n.read = true;
            }
            self.unread = 0;
        }
        marked
    }

    /// Delete one notification, returning it if present.
    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let pos = self.entries.iter().position(|n| n.id == id)?;
        let removed = self.entries.remove(pos)?;
        if !removed.read {
            self.unread -= 1;
        }
        Some(removed)
    }

    /// Delete everything. Returns how many entries were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.unread = 0;
        removed
    }

    /// Evict the oldest entries until at most `max` remain.
    ///
    /// Returns the evicted notifications, oldest first.
    pub fn trim_to(&mut self, max: usize) -> Vec<Notification> {
        let excess = self.entries.len().saturating_sub(max);
        let evicted: Vec<Notification> = self.entries.drain(..excess).collect();
        self.unread -= evicted.iter().filter(|n| !n.read).count();
        evicted
    }

    // --- Queries ---

    /// Snapshot, newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.iter().cloned().collect()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> + '_ {
        self.entries.iter().rev()
    }

    /// Unread notifications, newest first.
    pub fn unread(&self) -> Vec<Notification> {
        self.iter().filter(|n| !n.read).cloned().collect()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Totals plus unread counts per kind.
    pub fn summary(&self) -> NotificationSummary {
        let mut summary = NotificationSummary {
            total: self.entries.len(),
            unread: self.unread,
            ..Default::default()
        };
        for n in self.entries.iter().filter(|n| !n.read) {
            *summary.unread_by_kind.entry(n.kind).or_insert(0) += 1;
        }
        summary
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
