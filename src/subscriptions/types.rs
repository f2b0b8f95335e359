//! Subscription types for live center updates.

use crate::config::DEFAULT_SUBSCRIPTION_BUFFER;
use crate::types::{Notification, NotificationId, NotificationKind};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    pub buffer_size: usize,

    /// Start with a `Snapshot` of the current notifications.
    pub include_snapshot: bool,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_SUBSCRIPTION_BUFFER,
            include_snapshot: true,
            filter: SubscriptionFilter::default(),
        }
    }
}

/// Filter criteria for subscriptions.
///
/// Filtering only ever applies to `Added` events. Read, remove, clear and
/// evict events are always delivered, and the `Snapshot` plus every
/// `unread_count` always cover all kinds.
#[derive(Clone, Debug)]
pub struct SubscriptionFilter {
    /// Restrict `Added` events to these kinds (None = all kinds).
    pub kinds: Option<Vec<NotificationKind>>,

    /// Include `Added` events at all.
    pub include_additions: bool,
}

impl Default for SubscriptionFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl SubscriptionFilter {
    /// Subscribe to everything.
    pub fn all() -> Self {
        Self {
            kinds: None,
            include_additions: true,
        }
    }

    /// Additions of specific kinds, plus all state changes.
    pub fn kinds(kinds: Vec<NotificationKind>) -> Self {
        Self {
            kinds: Some(kinds),
            include_additions: true,
        }
    }

    /// Only read/remove/clear/evict changes.
    pub fn state_changes() -> Self {
        Self {
            kinds: None,
            include_additions: false,
        }
    }
}

/// Events emitted to subscribers. Every mutation event carries the unread
/// count as of that mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CenterEvent {
    /// Current contents at subscribe time, newest first.
    Snapshot {
        notifications: Vec<Notification>,
        unread_count: usize,
    },

    // --- Mutation Events ---
    Added {
        notification: Notification,
        unread_count: usize,
    },

    Read {
        id: NotificationId,
        unread_count: usize,
    },

    AllRead {
        /// How many were unread before.
        marked: usize,
        unread_count: usize,
    },

    Removed {
        id: NotificationId,
        unread_count: usize,
    },

    Cleared {
        removed: usize,
        unread_count: usize,
    },

    /// Oldest entries dropped by the retention cap.
    Evicted {
        ids: Vec<NotificationId>,
        unread_count: usize,
    },

    // --- Lifecycle Events ---
    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl CenterEvent {
    /// Unread count carried by the event, if any.
    pub fn unread_count(&self) -> Option<usize> {
        match self {
            CenterEvent::Snapshot { unread_count, .. }
            | CenterEvent::Added { unread_count, .. }
            | CenterEvent::Read { unread_count, .. }
            | CenterEvent::AllRead { unread_count, .. }
            | CenterEvent::Removed { unread_count, .. }
            | CenterEvent::Cleared { unread_count, .. }
            | CenterEvent::Evicted { unread_count, .. } => Some(*unread_count),
            CenterEvent::Dropped { .. } => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
    /// The center was shut down.
    Shutdown,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<CenterEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<CenterEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<CenterEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<CenterEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything currently queued, in delivery order.
    pub fn drain(&self) -> Vec<CenterEvent> {
        self.receiver.try_iter().collect()
    }
}
