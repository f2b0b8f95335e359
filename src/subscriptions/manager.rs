//! Subscription manager for broadcasting center events.

use crate::types::{Notification, NotificationId};
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use super::types::{
    CenterEvent, DropReason, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<CenterEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if buffer is full or the
    /// receiver is gone (subscriber will be dropped).
    fn try_send(&self, event: CenterEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    fn wants_addition(&self, notification: &Notification) -> bool {
        if !self.config.filter.include_additions {
            return false;
        }

        match self.config.filter.kinds {
            Some(ref kinds) => kinds.contains(&notification.kind),
            None => true,
        }
    }
}

/// Manages subscriptions and broadcasts events.
///
/// Callers serialize broadcasts (the center holds its store lock while
/// broadcasting), so each subscriber sees events in mutation order.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        debug!(subscription = id.0, "subscriber registered");
        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.drop_subscription(id, DropReason::Unsubscribed);
    }

    /// Drop every subscriber, telling each why.
    pub fn close_all(&self, reason: DropReason) {
        let drained: Vec<_> = self.subscriptions.write().drain().collect();
        for (_, sub) in drained {
            let _ = sub.sender.try_send(CenterEvent::Dropped {
                reason: reason.clone(),
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Send an event directly to one subscription (for the initial snapshot).
    /// Returns false if the subscription was dropped.
    pub fn send_to(&self, id: SubscriptionId, event: CenterEvent) -> bool {
        let delivered = match self.subscriptions.read().get(&id) {
            Some(sub) => sub.try_send(event),
            None => return false,
        };
        if !delivered {
            self.drop_subscription(id, DropReason::BufferOverflow);
        }
        delivered
    }

    /// Whether the subscription asked for an initial snapshot.
    pub fn wants_snapshot(&self, id: SubscriptionId) -> bool {
        self.subscriptions
            .read()
            .get(&id)
            .is_some_and(|s| s.config.include_snapshot)
    }

    // --- Broadcasting ---

    pub fn broadcast_added(&self, notification: &Notification, unread_count: usize) {
        let event = CenterEvent::Added {
            notification: notification.clone(),
            unread_count,
        };
        self.broadcast(|sub| sub.wants_addition(notification), event);
    }

    pub fn broadcast_read(&self, id: NotificationId, unread_count: usize) {
        let event = CenterEvent::Read { id, unread_count };
        self.broadcast(|_| true, event);
    }

    pub fn broadcast_all_read(&self, marked: usize, unread_count: usize) {
        let event = CenterEvent::AllRead {
            marked,
            unread_count,
        };
        self.broadcast(|_| true, event);
    }

    pub fn broadcast_removed(&self, id: NotificationId, unread_count: usize) {
        let event = CenterEvent::Removed { id, unread_count };
        self.broadcast(|_| true, event);
    }

    pub fn broadcast_cleared(&self, removed: usize, unread_count: usize) {
        let event = CenterEvent::Cleared {
            removed,
            unread_count,
        };
        self.broadcast(|_| true, event);
    }

    pub fn broadcast_evicted(&self, ids: Vec<NotificationId>, unread_count: usize) {
        let event = CenterEvent::Evicted { ids, unread_count };
        self.broadcast(|_| true, event);
    }

    /// Internal broadcast helper. Drops subscribers that fail to receive.
    fn broadcast<F>(&self, filter: F, event: CenterEvent)
    where
        F: Fn(&Subscription) -> bool,
    {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if filter(sub) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        for id in to_remove {
            self.drop_subscription(id, DropReason::BufferOverflow);
        }
    }

    fn drop_subscription(&self, id: SubscriptionId, reason: DropReason) {
        let removed = self.subscriptions.write().remove(&id);
        if let Some(sub) = removed {
            if reason == DropReason::BufferOverflow {
                warn!(subscription = id.0, "dropping slow subscriber");
            } else {
                debug!(subscription = id.0, ?reason, "subscriber removed");
            }
            // Best effort; the buffer may be exactly what is full.
            let _ = sub.sender.try_send(CenterEvent::Dropped { reason });
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
