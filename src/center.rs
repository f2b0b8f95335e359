//! The notification center facade.
//!
//! Composes the store, the subscription manager and the simulated feed, and
//! owns the feed's lifecycle. Every query and command requires a started
//! center; the lifecycle is `Idle -> Running -> ShutDown` and shutdown is
//! terminal.

use crate::clock::{Clock, SystemClock};
use crate::config::CenterConfig;
use crate::error::{CenterError, Result};
use crate::feed::{ArrivalGenerator, FeedDriver, NotificationSink, SeedNotification};
use crate::store::NotificationStore;
use crate::subscriptions::{
    CenterEvent, DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
use crate::types::{
    Notification, NotificationId, NotificationInput, NotificationKind, NotificationSummary,
};
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    ShutDown,
}

struct CenterState {
    lifecycle: Lifecycle,
    store: NotificationStore,
}

/// State shared with the feed thread.
///
/// Every mutation takes the write lock, applies the change, and broadcasts
/// before releasing it, so subscribers see events in mutation order.
struct CenterCore {
    state: RwLock<CenterState>,
    subscriptions: SubscriptionManager,
    max_retained: Option<usize>,
}

impl CenterCore {
    fn read(&self) -> Result<RwLockReadGuard<'_, CenterState>> {
        let state = self.state.read();
        if state.lifecycle != Lifecycle::Running {
            return Err(CenterError::NotInitialized);
        }
        Ok(state)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CenterState>> {
        let state = self.state.write();
        if state.lifecycle != Lifecycle::Running {
            return Err(CenterError::NotInitialized);
        }
        Ok(state)
    }

    fn add(&self, input: NotificationInput) -> Result<Notification> {
        let mut state = self.write()?;
        let notification = state.store.add(input)?;
        self.publish_added(&mut state, &notification);
        Ok(notification)
    }

    /// Apply the retention cap, then announce the new entry and any
    /// evictions with the unread count left after both.
    fn publish_added(&self, state: &mut CenterState, notification: &Notification) {
        let evicted = match self.max_retained {
            Some(max) => state.store.trim_to(max),
            None => Vec::new(),
        };
        let unread_count = state.store.unread_count();

        self.subscriptions.broadcast_added(notification, unread_count);

        if !evicted.is_empty() {
            debug!(count = evicted.len(), "evicted oldest notifications");
            let ids = evicted.into_iter().map(|n| n.id).collect();
            self.subscriptions.broadcast_evicted(ids, unread_count);
        }
    }

    fn mark_as_read(&self, id: NotificationId) -> Result<bool> {
        let mut state = self.write()?;
        let changed = state.store.mark_as_read(id);
        if changed {
            debug!(id = %id, "notification marked read");
            self.subscriptions
                .broadcast_read(id, state.store.unread_count());
        }
        Ok(changed)
    }
}

impl NotificationSink for CenterCore {
    fn push(&self, input: NotificationInput) -> Result<Notification> {
        self.add(input)
    }
}

/// Process-wide access point for notifications.
///
/// Construct one and hand out references (or an `Arc`) to every consumer.
/// Independent instances share nothing, which keeps tests isolated.
///
/// # Example
///
/// ```ignore
/// let center = NotificationCenter::new(CenterConfig::default())?;
/// center.start()?;
///
/// let n = center.add_notification(
///     NotificationKind::Warning,
///     "System Maintenance",
///     "Scheduled maintenance in 2 hours",
///     None,
/// )?;
/// assert_eq!(center.unread_count()?, 1);
///
/// center.mark_as_read(n.id)?;
/// center.shutdown();
/// ```
pub struct NotificationCenter {
    config: CenterConfig,
    core: Arc<CenterCore>,
    /// Also serializes start/shutdown.
    feed: Mutex<Option<FeedDriver>>,
}

impl NotificationCenter {
    /// Create an idle center stamped by the system clock.
    pub fn new(config: CenterConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an idle center stamped by the given clock.
    pub fn with_clock(config: CenterConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let core = CenterCore {
            state: RwLock::new(CenterState {
                lifecycle: Lifecycle::Idle,
                store: NotificationStore::with_clock(clock),
            }),
            subscriptions: SubscriptionManager::new(),
            max_retained: config.max_retained,
        };

        Ok(Self {
            config,
            core: Arc::new(core),
            feed: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    // --- Lifecycle ---

    /// Start the center and, if enabled, the simulated feed.
    ///
    /// Starting a running center is a no-op; starting a shut-down center
    /// fails with [`CenterError::ShutDown`].
    pub fn start(&self) -> Result<()> {
        let mut feed = self.feed.lock();

        {
            let mut state = self.core.state.write();
            match state.lifecycle {
                Lifecycle::Running => {
                    debug!("notification center already running");
                    return Ok(());
                }
                Lifecycle::ShutDown => return Err(CenterError::ShutDown),
                Lifecycle::Idle => state.lifecycle = Lifecycle::Running,
            }
        }

        if self.config.generator.enabled {
            match self.spawn_feed() {
                Ok(driver) => *feed = Some(driver),
                Err(e) => {
                    self.core.state.write().lifecycle = Lifecycle::Idle;
                    return Err(e);
                }
            }
        }

        info!(
            feed = self.config.generator.enabled,
            max_retained = ?self.config.max_retained,
            "notification center started"
        );
        Ok(())
    }

    /// Stop the feed, drop all subscribers and refuse further use.
    ///
    /// Once this returns no feed tick can fire. Idempotent.
    pub fn shutdown(&self) {
        let mut feed = self.feed.lock();

        if let Some(mut driver) = feed.take() {
            driver.stop();
        }

        let previous = {
            let mut state = self.core.state.write();
            std::mem::replace(&mut state.lifecycle, Lifecycle::ShutDown)
        };

        if previous != Lifecycle::ShutDown {
            self.core.subscriptions.close_all(DropReason::Shutdown);
            info!("notification center shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.core.state.read().lifecycle == Lifecycle::Running
    }

    /// Whether the simulated feed thread is alive.
    pub fn is_feed_running(&self) -> bool {
        self.feed.lock().as_ref().is_some_and(FeedDriver::is_running)
    }

    fn spawn_feed(&self) -> Result<FeedDriver> {
        let generator_config = &self.config.generator;
        let rng = match generator_config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let generator = ArrivalGenerator::from_config(generator_config, rng)?;
        let sink: Arc<dyn NotificationSink> = self.core.clone();
        FeedDriver::start(generator, generator_config.tick_interval(), sink)
    }

    /// Where an external transport (or a hand-driven generator) pushes
    /// notifications. Pushes fail with `NotInitialized` outside `Running`.
    pub fn sink(&self) -> Arc<dyn NotificationSink> {
        self.core.clone()
    }

    // --- Queries ---

    /// Snapshot, newest first.
    pub fn notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.core.read()?.store.list())
    }

    /// Unread notifications, newest first.
    pub fn unread(&self) -> Result<Vec<Notification>> {
        Ok(self.core.read()?.store.unread())
    }

    pub fn unread_count(&self) -> Result<usize> {
        Ok(self.core.read()?.store.unread_count())
    }

    pub fn get(&self, id: NotificationId) -> Result<Option<Notification>> {
        Ok(self.core.read()?.store.get(id).cloned())
    }

    pub fn summary(&self) -> Result<NotificationSummary> {
        Ok(self.core.read()?.store.summary())
    }

    // --- Commands ---

    /// Add a new unread notification as the newest entry.
    pub fn add_notification(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        action_url: Option<String>,
    ) -> Result<Notification> {
        let input = NotificationInput {
            kind,
            title: title.into(),
            message: message.into(),
            action_url,
        };
        self.core.add(input)
    }

    pub fn push(&self, input: NotificationInput) -> Result<Notification> {
        self.core.add(input)
    }

    /// Load fixtures in order as one mutation.
    ///
    /// Each fixture is stamped `age` before now and inserted with its read
    /// flag already set. A blank fixture rejects the whole batch.
    pub fn seed(
        &self,
        fixtures: impl IntoIterator<Item = SeedNotification>,
    ) -> Result<Vec<Notification>> {
        let fixtures: Vec<SeedNotification> = fixtures.into_iter().collect();
        for fixture in &fixtures {
            fixture.input.validate()?;
        }

        let mut state = self.core.write()?;
        let mut seeded = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            let notification = state
                .store
                .add_seeded(fixture.input, fixture.age, fixture.read)?;
            self.core.publish_added(&mut state, &notification);
            seeded.push(notification);
        }

        debug!(count = seeded.len(), "notifications seeded");
        Ok(seeded)
    }

    /// Mark one notification read. Returns true if it was unread.
    ///
    /// Unknown or already-read ids are accepted silently.
    pub fn mark_as_read(&self, id: NotificationId) -> Result<bool> {
        self.core.mark_as_read(id)
    }

    /// Returns how many notifications were unread before.
    pub fn mark_all_as_read(&self) -> Result<usize> {
        let mut state = self.core.write()?;
        let marked = state.store.mark_all_as_read();
        if marked > 0 {
            debug!(marked, "all notifications marked read");
            self.core.subscriptions.broadcast_all_read(marked, 0);
        }
        Ok(marked)
    }

    /// Returns true if a notification was removed.
    pub fn remove_notification(&self, id: NotificationId) -> Result<bool> {
        let mut state = self.core.write()?;
        let removed = state.store.remove(id).is_some();
        if removed {
            debug!(id = %id, "notification removed");
            self.core
                .subscriptions
                .broadcast_removed(id, state.store.unread_count());
        }
        Ok(removed)
    }

    /// Returns how many notifications were removed.
    pub fn clear_all(&self) -> Result<usize> {
        let mut state = self.core.write()?;
        let removed = state.store.clear();
        if removed > 0 {
            debug!(removed, "notifications cleared");
            self.core.subscriptions.broadcast_cleared(removed, 0);
        }
        Ok(removed)
    }

    // --- Subscriptions ---

    /// Subscribe with the center's buffer size and an initial snapshot.
    pub fn subscribe(&self, filter: SubscriptionFilter) -> Result<SubscriptionHandle> {
        self.subscribe_with(SubscriptionConfig {
            buffer_size: self.config.subscription_buffer,
            include_snapshot: true,
            filter,
        })
    }

    pub fn subscribe_with(&self, config: SubscriptionConfig) -> Result<SubscriptionHandle> {
        // Holding the read lock keeps mutations (and their broadcasts) out
        // until the snapshot is queued.
        let state = self.core.read()?;
        let handle = self.core.subscriptions.subscribe(config);

        if self.core.subscriptions.wants_snapshot(handle.id) {
            self.core.subscriptions.send_to(
                handle.id,
                CenterEvent::Snapshot {
                    notifications: state.store.list(),
                    unread_count: state.store.unread_count(),
                },
            );
        }

        Ok(handle)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.core.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.core.subscriptions.subscription_count()
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
