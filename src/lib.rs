//! # Notification Center
//!
//! An in-process store of notification events with a read/unread lifecycle,
//! live subscriptions for display surfaces, and a simulated arrival feed that
//! stands in for a future push transport.
//!
//! ## Core Concepts
//!
//! - **Store**: Insertion-ordered notifications, read newest first
//! - **Feed**: A cancellable ticker that probabilistically synthesizes arrivals
//! - **Center**: The facade that owns both and gates access on its lifecycle
//! - **Subscriptions**: Ordered mutation events for panels and badges
//!
//! ## Example
//!
//! ```ignore
//! use notification_center::{
//!     CenterConfig, NotificationCenter, NotificationKind, SubscriptionFilter,
//! };
//!
//! let center = NotificationCenter::new(CenterConfig::default())?;
//! center.start()?;
//!
//! let badge = center.subscribe(SubscriptionFilter::all())?;
//!
//! let n = center.add_notification(
//!     NotificationKind::Warning,
//!     "System Maintenance",
//!     "Scheduled maintenance in 2 hours",
//!     None,
//! )?;
//! center.mark_as_read(n.id)?;
//!
//! center.shutdown();
//! ```

pub mod center;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use center::NotificationCenter;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CenterConfig, GeneratorConfig};
pub use error::{CenterError, Result};
pub use feed::{
    default_catalog, panel_fixtures, ArrivalGenerator, FeedDriver, MessageTemplate,
    NotificationSink, SeedNotification,
};
pub use store::NotificationStore;
pub use subscriptions::{
    CenterEvent, DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
