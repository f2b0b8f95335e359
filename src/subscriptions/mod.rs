//! Subscription system for live center updates.
//!
//! Display surfaces (panel, badge, activity feed) subscribe instead of
//! polling. Subscriptions support:
//! - An initial snapshot of current notifications
//! - Filtering additions by kind
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let handle = center.subscribe_with(SubscriptionConfig::default())?;
//!
//! loop {
//!     match handle.recv() {
//!         Ok(CenterEvent::Snapshot { notifications, .. }) => render(notifications),
//!         Ok(CenterEvent::Added { notification, unread_count }) => badge(unread_count),
//!         Ok(CenterEvent::Dropped { .. }) | Err(_) => break,
//!         Ok(_) => {}
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    CenterEvent, DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
