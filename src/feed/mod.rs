//! Simulated arrival feed.
//!
//! Stands in for a real push transport (websocket, SSE, polling). The
//! generator only ever talks to a [`NotificationSink`], so a real source can
//! replace it without touching the store or the center.
//!
//! # Example
//!
//! ```ignore
//! let generator = ArrivalGenerator::new(0.1, default_catalog(), StdRng::seed_from_u64(7))?;
//! let driver = FeedDriver::start(generator, Duration::from_secs(30), sink)?;
//! // ...
//! drop(driver); // stops and joins the ticker thread
//! ```

pub mod catalog;
mod driver;
mod generator;

pub use catalog::{default_catalog, panel_fixtures, MessageTemplate, SeedNotification};
pub use driver::FeedDriver;
pub use generator::ArrivalGenerator;

use crate::error::Result;
use crate::store::NotificationStore;
use crate::types::{Notification, NotificationInput};
use parking_lot::Mutex;

/// Destination for synthesized notifications.
pub trait NotificationSink: Send + Sync {
    fn push(&self, input: NotificationInput) -> Result<Notification>;
}

impl NotificationSink for Mutex<NotificationStore> {
    fn push(&self, input: NotificationInput) -> Result<Notification> {
        self.lock().add(input)
    }
}
