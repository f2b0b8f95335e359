//! Static message catalog and dashboard fixtures.

use crate::types::{NotificationInput, NotificationKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A title/message pair the generator can emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub title: String,
    pub message: String,
}

impl MessageTemplate {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// University-administration events used when no catalog is configured.
pub fn default_catalog() -> Vec<MessageTemplate> {
    vec![
        MessageTemplate::new(
            "New Student Registration",
            "A new student has registered for admission.",
        ),
        MessageTemplate::new(
            "Course Enrollment Full",
            "CS101 course has reached maximum capacity.",
        ),
        MessageTemplate::new("System Maintenance", "Scheduled maintenance in 2 hours."),
        MessageTemplate::new(
            "Grade Submission Due",
            "Final grades for Spring semester due tomorrow.",
        ),
        MessageTemplate::new(
            "Payment Received",
            "Tuition payment received from student ID: 2024001.",
        ),
    ]
}

/// A notification to preload, optionally already read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedNotification {
    pub input: NotificationInput,
    pub read: bool,
    /// How long before seeding it was created.
    pub age: Duration,
}

/// What the dashboard panel shows before any live event arrives.
///
/// Listed oldest first, so after seeding the panel reads newest first.
pub fn panel_fixtures() -> Vec<SeedNotification> {
    vec![
        SeedNotification {
            input: NotificationInput::new(
                NotificationKind::Info,
                "Fee Payment Reminder",
                "Semester fees due in 7 days",
            ),
            read: true,
            age: Duration::from_secs(4 * 60 * 60),
        },
        SeedNotification {
            input: NotificationInput::new(
                NotificationKind::Success,
                "New Student Registration",
                "5 new students registered today",
            ),
            read: false,
            age: Duration::from_secs(2 * 60 * 60),
        },
        SeedNotification {
            input: NotificationInput::new(
                NotificationKind::Warning,
                "System Maintenance",
                "Scheduled maintenance in 2 hours",
            ),
            read: false,
            age: Duration::from_secs(30 * 60),
        },
    ]
}
