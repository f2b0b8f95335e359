//! Core types for the notification center.

use crate::error::{CenterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a notification.
///
/// Assigned by the store from a monotonic counter; never reused for the
/// lifetime of the store, even after removal or clearing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Debug for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotificationId({})", self.0)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        Timestamp(duration.as_micros() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Severity of a notification. Closed set, no unknown variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Every kind, in declaration order.
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Info,
        NotificationKind::Success,
        NotificationKind::Warning,
        NotificationKind::Error,
    ];

    /// Icon shown next to the notification in the panel.
    pub fn glyph(self) -> &'static str {
        match self {
            NotificationKind::Success => "✓",
            NotificationKind::Warning => "⚠",
            NotificationKind::Error => "✕",
            NotificationKind::Info => "ℹ",
        }
    }

    /// Accent colour name used for the icon badge.
    pub fn accent(self) -> &'static str {
        match self {
            NotificationKind::Success => "green",
            NotificationKind::Warning => "yellow",
            NotificationKind::Error => "red",
            NotificationKind::Info => "blue",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notification held by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier (assigned by store).
    pub id: NotificationId,

    pub kind: NotificationKind,

    /// Short label, never empty.
    pub title: String,

    /// Body text, never empty.
    pub message: String,

    /// When the store accepted the notification.
    pub created_at: Timestamp,

    /// Only ever flips from `false` to `true`.
    pub read: bool,

    /// Opaque link for consumers; not interpreted by the center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// Input for creating a new notification (before id/timestamp assigned).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationInput {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub action_url: Option<String>,
}

impl NotificationInput {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action_url: None,
        }
    }

    /// Attach an action link.
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Reject blank titles and messages.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CenterError::EmptyField("title"));
        }
        if self.message.trim().is_empty() {
            return Err(CenterError::EmptyField("message"));
        }
        Ok(())
    }
}

/// Counts backing badges and panel headers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub total: usize,
    pub unread: usize,
    /// Unread notifications per kind. Kinds with no unread entries are absent.
    pub unread_by_kind: BTreeMap<NotificationKind, usize>,
}
