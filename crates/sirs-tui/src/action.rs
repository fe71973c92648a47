//! Actions flowing through the app loop.

use std::fmt;
use std::sync::Arc;

use sirs_core::{BulkOutcome, EntityId, FetchStatus, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    /// Errors stay until dismissed; successes time out.
    pub fn is_sticky(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Pending confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteProducts { ids: Vec<EntityId> },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteProducts { ids } => match ids.as_slice() {
                [one] => write!(f, "Delete product #{one}?"),
                many => write!(f, "Delete {} products?", many.len()),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──────────────────────────────────────────────────
    ToggleHelp,
    DismissNotification,
    Notify(Notification),

    // ── Data (from the bridge) ─────────────────────────────────────
    ProductsUpdated(Arc<Vec<Arc<Product>>>),
    FetchStarted,
    FetchStatusChanged(FetchStatus),
    Refresh,

    // ── Commands ──────────────────────────────────────────────────
    RequestDelete(Vec<EntityId>),
    ConfirmYes,
    ConfirmNo,
    DeleteFinished(BulkOutcome),
}
