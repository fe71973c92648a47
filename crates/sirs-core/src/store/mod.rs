// ── Central data store ──
//
// One snapshot collection per entity type, a monotonic request counter,
// and the last fetch outcome. Consumers read snapshots or subscribe to
// `watch` channels; only the controller writes.

mod collection;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use collection::EntityCollection;

use crate::model::{
    Category, Delivery, EntityId, Notification, Product, ServiceRequest, User,
};

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(pub(crate) u64);

/// Outcome of the most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Ok { at: DateTime<Utc> },
    /// The fetch failed; the previous snapshot is still being served.
    Failed { message: String, at: DateTime<Utc> },
}

pub struct DataStore {
    pub(crate) products: EntityCollection<Product>,
    pub(crate) categories: EntityCollection<Category>,
    pub(crate) users: EntityCollection<User>,
    pub(crate) service_requests: EntityCollection<ServiceRequest>,
    pub(crate) deliveries: EntityCollection<Delivery>,
    pub(crate) notifications: EntityCollection<Notification>,
    next_ticket: AtomicU64,
    fetch_status: watch::Sender<FetchStatus>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    pub fn new() -> Self {
        let (fetch_status, _) = watch::channel(FetchStatus::Idle);
        Self {
            products: EntityCollection::new(),
            categories: EntityCollection::new(),
            users: EntityCollection::new(),
            service_requests: EntityCollection::new(),
            deliveries: EntityCollection::new(),
            notifications: EntityCollection::new(),
            next_ticket: AtomicU64::new(1),
            fetch_status,
        }
    }

    /// Issue the ticket for a fetch that is about to start.
    pub fn issue_ticket(&self) -> RequestTicket {
        RequestTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed))
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn products_snapshot(&self) -> Arc<Vec<Arc<Product>>> {
        self.products.snapshot()
    }

    pub fn categories_snapshot(&self) -> Arc<Vec<Arc<Category>>> {
        self.categories.snapshot()
    }

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    pub fn service_requests_snapshot(&self) -> Arc<Vec<Arc<ServiceRequest>>> {
        self.service_requests.snapshot()
    }

    pub fn deliveries_snapshot(&self) -> Arc<Vec<Arc<Delivery>>> {
        self.deliveries.snapshot()
    }

    pub fn notifications_snapshot(&self) -> Arc<Vec<Arc<Notification>>> {
        self.notifications.snapshot()
    }

    pub fn product(&self, id: EntityId) -> Option<Arc<Product>> {
        self.products.get(id)
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_products(&self) -> watch::Receiver<Arc<Vec<Arc<Product>>>> {
        self.products.subscribe()
    }

    pub fn subscribe_categories(&self) -> watch::Receiver<Arc<Vec<Arc<Category>>>> {
        self.categories.subscribe()
    }

    pub fn subscribe_fetch_status(&self) -> watch::Receiver<FetchStatus> {
        self.fetch_status.subscribe()
    }

    pub fn fetch_status(&self) -> FetchStatus {
        self.fetch_status.borrow().clone()
    }

    // ── Writers ──────────────────────────────────────────────────────

    pub(crate) fn apply_products(&self, ticket: RequestTicket, items: Vec<Product>) -> bool {
        self.products.replace(ticket, items)
    }

    pub(crate) fn apply_categories(&self, ticket: RequestTicket, items: Vec<Category>) -> bool {
        self.categories.replace(ticket, items)
    }

    pub(crate) fn apply_users(&self, ticket: RequestTicket, items: Vec<User>) -> bool {
        self.users.replace(ticket, items)
    }

    pub(crate) fn apply_service_requests(
        &self,
        ticket: RequestTicket,
        items: Vec<ServiceRequest>,
    ) -> bool {
        self.service_requests.replace(ticket, items)
    }

    pub(crate) fn apply_deliveries(&self, ticket: RequestTicket, items: Vec<Delivery>) -> bool {
        self.deliveries.replace(ticket, items)
    }

    pub(crate) fn apply_notifications(
        &self,
        ticket: RequestTicket,
        items: Vec<Notification>,
    ) -> bool {
        self.notifications.replace(ticket, items)
    }

    pub(crate) fn record_success(&self) {
        self.fetch_status
            .send_replace(FetchStatus::Ok { at: Utc::now() });
    }

    pub(crate) fn record_failure(&self, message: String) {
        self.fetch_status.send_replace(FetchStatus::Failed {
            message,
            at: Utc::now(),
        });
    }
}
