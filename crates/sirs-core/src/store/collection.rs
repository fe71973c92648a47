// ── Snapshot entity collection ──
//
// Holds one entity type as a wholesale snapshot. Lists are never patched in
// place: each successful fetch replaces the whole collection, and responses
// that belong to a request older than the one already applied are dropped.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::warn;

use super::RequestTicket;
use crate::model::{Entity, EntityId};

pub(crate) struct EntityCollection<T: Entity + Send + Sync + 'static> {
    /// Lookup index by id.
    by_id: DashMap<EntityId, Arc<T>>,

    /// Ticket of the snapshot currently applied (0 = nothing yet).
    applied: Mutex<u64>,

    /// Server-ordered snapshot pushed to subscribers.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Entity + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_id: DashMap::new(),
            applied: Mutex::new(0),
            snapshot,
        }
    }

    /// Replace the collection with `items` fetched under `ticket`.
    ///
    /// Returns `false` (and changes nothing) when a newer snapshot has
    /// already been applied.
    pub(crate) fn replace(&self, ticket: RequestTicket, items: Vec<T>) -> bool {
        let mut applied = self.applied.lock().expect("collection lock poisoned");
        if ticket.0 <= *applied {
            warn!(
                ticket = ticket.0,
                applied = *applied,
                "discarding stale response"
            );
            return false;
        }
        *applied = ticket.0;

        let values: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        self.by_id.clear();
        for value in &values {
            self.by_id.insert(value.id(), Arc::clone(value));
        }
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(values));
        true
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<Arc<T>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::product;

    #[test]
    fn replace_swaps_the_whole_list() {
        let col = EntityCollection::new();
        assert!(col.replace(RequestTicket(1), vec![product(1, "1", "1"), product(2, "1", "1")]));
        assert!(col.replace(RequestTicket(2), vec![product(3, "1", "1")]));

        assert_eq!(col.len(), 1);
        assert!(col.get(EntityId::new(1)).is_none());
        assert_eq!(col.snapshot()[0].id, EntityId::new(3));
    }

    #[test]
    fn stale_tickets_are_discarded() {
        let col = EntityCollection::new();
        assert!(col.replace(RequestTicket(5), vec![product(1, "1", "1")]));
        assert!(!col.replace(RequestTicket(4), vec![product(2, "1", "1")]));
        assert!(!col.replace(RequestTicket(5), vec![]));

        assert_eq!(col.snapshot().len(), 1);
        assert!(col.get(EntityId::new(1)).is_some());
    }

    #[test]
    fn subscribers_see_new_snapshots() {
        let col = EntityCollection::new();
        let mut rx = col.subscribe();
        col.replace(RequestTicket(1), vec![product(1, "1", "1")]);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
