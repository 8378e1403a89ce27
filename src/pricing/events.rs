//! Catalog change notifications
//!
//! Catalog mutations return a typed [`CatalogEvent`] and publish it to every
//! subscriber of a [`CatalogNotifier`]. Open worksheets subscribe and apply
//! the events they receive, so a price change reaches them explicitly.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::models::{CatalogItem, ResourceCategory};

/// A change made to the supply catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum CatalogEvent {
    Created(CatalogItem),
    Updated(CatalogItem),
    Deleted { id: u64, category: ResourceCategory },
}

impl CatalogEvent {
    /// Catalog id the event refers to
    pub fn item_id(&self) -> u64 {
        match self {
            Self::Created(item) | Self::Updated(item) => item.id,
            Self::Deleted { id, .. } => *id,
        }
    }

    /// The item carried by a create or update
    pub fn item(&self) -> Option<&CatalogItem> {
        match self {
            Self::Created(item) | Self::Updated(item) => Some(item),
            Self::Deleted { .. } => None,
        }
    }
}

/// Fan-out hub for catalog events
///
/// Subscribers whose receiver has been dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct CatalogNotifier {
    subscribers: Mutex<Vec<Sender<CatalogEvent>>>,
}

impl CatalogNotifier {
    /// Create a notifier with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Receiver<CatalogEvent> {
        let (tx, rx) = channel();
        self.lock().push(tx);
        rx
    }

    /// Deliver an event to every live subscriber
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, event: &CatalogEvent) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    // The subscriber list stays consistent even if a holder panicked
    fn lock(&self) -> MutexGuard<'_, Vec<Sender<CatalogEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn item() -> CatalogItem {
        CatalogItem::new(5, "Rebar", "kg", Decimal::from(12), ResourceCategory::Materials)
    }

    #[test]
    fn test_publish_reaches_subscribers() {
        let notifier = CatalogNotifier::new();
        let rx1 = notifier.subscribe();
        let rx2 = notifier.subscribe();

        let delivered = notifier.publish(&CatalogEvent::Updated(item()));
        assert_eq!(delivered, 2);
        assert_eq!(rx1.try_recv().unwrap().item_id(), 5);
        assert_eq!(rx2.try_recv().unwrap().item_id(), 5);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let notifier = CatalogNotifier::new();
        let rx = notifier.subscribe();
        drop(notifier.subscribe());
        assert_eq!(notifier.subscriber_count(), 2);

        notifier.publish(&CatalogEvent::Deleted {
            id: 5,
            category: ResourceCategory::Materials,
        });
        assert_eq!(notifier.subscriber_count(), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_subscribe_after_poisoned_lock() {
        let notifier = Arc::new(CatalogNotifier::new());
        let shared = Arc::clone(&notifier);
        let _ = std::thread::spawn(move || {
            let _guard = shared.subscribers.lock().unwrap();
            panic!("worker died holding the subscriber list");
        })
        .join();
        assert!(notifier.subscribers.is_poisoned());

        let rx = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(notifier.publish(&CatalogEvent::Updated(item())), 1);
        assert_eq!(rx.try_recv().unwrap().item_id(), 5);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(CatalogEvent::Created(item())).unwrap();
        assert_eq!(json["event"], "created");
        assert_eq!(json["name"], "Rebar");
    }
}
