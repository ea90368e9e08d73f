// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Record observers

use std::sync::Arc;

use tokio::sync::broadcast;

use super::Observer;
use crate::exchange::ExchangeRecord;

/// Observer callback type
pub type PublishCallback = Arc<dyn Fn(&ExchangeRecord) + Send + Sync>;

impl Observer for PublishCallback {
    fn publish(&self, record: &ExchangeRecord) {
        (**self)(record)
    }
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn publish(&self, _record: &ExchangeRecord) {}
}

/// Fans records out to any number of subscribers
#[derive(Debug, Clone)]
pub struct BroadcastObserver {
    tx: broadcast::Sender<ExchangeRecord>,
}

impl BroadcastObserver {
    /// Create an observer buffering up to `capacity` records per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeRecord> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Observer for BroadcastObserver {
    fn publish(&self, record: &ExchangeRecord) {
        // No subscribers is not an error
        if self.tx.send(record.clone()).is_err() {
            tracing::trace!(exchange = %record.exchange_id, "No record subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[tokio::test]
    async fn test_broadcast_delivers_to_subscribers() {
        let observer = BroadcastObserver::new(8);
        let mut rx = observer.subscribe();
        assert_eq!(observer.subscriber_count(), 1);

        observer.publish(&ExchangeRecord::new(1, "a"));
        let record = rx.recv().await.unwrap();
        assert_eq!(record.exchange_id, "a");
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let observer = BroadcastObserver::new(1);
        observer.publish(&ExchangeRecord::new(1, "a"));
    }

    #[test]
    fn test_callback_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: PublishCallback = Arc::new(move |r: &ExchangeRecord| {
            sink.lock().push(r.exchange_id.clone());
        });

        callback.publish(&ExchangeRecord::new(1, "x"));
        NullObserver.publish(&ExchangeRecord::new(1, "y"));
        assert_eq!(*seen.lock(), vec!["x".to_string()]);
    }
}
