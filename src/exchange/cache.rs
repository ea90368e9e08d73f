// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-session storage of in-progress exchanges
//!
//! The cache is not synchronized on its own. It lives inside the
//! [`ExecutionGate`](crate::service::ExecutionGate) and every call happens
//! while the gate is held.

use std::collections::{HashMap, VecDeque};

use super::record::{ExchangeId, ExchangePatch, ExchangeRecord, SessionId};

/// Exchanges of one session, with creation order for capping
#[derive(Debug, Default)]
struct SessionEntries {
    records: HashMap<ExchangeId, ExchangeRecord>,
    order: VecDeque<ExchangeId>,
}

/// Two-level store: session -> (exchange -> record)
#[derive(Debug, Default)]
pub struct ExchangeCache {
    sessions: HashMap<SessionId, SessionEntries>,
    /// Maximum exchanges kept per session (None = bounded by session lifetime)
    max_per_session: Option<usize>,
}

impl ExchangeCache {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of exchanges kept per session
    ///
    /// When a new exchange would exceed the cap, the oldest-created exchange
    /// of that session is dropped. A cap of zero is treated as one.
    pub fn max_exchanges_per_session(mut self, max: Option<usize>) -> Self {
        self.max_per_session = max.map(|m| m.max(1));
        self
    }

    /// Get a record
    pub fn get(&self, session: SessionId, exchange: &str) -> Option<&ExchangeRecord> {
        self.sessions
            .get(&session)
            .and_then(|entries| entries.records.get(exchange))
    }

    /// Merge a partial update, creating the record if absent
    pub fn merge(
        &mut self,
        session: SessionId,
        exchange: &str,
        patch: ExchangePatch,
    ) -> &ExchangeRecord {
        let limit = self.max_per_session;
        let entries = self.sessions.entry(session).or_default();

        if !entries.records.contains_key(exchange) {
            if let Some(limit) = limit {
                while entries.records.len() >= limit {
                    let Some(oldest) = entries.order.pop_front() else {
                        break;
                    };
                    entries.records.remove(&oldest);
                    tracing::debug!(session, exchange = %oldest, "Evicted oldest exchange");
                }
            }
            entries.order.push_back(exchange.to_string());
        }

        let record = entries
            .records
            .entry(exchange.to_string())
            .or_insert_with(|| ExchangeRecord::new(session, exchange));
        record.apply(patch);
        record
    }

    /// Drop every record of a session, returning how many were removed
    pub fn evict_session(&mut self, session: SessionId) -> usize {
        self.sessions
            .remove(&session)
            .map(|entries| entries.records.len())
            .unwrap_or(0)
    }

    /// Number of exchanges held for a session
    pub fn session_len(&self, session: SessionId) -> usize {
        self.sessions
            .get(&session)
            .map(|entries| entries.records.len())
            .unwrap_or(0)
    }

    /// Total number of exchanges across sessions
    pub fn len(&self) -> usize {
        self.sessions.values().map(|e| e.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sessions currently holding at least one record
    pub fn sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::HeaderEntry;

    #[test]
    fn test_merge_creates_lazily() {
        let mut cache = ExchangeCache::new();
        assert!(cache.get(1, "a").is_none());

        cache.merge(1, "a", ExchangePatch::new().method("GET"));
        let record = cache.get(1, "a").unwrap();
        assert_eq!(record.method.as_deref(), Some("GET"));
        assert_eq!(record.session_id, 1);
        assert_eq!(record.exchange_id, "a");
    }

    #[test]
    fn test_merge_is_field_union() {
        let mut cache = ExchangeCache::new();
        cache.merge(
            1,
            "a",
            ExchangePatch::new()
                .method("POST")
                .request_headers(vec![HeaderEntry::new("Cookie", "x")]),
        );
        cache.merge(
            1,
            "a",
            ExchangePatch::new().response_headers(vec![HeaderEntry::new("Server", "y")]),
        );

        let record = cache.get(1, "a").unwrap();
        assert_eq!(record.method.as_deref(), Some("POST"));
        assert_eq!(record.request_headers().len(), 1);
        assert_eq!(record.response_headers().len(), 1);
    }

    #[test]
    fn test_same_exchange_id_in_two_sessions() {
        let mut cache = ExchangeCache::new();
        cache.merge(1, "a", ExchangePatch::new().url("https://one.test/"));
        cache.merge(2, "a", ExchangePatch::new().url("https://two.test/"));

        assert_eq!(cache.get(1, "a").unwrap().url.as_deref(), Some("https://one.test/"));
        assert_eq!(cache.get(2, "a").unwrap().url.as_deref(), Some("https://two.test/"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evict_session() {
        let mut cache = ExchangeCache::new();
        cache.merge(1, "a", ExchangePatch::new());
        cache.merge(1, "b", ExchangePatch::new());
        cache.merge(2, "c", ExchangePatch::new());

        assert_eq!(cache.evict_session(1), 2);
        assert!(cache.get(1, "a").is_none());
        assert!(cache.get(1, "b").is_none());
        assert!(cache.get(2, "c").is_some());
        assert_eq!(cache.sessions(), vec![2]);
        assert_eq!(cache.evict_session(1), 0);
    }

    #[test]
    fn test_session_cap_evicts_oldest() {
        let mut cache = ExchangeCache::new().max_exchanges_per_session(Some(2));
        cache.merge(1, "a", ExchangePatch::new());
        cache.merge(1, "b", ExchangePatch::new());
        // Updating an existing exchange never evicts
        cache.merge(1, "a", ExchangePatch::new().method("GET"));
        assert_eq!(cache.session_len(1), 2);

        cache.merge(1, "c", ExchangePatch::new());
        assert_eq!(cache.session_len(1), 2);
        assert!(cache.get(1, "a").is_none());
        assert!(cache.get(1, "b").is_some());
        assert!(cache.get(1, "c").is_some());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut cache = ExchangeCache::new();
        for i in 0..500 {
            cache.merge(1, &i.to_string(), ExchangePatch::new());
        }
        assert_eq!(cache.session_len(1), 500);
        assert!(!cache.is_empty());
    }
}
