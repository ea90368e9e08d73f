// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Exclusive execution gate
//!
//! One lock owns the exchange cache. Handlers hold it for their whole body,
//! so every read-modify-write of a record happens in a total order and no
//! update is lost. The lock is a fair async mutex: waiters enter in the
//! order they asked.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};

use crate::exchange::ExchangeCache;

/// Serializes all access to the exchange cache
#[derive(Debug, Default)]
pub struct ExecutionGate {
    cache: Mutex<ExchangeCache>,
    entries: AtomicU64,
}

/// Critical section; the gate is released on drop
#[derive(Debug)]
pub struct GateGuard<'a> {
    guard: MutexGuard<'a, ExchangeCache>,
}

impl ExecutionGate {
    pub fn new(cache: ExchangeCache) -> Self {
        Self {
            cache: Mutex::new(cache),
            entries: AtomicU64::new(0),
        }
    }

    /// Wait for the gate and enter the critical section
    pub async fn enter(&self) -> GateGuard<'_> {
        let start = Instant::now();
        let guard = self.cache.lock().await;
        self.entries.fetch_add(1, Ordering::Relaxed);

        tracing::trace!(
            waited_us = start.elapsed().as_micros() as u64,
            "Entered execution gate"
        );
        GateGuard { guard }
    }

    /// Enter only if nobody holds the gate
    pub fn try_enter(&self) -> Option<GateGuard<'_>> {
        let guard = self.cache.try_lock().ok()?;
        self.entries.fetch_add(1, Ordering::Relaxed);
        Some(GateGuard { guard })
    }

    /// Number of critical sections entered so far
    pub fn entries(&self) -> u64 {
        self.entries.load(Ordering::Relaxed)
    }
}

impl Deref for GateGuard<'_> {
    type Target = ExchangeCache;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for GateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}
