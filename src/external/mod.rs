// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! External collaborators
//!
//! The service depends on four outside parties, each behind a trait:
//! replaying a captured request, reading configured endpoints, broadcasting
//! aggregated records, and starting a proof.

mod config_store;
mod observer;
mod prover;
mod replay;

use async_trait::async_trait;

use crate::error::Result;
use crate::exchange::ExchangeRecord;
use crate::payload::DisclosurePayload;

pub use config_store::MemoryConfigStore;
pub use observer::{BroadcastObserver, NullObserver, PublishCallback};
pub use prover::{ChannelProver, ProverMessage};
pub use replay::{HttpReplayer, ReplayConfig};

/// Re-issues a captured request to obtain a fresh response body
#[async_trait]
pub trait Replayer: Send + Sync {
    /// Response body text of the replayed request
    async fn replay(&self, record: &ExchangeRecord) -> Result<String>;
}

/// Persisted configuration lookup
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
}

/// Receives each aggregated record when its response starts
pub trait Observer: Send + Sync {
    fn publish(&self, record: &ExchangeRecord);
}

/// Notarization worker entry point
#[async_trait]
pub trait Prover: Send + Sync {
    /// Hand off a payload; the proof itself completes elsewhere
    async fn start_proof(&self, payload: DisclosurePayload) -> Result<()>;
}
